//! intervu: LLM-backed résumé scoring and mock interviews

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use intervu::cli::{Cli, Commands, ConfigAction};
use intervu::config::Config;
use intervu::input::InputManager;
use intervu::interview::{SessionStore, StoreSettings};
use intervu::llm::OpenAiGateway;
use intervu::output::{formatter_for, save_to_file, ConsoleFormatter};
use intervu::processing::analyzer::{
    improvement_suggestions, summarize_resume, ResumeAnalysisRequest, ResumeAnalyzer,
};
use intervu::processing::chunker::chunk_text;
use intervu::processing::document::JobCategory;
use intervu::processing::normalizer::TextNormalizer;
use intervu::processing::sections::SectionClassifier;
use log::{error, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    if let Err(e) = run_command(cli.command, cli.config, config).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config_path: Option<PathBuf>, config: Config) -> Result<()> {
    let formatter = formatter_for(config.output.format, config.output.color_output);

    match command {
        Commands::Extract { file, chunks } => {
            let document = InputManager::new().extract(&file).await?;
            if chunks {
                println!("{}", formatter.format_chunks(&document.chunks)?);
            } else {
                println!("{}", document.full_text);
            }
        }

        Commands::Sections { file } => {
            let document = InputManager::new().extract(&file).await?;
            let cleaned = TextNormalizer::new().clean_lines(&document.full_text);
            let sections = SectionClassifier::new()?.classify(&cleaned);
            println!("{}", formatter.format_sections(&sections)?);
        }

        Commands::Chunk { file, size, overlap } => {
            let document = InputManager::new().extract(&file).await?;
            let size = size.unwrap_or(config.processing.chunk_size);
            let overlap = overlap.unwrap_or(config.processing.chunk_overlap);
            let chunks = chunk_text(&document.full_text, size, overlap)?;
            info!("Created {} chunks (size {}, overlap {})", chunks.len(), size, overlap);
            println!("{}", formatter.format_chunks(&chunks)?);
        }

        Commands::Analyze {
            resume,
            job,
            description,
            category,
            save,
        } => {
            let gateway = build_gateway(&config)?;
            let mut analyzer = ResumeAnalyzer::new(gateway, config.gateway_timeout())?;

            let upload = analyzer
                .process_uploaded_file(&resume)
                .await
                .with_context(|| format!("Failed to read résumé {}", resume.display()))?;
            info!("Loaded {} ({} bytes)", upload.filename, upload.file_size);

            let job_description = match description {
                Some(path) => Some(InputManager::new().extract(&path).await?.full_text),
                None => None,
            };

            let request = ResumeAnalysisRequest {
                resume_text: upload.full_text,
                target_job: job,
                job_description,
                job_category: category,
            };

            let pb = spinner("Analyzing résumé...");
            let analysis = analyzer.analyze(&request).await;
            pb.finish_and_clear();

            let rendered = formatter.format_analysis(&analysis)?;
            println!("{}", rendered);
            if let Some(path) = save {
                save_output(&rendered, &path)?;
            }
        }

        Commands::Summary { resume, job } => {
            let document = InputManager::new().extract(&resume).await?;
            let cleaned = TextNormalizer::new().clean_lines(&document.full_text);
            let summary = summarize_resume(&SectionClassifier::new()?, &cleaned);
            println!("{}", formatter.format_resume_summary(&summary)?);

            if let Some(job) = job {
                println!("{}", format!("Suggestions for {}:", job).bold());
                for suggestion in improvement_suggestions(&job) {
                    println!("  • {}", suggestion);
                }
            }
        }

        Commands::Interview {
            category,
            background,
            resume,
            save,
        } => {
            let background = match (background, resume) {
                (Some(text), _) => text,
                (None, Some(path)) => {
                    let document = InputManager::new().extract(&path).await?;
                    TextNormalizer::new().clean(&document.full_text)
                }
                (None, None) => String::new(),
            };

            let store = SessionStore::new(build_gateway(&config)?, StoreSettings::from(&config.interview));
            run_interview(&store, category, &background, &config, save.as_deref()).await?;
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration ({})\n", path.display());
                    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
                    println!("{}", rendered);
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset successfully!");
                }
            }
        }
    }

    Ok(())
}

async fn run_interview(
    store: &SessionStore,
    category: JobCategory,
    background: &str,
    config: &Config,
    save: Option<&Path>,
) -> Result<()> {
    let pb = spinner("Generating interview questions...");
    let created = store.create_session(category, background).await;
    pb.finish_and_clear();
    let session = created?;

    let console = ConsoleFormatter::new(config.output.color_output);
    let total = session.questions().len();
    println!(
        "{} {} questions for {}. Type :quit to stop early.",
        "🎤".bold(),
        total,
        category
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(question) = store.current_question(session.id()).await {
        let index = store.summary(session.id()).await?.current_question;
        print!("{}> ", console.format_question(index, total, &question));
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let answer = line.trim();
        if answer == ":quit" {
            break;
        }
        if answer.is_empty() {
            continue;
        }

        let outcome = store.submit_answer(session.id(), answer).await?;
        if outcome.completed {
            println!("\n{}", "All questions answered.".green());
        }
    }

    let summary = store.summary(session.id()).await?;
    if summary.answered_questions == 0 {
        println!("No answers recorded; nothing to evaluate.");
        return Ok(());
    }

    let pb = spinner("Evaluating answers...");
    let evaluated = store.evaluate(session.id()).await;
    pb.finish_and_clear();

    let rendered = formatter_for(config.output.format, config.output.color_output).format_evaluation(&evaluated?)?;
    println!("{}", rendered);
    if let Some(path) = save {
        save_output(&rendered, path)?;
    }
    Ok(())
}

fn build_gateway(config: &Config) -> Result<Arc<OpenAiGateway>> {
    let api_key = config.api_key()?;
    let gateway = OpenAiGateway::new(&config.llm, api_key).context("Failed to build LLM client")?;
    info!("Using model {} at {}", gateway.model(), config.llm.base_url);
    Ok(Arc::new(gateway))
}

fn save_output(content: &str, path: &Path) -> Result<()> {
    save_to_file(content, path).with_context(|| format!("Failed to save output to {}", path.display()))?;
    println!("💾 Saved to {}", path.display());
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
