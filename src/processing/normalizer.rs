//! Text normalization

use regex::Regex;

/// Collapses whitespace and strips characters outside the allow-list
pub struct TextNormalizer {
    disallowed: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        // word chars, whitespace, CJK ideographs and a fixed punctuation set
        let disallowed = Regex::new(r#"[^\w\s\x{4e00}-\x{9fff}.,!?;:()\[\]{}"'\-]"#)
            .expect("Invalid normalizer regex");

        Self { disallowed }
    }

    /// Clean text into a single line
    pub fn clean(&self, text: &str) -> String {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        self.disallowed.replace_all(&collapsed, "").trim().to_string()
    }

    /// Clean each line independently, keeping the line structure
    pub fn clean_lines(&self, text: &str) -> String {
        text.lines()
            .map(|line| self.clean(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
