//! Markup stripping and whitespace normalization
//!
//! Journal entries arrive as rich text (markdown, sometimes with stray
//! inline HTML). The tagger wants plain prose, so everything structural is
//! dropped and only visible text survives. Malformed markup is handled
//! best-effort; the parser never fails.

use pulldown_cmark::{Event, Options, Parser};

/// Strips markup and collapses whitespace
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Reduce rich text to plain prose with single-space separation
    pub fn normalize(&self, text: &str) -> String {
        let parser = Parser::new_ext(text, Options::empty());
        let mut out = String::new();

        for event in parser {
            match event {
                Event::Text(t) | Event::Code(t) => {
                    out.push_str(&t);
                    out.push(' ');
                }
                Event::SoftBreak | Event::HardBreak => out.push(' '),
                // Inline/block HTML is dropped wholesale
                Event::Html(_) | Event::InlineHtml(_) => {}
                _ => {}
            }
        }

        Self::collapse_whitespace(&out)
    }

    fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_formatting() {
        let normalizer = TextNormalizer::new();
        let plain = normalizer.normalize("# Morning\n\nHad **coffee** with *Anna* today.");
        assert_eq!(plain, "Morning Had coffee with Anna today.");
    }

    #[test]
    fn drops_inline_html() {
        let normalizer = TextNormalizer::new();
        let plain = normalizer.normalize("Went <b>running</b> <span>by the lake</span>");
        assert_eq!(plain, "Went running by the lake");
    }

    #[test]
    fn collapses_whitespace_runs() {
        let normalizer = TextNormalizer::new();
        let plain = normalizer.normalize("too   many\n\n\nspaces   here");
        assert_eq!(plain, "too many spaces here");
    }

    #[test]
    fn unclosed_markup_is_best_effort() {
        let normalizer = TextNormalizer::new();
        let plain = normalizer.normalize("an **unclosed emphasis and <div unfinished");
        assert!(plain.contains("unclosed emphasis"));
    }

    #[test]
    fn empty_input_stays_empty() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("   \n  "), "");
    }
}
