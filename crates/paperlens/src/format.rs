//! Text formatting utilities shared across the pipeline.
//!
//! These helpers clean extracted text before it reaches the summarizer or
//! keyword extractor (placeholder removal, whitespace collapsing), enforce
//! word budgets at word boundaries, and shorten node labels for graph
//! output.
//!
//! # Examples
//!
//! ```
//! use paperlens::format;
//!
//! let text = "A <formula 1 (page 2)> appears   here.";
//! assert_eq!(format::clean_text(text), "A appears here.");
//!
//! assert_eq!(format::truncate_words("one two three four", 2), "one two");
//! ```

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
  /// Matches the inline placeholders the extractor inserts for formulas and
  /// figures.
  static ref PLACEHOLDER: Regex = Regex::new(r"<(?:formula|figure)[^>]*>").unwrap();
}

/// Removes formula/figure placeholders and collapses runs of whitespace into
/// single spaces.
///
/// Summaries and keyword statistics should not be polluted by placeholder
/// markers, so both components run their input through this first.
pub fn clean_text(text: &str) -> String {
  let without_placeholders = PLACEHOLDER.replace_all(text, " ");
  without_placeholders.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates `text` to at most `max_words` whitespace-separated words,
/// preserving word boundaries.
///
/// Returns the input unchanged (modulo trailing whitespace) when it is
/// already within the budget.
pub fn truncate_words(text: &str, max_words: usize) -> String {
  let words: Vec<&str> = text.split_whitespace().collect();
  if words.len() <= max_words {
    return words.join(" ");
  }
  words[..max_words].join(" ")
}

/// Shortens a string to `max_chars` characters for use as a graph node
/// label, appending an ellipsis when truncation occurred.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
  let mut out = String::new();
  for (i, c) in text.chars().enumerate() {
    if i >= max_chars {
      out.push('…');
      return out;
    }
    out.push(c);
  }
  out
}

/// Splits text into sentences on `.`, `!`, or `?` followed by whitespace.
///
/// The terminator stays attached to its sentence. This is a deliberately
/// simple splitter; abbreviations like "et al." may over-split, which the
/// salience scoring downstream tolerates.
pub fn split_sentences(text: &str) -> Vec<String> {
  let mut sentences = Vec::new();
  let mut current = String::new();
  let mut chars = text.chars().peekable();

  while let Some(c) = chars.next() {
    current.push(c);
    if matches!(c, '.' | '!' | '?') {
      if chars.peek().map_or(true, |next| next.is_whitespace()) {
        let sentence = current.trim().to_string();
        if !sentence.is_empty() {
          sentences.push(sentence);
        }
        current.clear();
      }
    }
  }

  let tail = current.trim().to_string();
  if !tail.is_empty() {
    sentences.push(tail);
  }

  sentences
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_clean_text() {
    assert_eq!(clean_text("a  b\n c"), "a b c");
    assert_eq!(clean_text("before <formula 3 (page 1)> after"), "before after");
    assert_eq!(clean_text("<figure 1 (page 2)>"), "");
  }

  #[test]
  fn test_truncate_words() {
    assert_eq!(truncate_words("short text", 10), "short text");
    assert_eq!(truncate_words("one two three", 2), "one two");
    assert_eq!(truncate_words("", 5), "");
  }

  #[test]
  fn test_truncate_label() {
    assert_eq!(truncate_label("short", 10), "short");
    assert_eq!(truncate_label("a longer label", 8), "a longer…");
  }

  #[test]
  fn test_split_sentences() {
    let sentences = split_sentences("First one. Second one! Third?");
    assert_eq!(sentences, vec!["First one.", "Second one!", "Third?"]);
  }

  #[test]
  fn test_split_sentences_unterminated_tail() {
    let sentences = split_sentences("Complete sentence. trailing fragment");
    assert_eq!(sentences, vec!["Complete sentence.", "trailing fragment"]);
  }

  #[test]
  fn test_split_sentences_no_split_mid_token() {
    // A period not followed by whitespace stays inside its sentence.
    let sentences = split_sentences("See arxiv.org for details. Done.");
    assert_eq!(sentences, vec!["See arxiv.org for details.", "Done."]);
  }
}
