//! Frequency-based keyword extraction.
//!
//! Tokenizes section text case-insensitively, filters stopwords, and
//! returns the top-N terms ordered by descending frequency with ties broken
//! by first-occurrence order. Terms found in the static glossary carry a
//! short definition; unknown terms get `None` and never block extraction.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use super::*;

lazy_static! {
  /// Word tokens: three or more ASCII letters.
  static ref WORD: Regex = Regex::new(r"[a-z]{3,}").unwrap();
}

/// One extracted keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntry {
  /// The lowercase term.
  pub term:       String,
  /// Number of occurrences in the analyzed text.
  pub frequency:  usize,
  /// Short gloss from the domain glossary, when known.
  pub definition: Option<String>,
}

/// Computes term-frequency keywords over structured text.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
  /// Number of keywords to return.
  top_n: usize,
}

impl KeywordExtractor {
  /// Creates an extractor returning `config.keyword_count` terms.
  pub fn new(config: &AnalyzerConfig) -> Self { Self { top_n: config.keyword_count } }

  /// Extracts the top keywords from `text`.
  ///
  /// Ordering is by descending frequency; equal frequencies preserve the
  /// order in which the terms first appear in the text.
  pub fn extract(&self, text: &str) -> Vec<KeywordEntry> {
    let cleaned = format::clean_text(text).to_lowercase();

    // frequency and first-occurrence index per term
    let mut stats: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, token) in WORD.find_iter(&cleaned).enumerate() {
      let term = token.as_str();
      if resources::STOPWORDS.contains(term) {
        continue;
      }
      let entry = stats.entry(term).or_insert((0, position));
      entry.0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> =
      stats.into_iter().map(|(term, (freq, first))| (term, freq, first)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(self.top_n);

    ranked
      .into_iter()
      .map(|(term, frequency, _)| KeywordEntry {
        term: term.to_owned(),
        frequency,
        definition: resources::GLOSSARY.get(term).map(|s| (*s).to_owned()),
      })
      .collect()
  }

  /// Returns glossary terms that appear in `summary_text` but missed the
  /// frequency cut, capped at `limit` additions and never growing the
  /// combined list beyond the configured top-N. These implicit keywords
  /// get a frequency of zero since they were not counted in the source
  /// text.
  pub fn implicit_keywords(
    &self,
    summary_text: &str,
    existing: &[KeywordEntry],
    limit: usize,
  ) -> Vec<KeywordEntry> {
    let room = limit.min(self.top_n.saturating_sub(existing.len()));
    let lowered = summary_text.to_lowercase();
    let mut entries: Vec<_> = resources::GLOSSARY
      .iter()
      .filter(|(term, _)| lowered.contains(*term as &str))
      .filter(|(term, _)| existing.iter().all(|k| k.term != **term))
      .map(|(term, definition)| KeywordEntry {
        term:       (*term).to_owned(),
        frequency:  0,
        definition: Some((*definition).to_owned()),
      })
      .collect();
    // HashMap iteration order is arbitrary; keep output deterministic.
    entries.sort_by(|a, b| a.term.cmp(&b.term));
    entries.truncate(room);
    entries
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn extractor() -> KeywordExtractor { KeywordExtractor::new(&AnalyzerConfig::default()) }

  #[test]
  fn test_frequency_ordering_with_tiebreak() {
    // "model" x5 appears before "data" x5; "network" x3 trails both.
    let text = "model data model data model data model data model data \
                network network network";
    let keywords = extractor().extract(text);

    let terms: Vec<&str> = keywords.iter().map(|k| k.term.as_str()).collect();
    assert_eq!(&terms[..3], &["model", "data", "network"]);
    assert_eq!(keywords[0].frequency, 5);
    assert_eq!(keywords[2].frequency, 3);
  }

  #[test]
  fn test_stopwords_filtered() {
    let keywords = extractor().extract("the the the gradient gradient and and with");
    let terms: Vec<&str> = keywords.iter().map(|k| k.term.as_str()).collect();
    assert_eq!(terms, vec!["gradient"]);
  }

  #[test]
  fn test_case_insensitive() {
    let keywords = extractor().extract("Transformer TRANSFORMER transformer");
    assert_eq!(keywords[0].term, "transformer");
    assert_eq!(keywords[0].frequency, 3);
  }

  #[test]
  fn test_glossary_definitions() {
    let keywords = extractor().extract("transformer snailhouse transformer snailhouse");
    let transformer = keywords.iter().find(|k| k.term == "transformer").unwrap();
    let unknown = keywords.iter().find(|k| k.term == "snailhouse").unwrap();
    assert!(transformer.definition.is_some());
    assert!(unknown.definition.is_none());
  }

  #[test]
  fn test_top_n_cap() {
    let config = AnalyzerConfig { keyword_count: 2, ..Default::default() };
    let keywords = KeywordExtractor::new(&config).extract("alpha beta gamma delta epsilon");
    assert_eq!(keywords.len(), 2);
  }

  #[test]
  fn test_short_tokens_ignored() {
    let keywords = extractor().extract("ab cd ef longword");
    let terms: Vec<&str> = keywords.iter().map(|k| k.term.as_str()).collect();
    assert_eq!(terms, vec!["longword"]);
  }

  #[test]
  fn test_implicit_keywords() {
    let existing = extractor().extract("gradient gradient");
    let implicit =
      extractor().implicit_keywords("uses attention and an encoder", &existing, 5);
    let terms: Vec<&str> = implicit.iter().map(|k| k.term.as_str()).collect();
    assert_eq!(terms, vec!["attention", "encoder"]);
  }

  #[test]
  fn test_implicit_keywords_respect_top_n() {
    let config = AnalyzerConfig { keyword_count: 3, ..Default::default() };
    let extractor = KeywordExtractor::new(&config);
    let existing = extractor.extract("alpha beta gamma alpha beta gamma");

    // The list is already at the cap, so nothing is appended.
    let implicit = extractor.implicit_keywords("attention encoder decoder", &existing, 5);
    assert!(implicit.is_empty());
  }
}
