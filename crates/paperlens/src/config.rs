//! Tunable parameters for the analysis pipeline.
//!
//! Every heuristic threshold lives here rather than being hard-coded at its
//! point of use, so callers can tighten or relax behavior without touching
//! the components. [`AnalyzerConfig::default`] matches the documented
//! contract: a 20 MB input cap, a 5 second lookup timeout, a 150 word short
//! summary, and the top 10 keywords.

use std::time::Duration;

/// Configuration for an [`Analyzer`](crate::Analyzer) and its components.
///
/// A config is cheap to clone and is copied into each component at
/// construction time; changing a config after building an analyzer has no
/// effect on it.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
  /// Maximum accepted PDF size in bytes. Inputs above this fail fast with
  /// [`PaperlensError::InputTooLarge`](crate::errors::PaperlensError).
  pub max_input_bytes: u64,

  /// Maximum number of pages to process. Pages beyond the cap are skipped
  /// with a warning rather than failing the request.
  pub max_pages: usize,

  /// Fraction of mathematical characters above which a short text block is
  /// treated as a formula and replaced with a placeholder.
  pub formula_char_ratio: f32,

  /// Number of keywords returned by the keyword extractor.
  pub keyword_count: usize,

  /// Word budget for the short summary.
  pub short_summary_words: usize,

  /// Word budget for each per-section summary in the long summary.
  pub section_summary_words: usize,

  /// Timeout for one bibliographic metadata lookup. The resolver makes at
  /// most one attempt per identifier, so a request spends at most this long
  /// per identifier waiting on metadata.
  pub lookup_timeout: Duration,

  /// Ceiling for one generative oracle call. On expiry the summarizer falls
  /// back to the extractive method.
  pub oracle_timeout: Duration,

  /// Citation-count threshold for flagging a reference as a classic paper.
  /// `None` disables the count-based signal; the landmark-title list still
  /// applies. The exact threshold is a product decision, hence configurable.
  pub classic_citation_threshold: Option<u32>,
}

impl Default for AnalyzerConfig {
  fn default() -> Self {
    Self {
      max_input_bytes:            20 * 1024 * 1024,
      max_pages:                  100,
      formula_char_ratio:         0.15,
      keyword_count:              10,
      short_summary_words:        150,
      section_summary_words:      100,
      lookup_timeout:             Duration::from_secs(5),
      oracle_timeout:             Duration::from_secs(10),
      classic_citation_threshold: None,
    }
  }
}
