//! Multi-granularity summarization with oracle fallback.
//!
//! The summarizer produces a short (bounded word count) overview and a long
//! per-section summary. When a generative [`TextOracle`] is configured,
//! each summary is delegated to it under a timeout ceiling; on any oracle
//! failure the deterministic extractive method takes over and the
//! degradation is recorded in the result's [`GenerationMethod`] tag. Oracle
//! failure never propagates to the caller.
//!
//! The extractive method scores sentences by position (leading and trailing
//! sentences weigh more) and by cue words ("propose", "demonstrate", ...),
//! then greedily fills the word budget with the highest-scoring sentences.
//!
//! # Examples
//!
//! ```
//! use paperlens::{AnalyzerConfig, GenerationMethod, Summarizer, SummaryMode};
//! use paperlens::structure::{Section, StructuredText};
//!
//! let text = StructuredText {
//!   sections: vec![(Section::Abstract, "We study snail routing.".into())],
//!   ..Default::default()
//! };
//!
//! let summarizer = Summarizer::rule_based(&AnalyzerConfig::default());
//! let result = tokio_test::block_on(summarizer.summarize(&text, SummaryMode::Short));
//! assert_eq!(result.generation_method, GenerationMethod::RuleBased);
//! assert!(result.short_summary.unwrap().contains("snail routing"));
//! ```

use super::*;

/// Which summaries to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMode {
  /// Only the short overview.
  Short,
  /// Only the per-section long summary.
  Long,
  /// Both granularities.
  Both,
}

/// How a summary was produced, recorded for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
  /// Every summary came from the generative oracle.
  Model,
  /// At least one summary used the deterministic extractive fallback.
  RuleBased,
}

/// The per-section long summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LongSummary {
  /// One summary per structured section, in [`StructuredText`] order.
  pub sections:  Vec<(Section, String)>,
  /// The section summaries concatenated with headers, preserving order.
  pub full_text: String,
}

/// The packed summarization result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
  /// Short overview, present unless the mode was [`SummaryMode::Long`].
  pub short_summary:     Option<String>,
  /// Per-section summary, present unless the mode was
  /// [`SummaryMode::Short`].
  pub long_summary:      Option<LongSummary>,
  /// Extracted keywords, including capped implicit glossary matches.
  pub keywords:          Vec<KeywordEntry>,
  /// Whether the oracle or the fallback produced the summaries.
  pub generation_method: GenerationMethod,
}

/// Instruction sent with a short-summary oracle call.
const SHORT_PROMPT: &str = "Summarize this paper's core contribution, the problem it solves, and \
                            its main result in at most 150 words of plain prose.";

/// Instruction sent with a per-section oracle call.
const SECTION_PROMPT: &str =
  "Summarize this section of an academic paper in at most 100 words of plain prose.";

/// Produces short and long summaries over structured text.
///
/// Generic over the oracle implementation; construct with
/// [`Summarizer::with_oracle`] for model-backed summarization or
/// [`Summarizer::rule_based`] for the pure extractive path.
pub struct Summarizer<O = HttpOracle> {
  /// The generative backend, if any.
  oracle:        Option<O>,
  /// Ceiling for one oracle call.
  timeout:       Duration,
  /// Word budget for the short summary.
  short_words:   usize,
  /// Word budget for each section summary.
  section_words: usize,
  /// Keyword extraction riding along with summarization.
  keywords:      KeywordExtractor,
}

impl Summarizer<HttpOracle> {
  /// Creates a summarizer that always uses the extractive method.
  pub fn rule_based(config: &AnalyzerConfig) -> Self {
    Self {
      oracle:        None,
      timeout:       config.oracle_timeout,
      short_words:   config.short_summary_words,
      section_words: config.section_summary_words,
      keywords:      KeywordExtractor::new(config),
    }
  }
}

impl<O: TextOracle> Summarizer<O> {
  /// Creates a summarizer backed by `oracle`, with the extractive method as
  /// its fallback.
  pub fn with_oracle(oracle: O, config: &AnalyzerConfig) -> Self {
    Self {
      oracle:        Some(oracle),
      timeout:       config.oracle_timeout,
      short_words:   config.short_summary_words,
      section_words: config.section_summary_words,
      keywords:      KeywordExtractor::new(config),
    }
  }

  /// Summarizes `text` at the requested granularity.
  ///
  /// Never fails: oracle errors and timeouts degrade to the extractive
  /// method, tagged [`GenerationMethod::RuleBased`]. For empty input the
  /// summaries are empty strings, still a well-formed result.
  pub async fn summarize(&self, text: &StructuredText, mode: SummaryMode) -> SummaryResult {
    let mut degraded = self.oracle.is_none();

    let short_summary = match mode {
      SummaryMode::Short | SummaryMode::Both => {
        let input = self.short_input(text);
        let (summary, fell_back) = self.generate(SHORT_PROMPT, &input, self.short_words).await;
        degraded |= fell_back;
        Some(summary)
      },
      SummaryMode::Long => None,
    };

    let long_summary = match mode {
      SummaryMode::Long | SummaryMode::Both => {
        let mut sections = Vec::new();
        for (section, section_text) in &text.sections {
          if *section == Section::References {
            continue;
          }
          let cleaned = format::clean_text(section_text);
          if cleaned.is_empty() {
            continue;
          }
          let (summary, fell_back) =
            self.generate(SECTION_PROMPT, &cleaned, self.section_words).await;
          degraded |= fell_back;
          sections.push((*section, summary));
        }

        let full_text = sections
          .iter()
          .map(|(section, summary)| format!("[{section}] {summary}"))
          .collect::<Vec<_>>()
          .join("\n\n");
        Some(LongSummary { sections, full_text })
      },
      SummaryMode::Short => None,
    };

    let mut keywords = self.keywords.extract(&text.combined());
    let summary_view = format!(
      "{} {}",
      short_summary.as_deref().unwrap_or(""),
      long_summary.as_ref().map(|l| l.full_text.as_str()).unwrap_or("")
    );
    let implicit = self.keywords.implicit_keywords(&summary_view, &keywords, 5);
    keywords.extend(implicit);

    SummaryResult {
      short_summary,
      long_summary,
      keywords,
      generation_method: if degraded { GenerationMethod::RuleBased } else { GenerationMethod::Model },
    }
  }

  /// Runs one oracle call under the timeout ceiling, falling back to the
  /// extractive method on failure. Returns the summary and whether the
  /// fallback was used.
  async fn generate(&self, prompt: &str, input: &str, word_budget: usize) -> (String, bool) {
    if let Some(oracle) = &self.oracle {
      match tokio::time::timeout(self.timeout, oracle.generate(prompt, input)).await {
        Ok(Ok(generated)) => return (format::truncate_words(generated.trim(), word_budget), false),
        Ok(Err(e)) => debug!("oracle failed, using extractive fallback: {e}"),
        Err(_) => debug!("oracle exceeded {:?} ceiling, using extractive fallback", self.timeout),
      }
    }
    (extractive_summary(input, word_budget), true)
  }

  /// Picks the short-summary input by priority: abstract, then
  /// introduction plus conclusion, then whatever text is available.
  fn short_input(&self, text: &StructuredText) -> String {
    if let Some(abstract_text) = text.section(Section::Abstract) {
      return format::clean_text(abstract_text);
    }

    let intro = text.section(Section::Introduction);
    let conclusion = text.section(Section::Conclusion);
    if intro.is_some() || conclusion.is_some() {
      let joined =
        [intro, conclusion].into_iter().flatten().collect::<Vec<_>>().join("\n\n");
      return format::clean_text(&joined);
    }

    format::truncate_words(&format::clean_text(&text.combined()), 1000)
  }
}

/// Deterministic extractive summarization: scores sentences by position and
/// cue words, then greedily fills the word budget in score order.
pub fn extractive_summary(text: &str, word_budget: usize) -> String {
  let sentences = format::split_sentences(text);
  let total = sentences.len();

  let mut scored: Vec<(f32, usize, &String)> = sentences
    .iter()
    .enumerate()
    .filter(|(_, sentence)| sentence.len() >= 10)
    .map(|(i, sentence)| {
      let position_score = if i == 0 || i + 1 == total {
        2.0
      } else if i < 3 {
        1.5
      } else {
        1.0
      };
      let lowered = sentence.to_lowercase();
      let cue_score =
        if resources::CUE_WORDS.iter().any(|cue| lowered.contains(cue)) { 1.5 } else { 1.0 };
      (position_score * cue_score, i, sentence)
    })
    .collect();

  // Highest score first; ties keep document order for determinism.
  scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal).then(a.1.cmp(&b.1)));

  let mut summary = String::new();
  let mut words_used = 0;
  for (_, _, sentence) in &scored {
    let words = sentence.split_whitespace().count();
    if words_used + words > word_budget {
      continue;
    }
    if !summary.is_empty() {
      summary.push(' ');
    }
    summary.push_str(sentence);
    words_used += words;
  }

  // A single oversized sentence still yields a non-empty summary.
  if summary.is_empty() {
    if let Some(first) = sentences.first() {
      summary = format::truncate_words(first, word_budget);
    }
  }

  summary
}

#[cfg(test)]
mod tests {
  use super::*;

  /// An oracle that always fails, forcing the fallback path.
  struct FailingOracle;

  impl TextOracle for FailingOracle {
    async fn generate(&self, _prompt: &str, _input: &str) -> Result<String, OracleError> {
      Err(OracleError::Unavailable)
    }
  }

  /// An oracle that answers with a canned string.
  struct CannedOracle(&'static str);

  impl TextOracle for CannedOracle {
    async fn generate(&self, _prompt: &str, _input: &str) -> Result<String, OracleError> {
      Ok(self.0.to_owned())
    }
  }

  /// An oracle that never resolves, exercising the timeout ceiling.
  struct HangingOracle;

  impl TextOracle for HangingOracle {
    async fn generate(&self, _prompt: &str, _input: &str) -> Result<String, OracleError> {
      std::future::pending().await
    }
  }

  fn sample_text() -> StructuredText {
    StructuredText {
      sections:   vec![
        (
          Section::Abstract,
          "We propose a novel approach to snail routing. Our method improves throughput. \
           Experiments demonstrate a clear gain."
            .to_owned(),
        ),
        (Section::Conclusion, "We conclude that snails route well.".to_owned()),
      ],
      figures:    Vec::new(),
      references: Vec::new(),
    }
  }

  #[tokio::test]
  async fn test_rule_based_short_summary() {
    let summarizer = Summarizer::rule_based(&AnalyzerConfig::default());
    let result = summarizer.summarize(&sample_text(), SummaryMode::Short).await;

    let short = result.short_summary.unwrap();
    assert!(!short.is_empty());
    assert!(short.split_whitespace().count() <= 150);
    assert_eq!(result.generation_method, GenerationMethod::RuleBased);
    assert!(result.long_summary.is_none());
  }

  #[tokio::test]
  async fn test_oracle_failure_falls_back() {
    let summarizer = Summarizer::with_oracle(FailingOracle, &AnalyzerConfig::default());
    let result = summarizer.summarize(&sample_text(), SummaryMode::Both).await;

    assert_eq!(result.generation_method, GenerationMethod::RuleBased);
    assert!(!result.short_summary.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_oracle_success_is_tagged_model() {
    let summarizer =
      Summarizer::with_oracle(CannedOracle("A generated summary."), &AnalyzerConfig::default());
    let result = summarizer.summarize(&sample_text(), SummaryMode::Short).await;

    assert_eq!(result.generation_method, GenerationMethod::Model);
    assert_eq!(result.short_summary.as_deref(), Some("A generated summary."));
  }

  #[tokio::test]
  async fn test_hanging_oracle_hits_ceiling() {
    let config =
      AnalyzerConfig { oracle_timeout: Duration::from_millis(50), ..Default::default() };
    let summarizer = Summarizer::with_oracle(HangingOracle, &config);
    let result = summarizer.summarize(&sample_text(), SummaryMode::Short).await;

    assert_eq!(result.generation_method, GenerationMethod::RuleBased);
    assert!(!result.short_summary.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_long_summary_preserves_section_order() {
    let summarizer = Summarizer::rule_based(&AnalyzerConfig::default());
    let result = summarizer.summarize(&sample_text(), SummaryMode::Long).await;

    let long = result.long_summary.unwrap();
    let order: Vec<Section> = long.sections.iter().map(|(s, _)| *s).collect();
    assert_eq!(order, vec![Section::Abstract, Section::Conclusion]);
    assert!(long.full_text.contains("[abstract]"));
    assert!(long.full_text.contains("[conclusion]"));
  }

  #[tokio::test]
  async fn test_empty_input_yields_empty_summary() {
    let summarizer = Summarizer::rule_based(&AnalyzerConfig::default());
    let result = summarizer.summarize(&StructuredText::default(), SummaryMode::Both).await;

    assert_eq!(result.short_summary.as_deref(), Some(""));
    assert!(result.long_summary.unwrap().sections.is_empty());
    assert!(result.keywords.is_empty());
  }

  #[test]
  fn test_extractive_summary_respects_budget() {
    let text = "First sentence with propose. Second filler sentence here. \
                Third one demonstrates results. Final concluding sentence.";
    let summary = extractive_summary(text, 8);
    assert!(!summary.is_empty());
    assert!(summary.split_whitespace().count() <= 8);
  }

  #[test]
  fn test_extractive_summary_is_deterministic() {
    let text = "One sentence here. Another sentence there. A third sentence too.";
    assert_eq!(extractive_summary(text, 20), extractive_summary(text, 20));
  }
}
