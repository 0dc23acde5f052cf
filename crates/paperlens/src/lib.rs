//! A library for parsing academic papers from PDF and deriving summaries,
//! keywords, citation graphs, and figure descriptions from them.
//!
//! The pipeline is deterministic wherever it does not call an external text
//! oracle: the same PDF bytes always produce the same structured text,
//! keyword list, and Mermaid citation graph. A valid PDF always yields a
//! complete [`PaperAnalysis`]; metadata lookups and oracle calls degrade to
//! documented fallbacks instead of failing the request.
//!
//! # Example
//! ```rust,no_run
//! use paperlens::{Analyzer, AnalyzerConfig, ParseRequest, PdfSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!   let analyzer = Analyzer::rule_based(&AnalyzerConfig::default());
//!   let request = ParseRequest { arxiv_id: Some("1706.03762".into()), ..Default::default() };
//!
//!   let analysis = analyzer.analyze(&PdfSource::Path("paper.pdf".into()), &request).await?;
//!   println!("{}", analysis.summary.short_summary.unwrap_or_default());
//!
//!   Ok(())
//! }
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
#[cfg(test)] use tracing_test::traced_test;

pub mod citations;
pub mod clients;
pub mod config;
pub mod errors;
pub mod extract;
pub mod figures;
pub mod format;
pub mod keywords;
pub mod metadata;
pub mod report;
pub mod resources;
pub mod structure;
pub mod summary;

pub use citations::{CitationEdge, CitationGraph, CitationGraphBuilder, ReferenceEntry};
pub use clients::{ArxivClient, CrossrefClient, HttpOracle, OracleError, TextOracle};
pub use config::AnalyzerConfig;
pub use errors::PaperlensError;
pub use extract::{BoundingBox, Extraction, PdfExtractor, PdfSource, RawPage, Region, RegionKind};
pub use figures::{FigureDescriber, FigureDescription, MatchQuality};
pub use keywords::{KeywordEntry, KeywordExtractor};
pub use metadata::{Metadata, MetadataResolver};
pub use structure::{FigurePlaceholder, Section, StructuredText, Structurer};
pub use summary::{GenerationMethod, LongSummary, Summarizer, SummaryMode, SummaryResult};

/// Optional identifiers guiding bibliographic metadata resolution.
///
/// All fields are optional; an empty request skips network lookups entirely
/// and yields empty [`Metadata`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseRequest {
  /// An arXiv identifier such as `1706.03762`.
  pub arxiv_id: Option<String>,
  /// A DOI such as `10.1145/3292500`.
  pub doi:      Option<String>,
  /// The paper title, used only as a last-resort matching hint.
  pub title:    Option<String>,
}

/// Counts describing what extraction found in a document.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ParseStats {
  /// Pages in the document before the page cap.
  pub total_pages:     usize,
  /// Pages actually processed.
  pub processed_pages: usize,
  /// Detected figure regions.
  pub figure_count:    usize,
  /// Detected formula regions.
  pub formula_count:   usize,
}

/// The outcome of the offline parsing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
  /// The extracted text organized into sections.
  pub text:  StructuredText,
  /// Extraction counters.
  pub stats: ParseStats,
}

/// A fully analyzed paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperAnalysis {
  /// The extracted text organized into sections.
  pub text:           StructuredText,
  /// Extraction counters.
  pub stats:          ParseStats,
  /// Resolved bibliographic metadata; empty when nothing resolved.
  pub metadata:       Metadata,
  /// Short and per-section summaries plus keywords.
  pub summary:        SummaryResult,
  /// The citation graph with its Mermaid rendering.
  pub citation_graph: CitationGraph,
  /// Descriptions of the detected figures.
  pub figures:        Vec<FigureDescription>,
}

impl PaperAnalysis {
  /// Renders this analysis as a Markdown digest.
  pub fn to_markdown(&self) -> String { report::render_markdown(self) }
}

/// The top-level analysis pipeline.
///
/// Owns one instance of each pipeline component and runs them in a fixed
/// order: extract, structure, resolve metadata, summarize, build the
/// citation graph, describe figures. An analyzer holds no per-document
/// state and can be shared across concurrent requests.
pub struct Analyzer<O = HttpOracle> {
  /// PDF text and region extraction.
  extractor:  PdfExtractor,
  /// Section structuring.
  structurer: Structurer,
  /// Bibliographic metadata lookup.
  resolver:   MetadataResolver,
  /// Summary and keyword generation.
  summarizer: Summarizer<O>,
  /// Citation graph construction.
  citations:  CitationGraphBuilder,
  /// Figure description.
  figures:    FigureDescriber,
}

impl Analyzer<HttpOracle> {
  /// Creates an analyzer that summarizes with the extractive fallback only.
  pub fn rule_based(config: &AnalyzerConfig) -> Self {
    Self::assemble(Summarizer::rule_based(config), config)
  }

  /// Creates an analyzer whose oracle comes from the environment, falling
  /// back to rule-based summarization when no oracle is configured.
  pub fn from_env(config: &AnalyzerConfig) -> Self {
    match HttpOracle::from_env(config.oracle_timeout) {
      Some(oracle) => Self::assemble(Summarizer::with_oracle(oracle, config), config),
      None => {
        debug!("no oracle configured, using rule-based summaries");
        Self::rule_based(config)
      },
    }
  }
}

impl<O: TextOracle> Analyzer<O> {
  /// Creates an analyzer that summarizes through `oracle`.
  pub fn with_oracle(oracle: O, config: &AnalyzerConfig) -> Self {
    Self::assemble(Summarizer::with_oracle(oracle, config), config)
  }

  /// Wires the components together from one configuration.
  fn assemble(summarizer: Summarizer<O>, config: &AnalyzerConfig) -> Self {
    Self {
      extractor: PdfExtractor::new(config),
      structurer: Structurer::new(),
      resolver: MetadataResolver::new(config),
      summarizer,
      citations: CitationGraphBuilder::new(config),
      figures: FigureDescriber,
    }
  }

  /// Runs only the offline parsing stage: extraction and structuring.
  ///
  /// # Errors
  ///
  /// Fails only for structurally invalid input, per
  /// [`PdfExtractor::extract`].
  pub fn parse(&self, source: &PdfSource) -> Result<ParseResult, PaperlensError> {
    let extraction = self.extractor.extract(source)?;
    let stats = ParseStats {
      total_pages:     extraction.total_pages,
      processed_pages: extraction.pages.len(),
      figure_count:    count_regions(&extraction.pages, RegionKind::Figure),
      formula_count:   count_regions(&extraction.pages, RegionKind::Formula),
    };
    let text = self.structurer.structure(&extraction.pages);
    trace!("parsed {} sections from {} pages", text.sections.len(), stats.processed_pages);
    Ok(ParseResult { text, stats })
  }

  /// Runs the full pipeline on one document.
  ///
  /// Metadata resolution and summarization never fail the request; on
  /// lookup or oracle failure the result carries empty metadata or a
  /// rule-based summary instead.
  ///
  /// # Errors
  ///
  /// Fails only for structurally invalid input, per
  /// [`PdfExtractor::extract`].
  pub async fn analyze(
    &self,
    source: &PdfSource,
    request: &ParseRequest,
  ) -> Result<PaperAnalysis, PaperlensError> {
    let ParseResult { text, stats } = self.parse(source)?;

    let metadata = self
      .resolver
      .resolve(request.arxiv_id.as_deref(), request.doi.as_deref(), request.title.as_deref())
      .await;
    let summary = self.summarizer.summarize(&text, SummaryMode::Both).await;
    let citation_graph = self.citations.build(&text);
    let figures = self.figures.describe(&text);

    Ok(PaperAnalysis { text, stats, metadata, summary, citation_graph, figures })
  }
}

/// Counts regions of one kind across pages.
fn count_regions(pages: &[RawPage], kind: RegionKind) -> usize {
  pages.iter().flat_map(|page| page.regions.iter()).filter(|region| region.kind == kind).count()
}
