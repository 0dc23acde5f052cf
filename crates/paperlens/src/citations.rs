//! Citation graph construction and Mermaid rendering.
//!
//! Parses the raw reference-list entries into best-effort (title, authors,
//! year) tuples, resolves in-text citation markers like `[3]` to reference
//! entries, and emits a deterministic Mermaid flowchart of the
//! citing-to-cited relationships. Malformed reference entries are kept as
//! raw-text nodes with unresolved fields, never dropped; unresolved markers
//! produce no edge and no error.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::*;

lazy_static! {
  /// Numbered reference-entry prefixes at line starts: "[1]", "1.", "(1)".
  static ref ENTRY_PREFIX: Regex = Regex::new(r"(?m)^\s*(?:\[(\d+)\]|\((\d+)\)|(\d+)\.)\s+").unwrap();
  /// In-text citation markers: "[1]" and "[1, 2]" lists.
  static ref CITATION_MARKER: Regex = Regex::new(r"\[(\d+(?:\s*,\s*\d+)*)\]").unwrap();
  /// A quoted title inside a reference entry.
  static ref QUOTED_TITLE: Regex = Regex::new(r#"["“]([^"”]+)["”]"#).unwrap();
  /// Authors running up to a year: "Vaswani, A., et al. (2017)" or "... 2017".
  static ref AUTHORS_YEAR: Regex = Regex::new(r"^(.{4,120}?)[,.]?\s*\(?((?:19|20)\d{2})\)?").unwrap();
  /// A title candidate after the year: the first sentence-like span.
  static ref TITLE_AFTER_YEAR: Regex =
    Regex::new(r"\(?(?:19|20)\d{2}\)?[.,]?\s+([^.]{8,}?)\.(?:\s|$)").unwrap();
}

/// One node of the citation graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceEntry {
  /// 1-based reference number, matching in-text markers.
  pub id:             usize,
  /// The raw citation text as it appeared in the reference list.
  pub raw:            String,
  /// Parsed title, when the entry matched a known pattern.
  pub title:          Option<String>,
  /// Parsed author span, when the entry matched a known pattern.
  pub authors:        Option<String>,
  /// Parsed publication year.
  pub year:           Option<u16>,
  /// External citation count, when a signal is available. The current
  /// pipeline has no count source, so this stays `None` and the
  /// threshold-based classic signal stays disabled.
  pub citation_count: Option<u32>,
  /// Whether the classic-paper heuristic flagged this entry.
  pub is_classic:     bool,
}

/// A directed citing-to-cited relationship from the analyzed paper to one
/// of its references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationEdge {
  /// The cited reference's id.
  pub reference_id: usize,
}

/// The assembled citation graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitationGraph {
  /// Reference entries in reference-list order.
  pub references:   Vec<ReferenceEntry>,
  /// One edge per reference cited at least once in the text, in id order.
  pub edges:        Vec<CitationEdge>,
  /// Deterministic Mermaid flowchart rendering of the graph.
  pub mermaid_code: String,
}

/// Builds citation graphs from structured text.
#[derive(Debug, Clone)]
pub struct CitationGraphBuilder {
  /// Citation-count threshold for the classic flag; `None` disables the
  /// count signal.
  classic_citation_threshold: Option<u32>,
}

impl CitationGraphBuilder {
  /// Creates a builder from the pipeline configuration.
  pub fn new(config: &AnalyzerConfig) -> Self {
    Self { classic_citation_threshold: config.classic_citation_threshold }
  }

  /// Builds the graph for one parsed document.
  ///
  /// Node order follows the reference list and edge order follows
  /// reference ids, so identical input yields byte-identical Mermaid
  /// output.
  pub fn build(&self, text: &StructuredText) -> CitationGraph {
    let references: Vec<ReferenceEntry> = text
      .references
      .iter()
      .enumerate()
      .map(|(i, raw)| self.parse_entry(i + 1, raw))
      .collect();

    let body: String = text
      .sections
      .iter()
      .filter(|(section, _)| *section != Section::References)
      .map(|(_, t)| t.as_str())
      .collect::<Vec<_>>()
      .join("\n");

    let mut cited = BTreeSet::new();
    for capture in CITATION_MARKER.captures_iter(&body) {
      for number in capture[1].split(',') {
        if let Ok(id) = number.trim().parse::<usize>() {
          if id >= 1 && id <= references.len() {
            cited.insert(id);
          } else {
            trace!("ignoring unresolved citation marker [{id}]");
          }
        }
      }
    }
    let edges: Vec<CitationEdge> =
      cited.into_iter().map(|reference_id| CitationEdge { reference_id }).collect();

    let mermaid_code = render_mermaid(&references, &edges);
    CitationGraph { references, edges, mermaid_code }
  }

  /// Best-effort parse of one raw reference entry.
  ///
  /// Entries that match no pattern keep their raw text with unresolved
  /// fields; parsing never fails.
  fn parse_entry(&self, id: usize, raw: &str) -> ReferenceEntry {
    let raw = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let quoted = QUOTED_TITLE.captures(&raw).map(|c| c[1].trim().to_owned());
    let after_year = TITLE_AFTER_YEAR.captures(&raw).map(|c| c[1].trim().to_owned());
    let title = quoted.or(after_year);

    let (authors, year) = match AUTHORS_YEAR.captures(&raw) {
      Some(capture) => {
        let authors = capture[1].trim().trim_end_matches(',').to_owned();
        let year = capture[2].parse::<u16>().ok();
        (Some(authors), year)
      },
      None => (None, None),
    };

    let is_classic = self.is_classic(title.as_deref(), None);
    ReferenceEntry { id, raw, title, authors, year, citation_count: None, is_classic }
  }

  /// The classic-paper heuristic: landmark-title containment, plus the
  /// citation-count threshold when both a count and a threshold exist.
  fn is_classic(&self, title: Option<&str>, citation_count: Option<u32>) -> bool {
    if let Some(title) = title {
      let lowered = title.to_lowercase();
      if resources::LANDMARK_TITLES
        .iter()
        .any(|landmark| lowered.contains(&landmark.to_lowercase()))
      {
        return true;
      }
    }
    match (self.classic_citation_threshold, citation_count) {
      (Some(threshold), Some(count)) => count >= threshold,
      _ => false,
    }
  }
}

/// Splits a reference-section text into raw numbered entries.
///
/// Used by the structurer when it populates [`StructuredText::references`].
/// Lines before the first numbered prefix (typically the "References"
/// heading itself) are skipped; an unnumbered reference section yields no
/// entries rather than one giant entry.
pub fn split_reference_entries(text: &str) -> Vec<String> {
  let mut entries: Vec<String> = Vec::new();
  let mut current: Option<String> = None;

  for line in text.lines() {
    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }
    if ENTRY_PREFIX.is_match(trimmed) {
      if let Some(done) = current.take() {
        entries.push(done);
      }
      current = Some(ENTRY_PREFIX.replace(trimmed, "").into_owned());
    } else if let Some(open) = current.as_mut() {
      open.push(' ');
      open.push_str(trimmed);
    }
  }
  if let Some(done) = current.take() {
    entries.push(done);
  }

  entries.into_iter().filter(|entry| !entry.trim().is_empty()).collect()
}

/// Renders the graph as a Mermaid flowchart.
///
/// One node per reference in list order, one edge per resolved citation in
/// id order, and a distinguishing class for classic papers. Output is a
/// pure function of its input, supporting snapshot testing.
fn render_mermaid(references: &[ReferenceEntry], edges: &[CitationEdge]) -> String {
  let mut out = String::from("flowchart LR\n");
  out.push_str("  P[\"This paper\"]\n");

  for reference in references {
    let label = match (&reference.authors, &reference.title) {
      (Some(authors), Some(title)) => {
        format!("{}: {}", format::truncate_label(authors, 24), format::truncate_label(title, 40))
      },
      (_, Some(title)) => format::truncate_label(title, 40),
      _ => format::truncate_label(&reference.raw, 40),
    };
    let label = label.replace('"', "'");
    out.push_str(&format!("  R{}[\"[{}] {}\"]\n", reference.id, reference.id, label));
  }

  for edge in edges {
    out.push_str(&format!("  P --> R{}\n", edge.reference_id));
  }

  let classics: Vec<String> = references
    .iter()
    .filter(|r| r.is_classic)
    .map(|r| format!("R{}", r.id))
    .collect();
  out.push_str("  classDef classic fill:#fff9c4,stroke:#ffc107,stroke-width:2px\n");
  if !classics.is_empty() {
    out.push_str(&format!("  class {} classic\n", classics.join(",")));
  }

  out
}
