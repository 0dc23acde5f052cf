//! Section structuring for extracted paper text.
//!
//! Segments raw page text into labeled academic sections using an ordered
//! table of heading-pattern rules. Labels come from a fixed closed set with
//! [`Section::Other`] as the fallback: every extracted line lands in exactly
//! one section, so no text is dropped silently. Missing or out-of-order
//! headings only degrade granularity, never raise an error.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use super::*;

/// The closed set of section labels.
///
/// `Other` collects preamble text before the first recognized heading and
/// any span no rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
  /// The paper abstract.
  Abstract,
  /// Introduction or background.
  Introduction,
  /// Methodology.
  Method,
  /// Experiments or evaluation setup.
  Experiment,
  /// Results or findings.
  Results,
  /// Discussion or analysis.
  Discussion,
  /// Conclusions and future work.
  Conclusion,
  /// The reference list.
  References,
  /// Fallback bucket for unmatched text.
  Other,
}

impl Section {
  /// The lowercase label used in serialized output.
  pub fn label(&self) -> &'static str {
    match self {
      Section::Abstract => "abstract",
      Section::Introduction => "introduction",
      Section::Method => "method",
      Section::Experiment => "experiment",
      Section::Results => "results",
      Section::Discussion => "discussion",
      Section::Conclusion => "conclusion",
      Section::References => "references",
      Section::Other => "other",
    }
  }

}

impl fmt::Display for Section {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.label()) }
}

/// One heading-matching rule: a line pattern and the section it opens.
///
/// Rules are applied in table order, so more specific patterns must come
/// first. The table is separate from the structurer so it can be tested in
/// isolation.
pub struct SectionRule {
  /// Pattern a heading line must match, after trimming.
  pub pattern: Regex,
  /// The section the heading opens.
  pub section: Section,
}

/// Builds a heading rule. Headings may carry a numeric or Roman-numeral
/// prefix ("3.", "IV)") and an optional trailing colon or period.
fn rule(keywords: &str, section: Section) -> SectionRule {
  let pattern = format!(r"(?i)^(?:(?:\d+(?:\.\d+)*|[ivx]+)[.)]?\s+)?(?:{keywords})\s*[:.]?$");
  SectionRule { pattern: Regex::new(&pattern).unwrap(), section }
}

lazy_static! {
  /// The ordered heading rule table.
  pub static ref SECTION_RULES: Vec<SectionRule> = vec![
    rule("abstract", Section::Abstract),
    rule("introduction|background", Section::Introduction),
    rule("related\\s+work", Section::Introduction),
    rule("methods?|methodology|approach", Section::Method),
    rule("experiments?|evaluation|experimental\\s+setup", Section::Experiment),
    rule("results?|findings", Section::Results),
    rule("discussion|analysis|limitations", Section::Discussion),
    rule("conclusions?|summary|future\\s+work", Section::Conclusion),
    rule("references|bibliography", Section::References),
  ];
}

/// Matches a trimmed line against the heading table, returning the section
/// it opens, if any.
pub fn match_heading(line: &str) -> Option<Section> {
  let trimmed = line.trim();
  SECTION_RULES.iter().find(|rule| rule.pattern.is_match(trimmed)).map(|rule| rule.section)
}

/// A figure placeholder carried through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigurePlaceholder {
  /// Sequential figure id, starting at 1.
  pub id:      usize,
  /// 1-based page number.
  pub page:    usize,
  /// Bounding-box hint from extraction.
  pub bounds:  BoundingBox,
  /// Nearest caption-like text span, when one was found.
  pub caption: Option<String>,
}

/// Section-labeled text for one parsed document.
///
/// Owned by the pipeline for the duration of one request and never
/// persisted. The `sections` sequence preserves first-encounter order; text
/// for a section that appears more than once is merged into its first
/// entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredText {
  /// Ordered (label, text) pairs. Together with `Other`, these partition
  /// the extracted text.
  pub sections:   Vec<(Section, String)>,
  /// Flat list of figure placeholders across all pages.
  pub figures:    Vec<FigurePlaceholder>,
  /// Raw reference-list entries split out of the `References` section.
  pub references: Vec<String>,
}

impl StructuredText {
  /// Returns the text of `section`, if present and non-empty.
  pub fn section(&self, section: Section) -> Option<&str> {
    self
      .sections
      .iter()
      .find(|(s, text)| *s == section && !text.trim().is_empty())
      .map(|(_, text)| text.as_str())
  }

  /// All section text joined in encounter order, used for keyword
  /// statistics and caption search.
  pub fn combined(&self) -> String {
    self
      .sections
      .iter()
      .map(|(_, text)| text.as_str())
      .filter(|text| !text.is_empty())
      .collect::<Vec<_>>()
      .join("\n\n")
  }

  /// True when no section holds any text.
  pub fn is_empty(&self) -> bool { self.sections.iter().all(|(_, text)| text.trim().is_empty()) }
}

/// Segments raw pages into a [`StructuredText`].
#[derive(Debug, Clone, Default)]
pub struct Structurer;

impl Structurer {
  /// Creates a structurer.
  pub fn new() -> Self { Self }

  /// Assigns every line of every page to exactly one section.
  ///
  /// A heading line both switches the open section and is kept as part of
  /// that section's text, so the output partitions the input. Text before
  /// the first heading accumulates under [`Section::Other`].
  pub fn structure(&self, pages: &[RawPage]) -> StructuredText {
    let mut sections: Vec<(Section, Vec<String>)> = Vec::new();
    let mut current = Section::Other;

    let append = |section: Section, line: &str, sections: &mut Vec<(Section, Vec<String>)>| {
      match sections.iter_mut().find(|(s, _)| *s == section) {
        Some((_, lines)) => lines.push(line.to_owned()),
        None => sections.push((section, vec![line.to_owned()])),
      }
    };

    for page in pages {
      for line in page.text.lines() {
        if let Some(section) = match_heading(line) {
          debug!("page {}: heading {line:?} opens section {section}", page.number);
          current = section;
        }
        append(current, line, &mut sections);
      }
    }

    let sections: Vec<(Section, String)> =
      sections.into_iter().map(|(section, lines)| (section, lines.join("\n"))).collect();

    let references = sections
      .iter()
      .find(|(section, _)| *section == Section::References)
      .map(|(_, text)| citations::split_reference_entries(text))
      .unwrap_or_default();

    let combined: String =
      sections.iter().map(|(_, text)| text.as_str()).collect::<Vec<_>>().join("\n");
    let figures = pages
      .iter()
      .flat_map(|page| page.regions.iter())
      .filter(|region| region.kind == RegionKind::Figure)
      .map(|region| FigurePlaceholder {
        id:      region.id,
        page:    region.page,
        bounds:  region.bounds,
        caption: figures::find_caption(&combined, region.id),
      })
      .collect();

    StructuredText { sections, figures, references }
  }
}
