//! Markdown digest rendering.
//!
//! Flattens a finished [`PaperAnalysis`] into a single self-contained
//! Markdown document: metadata header, summaries, keywords, figures, and
//! the citation graph as a fenced `mermaid` block. Sections with no
//! content are omitted rather than rendered empty.

use super::*;

/// Renders a full analysis as a Markdown digest.
pub fn render_markdown(analysis: &PaperAnalysis) -> String {
  let mut out = String::new();
  let title = analysis.metadata.title.as_deref().unwrap_or("Untitled paper");
  out.push_str(&format!("# {title}\n\n"));

  push_metadata(&mut out, &analysis.metadata);
  push_stats(&mut out, &analysis.stats);
  push_summaries(&mut out, &analysis.summary);
  push_keywords(&mut out, &analysis.summary.keywords);
  push_figures(&mut out, &analysis.figures);
  push_citations(&mut out, &analysis.citation_graph);

  out
}

/// Appends the metadata header lines, skipping absent fields.
fn push_metadata(out: &mut String, metadata: &Metadata) {
  if metadata.is_empty() {
    return;
  }
  if !metadata.authors.is_empty() {
    out.push_str(&format!("**Authors:** {}\n\n", metadata.authors.join(", ")));
  }
  if let Some(published) = metadata.published {
    out.push_str(&format!("**Published:** {}\n\n", published.format("%Y-%m-%d")));
  }
  if let Some(source_id) = &metadata.source_id {
    out.push_str(&format!("**Source:** {source_id}\n\n"));
  }
  if !metadata.categories.is_empty() {
    out.push_str(&format!("**Categories:** {}\n\n", metadata.categories.join(", ")));
  }
}

/// Appends the one-line extraction statistics.
fn push_stats(out: &mut String, stats: &ParseStats) {
  out.push_str(&format!(
    "*{} of {} pages processed, {} figures, {} formulas.*\n\n",
    stats.processed_pages, stats.total_pages, stats.figure_count, stats.formula_count
  ));
}

/// Appends the short and per-section summaries.
fn push_summaries(out: &mut String, summary: &SummaryResult) {
  if let Some(short) = &summary.short_summary {
    if !short.is_empty() {
      out.push_str("## Summary\n\n");
      out.push_str(short);
      out.push_str("\n\n");
      if summary.generation_method == GenerationMethod::RuleBased {
        out.push_str("*Summary generated by extractive fallback.*\n\n");
      }
    }
  }
  if let Some(long) = &summary.long_summary {
    if !long.sections.is_empty() {
      out.push_str("## Section summaries\n\n");
      for (section, text) in &long.sections {
        out.push_str(&format!("### {section}\n\n{text}\n\n"));
      }
    }
  }
}

/// Appends the keyword list with glossary definitions.
fn push_keywords(out: &mut String, keywords: &[KeywordEntry]) {
  if keywords.is_empty() {
    return;
  }
  out.push_str("## Keywords\n\n");
  for keyword in keywords {
    match &keyword.definition {
      Some(definition) => out.push_str(&format!("- **{}**: {definition}\n", keyword.term)),
      None => out.push_str(&format!("- {}\n", keyword.term)),
    }
  }
  out.push('\n');
}

/// Appends the figure descriptions.
fn push_figures(out: &mut String, figures: &[FigureDescription]) {
  if figures.is_empty() {
    return;
  }
  out.push_str("## Figures\n\n");
  for figure in figures {
    out.push_str(&format!("- **Figure {}** (page {}): {}\n", figure.id, figure.page, figure.description));
  }
  out.push('\n');
}

/// Appends the Mermaid citation graph and the reference list.
fn push_citations(out: &mut String, graph: &CitationGraph) {
  if graph.references.is_empty() {
    return;
  }
  out.push_str("## Citation graph\n\n");
  out.push_str("```mermaid\n");
  out.push_str(&graph.mermaid_code);
  out.push_str("```\n\n");
  out.push_str("### References\n\n");
  for reference in &graph.references {
    let classic = if reference.is_classic { " *(classic)*" } else { "" };
    out.push_str(&format!("{}. {}{classic}\n", reference.id, reference.raw));
  }
  out.push('\n');
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_analysis() -> PaperAnalysis {
    let metadata = Metadata {
      title:         Some("Deep Widgets".to_owned()),
      authors:       vec!["A. Author".to_owned(), "B. Author".to_owned()],
      published:     Utc.with_ymd_and_hms(2017, 6, 12, 0, 0, 0).single(),
      source_id:     Some("arXiv:1706.00001".to_owned()),
      abstract_text: None,
      categories:    vec!["cs.LG".to_owned()],
    };
    let summary = SummaryResult {
      short_summary:     Some("We study deep widgets.".to_owned()),
      long_summary:      None,
      keywords:          vec![KeywordEntry {
        term:       "transformer".to_owned(),
        frequency:  4,
        definition: Some("A neural architecture built on attention.".to_owned()),
      }],
      generation_method: GenerationMethod::RuleBased,
    };
    PaperAnalysis {
      text:           StructuredText::default(),
      stats:          ParseStats {
        total_pages:     2,
        processed_pages: 2,
        figure_count:    1,
        formula_count:   0,
      },
      metadata,
      summary,
      citation_graph: CitationGraph::default(),
      figures:        vec![FigureDescription {
        id:          1,
        page:        1,
        description: "Architecture overview.".to_owned(),
        quality:     figures::MatchQuality::Caption,
      }],
    }
  }

  #[test]
  fn test_digest_sections() {
    let digest = render_markdown(&sample_analysis());
    assert!(digest.starts_with("# Deep Widgets\n"));
    assert!(digest.contains("**Authors:** A. Author, B. Author"));
    assert!(digest.contains("**Published:** 2017-06-12"));
    assert!(digest.contains("## Summary"));
    assert!(digest.contains("extractive fallback"));
    assert!(digest.contains("- **transformer**: A neural architecture"));
    assert!(digest.contains("- **Figure 1** (page 1): Architecture overview."));
  }

  #[test]
  fn test_empty_sections_omitted() {
    let mut analysis = sample_analysis();
    analysis.metadata = Metadata::default();
    analysis.summary.keywords.clear();
    analysis.figures.clear();
    let digest = render_markdown(&analysis);
    assert!(digest.starts_with("# Untitled paper\n"));
    assert!(!digest.contains("**Authors:**"));
    assert!(!digest.contains("## Keywords"));
    assert!(!digest.contains("## Figures"));
    assert!(!digest.contains("## Citation graph"));
  }

  #[test]
  fn test_mermaid_block_present() {
    let mut analysis = sample_analysis();
    analysis.citation_graph = CitationGraphBuilder::new(&AnalyzerConfig::default()).build(
      &StructuredText {
        sections:   vec![(Section::Introduction, "See [1].".to_owned())],
        figures:    Vec::new(),
        references: vec!["Someone (2001). A title that is long enough. Venue.".to_owned()],
      },
    );
    let digest = render_markdown(&analysis);
    assert!(digest.contains("```mermaid\nflowchart LR"));
    assert!(digest.contains("### References"));
  }
}
