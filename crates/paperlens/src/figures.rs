//! Figure identification and textual description.
//!
//! Figures survive extraction only as placeholders with a page number and a
//! bounding-box hint. This module matches each placeholder against caption
//! lines ("Figure 3: ...") and in-text mentions, and produces a short
//! description with an explicit confidence tag so downstream consumers can
//! tell a real caption from a generic fallback.

use lazy_static::lazy_static;
use regex::Regex;

use super::*;

lazy_static! {
  /// A caption line: "Figure 3: ...", "Fig. 3. ...", or "Table 3: ...".
  static ref CAPTION_LINE: Regex =
    Regex::new(r"(?im)^\s*(?:fig(?:ure|\.)?|table)\s*(\d+)\s*[:.]\s*(.+)$").unwrap();
}

/// How confidently a figure description was recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchQuality {
  /// A caption line with a matching figure number was found.
  Caption,
  /// No caption, but the figure is mentioned in running text.
  Context,
  /// Nothing matched; the description is a generic fallback.
  None,
}

/// A human-readable description of one detected figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureDescription {
  /// Figure id, matching the extraction placeholder.
  pub id:          usize,
  /// 1-based page number the figure appears on.
  pub page:        usize,
  /// Caption text, mention context, or a generic fallback.
  pub description: String,
  /// Confidence of the match behind `description`.
  pub quality:     MatchQuality,
}

/// Returns the caption text for figure `id`, if the document contains a
/// matching caption line.
pub fn find_caption(text: &str, id: usize) -> Option<String> {
  CAPTION_LINE.captures_iter(text).find_map(|capture| {
    let number: usize = capture[1].parse().ok()?;
    (number == id).then(|| capture[2].trim().to_owned())
  })
}

/// Derives descriptions for every figure placeholder in a document.
#[derive(Debug, Clone, Default)]
pub struct FigureDescriber;

impl FigureDescriber {
  /// Describes all figures in `text`, in placeholder order.
  pub fn describe(&self, text: &StructuredText) -> Vec<FigureDescription> {
    let combined = text.combined();
    text
      .figures
      .iter()
      .map(|figure| {
        if let Some(caption) = figure.caption.clone() {
          return FigureDescription {
            id:          figure.id,
            page:        figure.page,
            description: caption,
            quality:     MatchQuality::Caption,
          };
        }
        match mention_context(&combined, figure.id) {
          Some(context) => FigureDescription {
            id:          figure.id,
            page:        figure.page,
            description: context,
            quality:     MatchQuality::Context,
          },
          None => {
            debug!("no caption or mention for figure {} on page {}", figure.id, figure.page);
            FigureDescription {
              id:          figure.id,
              page:        figure.page,
              description: format!("Figure {} (page {}, no caption detected)", figure.id, figure.page),
              quality:     MatchQuality::None,
            }
          },
        }
      })
      .collect()
  }
}

/// Finds the sentence that mentions figure `id` in running text.
fn mention_context(text: &str, id: usize) -> Option<String> {
  let mention =
    Regex::new(&format!(r"(?i)\bfig(?:ure|\.)?\s*{id}\b")).ok()?;
  format::split_sentences(text)
    .into_iter()
    .find(|sentence| mention.is_match(sentence) && !CAPTION_LINE.is_match(sentence))
    .map(|sentence| sentence.trim().to_owned())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn with_figures(body: &str, captions: &[Option<&str>]) -> StructuredText {
    StructuredText {
      sections:   vec![(Section::Introduction, body.to_owned())],
      figures:    captions
        .iter()
        .enumerate()
        .map(|(i, caption)| FigurePlaceholder {
          id:      i + 1,
          page:    1,
          bounds:  BoundingBox::LETTER,
          caption: caption.map(str::to_owned),
        })
        .collect(),
      references: Vec::new(),
    }
  }

  #[test]
  fn test_find_caption() {
    let text = "Intro text.\nFigure 1: Model architecture overview.\nFig. 2. Training curves.\nTable 3: Ablation results.";
    assert_eq!(find_caption(text, 1).as_deref(), Some("Model architecture overview."));
    assert_eq!(find_caption(text, 2).as_deref(), Some("Training curves."));
    assert_eq!(find_caption(text, 3).as_deref(), Some("Ablation results."));
    assert!(find_caption(text, 4).is_none());
  }

  #[test]
  fn test_caption_quality() {
    let text = with_figures("Body text.", &[Some("Model architecture overview.")]);
    let described = FigureDescriber.describe(&text);
    assert_eq!(described.len(), 1);
    assert_eq!(described[0].quality, MatchQuality::Caption);
    assert_eq!(described[0].description, "Model architecture overview.");
  }

  #[test]
  fn test_mention_fallback() {
    let text = with_figures("As Figure 1 shows, accuracy improves with depth.", &[None]);
    let described = FigureDescriber.describe(&text);
    assert_eq!(described[0].quality, MatchQuality::Context);
    assert!(described[0].description.contains("accuracy improves"));
  }

  #[test]
  fn test_generic_fallback() {
    let text = with_figures("Nothing relevant here.", &[None]);
    let described = FigureDescriber.describe(&text);
    assert_eq!(described[0].quality, MatchQuality::None);
    assert!(described[0].description.contains("no caption detected"));
  }

  #[test]
  fn test_placeholder_order_preserved() {
    let text = with_figures("Figure 2 is discussed here.", &[Some("First."), None, None]);
    let described = FigureDescriber.describe(&text);
    let ids: Vec<usize> = described.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(described[1].quality, MatchQuality::Context);
    assert_eq!(described[2].quality, MatchQuality::None);
  }
}
