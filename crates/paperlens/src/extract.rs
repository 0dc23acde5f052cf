//! PDF text extraction.
//!
//! Converts a PDF byte stream or file path into per-page raw text plus
//! heuristic region hints for embedded figures and formulas. Extraction is
//! deterministic: the same input always yields the same pages.
//!
//! The extractor walks each page's content stream and collects the text
//! shown by the `Tj`/`TJ`/`'`/`"` operators, starting a new line on the text
//! positioning operators. Figure regions come from image XObjects in the
//! page resources; their bounding box is the page media box, a page-level
//! hint rather than a precise placement. Formula regions come from a
//! math-character-ratio test over short text lines; matched lines are
//! replaced inline with a placeholder marker so downstream text stays
//! readable.
//!
//! # Examples
//!
//! ```no_run
//! use paperlens::{config::AnalyzerConfig, extract::{PdfExtractor, PdfSource}};
//!
//! # fn example() -> Result<(), paperlens::errors::PaperlensError> {
//! let extractor = PdfExtractor::new(&AnalyzerConfig::default());
//! let extraction = extractor.extract(&PdfSource::Path("paper.pdf".into()))?;
//! println!("extracted {} pages", extraction.pages.len());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use lazy_static::lazy_static;
use lopdf::{content::Content, Dictionary, Document, Object};
use regex::Regex;

use super::*;

lazy_static! {
  /// Page-number lines dropped as headers/footers: bare numbers and
  /// "page 3" / "3 / 12" / "3 of 12" forms.
  static ref PAGE_NUMBER: Regex =
    Regex::new(r"(?i)^(\d+|page\s+\d+|\d+\s*/\s*\d+|\d+\s+of\s+\d+)$").unwrap();
}

/// A PDF input: either an in-memory byte stream or a filesystem path.
#[derive(Debug, Clone)]
pub enum PdfSource {
  /// The raw bytes of a PDF document.
  Bytes(Vec<u8>),
  /// A path to a PDF file on disk.
  Path(PathBuf),
}

/// An axis-aligned bounding box in PDF user-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
  /// Left edge.
  pub x0: f32,
  /// Bottom edge.
  pub y0: f32,
  /// Right edge.
  pub x1: f32,
  /// Top edge.
  pub y1: f32,
}

impl BoundingBox {
  /// The default US Letter media box used when a page declares none.
  pub const LETTER: BoundingBox = BoundingBox { x0: 0.0, y0: 0.0, x1: 612.0, y1: 792.0 };
}

/// What kind of non-text content a detected region holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionKind {
  /// An embedded image, presumed to be a figure.
  Figure,
  /// A text block dominated by mathematical notation.
  Formula,
}

/// A detected figure or formula region on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
  /// What the region holds.
  pub kind:   RegionKind,
  /// Sequential id within its kind, starting at 1 across the document.
  pub id:     usize,
  /// 1-based page number the region appears on.
  pub page:   usize,
  /// Bounding-box hint. For figures this is the page media box.
  pub bounds: BoundingBox,
}

/// The result of extracting one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
  /// Number of pages in the document, before the page cap.
  pub total_pages: usize,
  /// The processed pages, at most `max_pages` of them, in document order.
  pub pages:       Vec<RawPage>,
}

/// One page of extracted text with its detected regions.
///
/// Produced by the extractor, immutable once created, and consumed only by
/// the section structurer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPage {
  /// 1-based page number.
  pub number:  usize,
  /// The page text, one extracted line per `\n`, with formula lines already
  /// replaced by their placeholder markers.
  pub text:    String,
  /// Figure and formula regions detected on this page.
  pub regions: Vec<Region>,
}

/// Extracts per-page text and region hints from PDF documents.
///
/// The extractor holds only configuration; it keeps no per-document state,
/// so one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct PdfExtractor {
  /// Input size cap in bytes.
  max_input_bytes:    u64,
  /// Page processing cap.
  max_pages:          usize,
  /// Math-character ratio above which a short line is tagged as a formula.
  formula_char_ratio: f32,
}

impl PdfExtractor {
  /// Creates an extractor from the pipeline configuration.
  pub fn new(config: &AnalyzerConfig) -> Self {
    Self {
      max_input_bytes:    config.max_input_bytes,
      max_pages:          config.max_pages,
      formula_char_ratio: config.formula_char_ratio,
    }
  }

  /// Extracts the ordered page sequence from `source`.
  ///
  /// # Errors
  ///
  /// - [`PaperlensError::InputTooLarge`] when the input exceeds the size cap
  ///   (checked before parsing)
  /// - [`PaperlensError::EncryptedPdf`] for password-protected documents
  /// - [`PaperlensError::UnreadablePdf`] for corrupt documents or documents
  ///   with zero pages
  pub fn extract(&self, source: &PdfSource) -> Result<Extraction, PaperlensError> {
    let doc = match source {
      PdfSource::Bytes(bytes) => {
        self.check_size(bytes.len() as u64)?;
        Document::load_mem(bytes)?
      },
      PdfSource::Path(path) => {
        self.check_size(std::fs::metadata(path)?.len())?;
        Document::load(path)?
      },
    };

    if doc.is_encrypted() {
      return Err(PaperlensError::EncryptedPdf);
    }

    let page_ids: Vec<_> = doc.page_iter().collect();
    let total_pages = page_ids.len();
    if total_pages == 0 {
      return Err(PaperlensError::UnreadablePdf("document has no pages".into()));
    }
    if total_pages > self.max_pages {
      warn!("PDF has {total_pages} pages, processing only the first {}", self.max_pages);
    }

    let mut pages = Vec::new();
    let mut figure_count = 0;
    let mut formula_count = 0;

    for (index, page_id) in page_ids.into_iter().take(self.max_pages).enumerate() {
      let number = index + 1;
      let bounds = media_box(&doc, page_id);

      let lines = match self.page_lines(&doc, page_id) {
        Ok(lines) => lines,
        Err(e) => {
          // A single malformed page degrades to empty text instead of
          // failing the whole document.
          debug!("failed to read content of page {number}: {e}");
          Vec::new()
        },
      };

      let mut regions = Vec::new();
      let mut text_lines = Vec::new();
      for line in lines {
        if self.is_formula_line(&line) {
          formula_count += 1;
          regions.push(Region { kind: RegionKind::Formula, id: formula_count, page: number, bounds });
          text_lines.push(format!("<formula {formula_count} (page {number})>"));
        } else {
          text_lines.push(line);
        }
      }

      for _ in 0..image_count(&doc, page_id) {
        figure_count += 1;
        regions.push(Region { kind: RegionKind::Figure, id: figure_count, page: number, bounds });
      }

      trace!("page {number}: {} lines, {} regions", text_lines.len(), regions.len());
      pages.push(RawPage { number, text: text_lines.join("\n"), regions });
    }

    Ok(Extraction { total_pages, pages })
  }

  /// Fails fast when the input exceeds the configured byte cap.
  fn check_size(&self, got: u64) -> Result<(), PaperlensError> {
    if got > self.max_input_bytes {
      return Err(PaperlensError::InputTooLarge { got, limit: self.max_input_bytes });
    }
    Ok(())
  }

  /// Decodes one page's content stream into cleaned text lines.
  fn page_lines(&self, doc: &Document, page_id: lopdf::ObjectId) -> Result<Vec<String>, PaperlensError> {
    let data = doc.get_page_content(page_id)?;
    let content = Content::decode(&data)?;

    let mut raw = String::new();
    for operation in &content.operations {
      match operation.operator.as_str() {
        // Text showing operators.
        "Tj" => {
          if let Some(Object::String(bytes, _)) = operation.operands.first() {
            raw.push_str(&decode_text(bytes));
            raw.push(' ');
          }
        },
        "TJ" => {
          if let Some(Object::Array(elements)) = operation.operands.first() {
            for element in elements {
              if let Object::String(bytes, _) = element {
                raw.push_str(&decode_text(bytes));
              }
            }
            raw.push(' ');
          }
        },
        // Move-to-next-line-and-show variants.
        "'" => {
          raw.push('\n');
          if let Some(Object::String(bytes, _)) = operation.operands.first() {
            raw.push_str(&decode_text(bytes));
            raw.push(' ');
          }
        },
        "\"" => {
          raw.push('\n');
          if let Some(Object::String(bytes, _)) = operation.operands.get(2) {
            raw.push_str(&decode_text(bytes));
            raw.push(' ');
          }
        },
        // Text positioning starts a new line.
        "Td" | "TD" | "T*" | "ET" => raw.push('\n'),
        _ => {},
      }
    }

    let lines = raw
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .filter(|line| !is_header_footer(line))
      .map(str::to_owned)
      .collect();
    Ok(lines)
  }

  /// Heuristic formula test: a short line whose math-character ratio exceeds
  /// the configured threshold.
  fn is_formula_line(&self, line: &str) -> bool {
    if line.is_empty() || line.chars().count() > 200 {
      return false;
    }
    let total = line.chars().count();
    let math = line.chars().filter(|c| resources::FORMULA_CHARS.contains(*c)).count();
    math as f32 / total as f32 > self.formula_char_ratio
  }
}

/// Returns true for lines that look like page headers or footers.
fn is_header_footer(line: &str) -> bool { line.len() < 100 && PAGE_NUMBER.is_match(line) }

/// Decodes a PDF text string, handling the UTF-16BE byte-order mark.
fn decode_text(bytes: &[u8]) -> String {
  if bytes.starts_with(&[0xFE, 0xFF]) {
    let (decoded, ..) = encoding_rs::UTF_16BE.decode(&bytes[2..]);
    decoded.into_owned()
  } else {
    String::from_utf8_lossy(bytes).into_owned()
  }
}

/// Reads the page media box, falling back to US Letter.
fn media_box(doc: &Document, page_id: lopdf::ObjectId) -> BoundingBox {
  let corners = doc
    .get_object(page_id)
    .ok()
    .and_then(|page| page.as_dict().ok())
    .and_then(|dict| dict.get(b"MediaBox").ok())
    .and_then(|obj| resolve(doc, obj))
    .and_then(|obj| obj.as_array().ok().cloned())
    .map(|array| array.iter().filter_map(as_number).collect::<Vec<_>>())
    .unwrap_or_default();

  match corners.as_slice() {
    [x0, y0, x1, y1] => BoundingBox { x0: *x0, y0: *y0, x1: *x1, y1: *y1 },
    _ => BoundingBox::LETTER,
  }
}

/// Counts image XObjects in the page resources.
fn image_count(doc: &Document, page_id: lopdf::ObjectId) -> usize {
  let Some(resources) = doc
    .get_object(page_id)
    .ok()
    .and_then(|page| page.as_dict().ok())
    .and_then(|dict| dict.get(b"Resources").ok())
    .and_then(|obj| resolve_dict(doc, obj))
  else {
    return 0;
  };

  let Some(xobjects) = resources.get(b"XObject").ok().and_then(|obj| resolve_dict(doc, obj))
  else {
    return 0;
  };

  xobjects
    .iter()
    .filter(|(_, value)| {
      resolve(doc, value)
        .and_then(|obj| obj.as_stream().ok())
        .and_then(|stream| stream.dict.get(b"Subtype").ok())
        .map(|subtype| matches!(subtype, Object::Name(name) if name == b"Image"))
        .unwrap_or(false)
    })
    .count()
}

/// Follows one level of indirection from a possibly-referenced object.
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
  match obj {
    Object::Reference(id) => doc.get_object(*id).ok(),
    other => Some(other),
  }
}

/// Resolves an object that should be a dictionary, following references.
fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
  resolve(doc, obj).and_then(|o| o.as_dict().ok())
}

/// Extracts a numeric value from an integer or real PDF object.
fn as_number(obj: &Object) -> Option<f32> {
  match obj {
    Object::Integer(i) => Some(*i as f32),
    Object::Real(r) => Some(*r),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tests::fixture_pdf;

  #[test]
  fn test_extracts_page_text() {
    let bytes = fixture_pdf(&[vec!["Abstract", "We study snails."]]);
    let extractor = PdfExtractor::new(&AnalyzerConfig::default());

    let extraction = extractor.extract(&PdfSource::Bytes(bytes)).unwrap();
    let pages = extraction.pages;
    assert_eq!(extraction.total_pages, 1);
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].number, 1);
    assert!(pages[0].text.contains("Abstract"));
    assert!(pages[0].text.contains("We study snails."));
  }

  #[test]
  fn test_extraction_is_deterministic() {
    let bytes = fixture_pdf(&[vec!["Introduction", "Some text here."], vec!["More text."]]);
    let extractor = PdfExtractor::new(&AnalyzerConfig::default());

    let first = extractor.extract(&PdfSource::Bytes(bytes.clone())).unwrap().pages;
    let second = extractor.extract(&PdfSource::Bytes(bytes)).unwrap().pages;
    let texts = |pages: &[RawPage]| pages.iter().map(|p| p.text.clone()).collect::<Vec<_>>();
    assert_eq!(texts(&first), texts(&second));
  }

  #[test]
  fn test_page_cap() {
    let config = AnalyzerConfig { max_pages: 1, ..Default::default() };
    let extractor = PdfExtractor::new(&config);
    let bytes = fixture_pdf(&[vec!["First page."], vec!["Second page."]]);

    let extraction = extractor.extract(&PdfSource::Bytes(bytes)).unwrap();
    assert_eq!(extraction.total_pages, 2);
    assert_eq!(extraction.pages.len(), 1);
    assert!(extraction.pages[0].text.contains("First page."));
  }

  #[test]
  fn test_rejects_oversized_input() {
    let config = AnalyzerConfig { max_input_bytes: 16, ..Default::default() };
    let extractor = PdfExtractor::new(&config);

    let result = extractor.extract(&PdfSource::Bytes(vec![0u8; 64]));
    assert!(matches!(result, Err(PaperlensError::InputTooLarge { got: 64, limit: 16 })));
  }

  #[test]
  fn test_rejects_garbage_bytes() {
    let extractor = PdfExtractor::new(&AnalyzerConfig::default());
    let result = extractor.extract(&PdfSource::Bytes(b"not a pdf at all".to_vec()));
    assert!(matches!(result, Err(PaperlensError::UnreadablePdf(_))));
  }

  #[test]
  fn test_formula_line_detection() {
    let extractor = PdfExtractor::new(&AnalyzerConfig::default());
    assert!(extractor.is_formula_line("x = y + z ± ∑"));
    assert!(!extractor.is_formula_line("A plain English sentence about results."));
  }

  #[test]
  fn test_header_footer_filtering() {
    assert!(is_header_footer("42"));
    assert!(is_header_footer("Page 3"));
    assert!(is_header_footer("3 of 12"));
    assert!(!is_header_footer("Abstract"));
    assert!(!is_header_footer("Section 2 covers 3 of the 12 cases"));
  }
}
