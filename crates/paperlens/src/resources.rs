//! Process-wide immutable resources: the stopword list, the domain glossary,
//! and the landmark-paper title list.
//!
//! All three are initialized lazily on first use and never mutated, so they
//! are safe to share between concurrent requests. Components receive them by
//! reference rather than reaching for them ad hoc, which keeps the lookup
//! tables swappable in tests.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

lazy_static! {
  /// English stopwords filtered out during keyword extraction.
  pub static ref STOPWORDS: HashSet<&'static str> = [
    "the", "and", "for", "with", "that", "this", "these", "those", "are", "from", "was", "were",
    "has", "have", "had", "will", "would", "could", "should", "can", "may", "not", "but", "our",
    "their", "its", "into", "also", "such", "than", "then", "when", "where", "which", "while",
    "who", "whom", "been", "being", "both", "each", "more", "most", "other", "some", "any",
    "only", "over", "under", "between", "about", "after", "before", "during", "based", "using",
    "used", "use", "via", "per", "however", "therefore", "thus", "well", "all", "one", "two",
  ]
  .into_iter()
  .collect();

  /// Short glosses for common machine-learning terms, keyed by lowercase
  /// term. Keywords outside this table get a `None` definition; an unknown
  /// term never blocks extraction.
  pub static ref GLOSSARY: HashMap<&'static str, &'static str> = [
    ("transformer", "A deep learning architecture built on self-attention"),
    ("attention", "Mechanism weighting input elements by learned relevance"),
    ("llm", "Large language model trained on broad text corpora"),
    ("embedding", "Continuous vector representation of a discrete input"),
    ("pretraining", "Training a model on a generic objective before task adaptation"),
    ("finetuning", "Adapting a pretrained model to a specific task"),
    ("overfitting", "Fitting training data at the expense of generalization"),
    ("regularization", "Constraints that penalize model complexity during training"),
    ("encoder", "Model component mapping inputs to internal representations"),
    ("decoder", "Model component generating outputs from internal representations"),
    ("convolution", "Sliding-window linear operation over structured input"),
    ("gradient", "Partial derivatives of the loss with respect to parameters"),
    ("benchmark", "A standardized dataset and protocol for comparing methods"),
    ("ablation", "Experiment removing a component to measure its contribution"),
    ("tokenization", "Splitting text into model-consumable units"),
  ]
  .into_iter()
  .collect();

  /// Titles of widely cited papers used by the classic-paper heuristic.
  /// Matching is case-insensitive containment against a parsed reference
  /// title.
  pub static ref LANDMARK_TITLES: Vec<&'static str> = vec![
    "Attention is all you need",
    "BERT: Pre-training of deep bidirectional transformers",
    "Generative adversarial networks",
    "ImageNet classification with deep convolutional neural networks",
    "Deep residual learning for image recognition",
    "U-Net: Convolutional networks for biomedical image segmentation",
    "Language models are few-shot learners",
    "Language models are unsupervised multitask learners",
    "Adam: A method for stochastic optimization",
    "Long short-term memory",
  ];
}

/// Characters counted as mathematical notation by the formula detector.
pub const FORMULA_CHARS: &str = "=+*∑∫∂∇Δ≡≈≠≤≥±×÷∈∉⊂⊃⊆⊇∪∩∧∨¬→←↔∀∃λαβγθσμπ";

/// Cue words that raise a sentence's salience in the extractive fallback.
pub const CUE_WORDS: &[&str] = &[
  "introduce",
  "present",
  "propose",
  "develop",
  "show",
  "demonstrate",
  "result",
  "conclusion",
  "find",
  "discover",
  "improve",
  "achieve",
  "outperform",
];

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stopwords_are_lowercase() {
    assert!(STOPWORDS.iter().all(|w| w.chars().all(|c| c.is_ascii_lowercase())));
  }

  #[test]
  fn glossary_lookup() {
    assert!(GLOSSARY.get("transformer").is_some());
    assert!(GLOSSARY.get("nonexistent-term").is_none());
  }
}
