//! Flagged-phrase detection.

use regex::Regex;

use crate::{
  error::{Error, Result},
  normalize::fold_homoglyphs,
};

/// Counts occurrences of the flagged phrase in channel text.
///
/// The phrase words are matched case-insensitively after confusable
/// folding, with any amount of whitespace (including none) between them, so
/// "FICHA CRIMINAL", "ficha criminal" and "ＦＩＣＨＡCRIMINAL" all count.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
  pattern: Regex,
}

impl PhraseMatcher {
  /// Compile `phrase` into a matcher. Words are taken from the phrase by
  /// whitespace splitting, uppercased, regex-escaped, and joined with `\s*`.
  pub fn new(phrase: &str) -> Result<Self> {
    let words: Vec<String> = phrase
      .split_whitespace()
      .map(|w| regex::escape(&w.to_uppercase()))
      .collect();
    if words.is_empty() {
      return Err(Error::EmptyPhrase);
    }
    let pattern = Regex::new(&words.join(r"\s*"))?;
    Ok(Self { pattern })
  }

  /// Number of non-overlapping matches in `text`, scanned left to right
  /// over the folded, uppercased form.
  pub fn count(&self, text: &str) -> usize {
    let canonical = fold_homoglyphs(text).to_uppercase();
    self.pattern.find_iter(&canonical).count()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn matcher() -> PhraseMatcher {
    PhraseMatcher::new("FICHA CRIMINAL").unwrap()
  }

  #[test]
  fn counts_plain_occurrences() {
    let m = matcher();
    assert_eq!(m.count("no match here"), 0);
    assert_eq!(m.count("FICHA CRIMINAL"), 1);
    assert_eq!(m.count("FICHA CRIMINAL e depois FICHA CRIMINAL"), 2);
  }

  #[test]
  fn case_insensitive_after_folding() {
    let m = matcher();
    assert_eq!(m.count("ficha criminal"), 1);
    assert_eq!(m.count("Ficha Criminal"), 1);
  }

  #[test]
  fn whitespace_between_words_is_elastic() {
    let m = matcher();
    assert_eq!(m.count("FICHA   CRIMINAL"), 1);
    assert_eq!(m.count("FICHA\n\tCRIMINAL"), 1);
    // Zero whitespace also counts.
    assert_eq!(m.count("FICHACRIMINAL"), 1);
  }

  #[test]
  fn fullwidth_and_bold_variants_count_like_ascii() {
    let m = matcher();
    assert_eq!(m.count("ＦＩＣＨＡ ＣＲＩＭＩＮＡＬ"), 1);
    assert_eq!(
      m.count("\u{1D405}\u{1D408}\u{1D402}\u{1D407}\u{1D400} CRIMINAL"),
      1
    );
    // Same count as the plain-ASCII equivalent.
    assert_eq!(m.count("ＦＩＣＨＡ ＣＲＩＭＩＮＡＬ"), m.count("FICHA CRIMINAL"));
  }

  #[test]
  fn matches_do_not_overlap() {
    // "aa" twice in "aaaa", not three times.
    let m = PhraseMatcher::new("aa").unwrap();
    assert_eq!(m.count("aaaa"), 2);
  }

  #[test]
  fn phrase_words_are_escaped() {
    let m = PhraseMatcher::new("c.d e+f").unwrap();
    assert_eq!(m.count("c.d e+f"), 1);
    assert_eq!(m.count("cxd exf"), 0);
  }

  #[test]
  fn empty_phrase_is_rejected() {
    assert!(matches!(PhraseMatcher::new("   "), Err(Error::EmptyPhrase)));
  }
}
