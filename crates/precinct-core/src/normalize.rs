//! Unicode confusable folding.
//!
//! Phrase detection runs over channel text that is sometimes written with
//! visually-identical alternate encodings (fullwidth forms, mathematical
//! alphanumerics) to slip past matching. Folding maps those blocks back to
//! plain ASCII; everything else passes through untouched.

use unicode_normalization::UnicodeNormalization;

/// Map visually-confusable code points to their ASCII equivalents.
///
/// Applies NFKC compatibility decomposition first, so ligatures and styled
/// variants collapse toward base forms, then remaps the fullwidth and
/// mathematical-bold Latin/digit blocks code point by code point. Pure,
/// total, and idempotent.
pub fn fold_homoglyphs(input: &str) -> String {
  input
    .nfkc()
    .map(|ch| {
      let code = ch as u32;
      match code {
        // Mathematical bold A-Z / a-z / 0-9.
        0x1D400..=0x1D419 => remap(code, 0x1D400, 'A'),
        0x1D41A..=0x1D433 => remap(code, 0x1D41A, 'a'),
        0x1D7CE..=0x1D7D7 => remap(code, 0x1D7CE, '0'),
        // Fullwidth A-Z / a-z / 0-9.
        0xFF21..=0xFF3A => remap(code, 0xFF21, 'A'),
        0xFF41..=0xFF5A => remap(code, 0xFF41, 'a'),
        0xFF10..=0xFF19 => remap(code, 0xFF10, '0'),
        _ => ch,
      }
    })
    .collect()
}

/// Shift `code` from its block onto the ASCII range starting at `ascii_start`.
/// Block widths are at most 26, so the result always lands in ASCII.
fn remap(code: u32, block_start: u32, ascii_start: char) -> char {
  char::from_u32(ascii_start as u32 + (code - block_start)).unwrap_or(ascii_start)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_ascii_passes_through() {
    assert_eq!(fold_homoglyphs("FICHA CRIMINAL"), "FICHA CRIMINAL");
    assert_eq!(fold_homoglyphs("abc 123 !?"), "abc 123 !?");
  }

  #[test]
  fn fullwidth_folds_to_ascii() {
    assert_eq!(fold_homoglyphs("ＦＩＣＨＡ"), "FICHA");
    assert_eq!(fold_homoglyphs("ａｂｃ"), "abc");
    assert_eq!(fold_homoglyphs("０１２"), "012");
  }

  #[test]
  fn mathematical_bold_folds_to_ascii() {
    // U+1D405 .. — bold FICHA; U+1D7CF — bold 1.
    assert_eq!(fold_homoglyphs("\u{1D405}\u{1D408}\u{1D402}\u{1D407}\u{1D400}"), "FICHA");
    assert_eq!(fold_homoglyphs("\u{1D41A}\u{1D41B}"), "ab");
    assert_eq!(fold_homoglyphs("\u{1D7CF}\u{1D7D7}"), "19");
  }

  #[test]
  fn other_scripts_and_punctuation_unchanged() {
    assert_eq!(fold_homoglyphs("prisão: опис 警察!"), "prisão: опис 警察!");
  }

  #[test]
  fn idempotent() {
    for input in ["ＦＩＣＨＡ ｃｒｉｍｉｎａｌ", "\u{1D405}\u{1D408}", "plain", "ﬁcha"] {
      let once = fold_homoglyphs(input);
      assert_eq!(fold_homoglyphs(&once), once);
    }
  }
}
