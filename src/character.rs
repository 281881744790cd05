#![allow(dead_code)]

/*!

  A `Char` is one code point of the scanner alphabet, stored as a `u8`. The alphabet is the 128
  ASCII code points; values above `0x7F` can arise from `\xHH` escapes but never drive a DFA
  transition (the subset constructor only scans codes 1–126).

  `Char` should not be confused with the syntactically meaningful characters of a regular
  expression, e.g. `*`, `.`, `$`, which the lexer classifies separately as tokens.

*/

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Escape letters for the control characters `\x07`..`\x0D`, indexed by `code - 0x07`.
pub const ASCII_ESCAPES: &[u8; 7] = b"abtnvfr";


#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default)]
pub struct Char(pub u8);


impl Char {

  pub fn is_hexdigit(&self) -> bool {
    self.0.is_ascii_hexdigit()
  }


  pub fn is_octdigit(&self) -> bool {
    self.0 >= b'0' && self.0 <= b'7'
  }


  pub fn to_uppercase(&self) -> Char {
    Char(self.0.to_ascii_uppercase())
  }


  pub fn to_digit(&self, radix: u32) -> u8 {
    (self.0 as char).to_digit(radix).unwrap_or(0) as u8
  }


  pub fn is_printable(&self) -> bool {
    self.0 >= b' ' && self.0 < 0x7F
  }


  /// Gives a printable rendition of `self` in the caret notation used for character-class
  /// display: control characters print as `^X`.
  pub(crate) fn caret_notation(&self) -> String {
    if self.0 < b' ' {
      format!("^{}", (self.0 + b'@') as char)
    } else {
      format!("{}", self.0 as char)
    }
  }


  /// Renders `self` the way it would appear in pattern text: common control characters as their
  /// backslash escapes, other unprintables in hex.
  pub(crate) fn escaped(&self) -> String {
    let c = self.0;

    if c >= b'\x07' && c <= b'\r' {
      format!("\\{}", ASCII_ESCAPES[(c - b'\x07') as usize] as char)
    } else if c == b'\\' {
      "\\\\".to_string()
    } else if self.is_printable() {
      format!("{}", c as char)
    } else {
      format!("\\x{:02x}", c)
    }
  }

}


impl Display for Char {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.escaped())
  }
}


// region `From` `impl`s

impl From<char> for Char {
  fn from(c: char) -> Self {
    Char(c as u8)
  }
}

impl From<u8> for Char {
  fn from(b: u8) -> Self {
    Char(b)
  }
}

impl From<usize> for Char {
  fn from(b: usize) -> Self {
    Char(b as u8)
  }
}

impl From<Char> for char {
  fn from(c: Char) -> Self {
    c.0 as char
  }
}

impl From<Char> for u8 {
  fn from(c: Char) -> Self {
    c.0
  }
}

impl From<Char> for usize {
  fn from(c: Char) -> Self {
    c.0 as usize
  }
}

// endregion


// region comparisons

impl std::cmp::PartialEq<char> for Char {
  fn eq(&self, other: &char) -> bool {
    (self.0 as u32).eq(&(*other as u32))
  }
}

impl std::cmp::PartialOrd<char> for Char {
  fn partial_cmp(&self, other: &char) -> Option<Ordering> {
    (self.0 as u32).partial_cmp(&(*other as u32))
  }
}

impl std::cmp::PartialEq<char> for &Char {
  fn eq(&self, other: &char) -> bool {
    (self.0 as u32).eq(&(*other as u32))
  }
}

// endregion


#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn digit_conversions() {
    assert_eq!(Char(b'7').to_digit(8), 7);
    assert_eq!(Char(b'f').to_digit(16), 15);
    assert_eq!(Char(b'F').to_digit(16), 15);
    assert!(Char(b'a').is_hexdigit());
    assert!(!Char(b'8').is_octdigit());
  }

  #[test]
  fn compares_against_char() {
    let c = Char(b'*');
    assert!(c == '*');
    assert!(c != 'x');
    assert!(Char(b'a') < 'z');
  }

  #[test]
  fn escaped_rendition() {
    assert_eq!(Char(b'\t').escaped(), "\\t");
    assert_eq!(Char(b'a').escaped(), "a");
    assert_eq!(Char(0x1B).escaped(), "\\x1b");
    assert_eq!(Char(3).caret_notation(), "^C");
  }
}
