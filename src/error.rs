use std::fmt::{Display, Formatter};

use crate::Index32;

/// Fatal pattern-compilation failures. Every variant carries the index into the pattern text at
/// which the parse gave up; no partial automaton is ever returned alongside one of these.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PatternError {
  DanglingQuantifier(Index32),  //< `*`, `+`, or `?` with no expression in front of it
  EmptyExpression(Index32),     //< a (sub)expression produced no NFA fragment, e.g. `a|` or `()`
  MismatchedParens(Index32),    //< `(` without a matching `)`
  MismatchedQuotation(Index32), //< pattern ended inside a `"..."` quoted run
  StrayBracket(Index32),        //< `]` outside of a character class
  StrayCarat(Index32),          //< `^` anywhere but the start of a rule
}

impl PatternError {

  /// The character position at which the error occurred.
  pub fn idx(&self) -> Index32 {
    *match self {
      | PatternError::DanglingQuantifier(loc)
      | PatternError::EmptyExpression(loc)
      | PatternError::MismatchedParens(loc)
      | PatternError::MismatchedQuotation(loc)
      | PatternError::StrayBracket(loc)
      | PatternError::StrayCarat(loc) => loc,
    }
  }

}

impl Display for PatternError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      PatternError::DanglingQuantifier(loc) => {
        write!(f, "'*', '+', and '?' must follow an expression (at character {})", loc)
      }
      PatternError::EmptyExpression(loc) => {
        write!(f, "expression is empty (at character {})", loc)
      }
      PatternError::MismatchedParens(loc) => {
        write!(f, "expected ')' (at character {})", loc)
      }
      PatternError::MismatchedQuotation(loc) => {
        write!(f, "newline in quoted string (at character {})", loc)
      }
      PatternError::StrayBracket(loc) => {
        write!(f, "encountered a stray ']' (at character {})", loc)
      }
      PatternError::StrayCarat(loc) => {
        write!(f, "encountered a stray '^' (at character {})", loc)
      }
    }
  }
}

impl std::error::Error for PatternError {}


#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn reports_location() {
    let error = PatternError::StrayBracket(7);
    assert_eq!(error.idx(), 7);
    assert!(format!("{}", error).contains("']'"));
    assert!(format!("{}", error).contains("7"));
  }
}
