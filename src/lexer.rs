/*!

  The pattern tokenizer. `advance()` consumes one lexical unit from the remaining pattern text
  and updates the current token and lexeme character. Escape processing runs outside quote mode;
  a `"` toggles quote mode, inside which every character is a literal except `\"`.

  All tokenizer state — cursor, quote mode, current token — lives in the `Lexer` value itself,
  so independent patterns can be compiled concurrently and tests can drive a lexer in isolation.

*/

use crate::character::Char;
use crate::error::PatternError;
use crate::Index32;


#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Token {
  EndOfInput,
  Carat,
  Dash,
  Dollar,
  Dot,
  LeftBracket,
  LeftParen,
  Literal,
  Pipe,
  Plus,
  QuestionMark,
  RightBracket,
  RightParen,
  Star,
}

impl Token {

  /// Classifies an unescaped, unquoted character.
  fn from_char(c: Char) -> Token {
    match c.0 {
      b'$' => Token::Dollar,
      b'(' => Token::LeftParen,
      b')' => Token::RightParen,
      b'*' => Token::Star,
      b'+' => Token::Plus,
      b'-' => Token::Dash,
      b'.' => Token::Dot,
      b'?' => Token::QuestionMark,
      b'[' => Token::LeftBracket,
      b']' => Token::RightBracket,
      b'^' => Token::Carat,
      b'|' => Token::Pipe,
      _    => Token::Literal,
    }
  }

}


pub struct Lexer<'a> {
  pattern  : &'a [u8],  //< Pattern text as bytes
  idx      : Index32,   //< Cursor into `self.pattern`
  in_quote : bool,      //< Inside a `"..."` literal run
  current  : Token,     //< Most recently recognized token
  lexeme   : Char,      //< Character value behind `current`
}

impl<'a> Lexer<'a> {

  pub fn new(pattern: &'a str) -> Lexer<'a> {
    Lexer {
      pattern: pattern.as_bytes(),
      idx: 0,
      in_quote: false,
      current: Token::EndOfInput,
      lexeme: Char(0),
    }
  }


  pub fn current(&self) -> Token {
    self.current
  }


  pub fn lexeme(&self) -> Char {
    self.lexeme
  }


  pub fn idx(&self) -> Index32 {
    self.idx
  }


  /// Returns the character at index `idx` of the pattern, or NUL past the end.
  fn at(&self, idx: Index32) -> Char {
    if idx >= self.pattern.len() as Index32 {
      return Char(0);
    }
    Char(self.pattern[idx as usize])
  }


  fn at_end(&self) -> bool {
    self.idx >= self.pattern.len() as Index32
  }


  /// Interprets one (possibly escaped) character at the cursor and consumes it. Recognized
  /// escapes: `\t \n \r \b \f \e` (case-insensitive), `\^X` caret-notation control characters,
  /// `\xHH` with 1–3 hex digits, `\NNN` with 1–3 octal digits. An unrecognized escape yields
  /// the escaped character itself; a lone trailing backslash yields a backslash.
  fn esc(&mut self) -> Char {
    if self.at(self.idx) != '\\' {
      let c = self.at(self.idx);
      self.idx += 1;
      return c;
    }

    self.idx += 1;
    let c = self.at(self.idx);
    match c.to_uppercase().0 {
      0 => Char(b'\\'), // lone trailing backslash
      b'B' => {
        self.idx += 1;
        Char(0x08)
      }
      b'E' => {
        self.idx += 1;
        Char(0x1B)
      }
      b'F' => {
        self.idx += 1;
        Char(0x0C)
      }
      b'N' => {
        self.idx += 1;
        Char(b'\n')
      }
      b'R' => {
        self.idx += 1;
        Char(b'\r')
      }
      b'T' => {
        self.idx += 1;
        Char(b'\t')
      }
      b'^' => {
        self.idx += 1;
        let x = self.at(self.idx);
        self.idx += 1;
        Char(x.to_uppercase().0.wrapping_sub(b'@'))
      }
      b'X' => {
        self.idx += 1;
        let mut value: u32 = 0;
        let mut digits = 0;
        while digits < 3 && self.at(self.idx).is_hexdigit() {
          value = (value << 4) | u32::from(self.at(self.idx).to_digit(16));
          self.idx += 1;
          digits += 1;
        }
        Char(value as u8)
      }
      _ if c.is_octdigit() => {
        let mut value: u32 = 0;
        let mut digits = 0;
        while digits < 3 && self.at(self.idx).is_octdigit() {
          value = (value << 3) | u32::from(self.at(self.idx).to_digit(8));
          self.idx += 1;
          digits += 1;
        }
        Char(value as u8)
      }
      _ => {
        self.idx += 1;
        c
      }
    }
  }


  /// Consumes one lexical unit, updating the current token and lexeme. Fails only when the
  /// pattern ends while quote mode is still open.
  pub fn advance(&mut self) -> Result<Token, PatternError> {
    if self.at_end() {
      if self.in_quote {
        return Err(PatternError::MismatchedQuotation(self.idx));
      }
      self.current = Token::EndOfInput;
      self.lexeme = Char(0);
      return Ok(self.current);
    }

    if self.at(self.idx) == '"' {
      self.in_quote = !self.in_quote;
      self.idx += 1;
      if self.at_end() {
        if self.in_quote {
          return Err(PatternError::MismatchedQuotation(self.idx));
        }
        self.current = Token::EndOfInput;
        self.lexeme = Char(0);
        return Ok(self.current);
      }
    }

    let saw_esc = self.at(self.idx) == '\\';
    if !self.in_quote {
      self.lexeme = self.esc();
    } else if saw_esc && self.at(self.idx + 1) == '"' {
      // The only escape honored inside quotes.
      self.idx += 2;
      self.lexeme = Char(b'"');
    } else {
      self.lexeme = self.at(self.idx);
      self.idx += 1;
    }

    self.current = if self.in_quote || saw_esc {
      Token::Literal
    } else {
      Token::from_char(self.lexeme)
    };
    Ok(self.current)
  }

}
