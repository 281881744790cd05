/*!

  Recursive-descent parser performing Thompson's construction directly: each production returns
  the (start, end) arena indices of the NFA fragment it built.

  ```text
  machine := rule ( rule )*            -- epsilon-chained at top level
  rule    := ['^'] expr ['$']
  expr    := cat_expr ( '|' cat_expr )*
  cat_expr:= factor ( factor )*
  factor  := term [ '*' | '+' | '?' ]
  term    := '(' expr ')' | literal | '.' | '[' class ']'
  ```

  Concatenation splices the second fragment's start node into the first fragment's end node
  rather than linking them with an epsilon edge; the vacated slot goes back on the arena's free
  list.

*/

use crate::character::Char;
use crate::charset::CharSet;
use crate::debug_logln;
use crate::error::PatternError;
use crate::lexer::{Lexer, Token};
use crate::nfa::{Anchor, Edge, Nfa, NodeArena};
use crate::NodeIndex;

/// An NFA fragment: start and end node indices.
type Fragment = (NodeIndex, NodeIndex);


pub struct Parser<'a> {
  lexer : Lexer<'a>,
  arena : NodeArena,
}

impl<'a> Parser<'a> {

  pub fn new(pattern: &'a str) -> Parser<'a> {
    Parser {
      lexer: Lexer::new(pattern),
      arena: NodeArena::new(),
    }
  }


  /// Runs the whole construction and hands the finished NFA over.
  pub fn thompson(mut self) -> Result<Nfa, PatternError> {
    let start = self.machine()?;
    Ok(Nfa {
      arena: self.arena,
      start,
    })
  }


  /// Checks whether the current token can begin a concatenation factor. Tokens that can only
  /// close an enclosing production answer no; tokens that are outright illegal here are fatal.
  fn first_in_cat(&self) -> Result<bool, PatternError> {
    match self.lexer.current() {
      Token::RightParen | Token::Dollar | Token::Pipe | Token::EndOfInput => Ok(false),
      Token::Star | Token::Plus | Token::QuestionMark => {
        Err(PatternError::DanglingQuantifier(self.lexer.idx()))
      }
      Token::RightBracket => Err(PatternError::StrayBracket(self.lexer.idx())),
      Token::Carat => Err(PatternError::StrayCarat(self.lexer.idx())),
      _ => Ok(true),
    }
  }


  /// Top level: one or more rules, each epsilon-chained off the previous chain node so the
  /// machine's start state nondeterministically tries every rule.
  fn machine(&mut self) -> Result<NodeIndex, PatternError> {
    debug_logln!("enter machine");
    let start = self.arena.alloc();
    let mut p = start;
    self.lexer.advance()?;
    let first = self.rule()?;
    self.arena.node_mut(p).next[0] = Some(first);
    while self.lexer.current() != Token::EndOfInput {
      let chain = self.arena.alloc();
      self.arena.node_mut(p).next[1] = Some(chain);
      p = chain;
      let next_rule = self.rule()?;
      self.arena.node_mut(p).next[0] = Some(next_rule);
    }
    debug_logln!("leave machine");
    Ok(start)
  }


  /// One rule: an optional line-start anchor, an expression, and an optional line-end anchor.
  /// The anchor obligations are recorded on the rule's terminal node. The trailing `advance`
  /// consumes the one-character separator between rules.
  fn rule(&mut self) -> Result<NodeIndex, PatternError> {
    debug_logln!("enter rule");
    let mut anchor = Anchor::NONE;
    let start: NodeIndex;
    let mut end: NodeIndex;

    if self.lexer.current() == Token::Carat {
      // The anchor node consumes the newline that precedes the line proper.
      let carat = self.arena.alloc();
      self.arena.node_mut(carat).edge = Edge::Literal(Char(b'\n'));
      anchor |= Anchor::LINE_START;
      self.lexer.advance()?;
      let (expr_start, expr_end) = self.expr()?;
      self.arena.node_mut(carat).next[0] = Some(expr_start);
      start = carat;
      end = expr_end;
    } else {
      let (expr_start, expr_end) = self.expr()?;
      start = expr_start;
      end = expr_end;
    }

    if self.lexer.current() == Token::Dollar {
      self.lexer.advance()?;
      // The erstwhile terminal now consumes the line terminator; a fresh node becomes terminal.
      let terminal = self.arena.alloc();
      let mut class = CharSet::new();
      class.insert(b'\n' as usize);
      class.insert(b'\r' as usize);
      let end_node = self.arena.node_mut(end);
      end_node.next[0] = Some(terminal);
      end_node.edge = Edge::Class(class);
      end = terminal;
      anchor |= Anchor::LINE_END;
    }

    self.arena.node_mut(end).anchor = anchor;
    self.lexer.advance()?;
    debug_logln!("leave rule");
    Ok(start)
  }


  /// Alternation: fork node into both branches, join node out of both ends.
  fn expr(&mut self) -> Result<Fragment, PatternError> {
    debug_logln!("enter expr");
    let (mut start, mut end) = self.cat_expr()?;
    while self.lexer.current() == Token::Pipe {
      self.lexer.advance()?;
      let (branch_start, branch_end) = self.cat_expr()?;

      let fork = self.arena.alloc();
      self.arena.node_mut(fork).next = [Some(start), Some(branch_start)];
      start = fork;

      let join = self.arena.alloc();
      self.arena.node_mut(end).next[0] = Some(join);
      self.arena.node_mut(branch_end).next[0] = Some(join);
      end = join;
    }
    debug_logln!("leave expr");
    Ok((start, end))
  }


  /// Concatenation by splicing: the follower's start node is folded into the current end node,
  /// reclaiming one arena slot per factor.
  fn cat_expr(&mut self) -> Result<Fragment, PatternError> {
    debug_logln!("enter cat_expr");
    if !self.first_in_cat()? {
      return Err(PatternError::EmptyExpression(self.lexer.idx()));
    }
    let (start, mut end) = self.factor()?;
    while self.first_in_cat()? {
      let (follower_start, follower_end) = self.factor()?;
      self.arena.splice(end, follower_start);
      end = follower_end;
    }
    debug_logln!("leave cat_expr");
    Ok((start, end))
  }


  /// A term with an optional quantifier. New start/end nodes wrap the inner fragment; `*`/`?`
  /// add the skip edge, `*`/`+` add the repeat edge.
  fn factor(&mut self) -> Result<Fragment, PatternError> {
    debug_logln!("enter factor");
    let (mut start, mut end) = self.term()?;
    let quantifier = self.lexer.current();
    if quantifier == Token::Star || quantifier == Token::Plus || quantifier == Token::QuestionMark
    {
      let outer_start = self.arena.alloc();
      let outer_end = self.arena.alloc();
      self.arena.node_mut(outer_start).next[0] = Some(start);
      self.arena.node_mut(end).next[0] = Some(outer_end);
      if quantifier == Token::Star || quantifier == Token::QuestionMark {
        self.arena.node_mut(outer_start).next[1] = Some(outer_end); // skip
      }
      if quantifier == Token::Star || quantifier == Token::Plus {
        self.arena.node_mut(end).next[1] = Some(start); // repeat
      }
      start = outer_start;
      end = outer_end;
      self.lexer.advance()?;
    }
    debug_logln!("leave factor");
    Ok((start, end))
  }


  /// A parenthesized expression, a literal, `.`, or a character class.
  fn term(&mut self) -> Result<Fragment, PatternError> {
    debug_logln!("enter term");
    if self.lexer.current() == Token::LeftParen {
      self.lexer.advance()?;
      let fragment = self.expr()?;
      if self.lexer.current() != Token::RightParen {
        return Err(PatternError::MismatchedParens(self.lexer.idx()));
      }
      self.lexer.advance()?;
      debug_logln!("leave term");
      return Ok(fragment);
    }

    let start = self.arena.alloc();
    let end = self.arena.alloc();
    self.arena.node_mut(start).next[0] = Some(end);

    if self.lexer.current() != Token::Dot && self.lexer.current() != Token::LeftBracket {
      self.arena.node_mut(start).edge = Edge::Literal(self.lexer.lexeme());
      self.lexer.advance()?;
    } else {
      let mut class = CharSet::new();
      if self.lexer.current() == Token::Dot {
        // `.` is anything but a line terminator.
        class.insert(b'\n' as usize);
        class.insert(b'\r' as usize);
        class.complement();
      } else {
        self.lexer.advance()?;
        if self.lexer.current() == Token::Carat {
          // A negated class implicitly excludes the line terminators.
          self.lexer.advance()?;
          class.insert(b'\n' as usize);
          class.insert(b'\r' as usize);
          class.complement();
        }
        if self.lexer.current() != Token::RightBracket {
          self.do_dash(&mut class)?;
        } else {
          // `[]` is the blank-and-control range.
          for c in 0..=b' ' {
            class.insert(c as usize);
          }
        }
      }
      self.arena.node_mut(start).edge = Edge::Class(class);
      self.lexer.advance()?;
    }
    debug_logln!("leave term");
    Ok((start, end))
  }


  /// The inside of a bracketed class: single characters and `a-b` runs, accumulated until the
  /// closing bracket. A run adds every code in `[lo, hi]` ascending; a reversed run adds
  /// nothing.
  fn do_dash(&mut self, class: &mut CharSet) -> Result<(), PatternError> {
    let mut first = Char(0);
    while self.lexer.current() != Token::EndOfInput
      && self.lexer.current() != Token::RightBracket
    {
      if self.lexer.current() != Token::Dash {
        first = self.lexer.lexeme();
        class.insert(first);
      } else {
        self.lexer.advance()?;
        class.insert_range(first, self.lexer.lexeme());
      }
      self.lexer.advance()?;
    }
    Ok(())
  }

}


/// Compiles a pattern into one NFA via Thompson's construction.
pub fn thompson(pattern: &str) -> Result<Nfa, PatternError> {
  Parser::new(pattern).thompson()
}


#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn single_literal_shape() {
    let nfa = thompson("a").unwrap();
    // machine start, literal node, terminal
    assert_eq!(nfa.live_count(), 3);
    assert_eq!(nfa.start, 0);

    let rule_start = nfa.node(nfa.start).next[0].unwrap();
    let literal = nfa.node(rule_start);
    assert_eq!(literal.edge, Edge::Literal(Char(b'a')));

    let terminal = nfa.node(literal.next[0].unwrap());
    assert!(terminal.is_terminal());
    assert_eq!(terminal.anchor, Anchor::NONE);
  }

  #[test]
  fn concatenation_splices_one_node() {
    let parser = Parser::new("ab");
    let nfa = parser.thompson().unwrap();
    // Fragments of 2 nodes each, one reclaimed by the splice, plus the machine start node.
    assert_eq!(nfa.live_count(), 4);
    // The tombstoned slot is still in the arena and sits on the free list.
    assert_eq!(nfa.len(), 5);
    assert_eq!(nfa.arena.free_list(), &[3]);
  }

  #[test]
  fn star_wiring() {
    let nfa = thompson("a*").unwrap();
    let rule_start = nfa.node(nfa.start).next[0].unwrap();
    let outer_start = nfa.node(rule_start);

    // Skip edge straight to the outer end.
    let inner_start = outer_start.next[0].unwrap();
    let outer_end = outer_start.next[1].unwrap();

    let inner = nfa.node(inner_start);
    assert_eq!(inner.edge, Edge::Literal(Char(b'a')));
    let inner_end = nfa.node(inner.next[0].unwrap());

    // Inner end feeds the outer end and loops back to the inner start.
    assert_eq!(inner_end.next[0], Some(outer_end));
    assert_eq!(inner_end.next[1], Some(inner_start));
    assert!(nfa.node(outer_end).is_terminal());
  }

  #[test]
  fn plus_has_no_skip_edge() {
    let nfa = thompson("a+").unwrap();
    let rule_start = nfa.node(nfa.start).next[0].unwrap();
    let outer_start = nfa.node(rule_start);
    assert_eq!(outer_start.next[1], None);
  }

  #[test]
  fn alternation_forks_and_joins() {
    let nfa = thompson("a|b").unwrap();
    let fork = nfa.node(nfa.node(nfa.start).next[0].unwrap());
    let left = nfa.node(fork.next[0].unwrap());
    let right = nfa.node(fork.next[1].unwrap());
    assert_eq!(left.edge, Edge::Literal(Char(b'a')));
    assert_eq!(right.edge, Edge::Literal(Char(b'b')));

    let join = nfa.node(nfa.node(left.next[0].unwrap()).next[0].unwrap());
    assert!(join.is_terminal());
  }

  #[test]
  fn anchors_mark_the_terminal() {
    let nfa = thompson("^a$").unwrap();
    let mut terminals = nfa.live().filter(|&i| nfa.node(i).is_terminal());
    let terminal = terminals.next().unwrap();
    assert_eq!(terminals.next(), None);
    assert_eq!(nfa.node(terminal).anchor, Anchor::BOTH);

    // The line-start node consumes a newline.
    let carat = nfa.node(nfa.node(nfa.start).next[0].unwrap());
    assert_eq!(carat.edge, Edge::Literal(Char(b'\n')));
  }

  #[test]
  fn dot_excludes_line_terminators() {
    let nfa = thompson(".").unwrap();
    let node = nfa.node(nfa.node(nfa.start).next[0].unwrap());
    match &node.edge {
      Edge::Class(set) => {
        assert!(set.is_complemented());
        assert!(set.contains(b'a' as usize));
        assert!(!set.contains(b'\n' as usize));
        assert!(!set.contains(b'\r' as usize));
      }
      other => panic!("expected a class edge, found {:?}", other),
    }
  }

  #[test]
  fn negated_class_excludes_line_terminators() {
    let nfa = thompson("[^ab]").unwrap();
    let node = nfa.node(nfa.node(nfa.start).next[0].unwrap());
    match &node.edge {
      Edge::Class(set) => {
        assert!(!set.contains(b'a' as usize));
        assert!(!set.contains(b'b' as usize));
        assert!(!set.contains(b'\n' as usize));
        assert!(set.contains(b'c' as usize));
      }
      other => panic!("expected a class edge, found {:?}", other),
    }
  }

  #[test]
  fn empty_class_is_blank_range() {
    let nfa = thompson("[]").unwrap();
    let node = nfa.node(nfa.node(nfa.start).next[0].unwrap());
    match &node.edge {
      Edge::Class(set) => {
        for c in 0..=b' ' {
          assert!(set.contains(c as usize));
        }
        assert!(!set.contains(b'!' as usize));
      }
      other => panic!("expected a class edge, found {:?}", other),
    }
  }

  #[test]
  fn class_ranges() {
    let nfa = thompson("[a-cx]").unwrap();
    let node = nfa.node(nfa.node(nfa.start).next[0].unwrap());
    match &node.edge {
      Edge::Class(set) => {
        for c in b'a'..=b'c' {
          assert!(set.contains(c as usize));
        }
        assert!(set.contains(b'x' as usize));
        assert!(!set.contains(b'd' as usize));
      }
      other => panic!("expected a class edge, found {:?}", other),
    }
  }

  #[test]
  fn multiple_rules_chain() {
    let nfa = thompson("^a$\n^b$").unwrap();
    let machine_start = nfa.node(nfa.start);
    assert!(machine_start.next[1].is_some());
    let terminal_count = nfa.live().filter(|&i| nfa.node(i).is_terminal()).count();
    assert_eq!(terminal_count, 2);
  }

  #[test]
  fn parse_errors() {
    assert!(matches!(thompson("*a"), Err(PatternError::DanglingQuantifier(_))));
    assert!(matches!(thompson("a?*"), Err(PatternError::DanglingQuantifier(_))));
    assert!(matches!(thompson("]a"), Err(PatternError::StrayBracket(_))));
    assert!(matches!(thompson("a^b"), Err(PatternError::StrayCarat(_))));
    assert!(matches!(thompson("(a"), Err(PatternError::MismatchedParens(_))));
    assert!(matches!(thompson("\"abc"), Err(PatternError::MismatchedQuotation(_))));
    assert!(matches!(thompson(""), Err(PatternError::EmptyExpression(_))));
    assert!(matches!(thompson("a|"), Err(PatternError::EmptyExpression(_))));
    assert!(matches!(thompson("()"), Err(PatternError::EmptyExpression(_))));
  }

  #[test]
  fn quoted_operators_are_literal() {
    let nfa = thompson("\"a*\"").unwrap();
    // a, *, concatenated: machine start + 4 fragment nodes - 1 spliced = 4 live.
    assert_eq!(nfa.live_count(), 4);
    let first = nfa.node(nfa.node(nfa.start).next[0].unwrap());
    assert_eq!(first.edge, Edge::Literal(Char(b'a')));
    let second = nfa.node(first.next[0].unwrap());
    assert_eq!(second.edge, Edge::Literal(Char(b'*')));
  }
}
