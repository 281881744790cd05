/*!

  Subset construction: converts an NFA into a DFA by epsilon-closure and per-character move
  sets. A DFA state's identity is its closure set of NFA node indices; two states are the same
  state iff their identity sets are equal. The worklist loop tries every alphabet code from 1
  through 126 — NUL never triggers a transition, and neither does DEL.

*/

use std::fmt::{Display, Formatter};

use crate::character::Char;
use crate::charset::CharSet;
use crate::nfa::{Anchor, Edge, Nfa};
use crate::{StateIndex, ALPHABET_SIZE};


/// Display label for a state, `A`, `B`, ... (wrapping past `Z`).
pub fn state_label(index: StateIndex) -> char {
  (b'A' + (index % 26) as u8) as char
}


#[derive(Clone, Debug)]
pub struct DfaState {
  pub set    : CharSet,        //< Identity: the epsilon-closure, as NFA node indices
  pub accept : Option<Anchor>, //< Some iff the closure holds a terminal NFA node
  pub next   : Vec<StateIndex>,
  pub chars  : Vec<CharSet>,   //< Trigger characters, parallel to `next`
  pub(crate) partition: usize, //< Scratch tag for the minimizer
}

impl DfaState {

  fn new(set: CharSet, accept: Option<Anchor>) -> DfaState {
    DfaState {
      set,
      accept,
      next: Vec::new(),
      chars: Vec::new(),
      partition: 0,
    }
  }


  pub fn is_accepting(&self) -> bool {
    self.accept.is_some()
  }


  /// The transition target on `c`, if any.
  pub fn target(&self, c: Char) -> Option<StateIndex> {
    for (j, chars) in self.chars.iter().enumerate() {
      if chars.contains(c) {
        return Some(self.next[j]);
      }
    }
    None
  }

}


#[derive(Debug)]
pub struct Dfa {
  pub states : Vec<DfaState>,
  pub start  : StateIndex,
}


/// Grows `set` to its epsilon closure and reports the accept status of the closed set: the OR
/// of the anchors on every terminal NFA node it contains, or `None` when it contains no
/// terminal.
fn epsilon_closure(nfa: &Nfa, mut set: CharSet) -> (CharSet, Option<Anchor>) {
  let mut stack: Vec<usize> = set.ones().collect();

  while let Some(index) = stack.pop() {
    let node = nfa.node(index);
    if let Edge::Epsilon = node.edge {
      for slot in node.next.iter() {
        if let Some(target) = *slot {
          if !set.contains(target) {
            set.insert(target);
            stack.push(target);
          }
        }
      }
    }
  }

  let mut accept: Option<Anchor> = None;
  for index in set.ones() {
    let node = nfa.node(index);
    if node.is_terminal() {
      *accept.get_or_insert(Anchor::NONE) |= node.anchor;
    }
  }

  (set, accept)
}


/// The raw (unclosed) set of NFA nodes reachable from `set` by consuming `c`, or `None` when
/// nothing in the set moves on `c`.
fn move_on(nfa: &Nfa, set: &CharSet, c: Char) -> Option<CharSet> {
  let mut outset: Option<CharSet> = None;
  for index in set.ones() {
    let node = nfa.node(index);
    if node.edge.matches(c) {
      if let Some(target) = node.next[0] {
        outset.get_or_insert_with(CharSet::new).insert(target);
      }
    }
  }
  outset
}


impl Dfa {

  /// Subset construction. State 0 is the closure of the NFA start state; new states are
  /// deduplicated by identity-set equality, and a transition to an already-reachable target
  /// extends that edge's trigger set instead of adding a parallel edge.
  pub fn from_nfa(nfa: &Nfa) -> Dfa {
    let (set, accept) = epsilon_closure(nfa, CharSet::single(nfa.start));
    let mut states = vec![DfaState::new(set, accept)];
    let mut work: Vec<StateIndex> = vec![0];

    while let Some(current) = work.pop() {
      for code in 1..(ALPHABET_SIZE - 1) as u8 {
        let c = Char(code);
        let raw = match move_on(nfa, &states[current].set, c) {
          None => continue,
          Some(raw) => raw,
        };
        let (closure, accept) = epsilon_closure(nfa, raw);

        match states.iter().position(|state| state.set == closure) {
          Some(existing) => {
            match states[current].next.iter().position(|&t| t == existing) {
              // Same target already reachable from here: widen its trigger set.
              Some(j) => states[current].chars[j].insert(c),
              None => {
                states[current].next.push(existing);
                states[current].chars.push(CharSet::single(c));
              }
            }
          }
          None => {
            let fresh = states.len();
            states.push(DfaState::new(closure, accept));
            states[current].next.push(fresh);
            states[current].chars.push(CharSet::single(c));
            work.push(fresh);
          }
        }
      }
    }

    Dfa { states, start: 0 }
  }


  pub fn len(&self) -> usize {
    self.states.len()
  }


  pub fn is_empty(&self) -> bool {
    self.states.is_empty()
  }


  /// Runs `input` against the automaton as one full line. Anchored rules consume the line
  /// terminators a scanner driver would supply, so a virtual `\n` is offered on either side;
  /// the accepting state's anchor must agree with exactly the virtual terminators consumed.
  pub fn matches_line(&self, input: &str) -> bool {
    for &(lead, trail) in &[(false, false), (true, false), (false, true), (true, true)] {
      if let Some(anchor) = self.run(input, lead, trail) {
        if anchor.is_line_start() == lead && anchor.is_line_end() == trail {
          return true;
        }
      }
    }
    false
  }


  /// Walks the automaton over the input, optionally book-ended with virtual newlines, and
  /// reports the final state's accept anchor if every character had a transition and the final
  /// state accepts.
  fn run(&self, input: &str, lead: bool, trail: bool) -> Option<Anchor> {
    let mut state = self.start;
    let lead_bytes = if lead { &b"\n"[..] } else { &b""[..] };
    let trail_bytes = if trail { &b"\n"[..] } else { &b""[..] };
    for &byte in lead_bytes.iter().chain(input.as_bytes()).chain(trail_bytes) {
      state = self.states[state].target(Char(byte))?;
    }
    self.states[state].accept
  }

}

impl Display for Dfa {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    for (index, state) in self.states.iter().enumerate() {
      write!(f, "DFA state {}", state_label(index))?;
      if index == self.start {
        write!(f, " (start)")?;
      }
      if let Some(anchor) = state.accept {
        write!(f, " (accept{}{})", if anchor == Anchor::NONE { "" } else { " " }, anchor)?;
      }
      writeln!(f, ":")?;
      for (j, target) in state.next.iter().enumerate() {
        writeln!(f, "  {} --> {}", state.chars[j], state_label(*target))?;
      }
    }
    Ok(())
  }
}
