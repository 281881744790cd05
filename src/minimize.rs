/*!

  DFA minimization by partition refinement. States start grouped by accept status, then each
  pass splits a group whenever two of its members disagree, on any input character, about which
  group they transition to. When a pass splits nothing the groups are the states of the minimal
  automaton, and a fresh DFA is rebuilt with one state per group.

*/

use crate::character::Char;
use crate::charset::CharSet;
use crate::dfa::{Dfa, DfaState};
use crate::{StateIndex, ALPHABET_SIZE};


/// Whether `a` and `b` currently look interchangeable: same accept status (including anchors)
/// and, for every input character, targets in the same partition.
fn equivalent(dfa: &Dfa, a: StateIndex, b: StateIndex) -> bool {
  if dfa.states[a].accept != dfa.states[b].accept {
    return false;
  }
  for code in 1..(ALPHABET_SIZE - 1) as u8 {
    let c = Char(code);
    let pa = dfa.states[a].target(c).map(|t| dfa.states[t].partition);
    let pb = dfa.states[b].target(c).map(|t| dfa.states[t].partition);
    if pa != pb {
      return false;
    }
  }
  true
}


/// Minimizes `dfa`, returning the reduced automaton. The input's partition tags are left
/// holding each state's group number, mapping old states to new ones.
pub fn minimize(dfa: &mut Dfa) -> Dfa {
  // Seed one group per distinct accept value; non-accepting states go first so the seed order
  // is stable regardless of which rule accepts.
  let mut groups: Vec<Vec<StateIndex>> = vec![Vec::new()];
  for (index, state) in dfa.states.iter().enumerate() {
    if state.accept.is_none() {
      groups[0].push(index);
      continue;
    }
    match groups[1..]
      .iter()
      .position(|g| dfa.states[g[0]].accept == state.accept)
    {
      Some(g) => groups[g + 1].push(index),
      None => groups.push(vec![index]),
    }
  }
  // A grammar where every state accepts leaves the seed group empty.
  if groups[0].is_empty() {
    groups.remove(0);
  }

  for (tag, group) in groups.iter().enumerate() {
    for &member in group.iter() {
      dfa.states[member].partition = tag;
    }
  }

  // Refine until stable. Scanning appends at most one new group per group per pass; the tag
  // update happens immediately so later comparisons in the same pass see the split.
  let mut changed = true;
  while changed {
    changed = false;
    let mut g = 0;
    while g < groups.len() {
      let mut split: Vec<StateIndex> = Vec::new();
      let representative = groups[g][0];
      let mut m = 1;
      while m < groups[g].len() {
        if equivalent(dfa, representative, groups[g][m]) {
          m += 1;
        } else {
          split.push(groups[g].remove(m));
        }
      }
      if !split.is_empty() {
        let tag = groups.len();
        for &member in split.iter() {
          dfa.states[member].partition = tag;
        }
        groups.push(split);
        changed = true;
      }
      g += 1;
    }
  }

  // Rebuild: one state per group, transitions read off the group's representative and
  // retargeted to group numbers.
  let mut states: Vec<DfaState> = Vec::with_capacity(groups.len());
  for group in groups.iter() {
    let representative = &dfa.states[group[0]];

    let mut set = CharSet::new();
    for &member in group.iter() {
      set |= &dfa.states[member].set;
    }

    let mut next: Vec<StateIndex> = Vec::new();
    let mut chars: Vec<CharSet> = Vec::new();
    for (j, target) in representative.next.iter().enumerate() {
      let tag = dfa.states[*target].partition;
      match next.iter().position(|&t| t == tag) {
        Some(k) => chars[k] |= &representative.chars[j],
        None => {
          next.push(tag);
          chars.push(representative.chars[j].clone());
        }
      }
    }

    states.push(DfaState {
      set,
      accept: representative.accept,
      next,
      chars,
      partition: 0,
    });
  }

  let start = dfa.states[dfa.start].partition;
  Dfa { states, start }
}


#[cfg(test)]
mod test {
  use super::*;
  use crate::dfa::Dfa;
  use crate::parser::thompson;

  fn minimal_dfa(pattern: &str) -> Dfa {
    let mut dfa = Dfa::from_nfa(&thompson(pattern).unwrap());
    minimize(&mut dfa)
  }

  #[test]
  fn redundant_alternation_collapses() {
    let plain = minimal_dfa("a");
    let doubled = minimal_dfa("a|a");
    assert_eq!(plain.len(), doubled.len());
    assert_eq!(doubled.len(), 2);
  }

  #[test]
  fn language_is_preserved() {
    for pattern in &["ab*", "[0-9]+", "(ab|cd)+", "a.c", "(a|b)*abb"] {
      let full = Dfa::from_nfa(&thompson(pattern).unwrap());
      let minimal = minimal_dfa(pattern);
      assert!(minimal.len() <= full.len());
      for input in &["", "a", "ab", "abb", "abbb", "42", "cd", "abcd", "axc", "babb", "x"] {
        assert_eq!(
          full.matches_line(input),
          minimal.matches_line(input),
          "pattern {:?} disagrees on {:?}",
          pattern,
          input
        );
      }
    }
  }

  #[test]
  fn minimization_is_idempotent() {
    let mut once = minimal_dfa("(a|b)*abb");
    let twice = minimize(&mut once);
    assert_eq!(once.len(), twice.len());
    assert!(twice.matches_line("abb"));
    assert!(twice.matches_line("babb"));
    assert!(!twice.matches_line("ab"));
  }

  #[test]
  fn anchored_and_unanchored_accepts_stay_distinct() {
    // The two rules accept with different anchor obligations, so their accepting states must
    // not merge even though their outgoing transitions agree.
    let mut dfa = Dfa::from_nfa(&thompson("^a$\nb").unwrap());
    let minimal = minimize(&mut dfa);
    assert!(minimal.matches_line("a"));
    assert!(minimal.matches_line("b"));
    assert!(!minimal.matches_line("ab"));
  }

  #[test]
  fn start_state_follows_its_group() {
    let mut dfa = Dfa::from_nfa(&thompson("a*").unwrap());
    let minimal = minimize(&mut dfa);
    // a* accepts the empty string, so the start state itself accepts.
    assert!(minimal.states[minimal.start].is_accepting());
    assert!(minimal.matches_line(""));
    assert!(minimal.matches_line("aaa"));
  }

  #[test]
  fn classic_dragon_example_reaches_four_states() {
    // (a|b)*abb minimizes to the textbook four states.
    let minimal = minimal_dfa("(a|b)*abb");
    assert_eq!(minimal.len(), 4);
  }
}
