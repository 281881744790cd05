/*!

  The NFA node arena. Nodes refer to each other by index into the arena, never by reference: the
  arena grows while the parser splices fragments together, and a reclaimed slot may be reissued
  for a later node. Reclaimed indices sit on a free list and are handed out again before the
  arena grows, keeping the arena compact under concatenation-heavy patterns.

*/

use std::fmt::{Display, Formatter};
use std::ops::{BitOr, BitOrAssign};

use crate::character::Char;
use crate::charset::CharSet;
use crate::NodeIndex;


/// Anchor obligations recorded on a rule's terminal node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Anchor(u8);

impl Anchor {
  pub const NONE       : Anchor = Anchor(0);
  pub const LINE_START : Anchor = Anchor(1);
  pub const LINE_END   : Anchor = Anchor(2);
  pub const BOTH       : Anchor = Anchor(3);

  pub fn is_line_start(self) -> bool {
    self.0 & Anchor::LINE_START.0 != 0
  }

  pub fn is_line_end(self) -> bool {
    self.0 & Anchor::LINE_END.0 != 0
  }
}

impl BitOrAssign for Anchor {
  fn bitor_assign(&mut self, rhs: Anchor) {
    self.0 |= rhs.0;
  }
}

impl BitOr for Anchor {
  type Output = Anchor;

  fn bitor(self, rhs: Anchor) -> Anchor {
    Anchor(self.0 | rhs.0)
  }
}

impl Display for Anchor {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    if self.is_line_start() {
      write!(f, "^")?;
    }
    if self.is_line_end() {
      write!(f, "$")?;
    }
    Ok(())
  }
}


/// What an NFA node's outgoing transition consumes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edge {
  /// Non-consuming; both `next` slots are usable.
  Epsilon,
  /// Consult the class set (which carries its own complement flag).
  Class(CharSet),
  /// One literal character.
  Literal(Char),
}

impl Edge {

  /// Whether an input character drives this edge. Epsilon edges never consume.
  pub fn matches(&self, c: Char) -> bool {
    match self {
      Edge::Epsilon => false,
      Edge::Class(set) => set.contains(c),
      Edge::Literal(l) => *l == c,
    }
  }

}

impl Default for Edge {
  fn default() -> Edge {
    Edge::Epsilon
  }
}

impl Display for Edge {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Edge::Epsilon => write!(f, "EPSILON"),
      Edge::Class(set) => write!(f, "{}", set),
      Edge::Literal(c) => write!(f, "'{}'", c),
    }
  }
}


#[derive(Clone, Debug, Default)]
pub struct NfaNode {
  pub next   : [Option<NodeIndex>; 2], //< Outgoing transitions, by arena index
  pub edge   : Edge,
  pub anchor : Anchor,                 //< Set only on a rule's terminal node
}

impl NfaNode {

  /// A node with no first transition is the accepting terminal of its rule.
  pub fn is_terminal(&self) -> bool {
    self.next[0].is_none()
  }

}


/// Growable node storage with slot recycling. Discarded slots are tombstoned and their indices
/// pushed on the free list; allocation drains the free list before growing the backing vector,
/// so indices stay stable for the lifetime of the arena.
#[derive(Debug, Default)]
pub struct NodeArena {
  nodes : Vec<Option<NfaNode>>,
  free  : Vec<NodeIndex>,
}

impl NodeArena {

  pub fn new() -> NodeArena {
    NodeArena::default()
  }


  pub fn alloc(&mut self) -> NodeIndex {
    if let Some(index) = self.free.pop() {
      self.nodes[index] = Some(NfaNode::default());
      return index;
    }
    self.nodes.push(Some(NfaNode::default()));
    self.nodes.len() - 1
  }


  /// Clears the slot back to empty and returns its index to the pool. The caller must ensure no
  /// live node still points at `index`.
  pub fn discard(&mut self, index: NodeIndex) {
    self.nodes[index] = None;
    self.free.push(index);
  }


  /// Moves the contents of `donor` into `target` and recycles `donor`'s slot. This is the
  /// concatenation splice: the second fragment's start node is folded into the first fragment's
  /// end node instead of spending an epsilon hop.
  pub fn splice(&mut self, target: NodeIndex, donor: NodeIndex) {
    self.nodes[target] = self.nodes[donor].take();
    self.free.push(donor);
  }


  pub fn node(&self, index: NodeIndex) -> &NfaNode {
    self.nodes[index].as_ref().expect("dangling NFA node index")
  }


  pub fn node_mut(&mut self, index: NodeIndex) -> &mut NfaNode {
    self.nodes[index].as_mut().expect("dangling NFA node index")
  }


  pub fn is_live(&self, index: NodeIndex) -> bool {
    index < self.nodes.len() && self.nodes[index].is_some()
  }


  /// Total slots, live and tombstoned.
  pub fn len(&self) -> usize {
    self.nodes.len()
  }


  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }


  pub fn live_count(&self) -> usize {
    self.nodes.iter().filter(|n| n.is_some()).count()
  }


  pub fn live(&self) -> impl Iterator<Item = NodeIndex> + '_ {
    self
      .nodes
      .iter()
      .enumerate()
      .filter_map(|(index, node)| node.as_ref().map(|_| index))
  }


  pub fn free_list(&self) -> &[NodeIndex] {
    &self.free
  }

}


/// A finished NFA: the node arena plus the start-state index. Read-only once the parser hands
/// it over.
#[derive(Debug)]
pub struct Nfa {
  pub(crate) arena: NodeArena,
  pub start: NodeIndex,
}

impl Nfa {

  pub fn node(&self, index: NodeIndex) -> &NfaNode {
    self.arena.node(index)
  }


  pub fn len(&self) -> usize {
    self.arena.len()
  }


  pub fn is_empty(&self) -> bool {
    self.arena.is_empty()
  }


  pub fn live_count(&self) -> usize {
    self.arena.live_count()
  }


  pub fn live(&self) -> impl Iterator<Item = NodeIndex> + '_ {
    self.arena.live()
  }

}

impl Display for Nfa {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    for index in self.live() {
      let node = self.node(index);
      write!(f, "NFA state {:02}: ", index)?;
      if node.is_terminal() {
        write!(f, "(TERMINAL)")?;
        if node.anchor != Anchor::NONE {
          write!(f, " anchor {}", node.anchor)?;
        }
      } else {
        write!(
          f,
          "--> {:02} ({:2}) on {}",
          node.next[0].unwrap_or(0),
          node.next[1].map(|n| n as i64).unwrap_or(-1),
          node.edge
        )?;
      }
      if index == self.start {
        write!(f, " (START STATE)")?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}
