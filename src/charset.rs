#![allow(dead_code)]

/*!

  `CharSet` is the bit-set workhorse of the whole pipeline. It is used in two roles: sets of
  alphabet code points (character classes, transition-trigger sets) and sets of NFA node indices
  (a DFA state's epsilon-closure identity). Bits are stored raw in growable 64-bit blocks; a
  `complement` flag records that the set is the negation of the stored bits, so "everything
  except these" never has to be enumerated.

  Membership is the stored bit XOR-ed with the complement flag at test time. The stored bits
  are never flipped: on a complemented set, `insert` carves a bit *out* of the set, which is
  how a negated character class excludes its listed members. A bit beyond the current capacity
  reads as unstored, so its membership is the complement flag itself; growth fills new blocks
  with zeros and changes no answers.

*/

use std::fmt::{Display, Formatter};
use std::ops::{BitOr, BitOrAssign};

use crate::character::Char;

const BLOCK_BITS: usize = 64;


#[derive(Clone, Debug, Default)]
pub struct CharSet {
  blocks: Vec<u64>,
  complement: bool,
}


impl CharSet {

  pub fn new() -> CharSet {
    CharSet {
      blocks: Vec::new(),
      complement: false,
    }
  }


  pub fn single<I: Into<usize>>(bit: I) -> CharSet {
    let mut set = CharSet::new();
    set.insert(bit);
    set
  }


  fn grow_to(&mut self, bit: usize) {
    while self.blocks.len() * BLOCK_BITS <= bit {
      self.blocks.push(0);
    }
  }


  pub fn insert<I: Into<usize>>(&mut self, bit: I) {
    let bit = bit.into();
    self.grow_to(bit);
    self.blocks[bit / BLOCK_BITS] |= 1u64 << (bit % BLOCK_BITS);
  }


  pub fn insert_range(&mut self, lo: Char, hi: Char) {
    for c in lo.0..=hi.0 {
      self.insert(c as usize);
    }
  }


  pub fn contains<I: Into<usize>>(&self, bit: I) -> bool {
    let bit = bit.into();
    let stored = bit < self.blocks.len() * BLOCK_BITS
      && (self.blocks[bit / BLOCK_BITS] & (1u64 << (bit % BLOCK_BITS))) != 0;
    stored ^ self.complement
  }


  /// Negates the set in place by toggling the flag; the stored bits are untouched, so inserts
  /// made after this call are exclusions.
  pub fn complement(&mut self) {
    self.complement = !self.complement;
  }


  pub fn is_complemented(&self) -> bool {
    self.complement
  }


  pub fn is_empty(&self) -> bool {
    !self.complement && self.blocks.iter().all(|&b| b == 0)
  }


  /// Number of set bits within current capacity. Only meaningful for finite (uncomplemented)
  /// sets.
  pub fn count(&self) -> usize {
    self.blocks.iter().map(|b| b.count_ones() as usize).sum()
  }


  /// Bit capacity of the backing storage; membership above this is governed by the complement
  /// flag.
  pub fn capacity(&self) -> usize {
    self.blocks.len() * BLOCK_BITS
  }


  /// Iterates the indices of the stored set bits, ascending.
  pub fn ones(&self) -> Ones<'_> {
    Ones {
      set: self,
      next_bit: 0,
    }
  }

}


// Two sets are equal iff they agree on every bit, regardless of how far each one's backing
// storage happens to reach.
impl PartialEq for CharSet {
  fn eq(&self, other: &CharSet) -> bool {
    if self.complement != other.complement {
      return false;
    }
    let len = self.blocks.len().max(other.blocks.len());
    for i in 0..len {
      let a = self.blocks.get(i).copied().unwrap_or(0);
      let b = other.blocks.get(i).copied().unwrap_or(0);
      if a != b {
        return false;
      }
    }
    true
  }
}

impl Eq for CharSet {}


// Set union. Each side's membership within capacity is its stored bits XOR its flag; the
// union's flag is the OR of the flags, and the stored bits are re-encoded against it, so the
// result answers correctly whether or not either operand is complemented.
impl BitOrAssign<&CharSet> for CharSet {
  fn bitor_assign(&mut self, rhs: &CharSet) {
    let self_mask = if self.complement { !0u64 } else { 0u64 };
    let rhs_mask = if rhs.complement { !0u64 } else { 0u64 };
    let union_complement = self.complement || rhs.complement;
    let union_mask = if union_complement { !0u64 } else { 0u64 };

    while self.blocks.len() < rhs.blocks.len() {
      self.blocks.push(0);
    }
    for (i, block) in self.blocks.iter_mut().enumerate() {
      let a = *block ^ self_mask;
      let b = rhs.blocks.get(i).copied().unwrap_or(0) ^ rhs_mask;
      *block = (a | b) ^ union_mask;
    }
    self.complement = union_complement;
  }
}

impl BitOr<&CharSet> for &CharSet {
  type Output = CharSet;

  fn bitor(self, rhs: &CharSet) -> CharSet {
    let mut copy = self.clone();
    copy |= rhs;
    copy
  }
}


/// Renders the set as a character class over the alphabet, control characters in `^X` caret
/// notation.
impl Display for CharSet {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "[")?;
    for code in 0u8..0x7F {
      if self.contains(code as usize) {
        write!(f, "{}", Char(code).caret_notation())?;
      }
    }
    write!(f, "]")
  }
}


pub struct Ones<'a> {
  set: &'a CharSet,
  next_bit: usize,
}

impl<'a> Iterator for Ones<'a> {
  type Item = usize;

  fn next(&mut self) -> Option<usize> {
    while self.next_bit < self.set.capacity() {
      let bit = self.next_bit;
      self.next_bit += 1;
      if (self.set.blocks[bit / BLOCK_BITS] & (1u64 << (bit % BLOCK_BITS))) != 0 {
        return Some(bit);
      }
    }
    None
  }
}


#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn insert_and_test() {
    let mut set = CharSet::new();
    set.insert(b'a' as usize);
    set.insert(200usize); // grows past the first block
    assert!(set.contains(b'a' as usize));
    assert!(set.contains(200usize));
    assert!(!set.contains(b'b' as usize));
    assert!(!set.contains(4000usize));
    assert_eq!(set.count(), 2);
  }

  #[test]
  fn complement_is_involutive() {
    let mut set = CharSet::new();
    set.insert(b'\n' as usize);
    set.insert(b'\r' as usize);
    let original = set.clone();

    set.complement();
    for code in 0..256usize {
      let member = code == b'\n' as usize || code == b'\r' as usize;
      assert_eq!(set.contains(code), !member, "code {}", code);
    }

    set.complement();
    assert_eq!(set, original);
    for code in 0..256usize {
      assert_eq!(set.contains(code), original.contains(code));
    }
  }

  #[test]
  fn growth_preserves_complement() {
    let mut set = CharSet::new();
    set.insert(b'x' as usize);
    set.complement();
    assert!(set.contains(500usize));

    // Inserting far beyond capacity carves that bit out and must not disturb the bits in
    // between.
    set.insert(1000usize);
    assert!(set.contains(500usize));
    assert!(!set.contains(1000usize));
    assert!(!set.contains(b'x' as usize));
  }

  #[test]
  fn insert_after_complement_excludes() {
    // The negated-character-class construction order: seed, complement, then list members.
    let mut set = CharSet::new();
    set.insert(b'\n' as usize);
    set.complement();
    set.insert(b'a' as usize);
    set.insert(b'b' as usize);
    assert!(!set.contains(b'a' as usize));
    assert!(!set.contains(b'b' as usize));
    assert!(!set.contains(b'\n' as usize));
    assert!(set.contains(b'c' as usize));
  }

  #[test]
  fn union_with_a_complemented_operand() {
    let mut a = CharSet::single(b'x' as usize);
    let mut b = CharSet::new();
    b.insert(b'\n' as usize);
    b.complement();

    a |= &b;
    assert!(a.is_complemented());
    assert!(a.contains(b'x' as usize));
    assert!(a.contains(b'q' as usize));
    assert!(!a.contains(b'\n' as usize));
  }

  #[test]
  fn equality_ignores_capacity() {
    let mut a = CharSet::new();
    a.insert(3usize);
    let mut b = CharSet::new();
    b.insert(3usize);
    b.insert(300usize);
    assert_ne!(a, b);

    let mut c = CharSet::new();
    c.insert(3usize);
    c.grow_to(300);
    assert_eq!(a, c);
  }

  #[test]
  fn union_and_iteration() {
    let mut a = CharSet::single(1usize);
    let b = CharSet::single(100usize);
    a |= &b;
    assert_eq!(a.ones().collect::<Vec<_>>(), vec![1, 100]);
  }

  #[test]
  fn insert_range_is_inclusive() {
    let mut set = CharSet::new();
    set.insert_range(Char(b'0'), Char(b'9'));
    for c in b'0'..=b'9' {
      assert!(set.contains(c as usize));
    }
    assert!(!set.contains(b'/' as usize));
    assert!(!set.contains(b':' as usize));
  }
}
