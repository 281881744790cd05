/*!

  Transition-table emission. The dense form is one 128-column row per DFA state, each cell a
  target state index or -1, with row 0 reserved as the all-(-1) error row. The pairs form
  re-encodes each row by a caller-supplied threshold: crowded rows stay dense behind a 0
  sentinel, sparse rows become a pair count followed by (character, target) pairs. Both forms
  decode identically for every (state, character) pair.

*/

use crate::character::Char;
use crate::dfa::Dfa;
use crate::{StateIndex, ALPHABET_SIZE};


/// Cell value for "no transition".
pub const NO_TRANSITION: i32 = -1;


/// The dense transition table. Row `state + 1` belongs to `state`; row 0 is the reserved error
/// row a downstream scanner can jump to unconditionally.
#[derive(Debug)]
pub struct Dtran {
  rows: Vec<[i32; ALPHABET_SIZE]>,
}

impl Dtran {

  pub fn new(dfa: &Dfa) -> Dtran {
    let mut rows = vec![[NO_TRANSITION; ALPHABET_SIZE]; dfa.len() + 1];
    for (index, state) in dfa.states.iter().enumerate() {
      let row = &mut rows[index + 1];
      for (j, target) in state.next.iter().enumerate() {
        for c in state.chars[j].ones().filter(|&c| c < ALPHABET_SIZE) {
          row[c] = *target as i32;
        }
      }
    }
    Dtran { rows }
  }


  /// Row count, including the reserved error row.
  pub fn rows(&self) -> usize {
    self.rows.len()
  }


  pub fn row(&self, state: StateIndex) -> &[i32; ALPHABET_SIZE] {
    &self.rows[state + 1]
  }


  pub fn lookup(&self, state: StateIndex, c: Char) -> Option<StateIndex> {
    // Escapes like `\xFF` can produce codes past the alphabet; no row has a column for them.
    if c.0 as usize >= ALPHABET_SIZE {
      return None;
    }
    let cell = self.rows[state + 1][c.0 as usize];
    if cell == NO_TRANSITION {
      None
    } else {
      Some(cell as StateIndex)
    }
  }


  pub fn cell_count(&self) -> usize {
    self.rows.len() * ALPHABET_SIZE
  }

}


/// The sparse encoding. Each row's first cell selects its format: 0 means the next 128 cells
/// are a dense row indexed directly by character; a nonzero count means that many
/// (character, target) pairs follow. A state with no transitions at all encodes as a bare 0
/// with nothing after it, read as an empty pair list.
#[derive(Debug)]
pub struct PairsTable {
  rows: Vec<Vec<i32>>,
}

impl PairsTable {

  /// Re-encodes `dtran` row by row. A row whose populated-cell count exceeds `threshold` is
  /// kept dense; otherwise it becomes pairs.
  pub fn new(dtran: &Dtran, threshold: usize) -> PairsTable {
    let mut rows = Vec::with_capacity(dtran.rows.len());
    for row in dtran.rows.iter() {
      let populated = row.iter().filter(|&&cell| cell != NO_TRANSITION).count();
      let mut encoded: Vec<i32>;
      if populated > threshold {
        encoded = Vec::with_capacity(ALPHABET_SIZE + 1);
        encoded.push(0);
        encoded.extend_from_slice(row);
      } else {
        encoded = Vec::with_capacity(2 * populated + 1);
        encoded.push(populated as i32);
        for (c, &cell) in row.iter().enumerate() {
          if cell != NO_TRANSITION {
            encoded.push(c as i32);
            encoded.push(cell);
          }
        }
      }
      rows.push(encoded);
    }
    PairsTable { rows }
  }


  /// Decodes one transition, the way a generated scanner's next-state routine reads the table.
  pub fn lookup(&self, state: StateIndex, c: Char) -> Option<StateIndex> {
    if c.0 as usize >= ALPHABET_SIZE {
      return None;
    }
    let row = &self.rows[state + 1];
    let cell = if row[0] == 0 {
      if row.len() == 1 {
        // Empty pair list.
        return None;
      }
      row[1 + c.0 as usize]
    } else {
      let count = row[0] as usize;
      let mut found = NO_TRANSITION;
      for pair in 0..count {
        if row[1 + 2 * pair] == i32::from(c.0) {
          found = row[2 + 2 * pair];
          break;
        }
      }
      found
    };
    if cell == NO_TRANSITION {
      None
    } else {
      Some(cell as StateIndex)
    }
  }


  /// Total encoded cells across all rows, the figure to weigh against the dense table's
  /// `rows * 128`.
  pub fn cell_count(&self) -> usize {
    self.rows.iter().map(|row| row.len()).sum()
  }

}
