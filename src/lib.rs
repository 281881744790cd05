/*!

  `lextab` compiles a restricted regular-expression syntax into minimized DFA transition
  tables, the classic lex pipeline: pattern text is tokenized, parsed into an NFA by Thompson's
  construction, determinized by subset construction, minimized by partition refinement, and
  finally flattened into a dense or sparse transition table a generated scanner can drive.

  The alphabet is the 128 ASCII codes. Rules may be anchored with `^`/`$`, quantified with
  `*`/`+`/`?`, grouped, alternated, and built from character classes; `"..."` quotes a run of
  characters literally.

  ```
  use lextab::compile;

  let compilation = compile("[0-9]+", 4).unwrap();
  assert!(compilation.dfa.matches_line("42"));
  assert!(compilation.dfa.len() <= 3);
  ```

*/

pub mod character;
pub mod charset;
mod debug;
pub mod dfa;
pub mod error;
pub mod lexer;
pub mod minimize;
pub mod nfa;
pub mod parser;
pub mod table;

use std::time::Duration;

use quanta::Clock;

pub use character::Char;
pub use charset::CharSet;
pub use dfa::{Dfa, DfaState};
pub use error::PatternError;
pub use minimize::minimize;
pub use nfa::{Anchor, Edge, Nfa};
pub use parser::thompson;
pub use table::{Dtran, PairsTable, NO_TRANSITION};


/// Index into pattern text.
pub type Index32 = u32;
/// Index into the NFA node arena.
pub type NodeIndex = usize;
/// Index into a DFA's state list.
pub type StateIndex = usize;

/// The automaton alphabet: ASCII codes 0 through 127.
pub const ALPHABET_SIZE: usize = 128;


/// Everything the pipeline produces for one pattern, with per-stage wall time.
pub struct Compilation {
  pub nfa   : Nfa,
  pub dfa   : Dfa,        //< Minimized
  pub dtran : Dtran,
  pub pairs : PairsTable,

  pub parse_time    : Duration,
  pub subset_time   : Duration,
  pub minimize_time : Duration,
}


/// Runs the whole pipeline over one pattern. `threshold` picks the dense/pairs encoding per
/// table row.
pub fn compile(pattern: &str, threshold: usize) -> Result<Compilation, PatternError> {
  let timer: Clock = Clock::new();

  let parse_start_time = timer.start();
  let nfa = thompson(pattern)?;
  let parse_time = timer.delta(parse_start_time, timer.end());

  let subset_start_time = timer.start();
  let mut dfa = Dfa::from_nfa(&nfa);
  let subset_time = timer.delta(subset_start_time, timer.end());

  let minimize_start_time = timer.start();
  let dfa = minimize(&mut dfa);
  let minimize_time = timer.delta(minimize_start_time, timer.end());

  let dtran = Dtran::new(&dfa);
  let pairs = PairsTable::new(&dtran, threshold);

  Ok(Compilation {
    nfa,
    dfa,
    dtran,
    pairs,
    parse_time,
    subset_time,
    minimize_time,
  })
}


/// Compiles several rules into one machine whose start state tries every rule. Rules are
/// joined with the newline rule separator `machine()` consumes between productions.
pub fn compile_rules(rules: &[&str], threshold: usize) -> Result<Compilation, PatternError> {
  compile(&rules.join("\n"), threshold)
}
