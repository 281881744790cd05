use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lextab::{compile, minimize, thompson, Dfa};

const TRACE_RULE: &str = "^[ \\t]*//[ \\t]*TRACE[ \\t]*#[0-9]+[ \\t]*$";

fn pipeline(c: &mut Criterion) {
  c.bench_function("thompson/trace_rule", |b| {
    b.iter(|| thompson(black_box(TRACE_RULE)).unwrap())
  });

  let nfa = thompson(TRACE_RULE).unwrap();
  c.bench_function("subset/trace_rule", |b| b.iter(|| Dfa::from_nfa(black_box(&nfa))));

  c.bench_function("minimize/trace_rule", |b| {
    b.iter(|| {
      let mut dfa = Dfa::from_nfa(&nfa);
      minimize(black_box(&mut dfa))
    })
  });

  c.bench_function("compile/trace_rule", |b| {
    b.iter(|| compile(black_box(TRACE_RULE), 4).unwrap())
  });
}

criterion_group!(benches, pipeline);
criterion_main!(benches);
