use criterion::{Criterion, black_box, criterion_group, criterion_main};

use rnng::{Action, Mode, Parser, ParserConfig, ParserState, Vocab, Vocabularies};

fn strings(v: &[&str]) -> Vocab<String> {
  v.iter().map(|s| s.to_string()).collect()
}

fn nt(label: &str) -> Action {
  Action::OpenNonterminal(label.to_string())
}

fn criterion_benchmark(c: &mut Criterion) {
  let vocab = Vocabularies::with_standard_actions(
    strings(&["mary", "said", "that", "she", "likes", "herself"]),
    strings(&["NNP", "VBD", "IN", "PRP", "VBZ"]),
    strings(&["S", "SBAR", "NP", "VP"]),
  )
  .unwrap();
  let parser = Parser::new(ParserConfig::default(), vocab).unwrap();

  let words = ["mary", "said", "that", "she", "likes", "herself"];
  let tags = ["NNP", "VBD", "IN", "PRP", "VBZ", "PRP"];
  // (S (NP mary) (VP said (SBAR that (S (NP she) (VP likes (NP herself))))))
  let gold = vec![
    nt("S"),
    nt("NP"),
    Action::Shift,
    Action::Reduce,
    nt("VP"),
    Action::Shift,
    nt("SBAR"),
    Action::Shift,
    nt("S"),
    nt("NP"),
    Action::Shift,
    Action::Reduce,
    nt("VP"),
    Action::Shift,
    nt("NP"),
    Action::Shift,
    Action::Reduce,
    Action::Reduce,
    Action::Reduce,
    Action::Reduce,
    Action::Reduce,
    Action::Reduce,
  ];

  let mut state = ParserState::new();

  c.bench_function("score gold sequence", |b| {
    b.iter(|| {
      parser
        .score_sequence(
          &mut state,
          black_box(&words),
          black_box(&tags),
          black_box(&gold),
          &mut Mode::Eval,
        )
        .unwrap()
    })
  });

  c.bench_function("greedy decode", |b| {
    b.iter(|| {
      parser
        .decode(&mut state, black_box(&words), black_box(&tags))
        .unwrap()
    })
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
