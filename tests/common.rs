#![allow(dead_code)]

use rnng::{Action, Parser, ParserConfig, Vocab, Vocabularies};

pub fn strings(v: &[&str]) -> Vocab<String> {
  v.iter().map(|s| s.to_string()).collect()
}

pub fn nt(label: &str) -> Action {
  Action::OpenNonterminal(label.to_string())
}

pub fn small_config(seed: u64) -> ParserConfig {
  ParserConfig {
    word_embedding_size: 4,
    pos_embedding_size: 2,
    nt_embedding_size: 4,
    action_embedding_size: 3,
    input_size: 6,
    hidden_size: 6,
    num_layers: 1,
    seed,
    ..Default::default()
  }
}

pub fn toy_parser(seed: u64) -> Parser {
  let vocab = Vocabularies::with_standard_actions(
    strings(&["the", "dog", "ran", "a", "cat", "saw"]),
    strings(&["DT", "NN", "VBD"]),
    strings(&["S", "NP", "VP"]),
  )
  .unwrap();
  Parser::new(small_config(seed), vocab).unwrap()
}
