//! Property tests for the transition system invariants

mod common;

use common::toy_parser;
use proptest::prelude::*;
use rnng::scorer::legal_mask;
use rnng::{Action, MAX_OPEN_NONTERMINALS, Mode, ParseTree, ParserState};

const WORDS: [&str; 6] = ["the", "dog", "ran", "a", "cat", "saw"];
const TAGS: [&str; 3] = ["DT", "NN", "VBD"];

fn sentence_strategy() -> impl Strategy<Value = (Vec<&'static str>, Vec<&'static str>)> {
  prop::collection::vec((0..WORDS.len(), 0..TAGS.len()), 1..6).prop_map(|pairs| {
    pairs
      .into_iter()
      .map(|(w, t)| (WORDS[w], TAGS[t]))
      .unzip::<_, _, Vec<_>, Vec<_>>()
  })
}

fn open_elements(state: &ParserState) -> usize {
  state
    .stack()
    .iter()
    .filter(|e| e.is_open_nonterminal)
    .count()
}

fn check_invariants(state: &ParserState) {
  assert_eq!(state.open_nonterminals(), open_elements(state));

  // every structure is mirrored by its encoder, plus the guard
  assert_eq!(
    state.encoder_depths(),
    (
      state.stack().len() + 1,
      state.buffer_len() + 1,
      state.history().len() + 1
    )
  );
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(48))]

  #[test]
  fn random_legal_walks_keep_invariants(
    (words, tags) in sentence_strategy(),
    choices in prop::collection::vec(any::<usize>(), 0..400),
  ) {
    let p = toy_parser(11);
    let actions = p.vocab().parsed_actions().to_vec();
    let mut state = ParserState::new();
    p.start(&mut state, &words, &tags, &mut Mode::Eval).unwrap();
    check_invariants(&state);

    for choice in choices {
      let mask = legal_mask(&state, p.vocab());
      let legal = actions
        .iter()
        .zip(mask.iter())
        .filter(|(_, l)| **l)
        .map(|(a, _)| a.clone())
        .collect::<Vec<Action>>();

      // never stuck before finishing, nothing legal after
      prop_assert_eq!(legal.is_empty(), state.is_finished());
      if legal.is_empty() {
        break;
      }

      let action = &legal[choice % legal.len()];
      let stack_before = state.stack().len();
      let open_before = state.open_nonterminals();
      let children = state
        .stack()
        .iter()
        .rev()
        .take_while(|e| !e.is_open_nonterminal)
        .count();

      p.apply_action(&mut state, action, &mut Mode::Eval).unwrap();
      check_invariants(&state);
      prop_assert!(state.open_nonterminals() <= MAX_OPEN_NONTERMINALS);

      if action.is_reduce() {
        prop_assert!(children >= 1);
        prop_assert_eq!(state.open_nonterminals(), open_before - 1);
        prop_assert_eq!(state.stack().len(), stack_before - children);
      }
    }

    if state.is_finished() {
      let tree = ParseTree::from_actions(&words, state.history()).unwrap();
      prop_assert_eq!(state.tree(), Some(&tree));
    }
  }

  #[test]
  fn decode_terminates_and_replays(
    (words, tags) in sentence_strategy(),
    seed in any::<u64>(),
  ) {
    let p = toy_parser(seed);
    let mut state = ParserState::new();
    let ids = p.decode(&mut state, &words, &tags).unwrap();

    prop_assert!(state.is_finished());
    prop_assert!(ids.len() <= (2 * MAX_OPEN_NONTERMINALS + 1) * words.len());

    // replaying never hits an illegal action
    let mut replay = ParserState::new();
    p.start(&mut replay, &words, &tags, &mut Mode::Eval).unwrap();
    for &id in ids.iter() {
      let action = p.action(id).unwrap().clone();
      prop_assert!(replay.can_apply(&action));
      p.apply_action(&mut replay, &action, &mut Mode::Eval).unwrap();
    }
    prop_assert!(replay.is_finished());
    prop_assert_eq!(replay.tree(), state.tree());

    let mut again = ParserState::new();
    prop_assert_eq!(p.decode(&mut again, &words, &tags).unwrap(), ids);
  }
}
