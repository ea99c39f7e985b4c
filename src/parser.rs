use tracing::{debug, warn};

use crate::action::Action;
use crate::config::{GoldPolicy, ParserConfig};
use crate::errors::{Error, Result};
use crate::model::Weights;
use crate::nn::Mode;
use crate::scorer;
use crate::state::ParserState;
use crate::syntree::ParseTree;
use crate::transition;
use crate::utils::argmax;
use crate::vocab::Vocabularies;

/// A parser: vocabularies, configuration and learned weights.
///
/// A `Parser` holds no per-sentence state. Each parse runs against a
/// `ParserState` passed in by the caller, so one parser can serve any number
/// of independent states.
#[derive(Debug, Clone)]
pub struct Parser {
  config: ParserConfig,
  vocab: Vocabularies,
  weights: Weights,
}

impl Parser {
  /// Validates `config` and initializes fresh weights from `config.seed`
  pub fn new(config: ParserConfig, vocab: Vocabularies) -> Result<Self> {
    config.validate()?;
    let weights = Weights::new(&config, &vocab);
    Ok(Self {
      config,
      vocab,
      weights,
    })
  }

  pub fn config(&self) -> &ParserConfig {
    &self.config
  }

  pub fn vocab(&self) -> &Vocabularies {
    &self.vocab
  }

  pub fn weights(&self) -> &Weights {
    &self.weights
  }

  /// For a training loop to update between parses
  pub fn weights_mut(&mut self) -> &mut Weights {
    &mut self.weights
  }

  pub fn action(&self, id: usize) -> Option<&Action> {
    self.vocab.action(id)
  }

  pub fn start<S, P>(
    &self,
    state: &mut ParserState,
    words: &[S],
    pos_tags: &[P],
    mode: &mut Mode,
  ) -> Result<()>
  where
    S: AsRef<str>,
    P: AsRef<str>,
  {
    transition::start(state, &self.weights, &self.vocab, words, pos_tags, mode)?;
    debug!(words = words.len(), "started sentence");
    Ok(())
  }

  pub fn apply_action(
    &self,
    state: &mut ParserState,
    action: &Action,
    mode: &mut Mode,
  ) -> Result<()> {
    transition::apply_action(state, &self.weights, &self.vocab, action, mode)
  }

  pub fn score_actions(&self, state: &ParserState, mode: &mut Mode) -> Result<Vec<f32>> {
    scorer::score_actions(state, &self.weights, &self.vocab, mode)
  }

  /// Loss of a gold derivation: the negated total log-probability of `gold`,
  /// each action scored in the state the previous gold actions produced.
  ///
  /// With `GoldPolicy::Truncate`, a gold action that is illegal where it occurs
  /// ends the sum there (its own log-probability is not added) and the loss so
  /// far is returned. With `GoldPolicy::Strict` it is an error.
  pub fn score_sequence<S, P>(
    &self,
    state: &mut ParserState,
    words: &[S],
    pos_tags: &[P],
    gold: &[Action],
    mode: &mut Mode,
  ) -> Result<f32>
  where
    S: AsRef<str>,
    P: AsRef<str>,
  {
    self.start(state, words, pos_tags, mode)?;

    let mut llh = 0.0;
    for (idx, action) in gold.iter().enumerate() {
      let action_id = self.vocab.action_id(action)?;
      if let Err(err) = state.verify(action) {
        match self.config.gold_policy {
          GoldPolicy::Strict => return Err(err),
          GoldPolicy::Truncate => {
            warn!(
              position = idx,
              action = %action,
              error = %err,
              "illegal gold action, truncating the sequence"
            );
            break;
          }
        }
      }

      let log_probs = self.score_actions(state, mode)?;
      llh += log_probs[action_id];
      self.apply_action(state, action, mode)?;
    }

    Ok(-llh)
  }

  /// Greedy decoding: apply the most probable legal action (lowest id on ties)
  /// until the parse is finished, returning the chosen action ids
  pub fn decode<S, P>(
    &self,
    state: &mut ParserState,
    words: &[S],
    pos_tags: &[P],
  ) -> Result<Vec<usize>>
  where
    S: AsRef<str>,
    P: AsRef<str>,
  {
    let mode = &mut Mode::Eval;
    self.start(state, words, pos_tags, mode)?;

    let mut best_action_ids = Vec::new();
    while !state.is_finished() {
      let log_probs = self.score_actions(state, mode)?;
      let best = argmax(&log_probs)
        .filter(|&id| log_probs[id] > f32::NEG_INFINITY)
        .ok_or_else(|| Error::illegal("no legal action before the parse is finished"))?;
      let action = self
        .vocab
        .action(best)
        .ok_or_else(|| Error::illegal(format!("no action with id {}", best)))?
        .clone();
      self.apply_action(state, &action, mode)?;
      best_action_ids.push(best);
    }

    debug!(actions = best_action_ids.len(), "decoded sentence");
    Ok(best_action_ids)
  }

  /// Decode into a fresh state and return the tree with the chosen action ids
  pub fn parse<S, P>(&self, words: &[S], pos_tags: &[P]) -> Result<(ParseTree, Vec<usize>)>
  where
    S: AsRef<str>,
    P: AsRef<str>,
  {
    let mut state = ParserState::new();
    let ids = self.decode(&mut state, words, pos_tags)?;
    let tree = state
      .tree()
      .cloned()
      .ok_or_else(|| Error::illegal("decoding stopped before the parse was finished"))?;
    Ok((tree, ids))
  }
}
