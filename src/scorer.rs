use crate::errors::{Error, Result};
use crate::model::Weights;
use crate::nn::{Mode, masked_log_softmax};
use crate::state::ParserState;
use crate::utils::concat;
use crate::vocab::Vocabularies;

/// Which action ids may be applied to `state`, indexed by action id
pub fn legal_mask(state: &ParserState, vocab: &Vocabularies) -> Vec<bool> {
  let shape = state.shape();
  vocab
    .parsed_actions()
    .iter()
    .map(|a| a.can_apply(&shape))
    .collect()
}

/// Log-probability of every action id in `state`. Illegal actions get negative
/// infinity and are left out of the normalizer.
pub fn score_actions(
  state: &ParserState,
  weights: &Weights,
  vocab: &Vocabularies,
  mode: &mut Mode,
) -> Result<Vec<f32>> {
  if !state.is_started() {
    return Err(Error::NotStarted);
  }

  let [stack, buffer, history] = state.encoder_summaries()?;
  let mut encoded = concat(&[stack, buffer, history]);
  mode.dropout(&mut encoded, weights.dropout);
  let summary = weights.encoders2summary.forward_relu(&encoded);
  let scores = weights.summary2actions.forward(&summary);

  Ok(masked_log_softmax(&scores, &legal_mask(state, vocab)))
}
