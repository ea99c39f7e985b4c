use tracing::trace;

use crate::action::Action;
use crate::composer::compose;
use crate::errors::{Error, Result};
use crate::model::Weights;
use crate::nn::Mode;
use crate::state::{ParserState, StackElement};
use crate::syntree::SynTree;
use crate::vocab::Vocabularies;

/// Reset `state` for a new sentence.
///
/// Each encoder is emptied and fed its guard vector, then the buffer encoder
/// gets the words in reverse so the first word to shift is its newest element.
/// Unknown words or tags fail before anything is reset.
pub fn start<S, P>(
  state: &mut ParserState,
  weights: &Weights,
  vocab: &Vocabularies,
  words: &[S],
  pos_tags: &[P],
  mode: &mut Mode,
) -> Result<()>
where
  S: AsRef<str>,
  P: AsRef<str>,
{
  if words.len() != pos_tags.len() {
    return Err(Error::config("words and POS tags must have equal length"));
  }
  if words.is_empty() {
    return Err(Error::config("words cannot be empty"));
  }

  let word_inputs = words
    .iter()
    .zip(pos_tags)
    .map(|(w, p)| -> Result<Vec<f32>> {
      let wid = vocab.word_id(w.as_ref())?;
      let pid = vocab.pos_id(p.as_ref())?;
      Ok(weights.word_input(wid, pid))
    })
    .collect::<Result<Vec<_>>>()?;

  state.stack.clear();
  state.buffer.clear();
  state.history.clear();
  state.open_nonterminals = 0;
  state.started = false;
  state.words = words.iter().map(|w| w.as_ref().to_string()).collect();

  state.stack_encoder.reset(&weights.stack_encoder);
  state.buffer_encoder.reset(&weights.buffer_encoder);
  state.history_encoder.reset(&weights.history_encoder);
  state
    .stack_encoder
    .push(&weights.stack_encoder, &weights.stack_guard, mode);
  state
    .buffer_encoder
    .push(&weights.buffer_encoder, &weights.buffer_guard, mode);
  state
    .history_encoder
    .push(&weights.history_encoder, &weights.history_guard, mode);

  state.word_inputs = word_inputs;
  state.nt_inputs = weights.nt_inputs();
  state.action_inputs = weights.action_inputs();

  for pos in (0..words.len()).rev() {
    state.buffer.push(pos);
    state
      .buffer_encoder
      .push(&weights.buffer_encoder, &state.word_inputs[pos], mode);
  }

  state.started = true;
  Ok(())
}

/// Apply `action` to `state`, mirroring every stack and buffer change in the
/// encoders and appending the action to the history.
///
/// An illegal action fails with `IllegalAction` and leaves `state` untouched.
pub fn apply_action(
  state: &mut ParserState,
  weights: &Weights,
  vocab: &Vocabularies,
  action: &Action,
  mode: &mut Mode,
) -> Result<()> {
  state.verify(action)?;
  let action_id = vocab.action_id(action)?;

  match action {
    Action::OpenNonterminal(label) => {
      let nt_id = vocab.nonterminal_id(label)?;
      push_nonterminal(state, weights, label, nt_id, mode);
    }
    Action::Shift => shift(state, weights, mode)?,
    Action::Reduce => reduce(state, weights, mode)?,
  }

  state.history.push(action.clone());
  state
    .history_encoder
    .push(&weights.history_encoder, &state.action_inputs[action_id], mode);

  trace!(
    action = %action,
    open = state.open_nonterminals,
    stack = state.stack.len(),
    buffer = state.buffer.len(),
    "applied action"
  );
  Ok(())
}

fn push_nonterminal(
  state: &mut ParserState,
  weights: &Weights,
  label: &str,
  nt_id: usize,
  mode: &mut Mode,
) {
  let embedding = state.nt_inputs[nt_id].clone();
  let position = state.words.len() - state.buffer.len();
  state
    .stack_encoder
    .push(&weights.stack_encoder, &embedding, mode);
  state.stack.push(StackElement {
    subtree: SynTree::open(label.to_string(), position),
    embedding,
    is_open_nonterminal: true,
  });
  state.open_nonterminals += 1;
}

fn shift(state: &mut ParserState, weights: &Weights, mode: &mut Mode) -> Result<()> {
  let position = state
    .buffer
    .pop()
    .ok_or_else(|| Error::illegal("cannot SHIFT when input buffer is empty"))?;
  state.buffer_encoder.pop()?;

  let embedding = state.word_inputs[position].clone();
  state
    .stack_encoder
    .push(&weights.stack_encoder, &embedding, mode);
  state.stack.push(StackElement {
    subtree: SynTree::leaf(state.words[position].clone(), position),
    embedding,
    is_open_nonterminal: false,
  });
  Ok(())
}

/// Pop the closed elements above the innermost open nonterminal, attach them
/// left to right, and push the closed constituent with its composed
/// vector. The stack encoder is popped once per popped element and pushed once,
/// so its depth drops by the number of children.
fn reduce(state: &mut ParserState, weights: &Weights, mode: &mut Mode) -> Result<()> {
  let mut children = Vec::new();
  while state.stack.last().is_some_and(|e| !e.is_open_nonterminal) {
    if let Some(child) = state.stack.pop() {
      state.stack_encoder.pop()?;
      children.push(child);
    }
  }
  if children.is_empty() {
    return Err(Error::illegal("cannot REDUCE an empty constituent"));
  }
  children.reverse();

  let mut opener = state
    .stack
    .pop()
    .ok_or_else(|| Error::illegal("no open nonterminal to REDUCE"))?;
  state.stack_encoder.pop()?;

  let child_embeddings = children
    .iter()
    .map(|c| c.embedding.as_slice())
    .collect::<Vec<_>>();
  let composed = compose(weights, &opener.embedding, &child_embeddings, mode);

  opener
    .subtree
    .close(children.into_iter().map(|c| c.subtree).collect())?;

  state
    .stack_encoder
    .push(&weights.stack_encoder, &composed, mode);
  state.stack.push(StackElement {
    subtree: opener.subtree,
    embedding: composed,
    is_open_nonterminal: false,
  });
  state.open_nonterminals -= 1;
  Ok(())
}
