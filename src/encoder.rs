use crate::errors::{Error, Result};
use crate::nn::{Lstm, LstmState, Mode};

/// One pushed element: the state after consuming it and its output vector
#[derive(Debug, Clone, PartialEq)]
struct Record {
  state: LstmState,
  output: Vec<f32>,
}

/// Incremental, undoable encoder of a sequence of vectors.
///
/// Records live in an arena with an explicit top index. Index 0 is the
/// sentinel holding the initial state. Pushing writes the slot above `top` and
/// advances it; popping only moves `top` back, so popped slots get overwritten by
/// later pushes instead of being freed.
///
/// The encoder owns no weights. The same `Lstm` must be passed to every `push`
/// between two `reset`s.
#[derive(Debug, Clone, Default)]
pub struct StackEncoder {
  records: Vec<Record>,
  top: usize,
}

impl StackEncoder {
  pub fn new() -> Self {
    Default::default()
  }

  /// Drop every pushed element and reseed the sentinel from `lstm`
  pub fn reset(&mut self, lstm: &Lstm) {
    let sentinel = Record {
      state: lstm.initial_state(),
      output: Vec::new(),
    };
    if self.records.is_empty() {
      self.records.push(sentinel);
    } else {
      self.records[0] = sentinel;
    }
    self.top = 0;
  }

  /// Append `input` as the newest element, returning the new state
  pub fn push(&mut self, lstm: &Lstm, input: &[f32], mode: &mut Mode) -> &LstmState {
    if self.records.is_empty() {
      self.reset(lstm);
    }

    let state = lstm.step(&self.records[self.top].state, input, mode);
    let record = Record {
      output: state.output().to_vec(),
      state,
    };

    self.top += 1;
    if self.top < self.records.len() {
      self.records[self.top] = record;
    } else {
      self.records.push(record);
    }
    &self.records[self.top].state
  }

  /// Remove the newest element, returning the state it produced.
  /// Only the sentinel left is an `EmptyStack` error.
  pub fn pop(&mut self) -> Result<LstmState> {
    if self.top == 0 {
      return Err(Error::EmptyStack);
    }
    let state = self.records[self.top].state.clone();
    self.top -= 1;
    Ok(state)
  }

  /// Summary of everything currently pushed, None when nothing is
  pub fn top(&self) -> Option<&[f32]> {
    if self.top == 0 {
      None
    } else {
      Some(&self.records[self.top].output)
    }
  }

  /// Pushes minus pops, the sentinel not counted
  pub fn len(&self) -> usize {
    self.top
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
