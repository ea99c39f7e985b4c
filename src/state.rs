use std::fmt;

use crate::action::{Action, Shape};
use crate::encoder::StackEncoder;
use crate::errors::{Error, Result};
use crate::syntree::ParseTree;

/// An entry on the parser stack: a word or a (possibly still open) constituent,
/// with the vector that was pushed into the stack encoder for it
#[derive(Debug, Clone, PartialEq)]
pub struct StackElement {
  pub subtree: ParseTree,
  pub embedding: Vec<f32>,
  pub is_open_nonterminal: bool,
}

/// Everything one in-flight parse owns: the symbolic stack, buffer and history,
/// and the three encoders mirroring them. Created once and reused, `start`
/// reinitializes it for each sentence.
///
/// The vectors cached here are computed from the weights at `start` and stay
/// valid until the next `start`.
#[derive(Debug, Clone, Default)]
pub struct ParserState {
  pub(crate) stack: Vec<StackElement>,
  /// Sentence positions still to be shifted, next word last
  pub(crate) buffer: Vec<usize>,
  pub(crate) words: Vec<String>,
  pub(crate) history: Vec<Action>,
  pub(crate) open_nonterminals: usize,
  pub(crate) started: bool,

  pub(crate) stack_encoder: StackEncoder,
  pub(crate) buffer_encoder: StackEncoder,
  pub(crate) history_encoder: StackEncoder,

  /// Encoder inputs per sentence position, nonterminal id and action id
  pub(crate) word_inputs: Vec<Vec<f32>>,
  pub(crate) nt_inputs: Vec<Vec<f32>>,
  pub(crate) action_inputs: Vec<Vec<f32>>,
}

impl ParserState {
  pub fn new() -> Self {
    Default::default()
  }

  pub fn is_started(&self) -> bool {
    self.started
  }

  /// A single closed constituent left and nothing more to shift. No action is
  /// legal from here.
  pub fn is_finished(&self) -> bool {
    self.stack.len() == 1 && !self.stack[0].is_open_nonterminal && self.buffer.is_empty()
  }

  pub fn open_nonterminals(&self) -> usize {
    self.open_nonterminals
  }

  pub fn stack(&self) -> &[StackElement] {
    &self.stack
  }

  /// Remaining input, next word first
  pub fn input_buffer(&self) -> Vec<&str> {
    self
      .buffer
      .iter()
      .rev()
      .map(|&pos| self.words[pos].as_str())
      .collect()
  }

  pub fn buffer_len(&self) -> usize {
    self.buffer.len()
  }

  pub fn history(&self) -> &[Action] {
    &self.history
  }

  /// Elements pushed (net of pops) into the stack, buffer and history encoders,
  /// guards included
  pub fn encoder_depths(&self) -> (usize, usize, usize) {
    (
      self.stack_encoder.len(),
      self.buffer_encoder.len(),
      self.history_encoder.len(),
    )
  }

  /// Current stack, buffer and history summaries
  pub fn encoder_summaries(&self) -> Result<[&[f32]; 3]> {
    if !self.started {
      return Err(Error::NotStarted);
    }
    match (
      self.stack_encoder.top(),
      self.buffer_encoder.top(),
      self.history_encoder.top(),
    ) {
      (Some(s), Some(b), Some(h)) => Ok([s, b, h]),
      _ => Err(Error::NotStarted),
    }
  }

  pub fn shape(&self) -> Shape {
    Shape {
      started: self.started,
      finished: self.is_finished(),
      buffer_len: self.buffer.len(),
      open_nonterminals: self.open_nonterminals,
      last_was_open: self.history.last().is_some_and(Action::is_open_nonterminal),
    }
  }

  pub fn verify(&self, action: &Action) -> Result<()> {
    action.verify(&self.shape())
  }

  pub fn can_apply(&self, action: &Action) -> bool {
    action.can_apply(&self.shape())
  }

  /// The finished parse
  pub fn tree(&self) -> Option<&ParseTree> {
    if self.is_finished() {
      Some(&self.stack[0].subtree)
    } else {
      None
    }
  }
}

impl fmt::Display for ParserState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "stack:")?;
    for e in self.stack.iter() {
      match &e.subtree {
        ParseTree::Branch(cons, _) if e.is_open_nonterminal => write!(f, " ({}", cons.value)?,
        t => write!(f, " {}", t)?,
      }
    }
    writeln!(f)?;
    writeln!(f, "buffer: {}", self.input_buffer().join(" "))?;
    write!(f, "history:")?;
    for a in self.history.iter() {
      write!(f, " {}", a)?;
    }
    Ok(())
  }
}
