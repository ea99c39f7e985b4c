//! Small dense building blocks: embedding tables, affine layers, a stacked LSTM
//! and a masked log-softmax. Vectors are plain `Vec<f32>`.

pub mod init;
mod linear;
mod lstm;

pub use init::Rng;
pub use linear::{Linear, dot, relu};
pub use lstm::{Lstm, LstmState};

/// Whether dropout is active. Threaded explicitly through every numeric call
/// instead of living as a flag on the model.
#[derive(Debug)]
pub enum Mode<'r> {
  Eval,
  Train(&'r mut Rng),
}

impl Mode<'_> {
  /// Inverted dropout: zeroes each entry with probability `p` and rescales the
  /// survivors. A no-op in eval mode or when `p` is 0.
  pub fn dropout(&mut self, v: &mut [f32], p: f32) {
    if let Self::Train(rng) = self {
      if p <= 0.0 {
        return;
      }
      let scale = 1.0 / (1.0 - p);
      for x in v.iter_mut() {
        if rng.next_f32() < p {
          *x = 0.0;
        } else {
          *x *= scale;
        }
      }
    }
  }
}

/// Lookup table of `len` vectors of width `dim`, initialized from N(0, 1)
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
  pub dim: usize,
  pub table: Vec<f32>,
}

impl Embedding {
  pub fn new(rng: &mut Rng, len: usize, dim: usize) -> Self {
    Self {
      dim,
      table: init::normal(rng, len * dim),
    }
  }

  pub fn len(&self) -> usize {
    if self.dim == 0 { 0 } else { self.table.len() / self.dim }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Panics on an out of range id; ids come from a validated vocabulary
  pub fn row(&self, id: usize) -> &[f32] {
    &self.table[id * self.dim..(id + 1) * self.dim]
  }
}

/// Log-softmax over the entries where `legal` is true. Illegal entries come out
/// as negative infinity and take no part in the normalizer.
pub fn masked_log_softmax(scores: &[f32], legal: &[bool]) -> Vec<f32> {
  assert_eq!(scores.len(), legal.len());

  let max = scores
    .iter()
    .zip(legal)
    .filter(|(_, l)| **l)
    .map(|(s, _)| *s)
    .fold(f32::NEG_INFINITY, f32::max);
  if max == f32::NEG_INFINITY {
    return vec![f32::NEG_INFINITY; scores.len()];
  }

  let sum: f32 = scores
    .iter()
    .zip(legal)
    .filter(|(_, l)| **l)
    .map(|(s, _)| (s - max).exp())
    .sum();
  let log_z = max + sum.ln();

  scores
    .iter()
    .zip(legal)
    .map(|(s, l)| if *l { s - log_z } else { f32::NEG_INFINITY })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_masked_log_softmax() {
    let out = masked_log_softmax(&[1.0, 5.0, 1.0], &[true, false, true]);
    assert_eq!(out[1], f32::NEG_INFINITY);
    assert!((out[0] - 0.5f32.ln()).abs() < 1e-6);
    assert!((out[2] - 0.5f32.ln()).abs() < 1e-6);

    let none = masked_log_softmax(&[1.0, 2.0], &[false, false]);
    assert!(none.iter().all(|x| *x == f32::NEG_INFINITY));
  }

  #[test]
  fn test_dropout_modes() {
    let mut v = vec![1.0; 64];
    Mode::Eval.dropout(&mut v, 0.5);
    assert!(v.iter().all(|x| *x == 1.0));

    let mut rng = Rng::new(5);
    Mode::Train(&mut rng).dropout(&mut v, 0.5);
    assert!(v.iter().all(|x| *x == 0.0 || *x == 2.0));
    assert!(v.iter().any(|x| *x == 0.0));
  }
}
