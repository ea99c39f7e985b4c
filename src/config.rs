use crate::errors::{Error, Result};

/// What gold-sequence scoring does when a gold action is illegal where it occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoldPolicy {
  /// Stop accumulating at the illegal action and return the loss so far,
  /// logging a warning
  #[default]
  Truncate,
  /// Fail with the `IllegalAction` error
  Strict,
}

/// Sizes and hyperparameters of a parser
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
  pub word_embedding_size: usize,
  pub pos_embedding_size: usize,
  pub nt_embedding_size: usize,
  pub action_embedding_size: usize,
  /// Width of every vector pushed into an encoder, composed vectors included
  pub input_size: usize,
  /// Width of the encoder summaries and the parser summary
  pub hidden_size: usize,
  pub num_layers: usize,
  pub dropout: f32,
  /// Seed for parameter initialization
  pub seed: u64,
  pub gold_policy: GoldPolicy,
}

impl Default for ParserConfig {
  fn default() -> Self {
    Self {
      word_embedding_size: 32,
      pos_embedding_size: 12,
      nt_embedding_size: 60,
      action_embedding_size: 16,
      input_size: 128,
      hidden_size: 128,
      num_layers: 2,
      dropout: 0.0,
      seed: 0,
      gold_policy: GoldPolicy::Truncate,
    }
  }
}

impl ParserConfig {
  pub fn validate(&self) -> Result<()> {
    let sizes = [
      ("word embedding size", self.word_embedding_size),
      ("POS embedding size", self.pos_embedding_size),
      ("nonterminal embedding size", self.nt_embedding_size),
      ("action embedding size", self.action_embedding_size),
      ("input size", self.input_size),
      ("hidden size", self.hidden_size),
      ("number of layers", self.num_layers),
    ];
    for (name, size) in sizes {
      if size == 0 {
        return Err(Error::config(format!("nonpositive {}: {}", name, size)));
      }
    }

    if !(0.0..1.0).contains(&self.dropout) {
      return Err(Error::config(format!("invalid dropout rate: {}", self.dropout)));
    }

    Ok(())
  }
}

#[test]
fn test_validate() {
  assert!(ParserConfig::default().validate().is_ok());

  let bad_size = ParserConfig {
    hidden_size: 0,
    ..Default::default()
  };
  assert!(matches!(bad_size.validate(), Err(Error::Configuration(_))));

  for dropout in [-0.1, 1.0, f32::NAN] {
    let bad = ParserConfig {
      dropout,
      ..Default::default()
    };
    assert!(matches!(bad.validate(), Err(Error::Configuration(_))));
  }
}
