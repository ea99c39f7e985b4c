use crate::config::ParserConfig;
use crate::nn::init::RELU_GAIN;
use crate::nn::{Embedding, Linear, Lstm, Rng};
use crate::vocab::Vocabularies;

/// Every learned parameter of a parser. Read-only while a sentence is scored or
/// decoded; an outside training loop may change them between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
  pub word_embedding: Embedding,
  pub pos_embedding: Embedding,
  pub nt_embedding: Embedding,
  pub action_embedding: Embedding,

  pub stack_encoder: Lstm,
  pub buffer_encoder: Lstm,
  pub history_encoder: Lstm,
  pub stack_guard: Vec<f32>,
  pub buffer_guard: Vec<f32>,
  pub history_guard: Vec<f32>,

  pub fwd_composer: Lstm,
  pub bwd_composer: Lstm,
  pub fwdbwd2composed: Linear,

  /// word + POS embedding -> encoder input
  pub word2encoder: Linear,
  pub nt2encoder: Linear,
  pub action2encoder: Linear,
  pub encoders2summary: Linear,
  pub summary2actions: Linear,
  /// Rate applied to the joint encoder summary before scoring
  pub dropout: f32,
}

impl Weights {
  /// Fresh parameters, deterministic in `config.seed`. Sizes must already be
  /// validated.
  pub fn new(config: &ParserConfig, vocab: &Vocabularies) -> Self {
    let mut rng = Rng::new(config.seed);
    let rng = &mut rng;
    let c = config;

    Self {
      word_embedding: Embedding::new(rng, vocab.words().len(), c.word_embedding_size),
      pos_embedding: Embedding::new(rng, vocab.pos_tags().len(), c.pos_embedding_size),
      nt_embedding: Embedding::new(rng, vocab.nonterminals().len(), c.nt_embedding_size),
      action_embedding: Embedding::new(rng, vocab.num_actions(), c.action_embedding_size),

      stack_encoder: Lstm::new(rng, c.input_size, c.hidden_size, c.num_layers, c.dropout),
      buffer_encoder: Lstm::new(rng, c.input_size, c.hidden_size, c.num_layers, c.dropout),
      history_encoder: Lstm::new(rng, c.input_size, c.hidden_size, c.num_layers, c.dropout),
      stack_guard: vec![0.0; c.input_size],
      buffer_guard: vec![0.0; c.input_size],
      history_guard: vec![0.0; c.input_size],

      fwd_composer: Lstm::new(rng, c.input_size, c.input_size, c.num_layers, c.dropout),
      bwd_composer: Lstm::new(rng, c.input_size, c.input_size, c.num_layers, c.dropout),
      fwdbwd2composed: Linear::new(rng, 2 * c.input_size, c.input_size, RELU_GAIN, 1.0),

      word2encoder: Linear::new(
        rng,
        c.word_embedding_size + c.pos_embedding_size,
        c.input_size,
        RELU_GAIN,
        1.0,
      ),
      nt2encoder: Linear::new(rng, c.nt_embedding_size, c.input_size, RELU_GAIN, 1.0),
      action2encoder: Linear::new(rng, c.action_embedding_size, c.input_size, RELU_GAIN, 1.0),
      encoders2summary: Linear::new(rng, 3 * c.hidden_size, c.hidden_size, RELU_GAIN, 1.0),
      summary2actions: Linear::new(rng, c.hidden_size, vocab.num_actions(), 1.0, 0.0),
      dropout: c.dropout,
    }
  }

  /// Encoder input for a word with its POS tag
  pub fn word_input(&self, word_id: usize, pos_id: usize) -> Vec<f32> {
    let joint = crate::utils::concat(&[
      self.word_embedding.row(word_id),
      self.pos_embedding.row(pos_id),
    ]);
    self.word2encoder.forward_relu(&joint)
  }

  /// Encoder inputs for every nonterminal label, indexed by label id
  pub fn nt_inputs(&self) -> Vec<Vec<f32>> {
    (0..self.nt_embedding.len())
      .map(|id| self.nt2encoder.forward_relu(self.nt_embedding.row(id)))
      .collect()
  }

  /// Encoder inputs for every action, indexed by action id
  pub fn action_inputs(&self) -> Vec<Vec<f32>> {
    (0..self.action_embedding.len())
      .map(|id| self.action2encoder.forward_relu(self.action_embedding.row(id)))
      .collect()
  }
}
