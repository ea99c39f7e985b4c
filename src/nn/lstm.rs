use super::init::{self, Rng};
use super::linear::{Linear, dot};
use super::Mode;

/// Hidden and cell vectors for every layer of an `Lstm`
#[derive(Debug, Clone, PartialEq)]
pub struct LstmState {
  pub h: Vec<Vec<f32>>,
  pub c: Vec<Vec<f32>>,
}

impl LstmState {
  /// Hidden vector of the last layer
  pub fn output(&self) -> &[f32] {
    self.h.last().map(Vec::as_slice).unwrap_or(&[])
  }
}

#[derive(Debug, Clone, PartialEq)]
struct LstmLayer {
  /// input -> 4 * hidden, gate order i, f, g, o
  input: Linear,
  /// hidden -> 4 * hidden, stored without a bias
  recurrent: Vec<f32>,
}

/// A stacked LSTM that advances one input at a time. It holds no sequence
/// state itself, so the same weights can drive any number of encoders.
#[derive(Debug, Clone, PartialEq)]
pub struct Lstm {
  pub input_size: usize,
  pub hidden_size: usize,
  pub dropout: f32,
  layers: Vec<LstmLayer>,
  /// Learned initial state, zero at initialization
  pub h0: Vec<Vec<f32>>,
  pub c0: Vec<Vec<f32>>,
}

impl Lstm {
  pub fn new(
    rng: &mut Rng,
    input_size: usize,
    hidden_size: usize,
    num_layers: usize,
    dropout: f32,
  ) -> Self {
    let bound = 1.0 / (hidden_size as f32).sqrt();
    let layers = (0..num_layers)
      .map(|l| {
        let in_size = if l == 0 { input_size } else { hidden_size };
        LstmLayer {
          input: Linear {
            in_size,
            out_size: 4 * hidden_size,
            weight: init::uniform(rng, 4 * hidden_size * in_size, bound),
            bias: vec![0.0; 4 * hidden_size],
          },
          recurrent: init::uniform(rng, 4 * hidden_size * hidden_size, bound),
        }
      })
      .collect();

    Self {
      input_size,
      hidden_size,
      dropout,
      layers,
      h0: vec![vec![0.0; hidden_size]; num_layers],
      c0: vec![vec![0.0; hidden_size]; num_layers],
    }
  }

  pub fn initial_state(&self) -> LstmState {
    LstmState {
      h: self.h0.clone(),
      c: self.c0.clone(),
    }
  }

  /// Feed one input vector, returning the successor of `prev`.
  /// In training mode, dropout is applied between layers.
  pub fn step(&self, prev: &LstmState, input: &[f32], mode: &mut Mode) -> LstmState {
    assert_eq!(
      input.len(),
      self.input_size,
      "expected input to have size {}, got {}",
      self.input_size,
      input.len()
    );

    let hs = self.hidden_size;
    let mut next = LstmState {
      h: Vec::with_capacity(self.layers.len()),
      c: Vec::with_capacity(self.layers.len()),
    };

    let mut x = input.to_vec();
    for (l, layer) in self.layers.iter().enumerate() {
      if l > 0 {
        mode.dropout(&mut x, self.dropout);
      }
      let mut gates = layer.input.forward(&x);
      for (g, row) in gates.iter_mut().zip(layer.recurrent.chunks_exact(hs)) {
        *g += dot(row, &prev.h[l]);
      }

      let mut h = vec![0.0; hs];
      let mut c = vec![0.0; hs];
      for j in 0..hs {
        let i = sigmoid(gates[j]);
        let f = sigmoid(gates[hs + j]);
        let g = gates[2 * hs + j].tanh();
        let o = sigmoid(gates[3 * hs + j]);
        c[j] = f * prev.c[l][j] + i * g;
        h[j] = o * c[j].tanh();
      }

      x = h.clone();
      next.h.push(h);
      next.c.push(c);
    }

    next
  }

  /// Encode a whole sequence in one pass from the initial state, returning the
  /// last output. An empty sequence gives the initial output.
  pub fn run<'a, I>(&self, inputs: I, mode: &mut Mode) -> Vec<f32>
  where
    I: IntoIterator<Item = &'a [f32]>,
  {
    let mut state = self.initial_state();
    for input in inputs {
      state = self.step(&state, input, mode);
    }
    state.output().to_vec()
  }
}

fn sigmoid(x: f32) -> f32 {
  1.0 / (1.0 + (-x).exp())
}
