use super::init::{self, Rng};

/// Affine map `y = Wx + b`, weights stored row-major as out x in
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
  pub in_size: usize,
  pub out_size: usize,
  pub weight: Vec<f32>,
  pub bias: Vec<f32>,
}

impl Linear {
  /// Xavier-uniform weights with the given gain, constant bias
  pub fn new(rng: &mut Rng, in_size: usize, out_size: usize, gain: f32, bias: f32) -> Self {
    let bound = init::xavier_bound(in_size, out_size, gain);
    Self {
      in_size,
      out_size,
      weight: init::uniform(rng, in_size * out_size, bound),
      bias: vec![bias; out_size],
    }
  }

  pub fn forward(&self, input: &[f32]) -> Vec<f32> {
    assert_eq!(
      input.len(),
      self.in_size,
      "expected input of size {}, got {}",
      self.in_size,
      input.len()
    );
    self
      .weight
      .chunks_exact(self.in_size)
      .zip(self.bias.iter())
      .map(|(row, b)| b + dot(row, input))
      .collect()
  }

  /// `relu(Wx + b)`, the shape of every transform feeding an encoder
  pub fn forward_relu(&self, input: &[f32]) -> Vec<f32> {
    let mut out = self.forward(input);
    relu(&mut out);
    out
  }
}

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
  a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn relu(v: &mut [f32]) {
  for x in v.iter_mut() {
    *x = x.max(0.0);
  }
}

#[test]
fn test_linear_forward() {
  let layer = Linear {
    in_size: 2,
    out_size: 3,
    weight: vec![1.0, 2.0, 0.0, -1.0, 0.5, 0.5],
    bias: vec![0.0, 1.0, -10.0],
  };
  assert_eq!(layer.forward(&[1.0, 2.0]), vec![5.0, -1.0, -8.5]);
  assert_eq!(layer.forward_relu(&[1.0, 2.0]), vec![5.0, 0.0, 0.0]);
}
