/// Deterministic splitmix64 generator for parameter initialization and dropout
/// masks. The same seed always produces the same parameters.
#[derive(Debug, Clone)]
pub struct Rng {
  state: u64,
}

impl Rng {
  pub fn new(seed: u64) -> Self {
    Self { state: seed }
  }

  pub fn next_u64(&mut self) -> u64 {
    self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = self.state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
  }

  /// Uniform in [0, 1)
  pub fn next_f32(&mut self) -> f32 {
    // top 24 bits fill an f32 mantissa exactly
    (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
  }

  pub fn uniform(&mut self, low: f32, high: f32) -> f32 {
    low + (high - low) * self.next_f32()
  }

  /// Standard normal via Box-Muller
  pub fn normal(&mut self) -> f32 {
    let u1 = 1.0 - self.next_f32();
    let u2 = self.next_f32();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
  }
}

pub fn uniform(rng: &mut Rng, len: usize, bound: f32) -> Vec<f32> {
  (0..len).map(|_| rng.uniform(-bound, bound)).collect()
}

pub fn normal(rng: &mut Rng, len: usize) -> Vec<f32> {
  (0..len).map(|_| rng.normal()).collect()
}

/// Xavier/Glorot uniform bound for a fan_in x fan_out matrix
pub fn xavier_bound(fan_in: usize, fan_out: usize, gain: f32) -> f32 {
  gain * (6.0 / (fan_in + fan_out) as f32).sqrt()
}

pub const RELU_GAIN: f32 = std::f32::consts::SQRT_2;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_deterministic() {
    let mut a = Rng::new(7);
    let mut b = Rng::new(7);
    for _ in 0..16 {
      assert_eq!(a.next_u64(), b.next_u64());
    }
    assert_ne!(Rng::new(1).next_u64(), Rng::new(2).next_u64());
  }

  #[test]
  fn test_ranges() {
    let mut rng = Rng::new(42);
    for _ in 0..1000 {
      let x = rng.next_f32();
      assert!((0.0..1.0).contains(&x));
      let y = rng.uniform(-0.5, 0.5);
      assert!((-0.5..=0.5).contains(&y));
      assert!(rng.normal().is_finite());
    }
  }
}
