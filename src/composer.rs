use crate::model::Weights;
use crate::nn::Mode;
use crate::utils::concat;

/// Vector for a just-closed constituent.
///
/// Two single-pass encoders read the opener followed by the children, one left
/// to right and one right to left; their last outputs are concatenated and
/// mapped back to encoder input width.
pub fn compose(
  weights: &Weights,
  opener: &[f32],
  children: &[&[f32]],
  mode: &mut Mode,
) -> Vec<f32> {
  let fwd = std::iter::once(opener).chain(children.iter().copied());
  let bwd = std::iter::once(opener).chain(children.iter().rev().copied());

  let mut fwd_out = weights.fwd_composer.run(fwd, mode);
  let mut bwd_out = weights.bwd_composer.run(bwd, mode);
  mode.dropout(&mut fwd_out, weights.fwd_composer.dropout);
  mode.dropout(&mut bwd_out, weights.bwd_composer.dropout);

  weights
    .fwdbwd2composed
    .forward_relu(&concat(&[&fwd_out, &bwd_out]))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ParserConfig;
  use crate::vocab::{Vocab, Vocabularies};

  fn weights() -> Weights {
    let config = ParserConfig {
      input_size: 6,
      hidden_size: 5,
      ..Default::default()
    };
    let one = |s: &str| std::iter::once(s.to_string()).collect::<Vocab<String>>();
    let vocab = Vocabularies::with_standard_actions(one("w"), one("P"), one("X")).unwrap();
    Weights::new(&config, &vocab)
  }

  #[test]
  fn test_compose_width_and_order() {
    let w = weights();
    let opener = [0.1, -0.2, 0.3, 0.0, 0.5, 1.0];
    let a = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let b = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0];

    let ab = compose(&w, &opener, &[&a, &b], &mut Mode::Eval);
    let ba = compose(&w, &opener, &[&b, &a], &mut Mode::Eval);
    assert_eq!(ab.len(), 6);
    assert!(ab.iter().all(|x| *x >= 0.0));
    assert_ne!(ab, ba);

    // deterministic in eval mode
    assert_eq!(ab, compose(&w, &opener, &[&a, &b], &mut Mode::Eval));
  }
}
