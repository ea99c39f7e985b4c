use std::error::Error;

/// Boxed static error type
pub type Err = Box<dyn Error + 'static>;

/// Index of the largest value. Ties go to the lowest index, and NaNs are never
/// picked over a number. Returns None for an empty slice.
///
/// ```
/// assert_eq!(rnng::utils::argmax(&[0.5, 2.0, 2.0, -1.0]), Some(1));
/// assert_eq!(rnng::utils::argmax(&[f32::NEG_INFINITY, -3.0]), Some(1));
/// assert_eq!(rnng::utils::argmax(&[]), None);
/// ```
pub fn argmax(values: &[f32]) -> Option<usize> {
  let mut best: Option<(usize, f32)> = None;
  for (idx, &v) in values.iter().enumerate() {
    match best {
      Some((_, b)) if !(v > b) => {}
      _ if v.is_nan() => {}
      _ => best = Some((idx, v)),
    }
  }
  best.map(|(idx, _)| idx)
}

/// Concatenate slices into one owned vector
pub fn concat(parts: &[&[f32]]) -> Vec<f32> {
  let len = parts.iter().map(|p| p.len()).sum();
  let mut out = Vec::with_capacity(len);
  for p in parts {
    out.extend_from_slice(p);
  }
  out
}
