use crate::error::{ReportError, Result};

/// Picks an axis step for a scale topping out at `max_ratio`. Candidates are
/// round multiples of the power of ten below `max_ratio`, largest first; the
/// first one giving strictly between 4 and 10 divisions wins. When none does
/// (a maximum of exactly twice a power of ten), the window is relaxed to
/// include its bounds.
pub fn tick_step(max_ratio: f64) -> Result<f64> {
  if !max_ratio.is_finite() || max_ratio <= 0.0 {
    return Err(ReportError::NoTickStep { max_ratio });
  }

  let p = 10f64.powf(max_ratio.log10().floor());
  let candidates = [5.0 * p, 2.0 * p, p, p / 2.0, p / 5.0, p / 10.0, p / 20.0];

  candidates
    .iter()
    .copied()
    .find(|step| {
      let divisions = max_ratio / step;
      divisions > 4.0 && divisions < 10.0
    })
    .or_else(|| {
      candidates
        .iter()
        .copied()
        .find(|step| (4.0..=10.0).contains(&(max_ratio / step)))
    })
    .ok_or(ReportError::NoTickStep { max_ratio })
}

/// Multiples of `step` from zero through the first one above `max_ratio`.
pub fn tick_values(max_ratio: f64, step: f64) -> Vec<f64> {
  let mut ticks = Vec::new();
  for k in 0u32.. {
    let value = f64::from(k) * step;
    ticks.push(value);

    if value > max_ratio {
      break;
    }
  }

  ticks
}

/// Number of decimals needed to print multiples of `step`.
pub fn decimals(step: f64) -> usize {
  (-step.log10()).ceil().max(0.0) as usize
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_step_for_3_2() {
    let step = tick_step(3.2).unwrap();
    assert!((step - 0.5).abs() < 1e-12);

    let ticks = tick_values(3.2, step);
    assert_eq!(ticks.len(), 8);
    assert!((ticks[7] - 3.5).abs() < 1e-12);
  }

  #[test]
  fn test_divisions_stay_in_window() {
    for max in [0.07, 0.5, 1.3, 2.5, 4.1, 7.9, 9.99, 15.0, 42.0, 123.0] {
      let step = tick_step(max).unwrap();
      let divisions = max / step;
      assert!(divisions > 4.0 && divisions < 10.0, "{max}: {step} gives {divisions}");
    }
  }

  #[test]
  fn test_exact_double_power_of_ten_falls_back() {
    let step = tick_step(2.0).unwrap();
    assert!((step - 0.5).abs() < 1e-12);

    let ticks = tick_values(2.0, step);
    assert!((ticks.last().unwrap() - 2.5).abs() < 1e-12);
    assert!((tick_step(20.0).unwrap() - 5.0).abs() < 1e-9);
  }

  #[test]
  fn test_degenerate_scale() {
    assert!(matches!(tick_step(0.0), Err(ReportError::NoTickStep { .. })));
    assert!(matches!(tick_step(-1.0), Err(ReportError::NoTickStep { .. })));
    assert!(matches!(tick_step(f64::NAN), Err(ReportError::NoTickStep { .. })));
    assert!(matches!(tick_step(f64::NEG_INFINITY), Err(ReportError::NoTickStep { .. })));
  }

  #[test]
  fn test_decimals() {
    assert_eq!(decimals(5.0), 0);
    assert_eq!(decimals(1.0), 0);
    assert_eq!(decimals(0.5), 1);
    assert_eq!(decimals(0.05), 2);
  }
}
