#[cfg(test)]
#[ctor::ctor]
fn init_backtrace() {
    color_backtrace::install();
}

/// The logistic function, evaluated without overflowing for large |s|.
///
/// Saturates to exactly 0.0 or 1.0 when exp(|s|) is not representable.
#[inline(always)]
pub fn logistic(s: f64) -> f64 {
    if s >= 0.0 {
        1.0 / (1.0 + (-s).exp())
    } else {
        let e = s.exp();
        e / (1.0 + e)
    }
}

/// The dot product of a weight slice with a feature slice.
#[inline(always)]
pub fn dot_features(weights: &[f64], features: &[f32]) -> f64 {
    debug_assert_eq!(weights.len(), features.len());

    weights
        .iter()
        .zip(features)
        .map(|(&w, &x)| w * x as f64)
        .sum()
}

pub trait VecMath {
    fn l2_norm(&self) -> f64;
    fn add_scaled(&mut self, other: &[f64], factor: f64);
}

impl VecMath for [f64] {
    fn l2_norm(&self) -> f64 {
        self.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    fn add_scaled(&mut self, other: &[f64], factor: f64) {
        self.iter_mut()
            .zip(other)
            .for_each(|(a, &b)| *a += factor * b);
    }
}
