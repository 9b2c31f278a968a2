//! Column transforms used by the feature builder.
//!
//! All functions keep the input length; positions without enough history
//! are `None`.

pub const HOURS_PER_DAY: usize = 24;

/// `out[t] = values[t] - values[t - window]`
pub fn difference(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|t| {
            if window == 0 || t < window {
                return None;
            }
            Some(values[t]? - values[t - window]?)
        })
        .collect()
}

/// `out[t] = values[t - lag]`
pub fn lag(values: &[Option<f64>], lag: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|t| if t < lag { None } else { values[t - lag] })
        .collect()
}

/// One-hot encoding of the hour of day.
pub fn hour_dummies(hour: u32) -> [f64; HOURS_PER_DAY] {
    let mut dummies = [0.0; HOURS_PER_DAY];
    if let Some(slot) = dummies.get_mut(hour as usize) {
        *slot = 1.0;
    }
    dummies
}

/// `ln(index²)`. Index 0 gives negative infinity.
pub fn log_trend(index: usize) -> f64 {
    let t = index as f64;
    (t * t).ln()
}
