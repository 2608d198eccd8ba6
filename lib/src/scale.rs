//! Mapping between raw attribute values and step indices.
//!
//! Brightness and loudness are perceived roughly logarithmically, so the
//! backlight is stepped on a base-10 logarithmic scale where equal step deltas
//! feel like equal changes. On/off style controls use the same
//! [`StepScale`] machinery with a scale that wraps instead of clamping.
//!
//! All rounding uses [`f64::round`], which rounds half-way cases away from zero.

use std::fmt::Debug;

use crate::errors::*;

make_log_macro!(trace, "scale");

/// A bidirectional mapping between raw values and integer step indices.
pub trait StepScale {
    type Value: Copy + Debug;

    /// Step index of `value`. Values outside the scale map to steps outside it.
    fn value_to_step(&self, value: Self::Value) -> Result<i64>;

    /// Raw value for `step`. Any step index is accepted; the result is always
    /// a valid value for this scale.
    fn step_to_value(&self, step: i64) -> Self::Value;

    /// Move `current` by `delta` steps.
    fn apply_step_delta(&self, current: Self::Value, delta: i64) -> Result<Self::Value> {
        let step = self.value_to_step(current)?;
        let next_step = step.saturating_add(delta);
        let next = self.step_to_value(next_step);
        trace!("{current:?} (step {step}) {delta:+} -> {next:?} (step {next_step})");
        Ok(next)
    }
}

/// Logarithmic scale spanning `[min, max]` in `steps` steps.
///
/// Step `0` is `min` and step `steps` is `max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogScale {
    min: i64,
    max: i64,
    steps: i64,
    log_min: f64,
    log_span: f64,
}

impl LogScale {
    pub fn new(min: i64, max: i64, steps: i64) -> Result<Self> {
        if min <= 0 || max <= min || steps <= 0 {
            return Err(FunkeysError::DegenerateRange {
                min: min as f64,
                max: max as f64,
                steps,
            });
        }
        let log_min = (min as f64).log10();
        Ok(Self {
            min,
            max,
            steps,
            log_min,
            log_span: (max as f64).log10() - log_min,
        })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn steps(&self) -> i64 {
        self.steps
    }
}

impl StepScale for LogScale {
    type Value = i64;

    fn value_to_step(&self, value: i64) -> Result<i64> {
        if value <= 0 {
            return Err(FunkeysError::NonPositiveValue(value));
        }
        let x = ((value as f64).log10() - self.log_min) / self.log_span;
        Ok((x * self.steps as f64).round() as i64)
    }

    fn step_to_value(&self, step: i64) -> i64 {
        let x = self.log_min + (step as f64 / self.steps as f64) * self.log_span;
        let candidate = 10f64.powf(x);
        if candidate > self.max as f64 {
            self.max
        } else if candidate < self.min as f64 {
            self.min
        } else {
            // rounding can't leave [min, max] since both bounds are integers
            candidate.round() as i64
        }
    }
}

/// Step index of `value` on the logarithmic scale `[min, max]` of `steps` steps.
pub fn value_to_step(value: i64, min: i64, max: i64, steps: i64) -> Result<i64> {
    LogScale::new(min, max, steps)?.value_to_step(value)
}

/// Raw value of `step` on the logarithmic scale `[min, max]` of `steps` steps,
/// clamped into `[min, max]`.
pub fn step_to_value(step: i64, min: i64, max: i64, steps: i64) -> Result<i64> {
    Ok(LogScale::new(min, max, steps)?.step_to_value(step))
}

/// Move `current` by `delta` logarithmic steps.
pub fn apply_step_delta(current: i64, delta: i64, min: i64, max: i64, steps: i64) -> Result<i64> {
    LogScale::new(min, max, steps)?.apply_step_delta(current, delta)
}

/// Binary on/off scale: `max` is step 1, everything else step 0, and steps
/// wrap modulo 2. Nudging by one flips the control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToggleScale {
    min: i64,
    max: i64,
}

impl ToggleScale {
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if max <= min {
            return Err(FunkeysError::DegenerateRange {
                min: min as f64,
                max: max as f64,
                steps: 1,
            });
        }
        Ok(Self { min, max })
    }
}

impl StepScale for ToggleScale {
    type Value = i64;

    fn value_to_step(&self, value: i64) -> Result<i64> {
        Ok(i64::from(value >= self.max))
    }

    fn step_to_value(&self, step: i64) -> i64 {
        if step.rem_euclid(2) == 1 {
            self.max
        } else {
            self.min
        }
    }
}

/// Every integer in `[min, max]` is a step, and stepping past `max` wraps to `min`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleScale {
    min: i64,
    max: i64,
}

impl CycleScale {
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if max <= min {
            return Err(FunkeysError::DegenerateRange {
                min: min as f64,
                max: max as f64,
                steps: max.saturating_sub(min),
            });
        }
        Ok(Self { min, max })
    }
}

impl StepScale for CycleScale {
    type Value = i64;

    fn value_to_step(&self, value: i64) -> Result<i64> {
        Ok(value.clamp(self.min, self.max) - self.min)
    }

    fn step_to_value(&self, step: i64) -> i64 {
        self.min + step.rem_euclid(self.max - self.min + 1)
    }
}

/// Evenly spaced float scale, used for volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    min: f64,
    max: f64,
    step: f64,
}

impl LinearScale {
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && max > min && step.is_finite() && step > 0.0) {
            return Err(FunkeysError::DegenerateRange {
                min,
                max,
                steps: ((max - min) / step).round() as i64,
            });
        }
        Ok(Self { min, max, step })
    }

    /// Pull `value` into `[min, max]`; `NaN` becomes `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

impl StepScale for LinearScale {
    type Value = f64;

    fn value_to_step(&self, value: f64) -> Result<i64> {
        if !value.is_finite() {
            return Err(FunkeysError::Other(format!("{value} is not a finite value")));
        }
        Ok(((value - self.min) / self.step).round() as i64)
    }

    fn step_to_value(&self, step: i64) -> f64 {
        self.clamp(self.min + step as f64 * self.step)
    }
}
