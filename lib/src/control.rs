use crate::attribute::{ScalarAttribute, Subsystem, SysfsAttribute};
use crate::config::{BacklightConfig, LedMode};
use crate::errors::*;
use crate::scale::*;

use std::path::Path;

make_log_macro!(debug, "control");

/// Read `attribute`, move it by `delta` steps of `scale` and write the result back.
///
/// Nothing is written if the read or the mapping fails. The read-modify-write
/// is not atomic: a concurrent writer to the same attribute can be overwritten.
pub async fn nudge<A, S>(attribute: &A, scale: &S, delta: i64) -> Result<S::Value>
where
    A: ScalarAttribute<Value = S::Value>,
    S: StepScale,
{
    let current = attribute.read().await?;
    let next = scale.apply_step_delta(current, delta)?;
    debug!("{}: {:?} -> {:?}", attribute.name(), current, next);
    attribute.write(next).await?;
    Ok(next)
}

/// A screen backlight stepped on a logarithmic scale.
#[derive(Debug)]
pub struct Backlight {
    attribute: SysfsAttribute,
    scale: LogScale,
}

impl Backlight {
    pub async fn open(root: &Path, config: &BacklightConfig, use_logind: bool) -> Result<Self> {
        let attribute = SysfsAttribute::new(root, Subsystem::Backlight, &config.device, use_logind);
        let max = attribute.read_max().await?;
        let scale = LogScale::new(config.min, max, config.steps)?;
        debug!("{} {:?}", attribute.name(), scale);
        Ok(Self { attribute, scale })
    }

    pub fn scale(&self) -> &LogScale {
        &self.scale
    }

    /// Current raw brightness and its step.
    pub async fn get(&self) -> Result<(i64, i64)> {
        let value = self.attribute.read().await?;
        Ok((value, self.scale.value_to_step(value)?))
    }

    pub async fn step(&self, delta: i64) -> Result<i64> {
        nudge(&self.attribute, &self.scale, delta).await
    }
}

#[derive(Clone, Copy, Debug)]
enum LedScale {
    Toggle(ToggleScale),
    Cycle(CycleScale),
}

impl StepScale for LedScale {
    type Value = i64;

    fn value_to_step(&self, value: i64) -> Result<i64> {
        match self {
            LedScale::Toggle(scale) => scale.value_to_step(value),
            LedScale::Cycle(scale) => scale.value_to_step(value),
        }
    }

    fn step_to_value(&self, step: i64) -> i64 {
        match self {
            LedScale::Toggle(scale) => scale.step_to_value(step),
            LedScale::Cycle(scale) => scale.step_to_value(step),
        }
    }
}

/// An LED (or keyboard backlight) that is switched rather than dimmed.
#[derive(Debug)]
pub struct Led {
    attribute: SysfsAttribute,
    scale: LedScale,
}

impl Led {
    pub async fn open(
        root: &Path,
        device: &str,
        mode: LedMode,
        use_logind: bool,
    ) -> Result<Self> {
        let attribute = SysfsAttribute::new(root, Subsystem::Leds, device, use_logind);
        let max = attribute.read_max().await?;
        let scale = match mode {
            LedMode::Toggle => LedScale::Toggle(ToggleScale::new(0, max)?),
            LedMode::Cycle => LedScale::Cycle(CycleScale::new(0, max)?),
        };
        Ok(Self { attribute, scale })
    }

    /// Advance to the next state, wrapping back to off after the brightest one.
    pub async fn step(&self) -> Result<i64> {
        nudge(&self.attribute, &self.scale, 1).await
    }
}
