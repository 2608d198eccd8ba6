use crate::attribute::ScalarAttribute;
use crate::consts::*;
use crate::errors::*;
use crate::scale::LinearScale;

use std::path::PathBuf;

use regex::Regex;
use smart_default::SmartDefault;
use tokio::process::Command;

make_log_macro!(debug, "volume");
make_log_macro!(warn, "volume");

/// Volume of a PipeWire sink, driven through `wpctl`.
#[derive(Clone, Debug)]
pub struct WpctlVolume {
    program: PathBuf,
    sink: String,
    name: String,
}

impl WpctlVolume {
    pub fn new(sink: &str) -> Self {
        Self::with_program(WPCTL, sink)
    }

    /// Drive `sink` through `program` instead of the `wpctl` found in `PATH`.
    pub fn with_program(program: impl Into<PathBuf>, sink: &str) -> Self {
        let program = program.into();
        Self {
            name: format!("{}:{sink}", program.display()),
            program,
            sink: sink.to_string(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        debug!("{} {}", self.program.display(), args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .unavailable(&self.name)?;
        if !output.status.success() {
            return Err(FunkeysError::AttributeUnavailable {
                attribute: self.name.clone(),
                reason: format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse `wpctl get-volume` output such as `Volume: 0.40 [MUTED]`.
pub fn parse_volume(output: &str) -> Result<Option<f64>> {
    let re = Regex::new(r"^Volume:\s*(\d+(?:\.\d+)?)")?;
    Ok(re
        .captures(output.trim_start())
        .and_then(|caps| caps[1].parse().ok()))
}

impl ScalarAttribute for WpctlVolume {
    type Value = f64;

    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> Result<f64> {
        let output = self.run(&["get-volume", &self.sink]).await?;
        parse_volume(&output)?.ok_or_else(|| FunkeysError::AttributeUnavailable {
            attribute: self.name.clone(),
            reason: format!("unexpected output {:?}", output.trim()),
        })
    }

    async fn write(&self, value: f64) -> Result<()> {
        let value = format!("{value:.prec$}", prec = VOLUME_PRECISION);
        self.run(&["set-volume", &self.sink, &value]).await?;
        Ok(())
    }
}

/// Volume to restore on the next unmute. Owned by the caller.
#[derive(Clone, Copy, Debug, PartialEq, SmartDefault)]
pub struct MuteState {
    #[default(DEFAULT_RESTORE_VOLUME)]
    pub previous: f64,
}

impl MuteState {
    /// Volume an unmute writes: `previous` kept inside `scale`, or the default
    /// level when `previous` is not audible.
    pub fn restore_volume(&self, scale: &LinearScale, threshold: f64) -> f64 {
        if self.previous.is_nan() || self.previous < threshold {
            scale.clamp(DEFAULT_RESTORE_VOLUME)
        } else {
            scale.clamp(self.previous)
        }
    }
}

/// Mute when audible, otherwise restore `state.previous`, and mirror the result
/// on the mute LED.
///
/// The LED is only an indicator: failing to write it is logged, not returned,
/// since the volume has already changed by then.
pub async fn toggle_mute<V, L>(
    volume: &V,
    mute_led: Option<&L>,
    state: MuteState,
    scale: &LinearScale,
    threshold: f64,
) -> Result<MuteState>
where
    V: ScalarAttribute<Value = f64>,
    L: ScalarAttribute<Value = i64>,
{
    let current = volume.read().await?;
    debug!("current volume {current}");

    let (next_state, led) = if current < threshold {
        let previous = state.restore_volume(scale, threshold);
        volume.write(previous).await?;
        (MuteState { previous }, 0)
    } else {
        volume.write(0.0).await?;
        (MuteState { previous: current }, 1)
    };

    if let Some(mute_led) = mute_led {
        if let Err(e) = mute_led.write(led).await {
            warn!("{e}");
        }
    }
    Ok(next_state)
}
