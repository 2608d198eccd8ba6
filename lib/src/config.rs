use crate::consts::*;
use crate::errors::*;
use crate::util::*;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Deserializer;
use smart_default::SmartDefault;

make_log_macro!(debug, "config");

#[derive(Deserialize, Clone, Debug, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct BacklightConfig {
    #[default(DEFAULT_BACKLIGHT_DEVICE.into())]
    pub device: String,

    /// Lowest value stepping down can reach
    #[default(DEFAULT_BACKLIGHT_MIN)]
    #[serde(deserialize_with = "deserialize_positive")]
    pub min: i64,

    /// Number of steps between `min` and the device's `max_brightness`
    #[default(DEFAULT_BACKLIGHT_STEPS)]
    #[serde(deserialize_with = "deserialize_positive")]
    pub steps: i64,
}

/// How a switched LED advances on each press.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LedMode {
    /// Jump between off and `max_brightness`.
    #[default]
    Toggle,
    /// Go through every level up to `max_brightness`, then off.
    Cycle,
}

#[derive(Deserialize, Clone, Debug, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct KeyboardConfig {
    #[default(DEFAULT_KEYBOARD_DEVICE.into())]
    pub device: String,

    pub mode: LedMode,
}

#[derive(Deserialize, Clone, Debug, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct LedsConfig {
    #[default(DEFAULT_MUTE_LED.into())]
    pub mute: String,

    #[default(DEFAULT_MIC_MUTE_LED.into())]
    pub micmute: String,

    #[default(DEFAULT_CAPSLOCK_LED.into())]
    pub capslock: String,
}

#[derive(Deserialize, Clone, Debug, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct VolumeConfig {
    #[default(DEFAULT_AUDIO_SINK.into())]
    pub sink: String,

    #[default(DEFAULT_VOLUME_STEP)]
    #[serde(deserialize_with = "deserialize_volume_step")]
    pub step: f64,

    #[default(DEFAULT_VOLUME_MAX)]
    #[serde(deserialize_with = "deserialize_volume_max")]
    pub max: f64,

    /// Anything quieter counts as muted
    #[default(DEFAULT_MUTE_THRESHOLD)]
    #[serde(deserialize_with = "deserialize_mute_threshold")]
    pub mute_threshold: f64,
}

#[derive(Deserialize, Clone, Debug, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct FunkeysConfig {
    /// Where the `backlight` and `leds` device classes live
    #[default(PathBuf::from(DEVICES_ROOT))]
    pub sysfs_root: PathBuf,

    /// Write through logind's `SetBrightness` before falling back to sysfs
    #[default(true)]
    pub use_logind: bool,

    pub backlight: BacklightConfig,
    pub keyboard: KeyboardConfig,
    pub leds: LedsConfig,
    pub volume: VolumeConfig,
}

fn deserialize_positive<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: i64 = Deserialize::deserialize(deserializer)?;
    debug!("{:?}", value);

    if value <= 0 {
        return Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Signed(value),
            &"a positive integer",
        ));
    }

    Ok(value)
}

fn deserialize_volume_step<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let step = Deserialize::deserialize(deserializer)?;
    debug!("{:?}", step);

    if !VOLUME_STEP_RANGE.contains(&step) {
        return Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Float(step),
            &"number in the range of 0.01 to 1.0",
        ));
    }

    Ok(step)
}

fn deserialize_volume_max<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let max = Deserialize::deserialize(deserializer)?;
    debug!("{:?}", max);

    if !VOLUME_MAX_RANGE.contains(&max) {
        return Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Float(max),
            &"number in the range of 0.01 to 1.5",
        ));
    }

    Ok(max)
}

fn deserialize_mute_threshold<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let threshold = Deserialize::deserialize(deserializer)?;
    debug!("{:?}", threshold);

    if !MUTE_THRESHOLD_RANGE.contains(&threshold) {
        return Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Float(threshold),
            &"number in the range of 0.0001 to 0.1",
        ));
    }

    Ok(threshold)
}

impl FunkeysConfig {
    /// Load `path`, or the first `funkeys/config.toml` found, or the defaults.
    pub async fn new(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => find_file("config", Some("toml")),
        };

        if let Some(config_path) = config_path {
            debug!("loading {}", config_path.display());
            deserialize_toml_file(config_path).await
        } else {
            debug!("using default config");
            Ok(FunkeysConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> std::result::Result<FunkeysConfig, toml::de::Error> {
        toml::from_str(contents)
    }

    #[test]
    fn defaults_match_the_builtin_constants() {
        let config = FunkeysConfig::default();
        assert_eq!(config.sysfs_root, PathBuf::from("/sys/class"));
        assert!(config.use_logind);
        assert_eq!(config.backlight.device, "intel_backlight");
        assert_eq!(config.backlight.min, 2);
        assert_eq!(config.backlight.steps, 20);
        assert_eq!(config.keyboard.device, "tpacpi::kbd_backlight");
        assert_eq!(config.keyboard.mode, LedMode::Toggle);
        assert_eq!(config.leds.mute, "platform::mute");
        assert_eq!(config.leds.micmute, "platform::micmute");
        assert_eq!(config.leds.capslock, "input3::capslock");
        assert_eq!(config.volume.sink, "@DEFAULT_AUDIO_SINK@");
        assert_eq!(config.volume.step, 0.05);
        assert_eq!(config.volume.max, 1.0);
        assert_eq!(config.volume.mute_threshold, 0.001);
    }

    #[test]
    fn empty_file_is_the_default() {
        let config = parse("").unwrap();
        assert_eq!(config.backlight.steps, 20);
        assert_eq!(config.keyboard.mode, LedMode::Toggle);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse(
            r#"
use_logind = false

[backlight]
device = "amdgpu_bl0"
steps = 32

[keyboard]
mode = "cycle"
"#,
        )
        .unwrap();
        assert!(!config.use_logind);
        assert_eq!(config.backlight.device, "amdgpu_bl0");
        assert_eq!(config.backlight.min, 2);
        assert_eq!(config.backlight.steps, 32);
        assert_eq!(config.keyboard.mode, LedMode::Cycle);
        assert_eq!(config.keyboard.device, "tpacpi::kbd_backlight");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(parse("[backlight]\nsteps = 0").is_err());
        assert!(parse("[backlight]\nmin = -2").is_err());
        assert!(parse("[volume]\nstep = 0.0").is_err());
        assert!(parse("[volume]\nstep = 0.001").is_err());
        assert!(parse("[volume]\nmute_threshold = -0.5").is_err());
        assert!(parse("[volume]\nmute_threshold = 0.0").is_err());
        assert!(parse("[volume]\nmax = 4.0").is_err());
        assert!(parse("[keyboard]\nmode = \"blink\"").is_err());
        assert!(parse("[backlight]\nbrightness = 3").is_err());
    }

    #[test]
    fn accepts_volume_settings_in_range() {
        let config = parse("[volume]\nstep = 0.01\nmute_threshold = 0.005").unwrap();
        assert_eq!(config.volume.step, 0.01);
        assert_eq!(config.volume.mute_threshold, 0.005);
    }

    #[tokio::test]
    async fn loads_an_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("funkeys.toml");
        std::fs::write(&path, "[volume]\nstep = 0.1\n").unwrap();

        let config = FunkeysConfig::new(Some(&path)).await.unwrap();
        assert_eq!(config.volume.step, 0.1);

        let missing = FunkeysConfig::new(Some(&dir.path().join("nope.toml"))).await;
        assert!(matches!(missing, Err(FunkeysError::Io(_))));
    }
}
