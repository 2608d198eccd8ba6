#![warn(clippy::match_same_arms)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::unnecessary_wraps)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Step screen backlight, keyboard backlight, indicator LEDs and volume the
//! way function keys should: in increments that look and sound even.

#[macro_use]
mod util;
mod attribute;
mod config;
mod consts;
mod control;
mod errors;
pub mod scale;
#[cfg(test)]
mod testing;
mod volume;

use std::path::Path;

pub use crate::attribute::{ScalarAttribute, Subsystem, SysfsAttribute};
pub use crate::config::{
    BacklightConfig, FunkeysConfig, KeyboardConfig, LedMode, LedsConfig, VolumeConfig,
};
pub use crate::control::{Backlight, Led, nudge};
pub use crate::errors::{FunkeysError, Result};
pub use crate::volume::{MuteState, WpctlVolume, parse_volume, toggle_mute};
use crate::consts::VOLUME_STEP_RANGE;
use crate::scale::LinearScale;

make_log_macro!(debug, "funkeys");

/// Indicator LEDs that can be toggled by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedKind {
    Mute,
    MicMute,
    CapsLock,
}

/// Used to construct [`Funkeys`]
#[derive(Default)]
pub struct FunkeysBuilder<'a> {
    config: Option<FunkeysConfig>,
    config_path: Option<&'a Path>,
}

impl<'a> FunkeysBuilder<'a> {
    /// Create a new [`FunkeysBuilder`].
    pub fn new() -> Self {
        FunkeysBuilder::default()
    }

    /// Use `config` as is. Takes precedence over [`with_config_path`](Self::with_config_path).
    pub fn with_config(mut self, config: FunkeysConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Defaults to `funkeys/config.toml` in the user's config dir.
    pub fn with_config_path(mut self, path: &'a Path) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Returns the constructed [`Funkeys`] instance.
    pub async fn build(self) -> Result<Funkeys> {
        let config = match self.config {
            Some(config) => config,
            None => FunkeysConfig::new(self.config_path).await?,
        };
        Funkeys::new(config)
    }
}

/// Entry point for every function key action.
///
/// Devices are opened per call, so each action sees the current hardware state.
pub struct Funkeys {
    config: FunkeysConfig,
    volume: WpctlVolume,
    volume_scale: LinearScale,
}

impl Funkeys {
    pub(crate) fn new(config: FunkeysConfig) -> Result<Self> {
        let volume = WpctlVolume::new(&config.volume.sink);
        let volume_scale = LinearScale::new(0.0, config.volume.max, config.volume.step)?;
        if !VOLUME_STEP_RANGE.contains(&config.volume.step) {
            return Err(FunkeysError::Config(format!(
                "volume step {} is outside {VOLUME_STEP_RANGE:?}",
                config.volume.step
            )));
        }
        debug!("{:?}", config);
        Ok(Self {
            config,
            volume,
            volume_scale,
        })
    }

    pub fn config(&self) -> &FunkeysConfig {
        &self.config
    }

    async fn open_backlight(&self) -> Result<Backlight> {
        Backlight::open(
            &self.config.sysfs_root,
            &self.config.backlight,
            self.config.use_logind,
        )
        .await
    }

    fn led_attribute(&self, device: &str) -> SysfsAttribute {
        SysfsAttribute::new(
            &self.config.sysfs_root,
            Subsystem::Leds,
            device,
            self.config.use_logind,
        )
    }

    /// Raw screen backlight value and its step.
    pub async fn backlight(&self) -> Result<(i64, i64)> {
        self.open_backlight().await?.get().await
    }

    /// Move the screen backlight by `delta` logarithmic steps. Returns the new raw value.
    pub async fn backlight_step(&self, delta: i64) -> Result<i64> {
        self.open_backlight().await?.step(delta).await
    }

    /// Advance the keyboard backlight according to its configured mode.
    pub async fn keyboard_step(&self) -> Result<i64> {
        let keyboard = &self.config.keyboard;
        Led::open(
            &self.config.sysfs_root,
            &keyboard.device,
            keyboard.mode,
            self.config.use_logind,
        )
        .await?
        .step()
        .await
    }

    /// Switch an indicator LED on or off.
    pub async fn led_toggle(&self, kind: LedKind) -> Result<i64> {
        let leds = &self.config.leds;
        let device = match kind {
            LedKind::Mute => &leds.mute,
            LedKind::MicMute => &leds.micmute,
            LedKind::CapsLock => &leds.capslock,
        };
        Led::open(
            &self.config.sysfs_root,
            device,
            LedMode::Toggle,
            self.config.use_logind,
        )
        .await?
        .step()
        .await
    }

    pub async fn volume(&self) -> Result<f64> {
        self.volume.read().await
    }

    /// Move the volume by `delta` steps of the configured size. Returns the new volume.
    pub async fn volume_step(&self, delta: i64) -> Result<f64> {
        nudge(&self.volume, &self.volume_scale, delta).await
    }

    /// Mute, or restore the volume remembered in `state`. Returns the state to
    /// pass to the next call.
    pub async fn toggle_mute(&self, state: MuteState) -> Result<MuteState> {
        let mute_led = self.led_attribute(&self.config.leds.mute);
        toggle_mute(
            &self.volume,
            Some(&mute_led),
            state,
            &self.volume_scale,
            self.config.volume.mute_threshold,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    fn sysfs(root: &Path, class: &str, device: &str, value: i64, max: i64) {
        let dir = root.join(class).join(device);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("max_brightness"), max.to_string()).unwrap();
        fs::write(dir.join("brightness"), value.to_string()).unwrap();
        fs::write(dir.join("actual_brightness"), value.to_string()).unwrap();
    }

    fn funkeys(root: &Path) -> Funkeys {
        let config = FunkeysConfig {
            sysfs_root: root.to_path_buf(),
            use_logind: false,
            ..Default::default()
        };
        Funkeys::new(config).unwrap()
    }

    #[tokio::test]
    async fn builder_keeps_the_given_config() {
        let config = FunkeysConfig {
            use_logind: false,
            ..Default::default()
        };
        let funkeys = FunkeysBuilder::new().with_config(config).build().await.unwrap();
        assert!(!funkeys.config().use_logind);
    }

    #[tokio::test]
    async fn builder_rejects_degenerate_volume_scale() {
        let mut config = FunkeysConfig::default();
        config.volume.step = 0.0;
        assert!(matches!(
            FunkeysBuilder::new().with_config(config).build().await,
            Err(FunkeysError::DegenerateRange { .. })
        ));
    }

    #[tokio::test]
    async fn builder_rejects_volume_step_finer_than_wpctl() {
        let mut config = FunkeysConfig::default();
        config.volume.step = 0.001;
        assert!(matches!(
            FunkeysBuilder::new().with_config(config).build().await,
            Err(FunkeysError::Config(_))
        ));
    }

    #[tokio::test]
    async fn backlight_up_and_down() {
        let root = tempfile::tempdir().unwrap();
        sysfs(root.path(), "backlight", "intel_backlight", 2, 2000);
        let funkeys = funkeys(root.path());

        assert_eq!(funkeys.backlight().await.unwrap(), (2, 0));
        assert_eq!(funkeys.backlight_step(1).await.unwrap(), 3);
        // actual_brightness is maintained by the driver, not by our writes
        assert_eq!(funkeys.backlight_step(-1).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn leds_and_keyboard_toggle() {
        let root = tempfile::tempdir().unwrap();
        sysfs(root.path(), "leds", "input3::capslock", 0, 1);
        sysfs(root.path(), "leds", "tpacpi::kbd_backlight", 1, 2);
        let funkeys = funkeys(root.path());

        assert_eq!(funkeys.led_toggle(LedKind::CapsLock).await.unwrap(), 1);
        assert_eq!(funkeys.led_toggle(LedKind::CapsLock).await.unwrap(), 0);
        assert_eq!(funkeys.keyboard_step().await.unwrap(), 2);
        assert_eq!(funkeys.keyboard_step().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_device_is_unavailable() {
        let root = tempfile::tempdir().unwrap();
        let funkeys = funkeys(root.path());

        assert!(matches!(
            funkeys.led_toggle(LedKind::MicMute).await,
            Err(FunkeysError::AttributeUnavailable { .. })
        ));
        assert!(matches!(
            funkeys.backlight_step(1).await,
            Err(FunkeysError::AttributeUnavailable { .. })
        ));
    }
}
