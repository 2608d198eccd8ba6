use std::ops::RangeInclusive;

/// Location of the sysfs device classes
pub const DEVICES_ROOT: &str = "/sys/class";

/// Filename for device's max brightness
pub const FILE_MAX_BRIGHTNESS: &str = "max_brightness";

/// Filename for current brightness.
pub const FILE_BRIGHTNESS: &str = "actual_brightness";

/// amdgpu drivers set the actual_brightness in a different scale than
/// [0, max_brightness], so we have to use the 'brightness' file instead.
pub const FILE_BRIGHTNESS_AMD: &str = "brightness";

/// set the requested brightness level
pub const FILE_BRIGHTNESS_WRITE: &str = "brightness";

pub const DEFAULT_BACKLIGHT_DEVICE: &str = "intel_backlight";
pub const DEFAULT_KEYBOARD_DEVICE: &str = "tpacpi::kbd_backlight";
pub const DEFAULT_MUTE_LED: &str = "platform::mute";
pub const DEFAULT_MIC_MUTE_LED: &str = "platform::micmute";
pub const DEFAULT_CAPSLOCK_LED: &str = "input3::capslock";

/// Lowest raw backlight value reachable by stepping down, keeps the panel lit.
pub const DEFAULT_BACKLIGHT_MIN: i64 = 2;

/// Number of perceptual steps between the minimum and maximum backlight.
pub const DEFAULT_BACKLIGHT_STEPS: i64 = 20;

pub const WPCTL: &str = "wpctl";
pub const DEFAULT_AUDIO_SINK: &str = "@DEFAULT_AUDIO_SINK@";

pub const DEFAULT_VOLUME_STEP: f64 = 0.05;
pub const DEFAULT_VOLUME_MAX: f64 = 1.0;

/// Anything quieter than this counts as muted.
pub const DEFAULT_MUTE_THRESHOLD: f64 = 0.001;

/// Volume restored on unmute when nothing was remembered.
pub const DEFAULT_RESTORE_VOLUME: f64 = 0.5;

/// Range of valid values for the volume step. `wpctl` reports two decimals,
/// so a finer step would be rounded away on the next read.
pub const VOLUME_STEP_RANGE: RangeInclusive<f64> = 0.01..=1.0;

/// Decimals used when writing a volume
pub const VOLUME_PRECISION: usize = 2;

/// Range of valid values for the volume ceiling
pub const VOLUME_MAX_RANGE: RangeInclusive<f64> = 0.01..=1.5;

/// Range of valid values for the mute threshold
pub const MUTE_THRESHOLD_RANGE: RangeInclusive<f64> = 0.0001..=0.1;
