use crate::consts::*;
use crate::errors::*;
use crate::util::*;

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use zbus::Connection;

make_log_macro!(debug, "attribute");

#[zbus::dbus_proxy(
    interface = "org.freedesktop.login1.Session",
    default_service = "org.freedesktop.login1",
    default_path = "/org/freedesktop/login1/session/auto"
)]
trait Session {
    fn set_brightness(&self, subsystem: &str, name: &str, brightness: u32) -> zbus::Result<()>;
}

/// A named external scalar that can be read and written.
///
/// Every failure is reported as an error; there are no in-band sentinel values.
#[allow(async_fn_in_trait)]
pub trait ScalarAttribute {
    type Value;

    /// Identifies the attribute in logs and errors.
    fn name(&self) -> &str;

    async fn read(&self) -> Result<Self::Value>;

    async fn write(&self, value: Self::Value) -> Result<()>;
}

/// Device classes that logind can write to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subsystem {
    Backlight,
    Leds,
}

impl Subsystem {
    pub fn as_str(self) -> &'static str {
        match self {
            Subsystem::Backlight => "backlight",
            Subsystem::Leds => "leds",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Brightness of a device under `<root>/<subsystem>/<device_name>`.
#[derive(Clone, Debug)]
pub struct SysfsAttribute {
    subsystem: Subsystem,
    device_name: String,
    name: String,
    read_brightness_file: PathBuf,
    write_brightness_file: PathBuf,
    max_brightness_file: PathBuf,
    use_logind: bool,
}

impl SysfsAttribute {
    pub fn new(root: &Path, subsystem: Subsystem, device_name: &str, use_logind: bool) -> Self {
        let device_path = root.join(subsystem.as_str()).join(device_name);
        let read_file = match subsystem {
            Subsystem::Backlight if !device_name.starts_with("amdgpu_bl") => FILE_BRIGHTNESS,
            _ => FILE_BRIGHTNESS_AMD,
        };

        Self {
            subsystem,
            device_name: device_name.to_string(),
            name: format!("{subsystem}/{device_name}"),
            read_brightness_file: device_path.join(read_file),
            write_brightness_file: device_path.join(FILE_BRIGHTNESS_WRITE),
            max_brightness_file: device_path.join(FILE_MAX_BRIGHTNESS),
            use_logind,
        }
    }

    /// Read the device's `max_brightness`.
    pub async fn read_max(&self) -> Result<i64> {
        self.read_raw(&self.max_brightness_file).await
    }

    async fn read_raw(&self, device_file: &Path) -> Result<i64> {
        let contents = read_file(device_file)
            .await
            .unavailable(&self.name)?;
        contents.trim().parse::<i64>().unavailable(&self.name)
    }

    async fn set_brightness_logind(&self, brightness: u32) -> Result<()> {
        let dbus_conn = Connection::system().await?;
        let proxy = SessionProxy::new(&dbus_conn).await?;
        proxy
            .set_brightness(self.subsystem.as_str(), &self.device_name, brightness)
            .await?;
        Ok(())
    }

    async fn set_brightness_sysfs(&self, brightness: u32) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.write_brightness_file)
            .await
            .unavailable(&self.name)?;
        file.write_all(brightness.to_string().as_bytes())
            .await
            .unavailable(&self.name)
    }
}

impl ScalarAttribute for SysfsAttribute {
    type Value = i64;

    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> Result<i64> {
        let value = self.read_raw(&self.read_brightness_file).await?;
        debug!("{} = {}", self.name, value);
        Ok(value)
    }

    async fn write(&self, value: i64) -> Result<()> {
        let brightness = u32::try_from(value).unavailable(&self.name)?;
        debug!("{} <- {}", self.name, brightness);
        if self.use_logind {
            match self.set_brightness_logind(brightness).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    // Fall back to writing to sysfs brightness file
                    debug!("{e}");
                }
            }
        }
        self.set_brightness_sysfs(brightness).await
    }
}
