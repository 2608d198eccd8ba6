use std::path::PathBuf;

use funkeys::{FunkeysBuilder, FunkeysError, LedKind, MuteState};

use clap::{Parser, Subcommand, ValueEnum};

/// Step backlight, keyboard backlight, LEDs and volume from function keys
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to use instead of `funkeys/config.toml` in the config dir
    #[arg(long, value_name = "path", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Screen backlight, stepped on a logarithmic scale
    Backlight {
        #[command(subcommand)]
        change: Change,
    },
    /// Advance the keyboard backlight
    Keyboard,
    /// Toggle an indicator LED
    Led {
        #[arg(value_enum)]
        led: LedArg,
    },
    /// Volume of the default audio sink
    Volume {
        #[command(subcommand)]
        change: Change,
    },
    /// Mute, or restore the volume given by `--restore`
    Mute {
        /// Volume to restore when currently muted
        #[arg(long, value_name = "volume")]
        restore: Option<f64>,
    },
}

#[derive(Subcommand, Debug)]
enum Change {
    /// Print the current value
    Get,
    /// Increase by the given number of steps
    Up {
        #[arg(default_value_t = 1)]
        steps: u32,
    },
    /// Decrease by the given number of steps
    Down {
        #[arg(default_value_t = 1)]
        steps: u32,
    },
}

impl Change {
    fn delta(&self) -> Option<i64> {
        match self {
            Change::Get => None,
            Change::Up { steps } => Some(i64::from(*steps)),
            Change::Down { steps } => Some(-i64::from(*steps)),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LedArg {
    Mute,
    Micmute,
    Capslock,
}

impl From<LedArg> for LedKind {
    fn from(led: LedArg) -> Self {
        match led {
            LedArg::Mute => LedKind::Mute,
            LedArg::Micmute => LedKind::MicMute,
            LedArg::Capslock => LedKind::CapsLock,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), FunkeysError> {
    env_logger::init();
    let args = Args::parse();
    log::debug!("{:?}", args);

    let mut builder = FunkeysBuilder::new();
    if let Some(path) = args.config.as_deref() {
        builder = builder.with_config_path(path);
    }
    let funkeys = builder.build().await?;

    match args.action {
        Action::Backlight { change } => match change.delta() {
            Some(delta) => println!("{}", funkeys.backlight_step(delta).await?),
            None => {
                let (value, step) = funkeys.backlight().await?;
                println!("{value} (step {step}/{})", funkeys.config().backlight.steps);
            }
        },
        Action::Keyboard => println!("{}", funkeys.keyboard_step().await?),
        Action::Led { led } => println!("{}", funkeys.led_toggle(led.into()).await?),
        Action::Volume { change } => match change.delta() {
            Some(delta) => println!("{:.2}", funkeys.volume_step(delta).await?),
            None => println!("{:.2}", funkeys.volume().await?),
        },
        Action::Mute { restore } => {
            let state = restore
                .map(|previous| MuteState { previous })
                .unwrap_or_default();
            let state = funkeys.toggle_mute(state).await?;
            // feed this back through `--restore` to unmute to the same level
            println!("{:.2}", state.previous);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn parses_steps_and_direction() {
        let args = Args::try_parse_from(["funkeys", "backlight", "down", "3"]).unwrap();
        match args.action {
            Action::Backlight { change } => assert_eq!(change.delta(), Some(-3)),
            other => panic!("unexpected {other:?}"),
        }

        let args = Args::try_parse_from(["funkeys", "volume", "up"]).unwrap();
        match args.action {
            Action::Volume { change } => assert_eq!(change.delta(), Some(1)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn step_counts_are_non_negative() {
        assert!(Args::try_parse_from(["funkeys", "backlight", "down", "--", "-5"]).is_err());
        assert!(
            Args::try_parse_from(["funkeys", "volume", "up", "--", "-9223372036854775808"])
                .is_err()
        );

        let args = Args::try_parse_from(["funkeys", "backlight", "down", "4294967295"]).unwrap();
        match args.action {
            Action::Backlight { change } => assert_eq!(change.delta(), Some(-4294967295)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_led_names_and_config() {
        let args =
            Args::try_parse_from(["funkeys", "led", "micmute", "--config", "/tmp/f.toml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/f.toml")));
        assert!(matches!(
            args.action,
            Action::Led {
                led: LedArg::Micmute
            }
        ));
        assert!(Args::try_parse_from(["funkeys", "led", "numlock"]).is_err());
    }
}
