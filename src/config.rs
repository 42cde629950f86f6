//! The script-generation configuration model and its JSON persistence.
//! A `ScriptConfig` fully describes one generation run; it is mutated by the
//! question flow and frozen before composition starts.

use std::fs;

use serde::{Deserialize, Serialize};

use crate::constants::STDOUT_PLACEHOLDER;
use crate::error::{Error, Result};

/// Error (ERR) trap choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ErrTrap {
    /// No ERR trap at all.
    Off,
    /// Trap active at the root level only.
    RootOnly,
    /// Trap inherited by functions and subshells (`set -E`).
    Inherited,
}

/// Exit (EXIT) trap choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ExitTrap {
    /// No EXIT trap at all.
    Off,
    /// Trap that only logs the exit.
    Logging,
    /// Trap that removes a temporary directory.
    TempDir,
    /// Trap that removes a dynamic list of files or directories.
    DeleteList,
}

/// `print_help` generation choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Usage {
    /// No help text.
    Off,
    /// Help function tied to `-h` and `--help`.
    HelpOption,
    /// Help function, also shown when no argument is given.
    OnEmptyArgs,
    /// Help function defined but left for the author to wire.
    Standalone,
}

/// Where utility functions are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Utils {
    /// Within the generated script itself.
    Embedded,
    /// In a separate file, overwritten if it already exists.
    Overwrite,
    /// In a separate file, with a numeric suffix on name collision.
    Suffixed,
}

macro_rules! int_coded {
    ($name:ident, $range:literal { $($value:literal => $variant:ident),+ $(,)? }) => {
        impl TryFrom<u8> for $name {
            type Error = String;

            fn try_from(value: u8) -> std::result::Result<Self, String> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    other => Err(format!(
                        concat!("invalid ", stringify!($name), " code: {} (valid codes: ", $range, ")"),
                        other,
                    )),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                match value {
                    $($name::$variant => $value,)+
                }
            }
        }
    };
}

int_coded!(ErrTrap, "0-2" { 0 => Off, 1 => RootOnly, 2 => Inherited });
int_coded!(ExitTrap, "0-3" { 0 => Off, 1 => Logging, 2 => TempDir, 3 => DeleteList });
int_coded!(Usage, "0-3" { 0 => Off, 1 => HelpOption, 2 => OnEmptyArgs, 3 => Standalone });
int_coded!(Utils, "0-2" { 0 => Embedded, 1 => Overwrite, 2 => Suffixed });

/// Details of what to include or not within the generated file, and how.
///
/// Every field is independently meaningful; there is no forbidden
/// combination, though some combinations suppress whole fragments
/// (no options and no positionals means no argument parsing at all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Shebang with env or direct Bash path.
    pub use_env: bool,
    /// Whether to include the Mac compatibility trick for BASEDIR.
    pub greadlink: bool,
    /// Include a set of logging functions.
    pub logging_utils: bool,
    /// Use `set -e`.
    pub set_e: bool,
    /// Use `set -x`.
    pub set_x: bool,
    /// Set up an error trap.
    pub err_trap: ErrTrap,
    /// Set up an exit trap.
    pub exit_trap: ExitTrap,
    /// Use a `main` function.
    pub main: bool,
    /// Support options.
    pub options: bool,
    /// Support positional arguments.
    pub positionals: bool,
    /// Generate a `print_help` function.
    pub usage: Usage,
    /// Implement a dry-run mode.
    pub dry: bool,
    /// Where to store utility functions.
    pub utils: Utils,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            use_env: true,
            greadlink: false,
            logging_utils: true,
            set_e: false,
            set_x: false,
            err_trap: ErrTrap::Off,
            exit_trap: ExitTrap::Off,
            main: false,
            options: true,
            positionals: true,
            usage: Usage::HelpOption,
            dry: false,
            utils: Utils::Embedded,
        }
    }
}

/// Field names accepted in a serialized configuration, in declaration order.
pub const FIELD_NAMES: [&str; 13] = [
    "use_env",
    "greadlink",
    "logging_utils",
    "set_e",
    "set_x",
    "err_trap",
    "exit_trap",
    "main",
    "options",
    "positionals",
    "usage",
    "dry",
    "utils",
];

/// Loads a script-generating configuration.
///
/// # Arguments
/// * `source` - Path to a JSON file, or raw JSON given directly as a string
///   (detected by a leading `{`).
///
/// # Errors
/// * `Error::ConfigError` if the object contains keys that do not map to a
///   configuration field; the message lists every offending key and
///   enumerates the valid field names.
/// * `Error::JsonError` if the data is not a JSON object or a value has the
///   wrong type or an out-of-range code.
pub fn load_config(source: &str) -> Result<ScriptConfig> {
    let raw = if source.trim_start().starts_with('{') {
        log::info!("Parsing the given configuration string... ({} characters)", source.len());
        source.to_string()
    } else {
        log::info!("Loading generator configuration from \"{}\"...", source);
        fs::read_to_string(source)?
    };

    let data: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw)?;

    let unknown: Vec<&str> = data
        .keys()
        .map(String::as_str)
        .filter(|key| !FIELD_NAMES.contains(key))
        .collect();
    if !unknown.is_empty() {
        return Err(Error::ConfigError(format!(
            "unknown keys: {}. Valid keys are: {}",
            unknown.join(", "),
            FIELD_NAMES.join(", "),
        )));
    }

    let config = serde_json::from_value(serde_json::Value::Object(data))?;
    log::info!("Done.");
    Ok(config)
}

/// Serializes a configuration with the given indentation width.
/// Key order follows the field declaration order and is stable across runs.
pub fn config_to_json(config: &ScriptConfig, indent_size: usize) -> Result<String> {
    let indent = " ".repeat(indent_size);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    config.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(|e| Error::ConfigError(e.to_string()))
}

/// Prints or saves the configuration resulting from the given answers,
/// for later use or debugging purposes.
///
/// A blank target means no dump was requested. The stdout placeholder
/// prints the JSON framed by visible banners; any other target is treated
/// as a file path and overwritten.
pub fn dump_config(config: &ScriptConfig, target: &str, indent_size: usize) -> Result<()> {
    if target.trim().is_empty() {
        return Ok(());
    }

    let json = config_to_json(config, indent_size)?;

    if target == STDOUT_PLACEHOLDER {
        println!();
        println!("==== [ ↓ CONFIG START ↓ ] ====");
        println!("{}", json);
        println!("==== [ ↑  CONFIG END  ↑ ] ====");
    } else {
        log::info!("Printing generator configuration to \"{}\"...", target);
        fs::write(target, format!("{}\n", json))?;
        log::info!("Done.");
    }
    Ok(())
}
