//! Output finalization: merging each writer's buffer and committing it to
//! its destination, plus utility-file path resolution.

use std::fs;
use std::path::Path;

use crate::config::{ScriptConfig, Utils};
use crate::constants::{COMMON_BASENAME, COMMON_EXTENSION, COMMON_STEM};
use crate::error::Result;
use crate::fragments::shebang_line;
use crate::writer::{Destination, ScriptWriter};

/// Determines a suitable destination for the utility functions. Only
/// meaningful when utilities are externalized.
///
/// When the script template goes to standard output there is no use
/// fiddling with files for the utility functions anyway; they stay on
/// standard output and are printed as a separate blurb after the script.
/// Otherwise the candidate is the common basename in the script's
/// directory, used unconditionally when overwriting was requested, and
/// probed for `-2`, `-3`, ... suffixed alternatives on collision when not.
pub fn resolve_utils_destination(utils: Utils, main_destination: &Destination) -> Destination {
    let path = match main_destination.path() {
        None => return Destination::Stdout,
        Some(path) => path,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let candidate = dir.join(COMMON_BASENAME);
    if utils == Utils::Overwrite || !candidate.exists() {
        return Destination::File(candidate);
    }

    // Look for an alternate name for the file.
    let mut n = 2;
    loop {
        let alternate = dir.join(format!("{}-{}{}", COMMON_STEM, n, COMMON_EXTENSION));
        if !alternate.exists() {
            return Destination::File(alternate);
        }
        n += 1;
    }
}

/// Generates the final output file, or files if the utilities are
/// separate.
///
/// The utility artifact is only emitted if utilities were externalized
/// and something of interest accumulated in the buffer; the shebang goes
/// in at the last moment, otherwise it would make every buffer look
/// non-empty.
pub fn finalize(
    config: &ScriptConfig,
    main: ScriptWriter,
    utils: Option<ScriptWriter>,
) -> Result<()> {
    write_artifact(&main, "script template", true)?;

    if config.utils != Utils::Embedded {
        if let Some(mut utils) = utils {
            if !utils.is_empty() {
                utils.prepend(&[shebang_line(config), ""]);
                utils.trim_trailing_blanks();
                write_artifact(&utils, "utils", false)?;
            }
        }
    }
    Ok(())
}

/// Commits one writer's merged content to its destination: an overwriting
/// file write with a trailing newline, or a banner-framed print to the
/// terminal.
fn write_artifact(writer: &ScriptWriter, label: &str, executable: bool) -> Result<()> {
    let text = writer.render();
    match writer.destination() {
        Destination::File(path) => {
            log::info!("Printing {} to \"{}\"...", label, path.display());
            fs::write(path, format!("{}\n", text))?;

            if executable {
                // Ensure the user can execute the script.
                if let Err(err) = make_executable(path) {
                    log::warn!(
                        "Failed to ensure \"{}\" is executable: {}",
                        path.display(),
                        err,
                    );
                }
            }
            log::info!("Done.");
        }
        Destination::Stdout => {
            let banner = label.to_uppercase();
            println!();
            println!("==== [ ↓ {} START ↓ ] ====", banner);
            println!("{}", text);
            println!("==== [ ↑  {} END  ↑ ] ====", banner);
        }
    }
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o100);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
