//! The level-gated question flow that fills in a [`ScriptConfig`].
//!
//! Questions are grouped, each group tagged with the minimum level of
//! details that enables it; a run executes every group whose tag is at or
//! below the requested level, in fixed group order. Every answer defaults
//! to the configuration's current value, so a loaded base configuration
//! seeds the defaults transparently.

use clap::ValueEnum;

use crate::config::{ErrTrap, ExitTrap, ScriptConfig, Usage, Utils};
use crate::constants::COMMON_BASENAME;
use crate::error::{Error, Result};
use crate::prompt::Prompter;

/// How much the user wants to be bothered (or not) with questions.
/// Levels are cumulative: each one runs all lower levels' questions first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Level {
    /// No questions asked; suitable for non-interactive or scripted
    /// execution.
    #[value(alias = "b")]
    Batch,
    /// Only essential questions are asked, using sensible defaults for
    /// others.
    #[value(alias = "d")]
    Default,
    /// More questions are asked, allowing for finer control over common
    /// advanced settings.
    #[value(alias = "a")]
    Advanced,
    /// All possible questions are asked, providing maximum control over
    /// every detail.
    #[value(alias = "f")]
    Full,
}

type QuestionGroup = fn(&mut ScriptConfig, &dyn Prompter, bool) -> Result<()>;

/// The question groups with their minimum enabling level. The order is a
/// contract: groups always run in this sequence.
const QUESTION_GROUPS: [(Level, QuestionGroup); 3] = [
    (Level::Default, essential_questions),
    (Level::Advanced, advanced_questions),
    (Level::Full, full_questions),
];

/// Runs the question flow for the requested level of details, mutating
/// `config` in place. `file_output` tells whether the script template
/// targets a real file, which changes how the utility-storage question is
/// worded.
pub fn ask_questions(
    level: Level,
    config: &mut ScriptConfig,
    prompter: &dyn Prompter,
    file_output: bool,
) -> Result<()> {
    for (minimum, group) in QUESTION_GROUPS {
        if level >= minimum {
            group(config, prompter, file_output)?;
        }
    }
    Ok(())
}

/// Questions that are always asked, unless pure batch mode was selected.
fn essential_questions(
    config: &mut ScriptConfig,
    prompter: &dyn Prompter,
    file_output: bool,
) -> Result<()> {
    config.logging_utils =
        prompter.ask_yes_no("Add logging utils?", Some(config.logging_utils))?;
    config.options = prompter.ask_yes_no("Support options?", Some(config.options))?;
    config.positionals =
        prompter.ask_yes_no("Support positional parameters?", Some(config.positionals))?;

    let usage = prompter.ask_choice(
        "Generate a \"print_help\" function?",
        &[
            "No",
            "Yes, tied to \"-h\" and \"--help\" options",
            "Yes, and call it if no argument is given",
            "Yes, but let me call it the way I want later",
        ],
        Some(u8::from(config.usage) as usize),
    )?;
    config.usage = Usage::try_from(usage as u8).map_err(Error::ConfigError)?;

    if file_output {
        let overwrite = format!(
            "Within a \"{}\" file alongside the script (overwrite if it exists)",
            COMMON_BASENAME,
        );
        let suffixed = format!(
            "Within a \"{}\" file alongside the script (add suffix if it exists)",
            COMMON_BASENAME,
        );
        let utils = prompter.ask_choice(
            "Where should utility functions be stored?",
            &["Within the script itself", &overwrite, &suffixed],
            Some(u8::from(config.utils) as usize),
        )?;
        config.utils = Utils::try_from(utils as u8).map_err(Error::ConfigError)?;
    } else {
        // Simplify the question somewhat because we're not creating files
        // anyway.
        let embed = prompter.ask_yes_no(
            "Should utility functions be stored in the script itself? (vs. separately)",
            Some(config.utils == Utils::Embedded),
        )?;
        config.utils = if embed { Utils::Embedded } else { Utils::Overwrite };
    }
    Ok(())
}

/// Questions that are only asked if advanced or full mode were selected.
fn advanced_questions(
    config: &mut ScriptConfig,
    prompter: &dyn Prompter,
    _file_output: bool,
) -> Result<()> {
    config.set_e = prompter.ask_yes_no(
        "Add \"set -e\"? WARNING: Make sure to read \
         https://github.com/yseop/codequality/blob/master/bash/README.adoc#set_e_etc \
         before activating this.",
        Some(config.set_e),
    )?;
    config.set_x = prompter
        .ask_yes_no("Add \"set -x\"? (Log executed commands to stderr.)", Some(config.set_x))?;

    let err_trap = prompter.ask_choice(
        "Add an error (ERR) trap? NB: Can be hard to master.",
        &[
            "No",
            "Yes, root level only",
            "Yes, inherited by functions, subshells, etc. (\"set -E\")",
        ],
        Some(u8::from(config.err_trap) as usize),
    )?;
    config.err_trap = ErrTrap::try_from(err_trap as u8).map_err(Error::ConfigError)?;

    let exit_trap = prompter.ask_choice(
        "Add an exit trap? (Typically for cleanup or logging purposes.)",
        &[
            "No",
            "Yes, logging only",
            "Yes, with a temporary directory",
            "Yes, with a dynamic list of files or directories to delete",
        ],
        Some(u8::from(config.exit_trap) as usize),
    )?;
    config.exit_trap = ExitTrap::try_from(exit_trap as u8).map_err(Error::ConfigError)?;

    config.dry = prompter.ask_yes_no("Implement a \"dry run\" mode?", Some(config.dry))?;
    Ok(())
}

/// The most technical questions or niche features, only asked if the user
/// really wanted them to be.
fn full_questions(
    config: &mut ScriptConfig,
    prompter: &dyn Prompter,
    _file_output: bool,
) -> Result<()> {
    config.use_env = prompter.ask_yes_no("Use env-based shebang?", Some(config.use_env))?;
    config.greadlink =
        prompter.ask_yes_no("Support MacOS' \"greadlink\"?", Some(config.greadlink))?;
    config.main = prompter.ask_yes_no(
        "Use a \"main\" function? NB: Its local variables are still visible \
         from within subfunctions, so main functions are of debatable usefulness.",
        Some(config.main),
    )?;
    Ok(())
}
