//! bashplate's main application entry point and orchestration logic.
//! Handles command-line argument parsing and coordinates the question
//! flow, fragment composition and artifact finalization.

use bashplate::{
    cli::{get_args, Args},
    config::{dump_config, load_config, ScriptConfig, Utils},
    error::{default_error_handler, Result},
    fragments::Composer,
    logger::init_logger,
    output::{finalize, resolve_utils_destination},
    prompt::TermPrompter,
    questions::{ask_questions, Level},
    writer::{Destination, ScriptWriter},
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Acquires the configuration: hardcoded defaults, or a loaded snapshot
/// 2. Runs the level-gated question flow against the terminal
/// 3. Composes the script fragments into the writers
/// 4. Finalizes both artifacts and optionally dumps the configuration
fn run(args: Args) -> Result<()> {
    // A forced configuration is authoritative: no questions asked.
    let level = if args.load_config.is_some() { Level::Batch } else { args.level };
    let seed = args.load_config.as_deref().or(args.base_config.as_deref());

    let mut config = match seed {
        Some(source) => load_config(source)?,
        None => ScriptConfig::default(),
    };

    let prompter = TermPrompter::new();
    ask_questions(level, &mut config, &prompter, args.output.is_some())?;
    // Frozen from here on.
    let config = config;

    let main_destination = match args.output {
        Some(path) => Destination::File(path),
        None => Destination::Stdout,
    };
    let main_writer = ScriptWriter::new(args.indent_size, main_destination);

    let utils_writer = match config.utils {
        Utils::Embedded => None,
        externalized => Some(ScriptWriter::new(
            args.indent_size,
            resolve_utils_destination(externalized, main_writer.destination()),
        )),
    };

    let (main_writer, utils_writer) = Composer::new(&config, main_writer, utils_writer).compose();
    finalize(&config, main_writer, utils_writer)?;

    if let Some(target) = &args.dump_config {
        dump_config(&config, target, args.indent_size)?;
    }
    Ok(())
}
