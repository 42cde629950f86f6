//! Command-line interface implementation for bashplate.
//! Provides argument parsing and help text using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::questions::Level;

/// Command-line arguments structure for bashplate.
#[derive(Parser, Debug)]
#[command(author, version, about = "Provide a starting point for Bash scripts.", long_about = None)]
pub struct Args {
    /// Number of spaces used to indent the generated script template
    #[arg(short, long, default_value_t = 4, value_name = "WIDTH")]
    pub indent_size: usize,

    /// Print the script template to a file instead of standard output
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Level of details of the questions that the program will ask.
    /// Use "batch" for non-interactive generation; the first letter of a
    /// level name works as an alias
    #[arg(short, long, value_enum, default_value_t = Level::Default)]
    pub level: Level,

    /// Load a configuration JSON file previously generated via
    /// "-d" / "--dump-config", and skip all questions. JSON can also
    /// directly be given here as a string instead of a file path
    #[arg(short = 'c', long, value_name = "PATH_OR_JSON", conflicts_with = "base_config")]
    pub load_config: Option<String>,

    /// Load a configuration JSON file previously generated via
    /// "-d" / "--dump-config", use it as a base to set default values,
    /// and still ask questions as usual afterward. JSON can also
    /// directly be given here as a string instead of a file path
    #[arg(short, long, value_name = "PATH_OR_JSON")]
    pub base_config: Option<String>,

    /// Print or save, as JSON data, the configuration resulting from the
    /// given answers, for later use or debugging purposes. Give "-" as
    /// the path to print the data to the standard output
    #[arg(short, long, value_name = "PATH")]
    pub dump_config: Option<String>,
}

/// Parses command line arguments and returns the Args structure.
pub fn get_args() -> Args {
    Args::parse()
}
