//! The ordered pipeline of fragment generators producing the script text.
//!
//! Each generator reads the frozen [`ScriptConfig`] and conditionally
//! registers lines on one of the two writers. The order in
//! [`Composer::compose`] is a contract, not a suggestion: later fragments
//! call functions emitted by earlier ones (the logging helpers must exist
//! before anything logs through them, the sourcing line must follow the
//! helpers it replaces), so generators cannot be reordered safely.

use crate::config::{ErrTrap, ExitTrap, ScriptConfig, Usage, Utils};
use crate::constants::COMMON_BASENAME;
use crate::writer::ScriptWriter;

/// The shebang matching the configured interpreter invocation style.
/// Also used by the finalizer when prepending a header to the utility file.
pub fn shebang_line(config: &ScriptConfig) -> &'static str {
    if config.use_env {
        "#! /usr/bin/env bash"
    } else {
        "#! /bin/bash"
    }
}

/// Request-scoped composition context: the frozen configuration plus the
/// two writers it drives. Shared helper fragments go to the utility writer
/// when one exists, and are embedded in the main script otherwise; a
/// fragment never splits itself across the two.
pub struct Composer<'a> {
    config: &'a ScriptConfig,
    main: ScriptWriter,
    utils: Option<ScriptWriter>,
}

impl<'a> Composer<'a> {
    /// `utils` must be Some exactly when the configuration externalizes
    /// utility functions.
    pub fn new(config: &'a ScriptConfig, main: ScriptWriter, utils: Option<ScriptWriter>) -> Self {
        Self { config, main, utils }
    }

    /// Runs every fragment generator once, in dependency order, and hands
    /// the populated writers back for finalization.
    pub fn compose(mut self) -> (ScriptWriter, Option<ScriptWriter>) {
        self.shebang();
        self.flags();
        self.basedir();
        self.constants();
        self.logging_utils();
        self.dry_run_utils();
        self.library_sourcing();
        self.trap_definitions();
        self.usage_function();
        self.parse_function();

        self.open_main();
        self.trap_activation();
        self.parse_invocation();
        self.placeholder_logic();
        self.close_main();

        (self.main, self.utils)
    }

    /// Writer receiving shared helper functions.
    fn shared(&mut self) -> &mut ScriptWriter {
        match self.utils.as_mut() {
            Some(writer) => writer,
            None => &mut self.main,
        }
    }

    fn shebang(&mut self) {
        self.main.push_line(shebang_line(self.config));
        self.main.blank();
    }

    fn flags(&mut self) {
        let mut flags = String::new();
        if self.config.set_e {
            flags.push('e');
        }
        if self.config.err_trap == ErrTrap::Inherited {
            flags.push('E');
        }
        if self.config.set_x {
            flags.push('x');
        }

        if !flags.is_empty() {
            self.main.push_line(&format!("set -{}", flags));
            self.main.blank();
        }
    }

    fn basedir(&mut self) {
        if self.config.greadlink {
            self.main.push_block(
                r#"if type greadlink &> /dev/null
then
    BASEDIR=$(dirname "$(greadlink -f -- "$0")")
else
    BASEDIR=$(dirname "$(readlink -f -- "$0")")
fi"#,
                false,
            );
        } else {
            self.main.push_line(r#"BASEDIR=$(dirname "$(readlink -f -- "$0")")"#);
        }
        self.main.push_line("# Adapt or remove the ROOTDIR definition depending");
        self.main.push_line("# on the depth of this script within the project.");
        self.main.push_line(r#"ROOTDIR=$(dirname "$BASEDIR")"#);
        self.main.push_line("readonly BASEDIR ROOTDIR");
        self.main.blank();
    }

    fn constants(&mut self) {
        if self.config.positionals {
            self.main.push_line("readonly DEFAULT_BAR=/the/default/bar");
            self.main.blank();
        }
    }

    fn logging_utils(&mut self) {
        if !self.config.logging_utils {
            return;
        }

        let dry = self.config.dry;
        let writer = self.shared();

        writer.push_block(
            r#"# For internal use via the logging functions below.
#
# $1    String added between the program name and the message,
#       typically to specify the log level.
# $2    Printf-style format string.
# $3…n  Arguments for printf.
_f_log() {
    local prog"#,
            false,
        );

        writer.indent(1);
        if dry {
            writer.push_line(r#"prog=$(basename "$0"):${DRY:+ [DRY RUN]}"#);
        } else {
            writer.push_line(r#"prog=$(basename "$0"):"#);
        }
        writer.unindent(1);

        writer.push_block(
            r#"    printf "%s %s${2}\n" "$prog" "$1" "${@:3}"
}

# $1    Printf-style format string.
# $2…n  Arguments for printf.
log() {
    _f_log '   INFO  ' "$@"
}

# $1    Printf-style format string.
# $2…n  Arguments for printf.
warn() {
    _f_log 'WARNING  ' "$@" >&2
}

# $1    Printf-style format string.
# $2…n  Arguments for printf.
err() {
    _f_log '  ERROR  ' "$@" >&2
}

# Print a command before running it.
# (This function takes care of running it).
#
# $@    The words making up the command to run.
log_and_run() {
    log 'Running: %s' "${*@Q}"
    "$@"
}
"#,
            false,
        );
        writer.blank();
    }

    fn dry_run_utils(&mut self) {
        if !self.config.dry {
            return;
        }

        let logging_command = if self.config.logging_utils {
            r#"log 'Would have run: %s' "${*@Q}""#
        } else {
            r#"printf '[DRY RUN] Would have run: %s\n' "${*@Q}""#
        };
        let writer = self.shared();

        writer.push_block(
            &format!(
                r#"# Returns with 0 status if and only if
# the dry run mode is currently activated.
is_dry_run() {{
    [[ $DRY ]]
}}

# Only run a command if dry run mode is not activated.
# In dry run mode, log the command instead to show what
# would have been run in a normal context.
#
# $@    The words making up the command to potentially run.
run_if_not_dry() {{
    if is_dry_run
    then
        {logging_command}
    else
        "$@"
    fi
}}
"#
            ),
            false,
        );
        writer.blank();
    }

    fn library_sourcing(&mut self) {
        if self.config.utils == Utils::Embedded {
            return;
        }

        let basename = self
            .utils
            .as_ref()
            .and_then(|writer| writer.destination().path())
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| COMMON_BASENAME.to_string());

        let mut instruction = format!(r#". "${{BASEDIR:?}}/{}""#, basename);
        if !self.config.set_e {
            instruction.push_str(" || exit");
        }
        self.main.push_line(&instruction);
        self.main.blank();
    }

    fn trap_definitions(&mut self) {
        if self.config.err_trap != ErrTrap::Off {
            self.main.push_block(
                r#"# Executed when a command fails, with the same exceptions as for “set -e”.
# See “trap” documentation in “man bash” for details.
err_trap() {"#,
                false,
            );
            self.main.indent(1);
            if self.config.logging_utils {
                self.main.push_line("err 'An error occurred.'");
            } else {
                self.main
                    .push_line(r#"printf '%s: An error occurred.\n' "$(basename "$0")" >&2"#);
            }
            self.main.unindent(1);
            self.main.push_line("}");
            self.main.blank();
        }

        let exit_body = match self.config.exit_trap {
            ExitTrap::Off => None,
            ExitTrap::Logging => Some(if self.config.logging_utils {
                "log 'Exiting.'"
            } else {
                r#"printf '%s: Exiting.\n' "$(basename "$0")""#
            }),
            ExitTrap::TempDir => Some(r#"rm -rf -- "$_temp_dir""#),
            ExitTrap::DeleteList => Some(r#"rm -rf -- "${_to_be_deleted[@]}""#),
        };
        if let Some(body) = exit_body {
            self.main.push_block(
                r#"# Executed upon exit, regardless of the cause.
exit_trap() {"#,
                false,
            );
            self.main.indent(1);
            self.main.push_line(body);
            self.main.unindent(1);
            self.main.push_line("}");
            self.main.blank();
        }
    }

    fn trap_activation(&mut self) {
        if self.config.err_trap != ErrTrap::Off {
            self.main.push_line("trap err_trap ERR");
            self.main.blank();
        }

        match self.config.exit_trap {
            ExitTrap::Off => {}
            ExitTrap::Logging => {
                self.main.push_line("trap exit_trap EXIT");
                self.main.blank();
            }
            ExitTrap::TempDir => {
                self.main.push_line("unset -v _temp_dir");
                self.main.push_line("trap exit_trap EXIT");
                if self.config.set_e {
                    self.main.push_line("_temp_dir=$(mktemp --directory)");
                } else {
                    self.main.push_line("_temp_dir=$(mktemp --directory) || exit");
                }
                self.main.blank();
            }
            ExitTrap::DeleteList => {
                self.main.push_line("unset -v _to_be_deleted");
                self.main.push_line("_to_be_deleted=()");
                self.main.push_line("trap exit_trap EXIT");
                if self.config.set_e {
                    self.main.push_line("_some_dir=$(mktemp --directory)");
                } else {
                    self.main.push_line("_some_dir=$(mktemp --directory) || exit");
                }
                self.main.push_line(r#"_to_be_deleted+=("$_some_dir")"#);
                self.main.blank();
            }
        }
    }

    fn usage_function(&mut self) {
        if self.config.usage == Usage::Off {
            return;
        }

        self.main.push_block(
            r#"print_help() {
    local prog
    prog=$(printf '%q' "$0")
    cat << _HELP_"#,
            false,
        );

        // The help blurb uses two-space steps inside the here-document.
        let initial_indent_size = self.main.indent_size();
        self.main.set_indent_size(2);

        self.main.blank();
        self.main.indent(1);
        self.main.push_line("Perform blah blah on a blah blah.");
        self.main.blank();
        self.main.push_line("Usage:");
        self.main.indent(1);
        if self.config.options {
            if self.config.positionals {
                self.main.push_line("${prog} [OPTIONS]... FOO [BAR]");
            } else {
                self.main.push_line("${prog} [OPTIONS]...");
            }
        } else if self.config.positionals {
            self.main.push_line("${prog} FOO [BAR]");
        } else {
            // Nothing to parse, so no function to call.
            self.main.push_line("<No arguments>");
        }
        self.main.unindent(1);
        self.main.blank();

        if self.config.positionals {
            self.main.push_line("Arguments:");
            self.main.indent(1);
            self.main.push_line("FOO     The foo to process.");
            self.main.push_line("BAR     (Optional) A bar in which to write the plop.");
            self.main.push_line("        This allows to blah blah.");
            self.main.push_line("        Default: “${DEFAULT_BAR}”");
            self.main.unindent(1);
            self.main.blank();
        }

        let options_section = self.config.usage == Usage::HelpOption || self.config.options;
        if options_section {
            self.main.push_line("Options:");
            self.main.indent(1);
        }
        if self.config.options {
            self.main.push_line("-y, --yo            Turn on yo mode.");
            self.main.push_line("-p, --plop PLOP     Use PLOP as the plop.");
            if self.config.dry {
                self.main.push_line("--dry               Turn dry mode on.");
            }
        }
        if self.config.usage == Usage::HelpOption {
            self.main.push_line("-h, --help          Print this message and exit.");
        }
        if options_section {
            self.main.unindent(1);
            self.main.blank();
        }

        self.main.push_line("Environment variables:");
        self.main.indent(1);
        self.main.push_line("GIT_USER    Username for requests to GitHub.");
        if self.config.dry {
            self.main.push_line("DRY         If not empty, turn dry mode on.");
            self.main.push_line("            “Important” commands will be skipped.");
        }
        self.main.unindent(2);

        self.main.push_block("\n_HELP_\n}\n", false);
        self.main.blank();

        self.main.set_indent_size(initial_indent_size);
    }

    fn parse_function(&mut self) {
        if self.config.options {
            if self.config.positionals {
                self.parse_function_options_and_positionals();
            } else {
                self.parse_function_options_only();
            }
        } else if self.config.positionals {
            self.parse_function_positionals_only();
        }
        // Nothing to parse, so no function to define.
    }

    fn parse_function_options_and_positionals(&mut self) {
        self.main.push_block(
            r#"# Fill up global “opt_*” and “arg_*” variables according to given
# options and positional parameters, and perform basic checks
# on the presence of mandatory info.
#
# $@    Arguments originally passed to the script itself.
parse_command() {"#,
            false,
        );
        self.main.indent(1);
        self.print_help_if_no_arg();
        self.main.push_block(
            r#"# Clear all option-related variables before parsing.
unset -v "${!opt_@}"

local param
local -a positionals=()
while (($# > 0))
do
    param=$1
    shift
    case $param in
        -y|--yo)
            opt_yo=1
            ;;

        -p|--plop)
            opt_plop=${1:?Missing argument for option: ${param}}
            shift
            ;;

"#,
            false,
        );

        self.dry_case_arm();
        self.help_case_arm();

        if self.config.usage != Usage::Off {
            self.main.push_block(
                r#"        -*)
            print_help >&2"#,
                true,
            );
        } else {
            self.main.push_block("        -*)", true);
        }

        self.main.indent(3);
        if self.config.logging_utils {
            self.main.push_line(r#"err 'Invalid option: %q' "$param""#);
        } else {
            self.main
                .push_line(r#"printf '%s: Error: Invalid option: %q\n' "$(basename "$0")" "$param" >&2"#);
        }
        self.main.unindent(4);

        self.main.push_block(
            r#"                exit 1
                ;;

            *)
                positionals+=("$param")
                ;;
        esac
    done

    set -- "${positionals[@]}"
    arg_foo=$1
    arg_bar=${2:-${DEFAULT_BAR}}

    if [[ -z $arg_foo ]]
    then"#,
            true,
        );
        self.main.indent(2);
        if self.config.usage != Usage::Off {
            self.main.push_line("print_help");
        }
        if self.config.logging_utils {
            self.main.push_line("err 'Missing mandatory parameter: foo'");
        } else {
            self.main
                .push_line(r#"printf '%s: Error: Missing mandatory parameter: foo\n' "$(basename "$0")""#);
        }
        self.main.push_line("exit 1");
        self.main.unindent(1);
        self.main.push_line("fi >&2");
        self.main.unindent(1);
        self.main.push_line("}");
        self.main.blank();
    }

    fn parse_function_options_only(&mut self) {
        self.main.push_block(
            r#"# Fill up global “opt_*” variables according to given options
# and perform basic checks on the presence of mandatory info.
#
# $@    Arguments originally passed to the script itself.
parse_command() {"#,
            false,
        );
        self.main.indent(1);
        self.print_help_if_no_arg();
        self.main.push_block(
            r#"# Clear all option-related variables before parsing.
unset -v "${!opt_@}"

local param
while (($# > 0))
do
    param=$1
    shift
    case $param in
        -y|--yo)
            opt_yo=1
            ;;

        -p|--plop)
            opt_plop=${1:?Missing argument for option: ${param}}
            shift
            ;;

"#,
            false,
        );

        self.dry_case_arm();
        self.help_case_arm();

        // Under option-only parsing any leftover token is an error.
        if self.config.usage != Usage::Off {
            self.main.push_block(
                r#"        *)
            print_help >&2"#,
                true,
            );
        } else {
            self.main.push_block("        *)", true);
        }

        self.main.indent(3);
        if self.config.logging_utils {
            self.main.push_line(r#"err 'Invalid option or extra parameter: %q' "$param""#);
        } else {
            self.main.push_line(
                r#"printf '%s: Error: Invalid option or extra parameter: %q\n' "$(basename "$0")" "$param" >&2"#,
            );
        }
        self.main.unindent(4);
        self.main.push_block(
            r#"                    exit 1
                    ;;
            esac
        done
    }"#,
            false,
        );
    }

    fn parse_function_positionals_only(&mut self) {
        self.main.push_block(
            r#"# Fill up global “arg_*” variables according to given arguments
# and perform basic checks on the presence of mandatory info.
#
# $@    Arguments originally passed to the script itself.
parse_command() {"#,
            false,
        );
        self.main.indent(1);
        self.help_scan_without_option_parsing(true);
        self.main.push_block(
            r#"arg_foo=$1
arg_bar=${2:-${DEFAULT_BAR}}

if [[ -z $arg_foo ]]
then"#,
            false,
        );
        self.main.indent(1);
        if self.config.usage != Usage::Off {
            self.main.push_line("print_help");
        }
        if self.config.logging_utils {
            self.main.push_line("err 'Missing mandatory parameter: foo'");
        } else {
            self.main.push_line(
                r#"printf '%s: Error: Missing mandatory parameter: foo\n' "$(basename "$0")" >&2"#,
            );
        }
        self.main.push_line("exit 1");
        self.main.unindent(1);
        self.main.push_line("fi >&2");
        self.main.unindent(1);
        self.main.push_line("}");
        self.main.blank();
    }

    /// Case arm turning the dry-run mode on, aligned on the arms of the
    /// surrounding `case` statement.
    fn dry_case_arm(&mut self) {
        if self.config.dry {
            self.main.push_block(
                r#"        --dry)
            DRY=1
            ;;

"#,
                true,
            );
        }
    }

    /// Case arm handling `-h` / `--help` when help is wired to options.
    fn help_case_arm(&mut self) {
        if self.config.usage == Usage::HelpOption {
            self.main.push_block(
                r#"        -h|--help)
            print_help
            exit 0
            ;;

"#,
                true,
            );
        }
    }

    fn print_help_if_no_arg(&mut self) {
        if self.config.usage == Usage::OnEmptyArgs {
            self.main.push_block(
                r#"if (($# == 0))
then
    print_help
    exit 1
fi"#,
                false,
            );
            self.main.blank();
        }
    }

    /// Help detection for shapes without a `case` statement: a pre-scan
    /// over all arguments matching `-h` or any letter-case variant of the
    /// long help spellings.
    fn help_scan_without_option_parsing(&mut self, with_local_vars: bool) {
        if self.config.usage == Usage::HelpOption {
            if with_local_vars {
                self.main.push_line("local arg");
            }
            self.main.push_block(
                r#"for arg
do
    if [[ ${arg,,} = @(-h|+(-)help) ]]
    then
        print_help
        exit 0
    fi
done"#,
                false,
            );
            self.main.blank();
        }
        self.print_help_if_no_arg();
    }

    fn log_option_values(&mut self) {
        if self.config.logging_utils {
            self.main.push_line(r#"log 'Yo: %q; Plop: %q' "$opt_yo" "$opt_plop""#);
        } else {
            self.main.push_line(r#"printf '%s: Yo: %q; Plop: %q\n' \"#);
            self.main.indent(2);
            self.main.push_line(r#""$(basename "$0")" "$opt_yo" "$opt_plop""#);
            self.main.unindent(2);
        }
    }

    fn log_parameter_values(&mut self) {
        if self.config.logging_utils {
            self.main.push_line(r#"log 'Foo: %q; Bar: %q' "$arg_foo" "$arg_bar""#);
        } else {
            self.main.push_line(r#"printf '%s: Foo: %q; Bar: %q\n' \"#);
            self.main.indent(2);
            self.main.push_line(r#""$(basename "$0")" "$arg_foo" "$arg_bar""#);
            self.main.unindent(2);
        }
    }

    fn parse_invocation(&mut self) {
        let call = r#"parse_command "$@""#;
        if self.config.options {
            self.main.push_line(call);
            self.main.blank();
            self.log_option_values();
            if self.config.positionals {
                self.log_parameter_values();
            }
            self.main.blank();
        } else if self.config.positionals {
            self.main.push_line(call);
            self.log_parameter_values();
            self.main.blank();
        } else {
            // Nothing to parse, so no function to call.
            // We may need to handle help requests, though.
            self.help_scan_without_option_parsing(self.config.main);
        }
    }

    fn open_main(&mut self) {
        if self.config.main {
            self.main.push_line("main() {");
            self.main.indent(1);
        } else {
            self.main.push_line("# ================================");
            self.main.blank();
        }
    }

    fn close_main(&mut self) {
        if self.config.main {
            self.main.push_line("return 0");
            self.main.unindent(1);
            self.main.push_block("}\n\nmain \"$@\"", false);
        } else {
            self.main.blank();
            self.main.push_line("exit 0");
        }
    }

    fn placeholder_logic(&mut self) {
        let prefix = if self.config.dry { "run_if_not_dry " } else { "" };
        if self.config.logging_utils {
            self.main.push_line(&format!("{}log 'TODO'", prefix));
        } else {
            self.main.push_line(&format!("{}echo 'TODO'", prefix));
        }
    }
}
