use std::path::PathBuf;

use bashplate::config::{ErrTrap, ExitTrap, ScriptConfig, Usage, Utils};
use bashplate::fragments::Composer;
use bashplate::writer::{Destination, ScriptWriter};

fn compose(config: &ScriptConfig, indent_size: usize) -> (ScriptWriter, Option<ScriptWriter>) {
    let main = ScriptWriter::new(indent_size, Destination::Stdout);
    let utils = match config.utils {
        Utils::Embedded => None,
        _ => Some(ScriptWriter::new(indent_size, Destination::Stdout)),
    };
    Composer::new(config, main, utils).compose()
}

fn script(config: &ScriptConfig) -> String {
    compose(config, 4).0.render()
}

#[test]
fn test_composition_is_deterministic() {
    let config = ScriptConfig {
        greadlink: true,
        set_e: true,
        set_x: true,
        err_trap: ErrTrap::Inherited,
        exit_trap: ExitTrap::DeleteList,
        main: true,
        usage: Usage::OnEmptyArgs,
        dry: true,
        utils: Utils::Overwrite,
        ..ScriptConfig::default()
    };

    let (first_main, first_utils) = compose(&config, 4);
    let (second_main, second_utils) = compose(&config, 4);
    assert_eq!(first_main.render(), second_main.render());
    assert_eq!(first_utils.unwrap().render(), second_utils.unwrap().render());
}

#[test]
fn test_default_batch_artifact_shape() {
    let text = script(&ScriptConfig::default());

    assert!(text.starts_with("#! /usr/bin/env bash\n\n"));
    assert!(text.contains(r#"BASEDIR=$(dirname "$(readlink -f -- "$0")")"#));
    // Logging helpers are embedded by default.
    assert!(text.contains("_f_log() {\n    local prog"));
    assert!(text.contains(r#"log() {
    _f_log '   INFO  ' "$@"
}"#));
    // Argument parsing handles both flags and positionals.
    assert!(text.contains("parse_command() {"));
    assert!(text.contains("            -y|--yo)"));
    assert!(text.contains(r#"positionals+=("$param")"#));
    assert!(text.contains("arg_foo=$1"));
    // No entry-point wrapper by default: an explicit zero-status exit.
    assert!(!text.contains("main() {"));
    assert!(text.contains("# ================================"));
    assert!(text.ends_with("\nexit 0"));
}

#[test]
fn test_direct_bash_shebang() {
    let config = ScriptConfig { use_env: false, ..ScriptConfig::default() };
    assert!(script(&config).starts_with("#! /bin/bash\n"));
}

#[test]
fn test_flags_line_collects_active_flags() {
    let config = ScriptConfig {
        set_e: true,
        set_x: true,
        err_trap: ErrTrap::Inherited,
        ..ScriptConfig::default()
    };
    assert!(script(&config).contains("\nset -eEx\n"));

    let config = ScriptConfig { set_e: true, err_trap: ErrTrap::RootOnly, ..ScriptConfig::default() };
    let text = script(&config);
    // A root-only trap does not contribute the inheritance flag.
    assert!(text.contains("\nset -e\n"));
    assert!(text.contains("err_trap() {"));
    assert!(text.contains("trap err_trap ERR"));
}

#[test]
fn test_greadlink_fallback_block() {
    let config = ScriptConfig { greadlink: true, ..ScriptConfig::default() };
    let text = script(&config);
    assert!(text.contains("if type greadlink &> /dev/null"));
    assert!(text.contains(r#"    BASEDIR=$(dirname "$(greadlink -f -- "$0")")"#));
}

#[test]
fn test_options_only_shape_has_no_positional_assignments() {
    let config = ScriptConfig { positionals: false, ..ScriptConfig::default() };
    let text = script(&config);

    assert!(text.contains("case $param in"));
    assert!(text.contains("Invalid option or extra parameter"));
    assert!(!text.contains("positionals+="));
    assert!(!text.contains("arg_foo=$1"));
    assert!(!text.contains("readonly DEFAULT_BAR"));
    // Usage line narrows down accordingly.
    assert!(text.contains("${prog} [OPTIONS]..."));
    assert!(!text.contains("${prog} [OPTIONS]... FOO [BAR]"));
}

#[test]
fn test_positionals_only_shape_has_no_flag_case_statement() {
    let config = ScriptConfig { options: false, ..ScriptConfig::default() };
    let text = script(&config);

    assert!(!text.contains("case $param in"));
    assert!(text.contains("arg_foo=$1"));
    assert!(text.contains("arg_bar=${2:-${DEFAULT_BAR}}"));
    // Help is detected by a pre-scan over all arguments instead of a case
    // arm.
    assert!(text.contains("local arg"));
    assert!(text.contains("if [[ ${arg,,} = @(-h|+(-)help) ]]"));
    assert!(!text.contains("-h|--help)"));
}

#[test]
fn test_no_arguments_means_no_parse_fragment() {
    let config =
        ScriptConfig { options: false, positionals: false, ..ScriptConfig::default() };
    let text = script(&config);

    assert!(!text.contains("parse_command"));
    // The help request pre-scan still runs in the body.
    assert!(text.contains("for arg"));
    assert!(text.contains("<No arguments>"));
}

#[test]
fn test_usage_off_emits_no_help_function() {
    let config = ScriptConfig { usage: Usage::Off, ..ScriptConfig::default() };
    let text = script(&config);
    assert!(!text.contains("print_help"));
    assert!(!text.contains("_HELP_"));
}

#[test]
fn test_usage_standalone_defines_help_but_wires_nothing() {
    let config = ScriptConfig { usage: Usage::Standalone, ..ScriptConfig::default() };
    let text = script(&config);

    assert!(text.contains("print_help() {"));
    // Not wired to an option, nor shown on an empty command line; the only
    // remaining caller is the invalid-option error path.
    assert!(!text.contains("-h|--help)"));
    assert!(!text.contains("-h, --help"));
    assert!(!text.contains("if (($# == 0))"));
    assert!(text.contains("print_help >&2"));
}

#[test]
fn test_usage_on_empty_args_guards_the_parser() {
    let config = ScriptConfig { usage: Usage::OnEmptyArgs, ..ScriptConfig::default() };
    let text = script(&config);
    assert!(text.contains("    if (($# == 0))"));
    assert!(text.contains("print_help"));
    // Help is not wired to an option in this mode.
    assert!(!text.contains("-h|--help)"));
    assert!(!text.contains("-h, --help"));
}

#[test]
fn test_help_here_document_uses_two_space_steps() {
    let text = script(&ScriptConfig::default());
    assert!(text.contains("cat << _HELP_\n\n  Perform blah blah on a blah blah."));
    assert!(text.contains("\n  Usage:\n    ${prog} [OPTIONS]... FOO [BAR]\n"));
    assert!(text.contains("\n  Options:\n    -y, --yo            Turn on yo mode.\n"));
    assert!(text.contains("\n    -h, --help          Print this message and exit.\n"));
    // The here-document terminator sits at column zero.
    assert!(text.contains("\n\n_HELP_\n}\n"));
}

#[test]
fn test_indent_width_two_scales_every_level() {
    let text = compose(&ScriptConfig::default(), 2).0.render();

    // One authored four-space level becomes two spaces, two become four.
    assert!(text.contains("_f_log() {\n  local prog"));
    assert!(text.contains("log() {\n  _f_log '   INFO  ' \"$@\"\n}"));
    assert!(text.contains("\n      -y|--yo)\n        opt_yo=1\n"));
    assert!(!text.contains("    local prog"));
}

#[test]
fn test_main_wrapper_indents_the_body() {
    let config =
        ScriptConfig { main: true, exit_trap: ExitTrap::Logging, ..ScriptConfig::default() };
    let text = script(&config);

    assert!(text.contains("\nmain() {\n"));
    assert!(!text.contains("# ================================"));
    // Trap activation happens inside the entry scope.
    assert!(text.contains("\n    trap exit_trap EXIT\n"));
    assert!(text.contains("\n    parse_command \"$@\"\n"));
    assert!(text.contains("\n    return 0\n"));
    assert!(text.ends_with("}\n\nmain \"$@\""));
}

#[test]
fn test_exit_trap_temp_dir() {
    let config = ScriptConfig { exit_trap: ExitTrap::TempDir, ..ScriptConfig::default() };
    let text = script(&config);
    assert!(text.contains("exit_trap() {\n    rm -rf -- \"$_temp_dir\"\n}"));
    assert!(text.contains("unset -v _temp_dir"));
    assert!(text.contains("_temp_dir=$(mktemp --directory) || exit"));

    // Under set -e the fallback exit is redundant and dropped.
    let config = ScriptConfig {
        exit_trap: ExitTrap::TempDir,
        set_e: true,
        ..ScriptConfig::default()
    };
    let text = script(&config);
    assert!(text.contains("_temp_dir=$(mktemp --directory)\n"));
    assert!(!text.contains("_temp_dir=$(mktemp --directory) || exit"));
}

#[test]
fn test_exit_trap_delete_list() {
    let config = ScriptConfig { exit_trap: ExitTrap::DeleteList, ..ScriptConfig::default() };
    let text = script(&config);
    assert!(text.contains("exit_trap() {\n    rm -rf -- \"${_to_be_deleted[@]}\"\n}"));
    assert!(text.contains("_to_be_deleted=()"));
    assert!(text.contains("_to_be_deleted+=(\"$_some_dir\")"));
}

#[test]
fn test_exit_trap_logging_uses_the_logging_helpers_when_present() {
    let config = ScriptConfig { exit_trap: ExitTrap::Logging, ..ScriptConfig::default() };
    assert!(script(&config).contains("exit_trap() {\n    log 'Exiting.'\n}"));

    let config = ScriptConfig {
        exit_trap: ExitTrap::Logging,
        logging_utils: false,
        ..ScriptConfig::default()
    };
    assert!(script(&config)
        .contains("exit_trap() {\n    printf '%s: Exiting.\\n' \"$(basename \"$0\")\"\n}"));
}

#[test]
fn test_dry_run_mode_threads_through_fragments() {
    let config = ScriptConfig { dry: true, ..ScriptConfig::default() };
    let text = script(&config);

    assert!(text.contains("prog=$(basename \"$0\"):${DRY:+ [DRY RUN]}"));
    assert!(text.contains("is_dry_run() {"));
    assert!(text.contains("run_if_not_dry() {"));
    assert!(text.contains("log 'Would have run: %s' \"${*@Q}\""));
    assert!(text.contains("            --dry)\n                DRY=1"));
    assert!(text.contains("--dry               Turn dry mode on."));
    assert!(text.contains("DRY         If not empty, turn dry mode on."));
    assert!(text.contains("run_if_not_dry log 'TODO'"));
}

#[test]
fn test_dry_run_without_logging_utils_falls_back_to_printf() {
    let config =
        ScriptConfig { dry: true, logging_utils: false, ..ScriptConfig::default() };
    let text = script(&config);
    assert!(text.contains(r#"printf '[DRY RUN] Would have run: %s\n' "${*@Q}""#));
    assert!(text.contains("run_if_not_dry echo 'TODO'"));
}

#[test]
fn test_externalized_utils_routing() {
    let config = ScriptConfig { utils: Utils::Overwrite, ..ScriptConfig::default() };
    let (main, utils) = compose(&config, 4);
    let main_text = main.render();
    let utils_text = utils.unwrap().render();

    // The whole logging fragment lands in the utility writer, never split.
    assert!(utils_text.contains("_f_log() {"));
    assert!(utils_text.contains("log_and_run() {"));
    assert!(!main_text.contains("_f_log"));
    // The script sources the external file instead.
    assert!(main_text.contains(r#". "${BASEDIR:?}/common.sh" || exit"#));
}

#[test]
fn test_sourcing_line_uses_the_resolved_basename() {
    let config = ScriptConfig { utils: Utils::Suffixed, ..ScriptConfig::default() };
    let main = ScriptWriter::new(4, Destination::Stdout);
    let utils = ScriptWriter::new(4, Destination::File(PathBuf::from("/tmp/x/common-2.sh")));
    let (main, _) = Composer::new(&config, main, Some(utils)).compose();
    assert!(main.render().contains(r#". "${BASEDIR:?}/common-2.sh" || exit"#));
}

#[test]
fn test_sourcing_line_respects_set_e() {
    let config =
        ScriptConfig { utils: Utils::Overwrite, set_e: true, ..ScriptConfig::default() };
    let (main, _) = compose(&config, 4);
    let text = main.render();
    assert!(text.contains(r#". "${BASEDIR:?}/common.sh""#));
    assert!(!text.contains("|| exit"));
}

#[test]
fn test_embedded_utils_produce_no_secondary_writer() {
    let config = ScriptConfig::default();
    let (main, utils) = compose(&config, 4);
    assert!(utils.is_none());
    assert!(!main.render().contains(". \"${BASEDIR:?}/"));
}

#[test]
fn test_echo_back_without_logging_utils_uses_printf_continuations() {
    let config = ScriptConfig { logging_utils: false, ..ScriptConfig::default() };
    let text = script(&config);
    assert!(text.contains("printf '%s: Yo: %q; Plop: %q\\n' \\\n        \"$(basename \"$0\")\""));
    assert!(text.contains("printf '%s: Foo: %q; Bar: %q\\n' \\\n        \"$(basename \"$0\")\""));
    assert!(text.contains("echo 'TODO'"));
}
