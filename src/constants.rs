//! Common constants used throughout the bashplate application.

/// Treated as standard output if given as an output file path.
pub const STDOUT_PLACEHOLDER: &str = "-";

/// Basename of the file that may be created to store common utility
/// functions, without its extension.
pub const COMMON_STEM: &str = "common";

/// Extension of the utility functions file.
pub const COMMON_EXTENSION: &str = ".sh";

/// Full basename of the utility functions file.
pub const COMMON_BASENAME: &str = "common.sh";
