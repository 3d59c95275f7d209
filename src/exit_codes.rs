//! Process exit codes shared by every subcommand.

/// Nothing to report
pub const SUCCESS: i32 = 0;
/// A page needs normalization or carries logged anomalies
pub const VIOLATIONS_FOUND: i32 = 1;
/// Bad arguments, unreadable input, or invalid configuration
pub const TOOL_ERROR: i32 = 2;

pub mod exit {
    use super::*;

    pub fn success() -> ! {
        std::process::exit(SUCCESS)
    }

    pub fn violations_found() -> ! {
        std::process::exit(VIOLATIONS_FOUND)
    }

    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR)
    }
}
