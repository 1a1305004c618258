use latstat_common::LatStatError;

pub mod config;
pub mod histogram;
pub mod logging;
pub mod percentile;
pub mod source;
pub mod table;

/// Process exit status for invalid invocations.
pub const EXIT_USAGE: i32 = 1;
/// Process exit status for unreadable, malformed or empty input.
pub const EXIT_DATA: i32 = 2;

/// Map an error to the exit status both binaries use for it.
pub fn exit_code(err: &LatStatError) -> i32 {
    if err.is_usage() {
        EXIT_USAGE
    } else {
        EXIT_DATA
    }
}
