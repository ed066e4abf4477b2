use std::path::PathBuf;

use snafu::Snafu;

/// Errors surfaced by the library.
///
/// Every failure is fatal for the pipeline that produced it: the core has no
/// recoverable error states, so callers (typically the CLI) report the message
/// and stop.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Source file missing/unreadable, or sink not writable.
    #[snafu(display("can not access '{}': {source}", path.display()))]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Malformed bench line (bad delimiters, unknown operator, wrong arity).
    #[snafu(display("bench line {line_no}: \"{line}\": {reason}"))]
    Parse {
        line_no: usize,
        line: String,
        reason: String,
    },

    /// An internal consistency check failed; this is a bug, not bad input.
    #[snafu(display("circuit invariant violated: {detail}"))]
    Invariant { detail: String },

    /// A pipeline was configured with conflicting parameters.
    #[snafu(display("invalid configuration: {detail}"))]
    Config { detail: String },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
