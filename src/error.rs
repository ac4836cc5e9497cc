//! Engine errors.
//!
//! Only construction-time failures and explicit playability gates are
//! errors. Static-analysis findings are [`Diagnostics`](crate::analysis::Diagnostics),
//! and runtime "no answer" results are the [`UNDEFINED`](crate::ludeme::UNDEFINED)
//! sentinel.

use thiserror::Error;

/// Engine result type
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two optional arguments of a ludeme exclude each other.
    #[error("{ludeme}: conflicting arguments: {message}")]
    ConflictingArguments {
        ludeme: &'static str,
        message: String,
    },

    /// A ludeme was built without an argument it cannot default.
    #[error("{ludeme}: missing argument: {message}")]
    MissingArgument {
        ludeme: &'static str,
        message: String,
    },

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("site {site} is not on a board of {size} sites")]
    SiteOutOfRange { site: i32, size: usize },

    #[error("duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },

    /// The rules need something the game does not provide.
    #[error("game is missing requirements:\n{report}")]
    MissingRequirement { report: String },

    /// Static analysis predicts a runtime failure; play must not start.
    #[error("game is predicted to crash:\n{report}")]
    WillCrash { report: String },
}
