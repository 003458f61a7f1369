//! Error values with context, and a console formatter for them.
//!
//! A [`Rejection`] wraps text, a native error, or nothing at all, together
//! with an optional payload, the stack at the point of capture, an optional
//! inner rejection, and any custom fields a subtype registers (see
//! [`HttpRejection`]). A [`ConsoleFormatter`] renders the whole chain.

pub mod config;
pub mod formatter;
pub mod http;
pub mod inspect;
pub mod native;
pub mod palette;
pub mod rejection;
pub mod result_ext;
pub mod stack;

// public exports
pub use config::{ColorOptions, DataOptions, FormatterConfig, FormatterOptions};
pub use formatter::{ConsoleFormatter, default_formatter};
pub use http::HttpRejection;
pub use inspect::{InspectOptions, inspect};
pub use native::NativeError;
pub use rejection::{Cause, CustomField, Issue, Rejection};
pub use result_ext::{EmitExt, ResultExt};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid formatter configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
