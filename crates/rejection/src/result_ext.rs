use serde_json::Value;
use tracing::Level;

use crate::formatter::ConsoleFormatter;
use crate::rejection::{Cause, Issue, Rejection};

/// Extension trait for turning failed results into rejections.
///
/// The original error becomes the inner cause of the new rejection: an error
/// that already is a rejection is nested as-is, anything else is captured as
/// a native error.
///
/// Example
/// ```rust,ignore
/// use rejection::ResultExt;
///
/// fn read_profile(path: &str) -> Result<String, rejection::Rejection> {
///     std::fs::read_to_string(path).reject_with("could not read profile", path.into())
/// }
/// ```
pub trait ResultExt<T> {
    /// Wrap the error in a rejection described by `issue`.
    fn reject(self, issue: impl Into<Issue>) -> Result<T, Rejection>;

    /// Wrap the error in a rejection described by `issue`, carrying `data`.
    fn reject_with(self, issue: impl Into<Issue>, data: Value) -> Result<T, Rejection>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn reject(self, issue: impl Into<Issue>) -> Result<T, Rejection> {
        self.map_err(|err| Rejection::create(issue, None, Some(Cause::from_error(err))))
    }

    fn reject_with(self, issue: impl Into<Issue>, data: Value) -> Result<T, Rejection> {
        self.map_err(|err| Rejection::create(issue, Some(data), Some(Cause::from_error(err))))
    }
}

/// Emission of rejected results through `tracing`, leaving the result
/// untouched for the caller to handle.
pub trait EmitExt {
    /// If the result is an error, emit its rendering at `level`.
    fn emit_rejection(self, formatter: &ConsoleFormatter, level: Level) -> Self;

    fn emit_warning(self, formatter: &ConsoleFormatter) -> Self
    where
        Self: Sized,
    {
        self.emit_rejection(formatter, Level::WARN)
    }

    fn emit_error(self, formatter: &ConsoleFormatter) -> Self
    where
        Self: Sized,
    {
        self.emit_rejection(formatter, Level::ERROR)
    }
}

impl<T> EmitExt for Result<T, Rejection> {
    fn emit_rejection(self, formatter: &ConsoleFormatter, level: Level) -> Self {
        if let Err(ref rejection) = self {
            emit(rejection, formatter, level);
        }
        self
    }
}

/// Emit a rendered rejection as a tracing event at `level`.
pub fn emit(rejection: &Rejection, formatter: &ConsoleFormatter, level: Level) {
    let rendered = formatter.format(rejection);
    let message = rejection.message.as_deref().unwrap_or_default();

    match level {
        Level::ERROR => tracing::event!(Level::ERROR, rejection = %rendered, "{message}"),
        Level::WARN => tracing::event!(Level::WARN, rejection = %rendered, "{message}"),
        Level::INFO => tracing::event!(Level::INFO, rejection = %rendered, "{message}"),
        Level::DEBUG => tracing::event!(Level::DEBUG, rejection = %rendered, "{message}"),
        _ => tracing::event!(Level::TRACE, rejection = %rendered, "{message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpRejection;
    use serde_json::json;

    fn failing_read() -> std::io::Result<String> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"))
    }

    #[test]
    fn reject_nests_native_errors() {
        let rej = failing_read().reject("could not load settings").unwrap_err();

        assert_eq!(rej.message.as_deref(), Some("could not load settings"));
        let inner = rej.inner().expect("inner");
        assert_eq!(inner.message.as_deref(), Some("no such file"));
        assert!(inner.inner.is_none());
    }

    #[test]
    fn reject_with_attaches_data() {
        let rej = failing_read()
            .reject_with("could not load settings", json!({ "path": "/etc/app.toml" }))
            .unwrap_err();
        assert_eq!(rej.data, Some(json!({ "path": "/etc/app.toml" })));
    }

    #[test]
    fn reject_keeps_existing_rejections() {
        let failed: Result<(), HttpRejection> =
            Err(HttpRejection::new("upstream timed out", Some(504), None, None));
        let rej = failed.reject("sync failed").unwrap_err();

        let inner = rej.inner().expect("inner");
        assert_eq!(inner.message.as_deref(), Some("upstream timed out"));
        assert_eq!(inner.field("code"), Some(&json!(504)));
    }

    #[test]
    fn ok_results_pass_through() {
        let ok: std::io::Result<u8> = Ok(3);
        assert_eq!(ok.reject("unused").unwrap(), 3);
    }

    #[test]
    fn emit_does_not_alter_the_result() {
        let _ = tracing_subscriber::fmt::try_init();
        let formatter = ConsoleFormatter::default();

        let failed: Result<(), Rejection> = Err(Rejection::new("boom"));
        let failed = failed.emit_error(&formatter);
        assert_eq!(failed.unwrap_err().message.as_deref(), Some("boom"));

        let ok: Result<u8, Rejection> = Ok(1);
        assert_eq!(ok.emit_warning(&formatter).unwrap(), 1);
    }
}
