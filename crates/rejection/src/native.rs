use std::fmt;

use crate::stack;

/// A foreign error reduced to the two things a rejection keeps from it: the
/// message and its trace text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    message: String,
    trace: String,
}

impl NativeError {
    /// Build from an explicit message and raw trace text.
    pub fn new(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: trace.into(),
        }
    }

    /// Capture a Rust error. Its `Display` output becomes the message and the
    /// trace holds the frame lines of a backtrace taken at this call, starting
    /// at the caller's frame.
    pub fn capture<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self {
            message: err.to_string(),
            trace: stack::capture().join("\n"),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for NativeError {}

impl From<std::io::Error> for NativeError {
    fn from(err: std::io::Error) -> Self {
        Self::capture(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_uses_display_output() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing config");
        let native = NativeError::capture(&io);
        assert_eq!(native.message(), "missing config");
        assert_eq!(native.to_string(), "missing config");
        assert_eq!(stack::parse_stack(native.trace()).join("\n"), native.trace());
    }

    #[test]
    fn explicit_trace_is_kept_verbatim() {
        let native = NativeError::new("boom", "Error: boom\n    at f (a.js:1:1)");
        assert_eq!(native.trace(), "Error: boom\n    at f (a.js:1:1)");
    }
}
