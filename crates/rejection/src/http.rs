use std::error::Error as StdError;
use std::fmt;
use std::ops::{Deref, DerefMut};

use serde_json::Value;

use crate::rejection::{Cause, Issue, Rejection};

/// Label of the status code field.
pub const CODE_LABEL: &str = "Code";
/// Attribute name of the status code field.
pub const CODE_FIELD: &str = "code";

/// A rejection describing an HTTP failure. Adds a `Code` field that the
/// formatter renders after `Data`.
#[derive(Debug, Clone)]
pub struct HttpRejection {
    base: Rejection,
}

impl HttpRejection {
    pub fn new(
        issue: impl Into<Issue>,
        code: Option<u16>,
        data: Option<Value>,
        inner: Option<Cause>,
    ) -> Self {
        let mut base = Rejection::extend(issue, data, inner, [(CODE_LABEL, CODE_FIELD)]);
        base.set_field(CODE_FIELD, code.map_or(Value::Null, Value::from));
        Self { base }
    }

    pub fn code(&self) -> Option<u16> {
        self.base
            .field(CODE_FIELD)
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
    }

    pub fn set_code(&mut self, code: Option<u16>) {
        self.base
            .set_field(CODE_FIELD, code.map_or(Value::Null, Value::from));
    }

    pub fn into_rejection(self) -> Rejection {
        self.base
    }
}

impl Deref for HttpRejection {
    type Target = Rejection;

    fn deref(&self) -> &Rejection {
        &self.base
    }
}

impl DerefMut for HttpRejection {
    fn deref_mut(&mut self) -> &mut Rejection {
        &mut self.base
    }
}

impl From<HttpRejection> for Rejection {
    fn from(http: HttpRejection) -> Self {
        http.base
    }
}

impl From<HttpRejection> for Cause {
    fn from(http: HttpRejection) -> Self {
        Cause::Rejection(Box::new(http.base))
    }
}

impl fmt::Display for HttpRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.base, f)
    }
}

impl StdError for HttpRejection {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.base.source()
    }
}
