use std::error::Error as StdError;
use std::fmt;

use serde_json::{Map, Value};

use crate::formatter;
use crate::http::HttpRejection;
use crate::native::NativeError;
use crate::stack;

/// Label of the built-in payload field.
pub const DATA_LABEL: &str = "Data";
/// Attribute name of the built-in payload field.
pub const DATA_FIELD: &str = "data";

/// An attribute registered for display, beyond the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomField {
    pub label: String,
    pub field_name: String,
}

impl CustomField {
    pub fn new(label: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field_name: field_name.into(),
        }
    }

    fn data() -> Self {
        Self::new(DATA_LABEL, DATA_FIELD)
    }
}

/// What went wrong, as handed to [`Rejection::create`].
#[derive(Debug, Clone, Default)]
pub enum Issue {
    #[default]
    Absent,
    Text(String),
    Native(NativeError),
    /// Any other value. It never becomes the message.
    Value(Value),
}

impl From<&str> for Issue {
    fn from(text: &str) -> Self {
        Issue::Text(text.to_string())
    }
}

impl From<String> for Issue {
    fn from(text: String) -> Self {
        Issue::Text(text)
    }
}

impl From<NativeError> for Issue {
    fn from(err: NativeError) -> Self {
        Issue::Native(err)
    }
}

impl From<Value> for Issue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Issue::Absent,
            Value::String(text) => Issue::Text(text),
            other => Issue::Value(other),
        }
    }
}

impl<T: Into<Issue>> From<Option<T>> for Issue {
    fn from(issue: Option<T>) -> Self {
        issue.map_or(Issue::Absent, Into::into)
    }
}

/// The underlying cause of a rejection, before normalization.
#[derive(Debug, Clone)]
pub enum Cause {
    Rejection(Box<Rejection>),
    Native(NativeError),
    Value(Value),
}

impl Cause {
    /// Turn any error into a cause. Rejections (including HTTP rejections) are
    /// nested as they are; every other error is captured as a native error.
    pub fn from_error<E>(err: E) -> Self
    where
        E: StdError + 'static,
    {
        let err: Box<dyn StdError> = Box::new(err);
        let err = match err.downcast::<Rejection>() {
            Ok(rejection) => return Cause::Rejection(rejection),
            Err(err) => err,
        };

        match err.downcast::<HttpRejection>() {
            Ok(http) => (*http).into(),
            Err(err) => Cause::Native(NativeError::capture(&*err)),
        }
    }
}

impl From<Rejection> for Cause {
    fn from(rejection: Rejection) -> Self {
        Cause::Rejection(Box::new(rejection))
    }
}

impl From<Box<Rejection>> for Cause {
    fn from(rejection: Box<Rejection>) -> Self {
        Cause::Rejection(rejection)
    }
}

impl From<NativeError> for Cause {
    fn from(err: NativeError) -> Self {
        Cause::Native(err)
    }
}

impl From<Value> for Cause {
    fn from(value: Value) -> Self {
        Cause::Value(value)
    }
}

/// An error value carrying a message, a payload, the stack at capture time, an
/// optional inner rejection, and any registered custom fields.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub message: Option<String>,
    pub data: Option<Value>,
    pub inner: Option<Box<Rejection>>,
    pub stack: Vec<String>,
    custom_fields: Vec<CustomField>,
    extensions: Map<String, Value>,
}

impl Rejection {
    /// Build a rejection from heterogeneous inputs.
    ///
    /// A native error contributes its message and its own trace; text becomes
    /// the message verbatim; anything else leaves the message empty. Unless the
    /// issue is a native error, the stack is captured here. The cause is
    /// normalized into a `Rejection` exactly once.
    pub fn create(issue: impl Into<Issue>, data: Option<Value>, inner: Option<Cause>) -> Self {
        let (message, stack) = match issue.into() {
            Issue::Native(err) => (
                Some(err.message().to_string()),
                stack::parse_stack(err.trace()),
            ),
            Issue::Text(text) => (Some(text), stack::capture()),
            Issue::Absent | Issue::Value(_) => (None, stack::capture()),
        };

        Self {
            message,
            data,
            inner: inner.and_then(Self::normalize_cause),
            stack,
            custom_fields: vec![CustomField::data()],
            extensions: Map::new(),
        }
    }

    pub fn new(issue: impl Into<Issue>) -> Self {
        Self::create(issue, None, None)
    }

    /// Wrap a native error, with no payload and no cause.
    pub fn from_native(err: NativeError) -> Self {
        Self::create(Issue::Native(err), None, None)
    }

    pub fn from_error<E>(err: &E) -> Self
    where
        E: StdError + ?Sized,
    {
        Self::from_native(NativeError::capture(err))
    }

    /// Wrap an error and its whole `source()` chain, outermost first.
    pub fn from_error_chain(err: &(dyn StdError + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(next) = source {
            causes.push(NativeError::capture(next));
            source = next.source();
        }

        let inner = causes.into_iter().rev().fold(None, |inner, native| {
            let mut rejection = Self::from_native(native);
            rejection.inner = inner;
            Some(Box::new(rejection))
        });

        let mut rejection = Self::from_error(err);
        rejection.inner = inner;
        rejection
    }

    /// Base construction for subtypes: builds the rejection, then registers
    /// `extra_fields` as `(label, field_name)` pairs after `Data`, in order.
    pub fn extend<L, F>(
        issue: impl Into<Issue>,
        data: Option<Value>,
        inner: Option<Cause>,
        extra_fields: impl IntoIterator<Item = (L, F)>,
    ) -> Self
    where
        L: Into<String>,
        F: Into<String>,
    {
        let mut rejection = Self::create(issue, data, inner);
        for (label, field_name) in extra_fields {
            rejection.register_field(label, field_name);
        }
        rejection
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_inner(mut self, cause: impl Into<Cause>) -> Self {
        self.inner = Self::normalize_cause(cause.into());
        self
    }

    pub fn register_field(&mut self, label: impl Into<String>, field_name: impl Into<String>) {
        self.custom_fields.push(CustomField::new(label, field_name));
    }

    pub fn custom_fields(&self) -> &[CustomField] {
        &self.custom_fields
    }

    /// Look up a registered attribute by name. `data` is the payload; every
    /// other name is read from the extension record.
    pub fn field(&self, name: &str) -> Option<&Value> {
        if name == DATA_FIELD {
            self.data.as_ref()
        } else {
            self.extensions.get(name)
        }
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        if name == DATA_FIELD {
            self.data = Some(value.into());
        } else {
            self.extensions.insert(name, value.into());
        }
    }

    pub fn inner(&self) -> Option<&Rejection> {
        self.inner.as_deref()
    }

    /// Iterate over the inner rejections, nearest first.
    pub fn causes(&self) -> impl Iterator<Item = &Rejection> {
        std::iter::successors(self.inner(), |r| r.inner())
    }

    fn normalize_cause(cause: Cause) -> Option<Box<Rejection>> {
        match cause {
            Cause::Rejection(rejection) => Some(rejection),
            Cause::Native(err) => Some(Box::new(Self::from_native(err))),
            Cause::Value(Value::Null) => None,
            Cause::Value(value) => Some(Box::new(Self::create(Issue::Absent, Some(value), None))),
        }
    }
}

impl fmt::Display for Rejection {
    /// `{}` prints the message; `{:#}` renders the whole chain with the
    /// default console formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f.write_str(&formatter::default_formatter().format(self));
        }
        match &self.message {
            Some(message) => f.write_str(message),
            None => f.write_str("rejection"),
        }
    }
}

impl StdError for Rejection {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .as_deref()
            .map(|inner| inner as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NODE_TRACE: &str = "Error: foo
    at Context.<anonymous> (/app/test/rejection.test.js:43:23)
    at callFn (/app/node_modules/mocha/lib/runnable.js:354:21)

    at next (/app/node_modules/mocha/lib/runner.js:473:10)";

    #[test]
    fn no_parameters() {
        let rej = Rejection::new(Issue::Absent);
        assert!(rej.message.is_none());
        assert!(rej.data.is_none());
        assert!(rej.inner.is_none());
        assert_eq!(rej.custom_fields(), &[CustomField::new("Data", "data")]);
    }

    #[test]
    fn empty_message_is_not_absent() {
        let rej = Rejection::new("");
        assert_eq!(rej.message.as_deref(), Some(""));
    }

    #[test]
    fn text_message_is_verbatim() {
        let rej = Rejection::new(String::from("  foo\n"));
        assert_eq!(rej.message.as_deref(), Some("  foo\n"));
    }

    #[test]
    fn native_issue_takes_message_and_trace() {
        let rej = Rejection::new(NativeError::new("foo", NODE_TRACE));
        assert_eq!(rej.message.as_deref(), Some("foo"));
        assert_eq!(
            rej.stack,
            vec![
                "at Context.<anonymous> (/app/test/rejection.test.js:43:23)",
                "at callFn (/app/node_modules/mocha/lib/runnable.js:354:21)",
                "at next (/app/node_modules/mocha/lib/runner.js:473:10)",
            ]
        );
        assert!(rej.data.is_none());
    }

    #[test]
    fn non_text_issue_has_no_message() {
        for issue in [json!(42), json!({ "a": 1 }), json!([1, 2]), json!(true), Value::Null] {
            let rej = Rejection::new(issue);
            assert!(rej.message.is_none());
        }
        assert_eq!(Rejection::new(json!("text")).message.as_deref(), Some("text"));
        assert!(Rejection::new(None::<String>).message.is_none());
    }

    #[test]
    fn data_is_stored_as_given() {
        let rej = Rejection::create("foo", Some(json!({ "foo": "bar" })), None);
        assert_eq!(rej.data, Some(json!({ "foo": "bar" })));
        assert_eq!(rej.field("data"), Some(&json!({ "foo": "bar" })));
    }

    #[test]
    fn inner_rejection_is_kept() {
        let inner = Rejection::new("foo");
        let inner_stack = inner.stack.clone();
        let rej = Rejection::create(Issue::Absent, None, Some(inner.into()));

        let nested = rej.inner().expect("inner");
        assert_eq!(nested.message.as_deref(), Some("foo"));
        assert_eq!(nested.stack, inner_stack);
    }

    #[test]
    fn inner_native_error_is_wrapped() {
        let rej = Rejection::new(Issue::Absent).with_inner(NativeError::new("foo", NODE_TRACE));

        let nested = rej.inner().expect("inner");
        assert_eq!(nested.message.as_deref(), Some("foo"));
        assert_eq!(nested.stack.len(), 3);
        assert!(nested.data.is_none());
        assert!(nested.inner.is_none());
    }

    #[test]
    fn inner_value_is_wrapped_as_data() {
        let rej = Rejection::new(Issue::Absent).with_inner(json!({ "foo": "bar" }));

        let nested = rej.inner().expect("inner");
        assert!(nested.message.is_none());
        assert_eq!(nested.data, Some(json!({ "foo": "bar" })));
    }

    #[test]
    fn null_cause_means_no_inner() {
        let rej = Rejection::create("foo", None, Some(Cause::Value(Value::Null)));
        assert!(rej.inner.is_none());
    }

    #[test]
    fn extend_registers_fields_after_data() {
        let mut rej = Rejection::extend("foo", None, None, [("Code", "code"), ("Route", "route")]);
        rej.set_field("code", 404);
        rej.set_field("route", "/users");

        let labels: Vec<_> = rej.custom_fields().iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, ["Data", "Code", "Route"]);
        assert_eq!(rej.field("code"), Some(&json!(404)));
        assert_eq!(rej.field("route"), Some(&json!("/users")));
        assert!(rej.field("missing").is_none());
    }

    #[test]
    fn cause_from_error_keeps_rejections() {
        let cause = Cause::from_error(Rejection::new("inner"));
        assert!(matches!(cause, Cause::Rejection(r) if r.message.as_deref() == Some("inner")));

        let http = HttpRejection::new("gone", Some(410), None, None);
        assert!(matches!(Cause::from_error(http), Cause::Rejection(r) if r.field("code") == Some(&json!(410))));

        let io = std::io::Error::other("disk full");
        assert!(matches!(Cause::from_error(io), Cause::Native(e) if e.message() == "disk full"));
    }

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("could not load profile")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn error_chain_becomes_nested_rejections() {
        let err = Outer(std::io::Error::other("permission denied"));
        let rej = Rejection::from_error_chain(&err);

        assert_eq!(rej.message.as_deref(), Some("could not load profile"));
        let messages: Vec<_> = rej.causes().filter_map(|r| r.message.as_deref()).collect();
        assert_eq!(messages, ["permission denied"]);
    }

    #[test]
    fn source_follows_inner() {
        let rej = Rejection::new("outer").with_inner(Rejection::new("inner"));
        let source = rej.source().expect("source");
        assert_eq!(source.to_string(), "inner");
        assert_eq!(Rejection::new(Issue::Absent).to_string(), "rejection");
    }
}
