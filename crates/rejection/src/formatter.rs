//! Console rendering of rejections and their inner causes.
//!
//! Each rejection in a chain renders as a block of `| `-prefixed lines:
//!
//! ```text
//! | Message: could not save profile
//! | Data: { user: 7 }
//! | Stack: at app::save (src/app.rs:10:5)
//! |        at app::main (src/main.rs:3:5)
//! | Inner Exception:
//!      | Message: permission denied
//! ```
//!
//! Inner blocks are shifted right by `inner_padding_increment` per level.

use std::error::Error as StdError;
use std::path::Path;

use colored::Color;
use lazy_static::lazy_static;
use serde_json::Value;

use crate::config::{FormatterConfig, FormatterOptions};
use crate::http::HttpRejection;
use crate::inspect::inspect;
use crate::palette::{self, FIELD_COLOR};
use crate::rejection::Rejection;
use crate::{Error, Result};

/// Printed in place of an absent message or field when `show_nil` is set.
pub const NIL_MARKER: &str = "null";

const STACK_CONTINUATION_PAD: &str = "        ";

lazy_static! {
    static ref DEFAULT_FORMATTER: ConsoleFormatter = ConsoleFormatter::default();
}

/// A shared formatter with default options.
pub fn default_formatter() -> &'static ConsoleFormatter {
    &DEFAULT_FORMATTER
}

/// Renders rejections as indented, optionally colored text.
///
/// The configuration is resolved once and reused for every call; `format`
/// touches no other state, so one formatter can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ConsoleFormatter {
    config: FormatterConfig,
}

impl ConsoleFormatter {
    pub fn new(options: FormatterOptions) -> Self {
        Self::with_config(FormatterConfig::resolve(options))
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        FormatterOptions::from_toml_str(input).map(Self::new)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        FormatterOptions::load_from_path(path).map(Self::new)
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Render a rejection and every inner cause below it.
    pub fn format(&self, rejection: &Rejection) -> String {
        let config = &self.config;
        let mut lines = Vec::new();

        let chain = std::iter::once(rejection).chain(rejection.causes());
        for (depth, current) in chain.enumerate() {
            let pad_width = config.padding + depth * config.inner_padding_increment;
            if depth > 0 {
                let parent_pad = " ".repeat(pad_width - config.inner_padding_increment);
                lines.push(format!("{parent_pad}| Inner Exception:"));
            }
            self.render_block(current, pad_width, &mut lines);
        }

        tracing::trace!(lines = lines.len(), "formatted rejection");

        let text = lines.join("\n");
        let text = text.trim_start_matches('\n');
        if config.use_colors {
            palette::paint(text, config.colors.label)
        } else {
            text.to_string()
        }
    }

    /// Render an arbitrary error, which must be a [`Rejection`] or an
    /// [`HttpRejection`].
    pub fn try_format(&self, err: &(dyn StdError + 'static)) -> Result<String> {
        if let Some(rejection) = err.downcast_ref::<Rejection>() {
            return Ok(self.format(rejection));
        }
        if let Some(http) = err.downcast_ref::<HttpRejection>() {
            return Ok(self.format(http));
        }

        tracing::debug!(error = %err, "refusing to format a non-rejection error");
        Err(Error::InvalidArgument(
            "must be of type Rejection".to_string(),
        ))
    }

    fn render_block(&self, rejection: &Rejection, pad_width: usize, lines: &mut Vec<String>) {
        let config = &self.config;
        let pad = " ".repeat(pad_width);

        let message = match rejection.message.as_deref() {
            Some(message) if !message.is_empty() => Some(message),
            Some(message) if config.show_nil => Some(message),
            None if config.show_nil => Some(NIL_MARKER),
            _ => None,
        };
        if let Some(message) = message {
            let message = self.paint(message, config.colors.message);
            lines.push(format!("{pad}| Message: {message}"));
        }

        for field in rejection.custom_fields() {
            let rendered = match rejection.field(&field.field_name) {
                Some(Value::String(text)) => text.clone(),
                Some(value) if !value.is_null() => inspect(value, &config.inspect),
                _ if config.show_nil => inspect(&Value::Null, &config.inspect),
                _ => continue,
            };
            let mut field_lines = rendered.lines().map(|line| self.paint(line, FIELD_COLOR));
            let first = field_lines.next().unwrap_or_default();
            lines.push(format!("{pad}| {}: {first}", field.label));
            lines.extend(field_lines.map(|line| format!("{pad}| {line}")));
        }

        if config.stack_trace_limit > 0 {
            let mut frames = rejection.stack.iter().take(config.stack_trace_limit);
            if let Some(first) = frames.next() {
                let first = self.paint(first, config.colors.stack);
                lines.push(format!("{pad}| Stack: {first}"));
            }
            for frame in frames {
                let frame = self.paint(frame, config.colors.stack);
                lines.push(format!("{pad}|{STACK_CONTINUATION_PAD}{frame}"));
            }
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.config.use_colors {
            palette::paint(text, color)
        } else {
            text.to_string()
        }
    }
}
