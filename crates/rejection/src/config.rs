use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::inspect::InspectOptions;
use crate::palette::{self, ColorScheme};
use crate::{Error, Result};

pub const DEFAULT_STACK_TRACE_LIMIT: usize = 10;
pub const DEFAULT_INNER_PADDING_INCREMENT: usize = 5;
pub const DEFAULT_PADDING: usize = 0;

/// Color identifiers requested by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColorOptions {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Inspector overrides for payload and custom field rendering.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataOptions {
    #[serde(default)]
    pub depth: Option<usize>,
    #[serde(default)]
    pub max_array_length: Option<usize>,
    #[serde(default)]
    pub break_length: Option<usize>,
    #[serde(default)]
    pub show_hidden: Option<bool>,
}

/// Caller-supplied formatter overrides. Anything left unset takes its default
/// when resolved into a [`FormatterConfig`].
///
/// Example TOML:
/// ```toml
/// use_colors = true
/// stack_trace_limit = 5
///
/// [colors]
/// stack = "magenta"
///
/// [data]
/// depth = 4
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatterOptions {
    #[serde(default)]
    pub use_colors: Option<bool>,
    #[serde(default)]
    pub colors: Option<ColorOptions>,
    #[serde(default)]
    pub stack_trace_limit: Option<usize>,
    #[serde(default)]
    pub show_nil: Option<bool>,
    #[serde(default)]
    pub inner_padding_increment: Option<usize>,
    #[serde(default)]
    pub padding: Option<usize>,
    #[serde(default)]
    pub data: Option<DataOptions>,
}

impl FormatterOptions {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| Error::Config(format!("TOML parse error: {e}")))
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn use_colors(mut self, enabled: bool) -> Self {
        self.use_colors = Some(enabled);
        self
    }

    pub fn stack_trace_limit(mut self, limit: usize) -> Self {
        self.stack_trace_limit = Some(limit);
        self
    }

    pub fn show_nil(mut self, enabled: bool) -> Self {
        self.show_nil = Some(enabled);
        self
    }

    pub fn inner_padding_increment(mut self, increment: usize) -> Self {
        self.inner_padding_increment = Some(increment);
        self
    }

    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn colors(mut self, colors: ColorOptions) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn data(mut self, data: DataOptions) -> Self {
        self.data = Some(data);
        self
    }
}

/// Fully resolved formatter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfig {
    pub use_colors: bool,
    pub colors: ColorScheme,
    pub stack_trace_limit: usize,
    pub show_nil: bool,
    pub inner_padding_increment: usize,
    pub padding: usize,
    /// `colors` mirrors `use_colors`.
    pub inspect: InspectOptions,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self::resolve(FormatterOptions::default())
    }
}

impl FormatterConfig {
    pub fn resolve(options: FormatterOptions) -> Self {
        let defaults = ColorScheme::default();
        let colors = options.colors.unwrap_or_default();
        let colors = ColorScheme {
            message: palette::resolve(colors.message.as_deref(), defaults.message),
            stack: palette::resolve(colors.stack.as_deref(), defaults.stack),
            label: palette::resolve(colors.label.as_deref(), defaults.label),
        };

        let use_colors = options.use_colors.unwrap_or(false);
        let data = options.data.unwrap_or_default();
        let base = InspectOptions::default();
        let inspect = InspectOptions {
            depth: data.depth.unwrap_or(base.depth),
            max_array_length: data.max_array_length.unwrap_or(base.max_array_length),
            break_length: data.break_length.unwrap_or(base.break_length),
            show_hidden: data.show_hidden.unwrap_or(base.show_hidden),
            colors: use_colors,
        };

        Self {
            use_colors,
            colors,
            stack_trace_limit: options
                .stack_trace_limit
                .unwrap_or(DEFAULT_STACK_TRACE_LIMIT),
            show_nil: options.show_nil.unwrap_or(false),
            inner_padding_increment: options
                .inner_padding_increment
                .unwrap_or(DEFAULT_INNER_PADDING_INCREMENT),
            padding: options.padding.unwrap_or(DEFAULT_PADDING),
            inspect,
        }
    }
}
