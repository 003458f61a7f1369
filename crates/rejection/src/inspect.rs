//! Generic value-to-text rendering for payloads and custom fields.
//!
//! Output follows the familiar inspector layout: `{ key: 'text', n: 1 }` on a
//! single line while it fits in `break_length`, otherwise one entry per line
//! indented by two spaces per level. Nesting past `depth` collapses to
//! `[Object]` / `[Array]`.

use colored::Colorize;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
    static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectOptions {
    /// Levels of nesting rendered below the top-level value.
    pub depth: usize,
    pub max_array_length: usize,
    pub break_length: usize,
    /// Also render hidden properties; for arrays this is `[length]`.
    pub show_hidden: bool,
    /// Style primitives with ANSI colors.
    pub colors: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            depth: 2,
            max_array_length: 100,
            break_length: 60,
            show_hidden: false,
            colors: false,
        }
    }
}

/// Render `value` to text.
pub fn inspect(value: &Value, options: &InspectOptions) -> String {
    Inspector { options }.format(value, 0, 0)
}

/// Display width of `text`, ignoring ANSI escape sequences.
pub fn visible_len(text: &str) -> usize {
    ANSI_ESCAPE.replace_all(text, "").chars().count()
}

enum Style {
    Null,
    Literal,
    Text,
    Special,
}

struct Inspector<'a> {
    options: &'a InspectOptions,
}

impl Inspector<'_> {
    fn format(&self, value: &Value, level: usize, indent: usize) -> String {
        match value {
            Value::Null => self.style("null", Style::Null),
            Value::Bool(b) => self.style(&b.to_string(), Style::Literal),
            Value::Number(n) => self.style(&n.to_string(), Style::Literal),
            Value::String(s) => self.style(&quote(s), Style::Text),
            Value::Array(items) => self.format_array(items, level, indent),
            Value::Object(map) => self.format_object(map, level, indent),
        }
    }

    fn format_array(&self, items: &[Value], level: usize, indent: usize) -> String {
        if items.is_empty() && !self.options.show_hidden {
            return "[]".to_string();
        }
        if level > self.options.depth {
            return self.style("[Array]", Style::Special);
        }

        let shown = items.len().min(self.options.max_array_length);
        let mut entries: Vec<String> = items[..shown]
            .iter()
            .map(|item| self.format(item, level + 1, indent + 2))
            .collect();

        let remaining = items.len() - shown;
        if remaining > 0 {
            let plural = if remaining > 1 { "s" } else { "" };
            entries.push(format!("... {remaining} more item{plural}"));
        }
        if self.options.show_hidden {
            let len = self.style(&items.len().to_string(), Style::Literal);
            entries.push(format!("[length]: {len}"));
        }

        self.reduce(entries, "[", "]", indent)
    }

    fn format_object(&self, map: &Map<String, Value>, level: usize, indent: usize) -> String {
        if map.is_empty() {
            return "{}".to_string();
        }
        if level > self.options.depth {
            return self.style("[Object]", Style::Special);
        }

        let entries = map
            .iter()
            .map(|(key, value)| {
                let value = self.format(value, level + 1, indent + 2);
                format!("{}: {}", format_key(key), value)
            })
            .collect();

        self.reduce(entries, "{", "}", indent)
    }

    /// Join entries on one line when they fit, otherwise one per line.
    fn reduce(&self, entries: Vec<String>, open: &str, close: &str, indent: usize) -> String {
        let width: usize = entries.iter().map(|e| visible_len(e)).sum();
        let start = indent + open.len() + 10;
        let fits = width + entries.len() * 2 + start <= self.options.break_length;

        if fits && !entries.iter().any(|e| e.contains('\n')) {
            return format!("{open} {} {close}", entries.join(", "));
        }

        let pad = " ".repeat(indent + 2);
        format!(
            "{open}\n{pad}{}\n{}{close}",
            entries.join(&format!(",\n{pad}")),
            " ".repeat(indent)
        )
    }

    fn style(&self, text: &str, style: Style) -> String {
        if !self.options.colors {
            return text.to_string();
        }
        match style {
            Style::Null => text.bold().to_string(),
            Style::Literal => text.yellow().to_string(),
            Style::Text => text.green().to_string(),
            Style::Special => text.cyan().to_string(),
        }
    }
}

fn format_key(key: &str) -> String {
    if IDENTIFIER.is_match(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
