//! Stack trace capture and frame extraction.
//!
//! A frame line is always normalised to `at <symbol> (<location>)`. Two input
//! shapes are understood:
//!
//! - single-line frames already in that shape, as produced by foreign runtimes
//!   and by earlier rejections that were rendered to text;
//! - Rust backtraces from [`std::backtrace::Backtrace`], where a symbol line
//!   (numbered, or indented for an inlined callee) is followed by an indented
//!   `at <location>` line.
//!
//! Everything else in the raw text (headers, blank lines, frames without a
//! resolved location) is dropped.

use std::backtrace::Backtrace;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INLINE_FRAME: Regex = Regex::new(r"^\s*(at\s+.*\(.*\))\s*$").unwrap();
    static ref NUMBERED_FRAME: Regex = Regex::new(r"^\s*\d+:\s+(.+?)\s*$").unwrap();
    static ref INLINED_SYMBOL: Regex = Regex::new(r"^\s+(\S.*?)\s*$").unwrap();
    static ref FRAME_LOCATION: Regex = Regex::new(r"^\s+at\s+(.+?)\s*$").unwrap();
    static ref FRAME_PARTS: Regex = Regex::new(r"^at\s+(.*?)\s+\((.*)\)$").unwrap();
    /// Path prefixes under which this crate's own sources are reported.
    static ref SOURCE_ROOTS: Vec<String> = source_roots();
}

/// Symbol prefixes that belong to the capture path rather than the caller.
/// The `core` entries cover closure and combinator glue between constructors.
const INTERNAL_PREFIXES: &[&str] = &[
    "std::backtrace",
    "<std::backtrace",
    "backtrace::",
    "rejection::",
    "<rejection::",
    "core::ops::function::",
    "core::option::",
    "core::result::",
    "<core::",
    "alloc::boxed::",
    "<alloc::boxed::",
];

/// Standard library sources that show up for inlined glue with bare names.
const INTERNAL_LIBRARY_PATHS: &[&str] = &[
    "/library/core/src/",
    "/library/alloc/src/",
    "/library/std/src/backtrace",
];

/// Extract the frame lines of a raw trace, preserving their order.
pub fn parse_stack(raw: &str) -> Vec<String> {
    let mut frames = Vec::new();
    let mut pending: Option<&str> = None;

    for line in raw.lines() {
        if let Some(symbol) = pending.take() {
            if let Some(loc) = FRAME_LOCATION.captures(line) {
                frames.push(format!("at {} ({})", symbol, &loc[1]));
                continue;
            }
        }

        if let Some(frame) = INLINE_FRAME.captures(line) {
            frames.push(frame[1].to_string());
        } else if let Some(symbol) = NUMBERED_FRAME.captures(line) {
            pending = symbol.get(1).map(|m| m.as_str());
        } else if let Some(symbol) = INLINED_SYMBOL
            .captures(line)
            .filter(|_| !FRAME_LOCATION.is_match(line))
        {
            pending = symbol.get(1).map(|m| m.as_str());
        }
    }

    frames
}

/// Snapshot the current call stack as frame lines.
///
/// Frames belonging to the backtrace machinery and to this crate's
/// constructors are skipped, so the first frame is the caller's.
pub fn capture() -> Vec<String> {
    let raw = Backtrace::force_capture().to_string();
    trim_internal(parse_stack(&raw))
}

/// Drop the leading frames that belong to the capture path: backtrace
/// machinery, this crate (by symbol or by source location), and the standard
/// library glue between them.
pub fn trim_internal(frames: Vec<String>) -> Vec<String> {
    frames
        .into_iter()
        .skip_while(|frame| is_internal(frame))
        .collect()
}

fn is_internal(frame: &str) -> bool {
    let (symbol, location) = match FRAME_PARTS.captures(frame) {
        Some(parts) => (
            parts.get(1).map_or("", |m| m.as_str()),
            parts.get(2).map_or("", |m| m.as_str()),
        ),
        None => (frame.strip_prefix("at ").unwrap_or(frame), ""),
    };

    INTERNAL_PREFIXES
        .iter()
        .any(|prefix| symbol.starts_with(prefix))
        || is_internal_location(location)
}

fn is_internal_location(location: &str) -> bool {
    SOURCE_ROOTS.iter().any(|root| location.starts_with(root.as_str()))
        || INTERNAL_LIBRARY_PATHS
            .iter()
            .any(|path| location.contains(path))
}

/// Backtraces report a source file by its absolute path, or relative to the
/// directory rustc ran in (the workspace root for members), optionally with a
/// leading `./`. The bare `src/` forms are only ours when running from this
/// crate's own directory.
fn source_roots() -> Vec<String> {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut roots = vec![format!("{}/src/", manifest_dir.display())];

    for ancestor in manifest_dir.ancestors().skip(1) {
        let Ok(relative) = manifest_dir.strip_prefix(ancestor) else {
            continue;
        };
        let relative = relative.display();
        roots.push(format!("{relative}/src/"));
        roots.push(format!("./{relative}/src/"));
    }

    if std::env::current_dir().is_ok_and(|cwd| cwd == manifest_dir) {
        roots.push("src/".to_string());
        roots.push("./src/".to_string());
    }
    roots
}
