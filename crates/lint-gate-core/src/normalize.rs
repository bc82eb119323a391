//! Reshapes raw toolchain output into linter-style lines.
//!
//! The Go toolchain prints one primary diagnostic per line, decorated with
//! package headers, indented context lines and truncation banners. Only the
//! primary `file:line:col: message` lines survive normalization, with the
//! `./` relativization prefix removed so paths match what the linter prints.

use crate::outcome::DiagnosticLine;

/// Package header emitted before each failing build unit (`# example.com/pkg`).
const HEADER_PREFIX: char = '#';

/// Indented context printed beneath a primary diagnostic.
const CONTEXT_PREFIX: char = '\t';

/// Banner printed when the package itself cannot be resolved.
const LOAD_FAILURE_PREFIX: &str = "can't load package:";

/// Marker appended when the compiler stops reporting.
const TRUNCATION_SUFFIX: &str = "too many errors";

/// A diagnostic whose detail continues on the next line.
const CONTINUATION_SUFFIX: &str = " in assignment:";

const RELATIVE_PREFIX: &str = "./";

/// Normalizes raw compiler output into linter-shaped lines.
///
/// Lines are split on `\n` (trailing `\r` removed, invalid UTF-8 replaced).
/// Headers, indented context, package-load banners and truncation markers are
/// dropped, and any leading `./` is stripped. A line ending in
/// `" in assignment:"` absorbs the following raw line, trimmed and joined
/// with a single space; a truncation marker in that position is consumed
/// without contributing text. At most one line is absorbed per trigger.
///
/// The output keeps emission order and is stable under re-normalization.
#[must_use]
pub fn normalize(raw: &[u8]) -> Vec<DiagnosticLine> {
    let text = String::from_utf8_lossy(raw);
    let mut lines = split_lines(&text);
    let mut normalized = Vec::new();

    while let Some(raw_line) = lines.next() {
        let line = strip_relative_prefix(raw_line);
        if is_noise(line) {
            continue;
        }

        let mut merged = line.to_string();
        if merged.ends_with(CONTINUATION_SUFFIX) {
            if let Some(next) = lines.next() {
                let continuation = next.trim();
                merged.push(' ');
                if !continuation.ends_with(TRUNCATION_SUFFIX) {
                    merged.push_str(continuation);
                }
            }
        }

        normalized.push(DiagnosticLine::new(merged));
    }

    normalized
}

/// Splits on `\n`, keeping a final unterminated line and dropping the empty
/// remainder after a trailing newline.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let body = text.strip_suffix('\n').unwrap_or(text);
    let empty = text.is_empty();
    body.split('\n')
        .filter(move |_| !empty)
        .map(|line| line.trim_end_matches('\r'))
}

fn strip_relative_prefix(mut line: &str) -> &str {
    while let Some(rest) = line.strip_prefix(RELATIVE_PREFIX) {
        line = rest;
    }
    line
}

fn is_noise(line: &str) -> bool {
    line.starts_with(HEADER_PREFIX)
        || line.starts_with(CONTEXT_PREFIX)
        || line.starts_with(LOAD_FAILURE_PREFIX)
        || line.ends_with(TRUNCATION_SUFFIX)
}
