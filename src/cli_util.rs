use std::io::{self, Write};

use crate::InterpreterError;

/// Bytes of source shown on each side of the failing instruction.
const WINDOW_BYTES: usize = 32;

/// Print an interpreter error to stderr with a caret under the failing
/// instruction. If `program` is `Some("bf")`, messages are prefixed with "bf: ...".
pub fn print_interpreter_error(program: Option<&str>, source: &[u8], err: &InterpreterError) {
    let kind = if err.is_parse_error() {
        "Parse error"
    } else if matches!(err, InterpreterError::OutOfMemory { .. }) {
        "Resource error"
    } else if matches!(err, InterpreterError::Io { .. }) {
        "I/O error"
    } else {
        "Runtime error"
    };

    let msg = match program {
        Some(p) => format!("{p}: {kind}: {err}"),
        None => format!("{kind}: {err}"),
    };

    match err.ip() {
        Some(ip) if ip < source.len() => print_error_with_context(&msg, source, ip),
        _ => {
            eprintln!("{msg}");
            let _ = io::stderr().flush();
        }
    }
}

/// Print `message`, then a short window of `source` around `pos` with a caret
/// under the byte at `pos`.
pub fn print_error_with_context(message: &str, source: &[u8], pos: usize) {
    let (window, caret) = context_window(source, pos);
    eprintln!("{message}");
    eprintln!("  {window}");
    eprintln!("  {caret}");
    let _ = io::stderr().flush();
}

/// Render the source window and the caret line for `pos`.
///
/// Line breaks and other control bytes are shown as spaces so the caret stays
/// aligned; invalid UTF-8 is replaced lossily.
fn context_window(source: &[u8], pos: usize) -> (String, String) {
    let start = pos.saturating_sub(WINDOW_BYTES);
    let end = (pos + WINDOW_BYTES + 1).min(source.len());

    let before = printable(&source[start..pos.min(end)]);
    let window = printable(&source[start..end]);

    let mut caret = " ".repeat(before.chars().count());
    caret.push('^');
    (window, caret)
}

fn printable(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
