//! Console Logger
//!
//! `tracing-subscriber` fmt output routed to the browser console. Each event
//! is buffered by its writer and emitted as one console call picked by level,
//! so devtools filtering by severity keeps working.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Writer for a single formatted event
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self { level, buf: Vec::new() }
    }

    fn emit(&mut self) {
        let Some(line) = take_line(&mut self.buf) else {
            return;
        };
        let line = wasm_bindgen::JsValue::from_str(&line);
        match self.level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.emit();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        self.emit();
    }
}

/// `MakeWriter` handing out one console writer per event
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Drain the buffer into one line without the trailing newline
fn take_line(buf: &mut Vec<u8>) -> Option<String> {
    if buf.is_empty() {
        return None;
    }
    let line = String::from_utf8_lossy(buf).trim_end().to_string();
    buf.clear();
    (!line.is_empty()).then_some(line)
}

/// Parse a level name ("debug", "warn", "off", ...), INFO when unrecognised.
/// Numeric verbosity is not accepted.
pub fn parse_level(level: &str) -> LevelFilter {
    let level = level.trim();
    if level.eq_ignore_ascii_case("off") {
        return LevelFilter::OFF;
    }
    if level.is_empty() || level.bytes().all(|b| b.is_ascii_digit()) {
        return LevelFilter::INFO;
    }
    level
        .parse::<Level>()
        .map(LevelFilter::from_level)
        .unwrap_or(LevelFilter::INFO)
}

/// Install the console subscriber as the global default.
/// Returns false if a subscriber was already installed.
pub fn init(level: &str) -> bool {
    tracing_subscriber::fmt()
        .with_writer(MakeConsoleWriter)
        .with_max_level(parse_level(level))
        .with_ansi(false)
        .without_time()
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::DEBUG);
        assert_eq!(parse_level(" WARN "), LevelFilter::WARN);
        assert_eq!(parse_level("off"), LevelFilter::OFF);
        assert_eq!(parse_level("chatty"), LevelFilter::INFO);
        assert_eq!(parse_level(""), LevelFilter::INFO);
    }

    #[test]
    fn test_parse_level_rejects_blank_and_numeric() {
        assert_eq!(parse_level("   "), LevelFilter::INFO);
        assert_eq!(parse_level("1"), LevelFilter::INFO);
        assert_eq!(parse_level("5"), LevelFilter::INFO);
        assert_eq!(parse_level("Trace"), LevelFilter::TRACE);
        assert_eq!(parse_level("OFF"), LevelFilter::OFF);
    }

    #[test]
    fn test_take_line_strips_newline_and_clears() {
        let mut buf = b" INFO kanban_board: bound 3 columns\n".to_vec();
        assert_eq!(take_line(&mut buf).as_deref(), Some(" INFO kanban_board: bound 3 columns"));
        assert!(buf.is_empty());
        assert_eq!(take_line(&mut buf), None);
    }

    #[test]
    fn test_take_line_skips_blank_output() {
        let mut buf = b"\n\n".to_vec();
        assert_eq!(take_line(&mut buf), None);
        assert!(buf.is_empty());
    }
}
