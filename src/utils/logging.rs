//! Structured logging to the browser console.
//!
//! `tracing` events are formatted by `tracing-subscriber` and forwarded to
//! the matching `console` method, so browser devtools can filter by level.

use std::io::{self, Write};

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

use crate::config::LOG_LEVEL;

/// Buffers one formatted event and writes it to the console when dropped.
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buffer);
        let text = text.trim_end();
        if text.is_empty() {
            return;
        }
        let message = JsValue::from_str(text);
        match self.level {
            Level::ERROR => console::error_1(&message),
            Level::WARN => console::warn_1(&message),
            Level::INFO => console::info_1(&message),
            _ => console::debug_1(&message),
        }
    }
}

/// [`MakeWriter`] producing one [`ConsoleWriter`] per event.
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

/// Parse a level name, defaulting to `info`.
pub fn parse_level(value: &str) -> Level {
    value.trim().parse().unwrap_or(Level::INFO)
}

/// Install the global subscriber. Call once, before mounting the app.
pub fn init() {
    let result = tracing_subscriber::fmt()
        .with_writer(MakeConsoleWriter)
        .with_max_level(parse_level(LOG_LEVEL))
        .with_ansi(false)
        .without_time()
        .try_init();
    if let Err(e) = result {
        console::warn_1(&JsValue::from_str(&format!("logging not initialized: {}", e)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("verbose"), Level::INFO);
    }

    #[test]
    fn test_writer_buffers_until_drop() {
        let mut writer = ConsoleWriter::new(Level::DEBUG);
        write!(writer, "cache ").unwrap();
        write!(writer, "hit").unwrap();
        assert_eq!(writer.buffer, b"cache hit");
        // Empty the buffer so dropping does not reach the browser console.
        writer.buffer.clear();
    }
}
