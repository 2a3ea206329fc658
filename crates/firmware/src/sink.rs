//! Report sinks.
//!
//! The decoder writes to any [`core::fmt::Write`]. These adapters connect it
//! to the outputs a board actually has:
//!
//! - [`IoWriter`]: any `embedded_io::Write` (UART, USB CDC, a byte buffer)
//! - [`LineSink`]: line-buffered callback, the basis of [`DefmtSink`]

use core::fmt;

use heapless::String;

/// Longest line a [`LineSink`] emits in one piece. Longer lines are split.
pub const LINE_CAPACITY: usize = 160;

/// [`fmt::Write`] over an `embedded_io::Write` byte stream.
///
/// With [`crlf`](Self::crlf) every `\n` is sent as `\r\n`, which serial
/// terminals expect.
pub struct IoWriter<W> {
    inner: W,
    crlf: bool,
}

impl<W: embedded_io::Write> IoWriter<W> {
    /// Wrap `inner`, passing line endings through unchanged.
    pub const fn new(inner: W) -> Self {
        Self { inner, crlf: false }
    }

    /// Translate `\n` to `\r\n`.
    #[must_use]
    pub fn crlf(mut self) -> Self {
        self.crlf = true;
        self
    }

    /// Give back the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> fmt::Result {
        self.inner.write_all(bytes).map_err(|_| fmt::Error)
    }
}

impl<W: embedded_io::Write> fmt::Write for IoWriter<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if !self.crlf {
            return self.write_bytes(s.as_bytes());
        }
        let mut lines = s.split('\n');
        if let Some(first) = lines.next() {
            self.write_bytes(first.as_bytes())?;
        }
        for line in lines {
            self.write_bytes(b"\r\n")?;
            self.write_bytes(line.as_bytes())?;
        }
        Ok(())
    }
}

/// Line-buffered [`fmt::Write`] that hands each completed line to `emit`,
/// without the trailing newline.
///
/// Call [`finish`](Self::finish) to emit a final line that has no newline.
pub struct LineSink<F, const N: usize> {
    line: String<N>,
    emit: F,
}

impl<F: FnMut(&str), const N: usize> LineSink<F, N> {
    /// Sink that calls `emit` once per line.
    pub const fn new(emit: F) -> Self {
        Self {
            line: String::new(),
            emit,
        }
    }

    /// Emit any buffered partial line.
    pub fn finish(&mut self) {
        if !self.line.is_empty() {
            self.flush_line();
        }
    }

    fn flush_line(&mut self) {
        (self.emit)(self.line.as_str());
        self.line.clear();
    }
}

impl<F: FnMut(&str), const N: usize> fmt::Write for LineSink<F, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if c == '\n' {
                self.flush_line();
                continue;
            }
            if self.line.push(c).is_err() {
                self.flush_line();
                self.line.push(c).map_err(|_| fmt::Error)?;
            }
        }
        Ok(())
    }
}

/// Report lines over defmt, one `println!` per line.
#[cfg(feature = "defmt")]
pub type DefmtSink = LineSink<fn(&str), LINE_CAPACITY>;

/// A [`DefmtSink`] ready to pass to the decoder.
#[cfg(feature = "defmt")]
pub fn defmt_sink() -> DefmtSink {
    fn emit(line: &str) {
        defmt::println!("{=str}", line);
    }
    LineSink::new(emit as fn(&str))
}
