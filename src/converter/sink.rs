use std::io::{self, Write};

use log::warn;

/// Owns the output writer for the duration of one conversion.
///
/// [`Sink::finish`] flushes and hands the writer back. If the guard is
/// dropped without finishing, the writer is flushed and released anyway, and a
/// failure at that point is only logged so it never replaces the error that
/// caused the early exit.
pub(crate) struct Sink<W: Write> {
    inner: Option<W>,
}

impl<W: Write> Sink<W> {
    pub(crate) fn new(inner: W) -> Sink<W> {
        Sink { inner: Some(inner) }
    }

    pub(crate) fn finish(mut self) -> io::Result<W> {
        let mut inner = self.inner.take().ok_or_else(released)?;
        inner.flush()?;
        Ok(inner)
    }
}

fn released() -> io::Error {
    io::Error::other("lock file sink was already released")
}

impl<W: Write> Write for Sink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.as_mut().ok_or_else(released)?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.as_mut().ok_or_else(released)?.flush()
    }
}

impl<W: Write> Drop for Sink<W> {
    fn drop(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            if let Err(err) = inner.flush() {
                warn!("Ignoring error while releasing lock file output: {err}");
            }
        }
    }
}
