use std::io::{self, Read};
use std::thread;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::runtime::Handle;
use tracing::error;

/// Provides a facility to read LF-terminated lines from a stream. A CR
/// immediately before the LF is dropped too, so CRLF files read the same.
pub struct LineReader<T: AsyncRead + Unpin> {
    /// Stores data that's been read in but lacks a LF.
    buf: BytesMut,
    /// Index in buf from which a LF may appear (and before which one hasn't
    /// been seen).
    maybe_lf_from: usize,
    /// Data source
    reader: T,
    /// On a reading error, this field is set and its value returned once the
    /// buffer is drained of pending lines.
    pending_error: Option<io::Error>,
}

impl<T: AsyncRead + Unpin> LineReader<T> {
    /// Reads a line from the internal buffer and/or reader, without its line
    /// terminator. On an end-of-stream condition, any unterminated text left
    /// in the buffer is returned as a final line; after that, returns None.
    ///
    /// This function is cancel-safe: its only async operation is a `read_buf`
    /// against the internal `reader`, and so it has the same guarantees:
    /// either a complete read occurs and is processed, or this is cancelled.
    ///
    /// On a read error, the error value is returned after processing all
    /// pending lines in the internal buffer.
    pub async fn read_line(&mut self) -> io::Result<Option<Bytes>> {
        loop {
            // Only scan the bytes added since the last look, keeping
            // O(bytes_read) behaviour across partial reads.
            if let Some(eol) = self.buf[self.maybe_lf_from..]
                .iter()
                .position(|c| *c == b'\n')
            {
                let line = self.buf.split_to(self.maybe_lf_from + eol + 1);
                self.maybe_lf_from = 0;

                return Ok(Some(strip_eol(line.freeze())));
            } else {
                self.maybe_lf_from = self.buf.len();

                // Try reading from the reader and accumulating in the buffer;
                // if we receive any bytes, re-scan for a LF, otherwise
                // assume the stream has ended.
                let n_bytes_read =
                    match self.reader.read_buf(&mut self.buf).await {
                        Ok(n) => n,
                        Err(e) => {
                            self.pending_error = Some(e);
                            0
                        },
                    };

                if n_bytes_read == 0 {
                    if let Some(e) = self.pending_error.take() {
                        return Err(e);
                    }

                    // Files commonly lack a trailing newline.
                    if self.buf.is_empty() {
                        return Ok(None);
                    }

                    self.maybe_lf_from = 0;
                    let line = self.buf.split().freeze();
                    return Ok(Some(strip_eol(line)));
                }
            }
        }
    }
}

/// Moves blocking reads from `reader` onto a dedicated OS thread, handing back
/// the other end as an async stream. Unlike reads on tokio's blocking pool, a
/// stalled read here doesn't hold up runtime shutdown.
///
/// A read error is logged and ends the stream. Must be called from within a
/// tokio runtime.
pub fn read_on_thread<R>(mut reader: R) -> DuplexStream
where
    R: Read + Send + 'static,
{
    let (mut tx, rx) = tokio::io::duplex(64 * 1024);
    let handle = Handle::current();

    thread::spawn(move || {
        let mut buf = [0u8; 8192];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => {
                    error!(%error, "reading input");
                    break;
                },
            };

            // Fails once the reading side has gone away.
            if handle.block_on(tx.write_all(&buf[..n])).is_err() {
                break;
            }
        }
    });

    rx
}

/// Drops a trailing b"\n" or b"\r\n".
fn strip_eol(line: Bytes) -> Bytes {
    let line = match line.last() {
        Some(b'\n') => line.slice(..line.len() - 1),
        _ => line,
    };

    match line.last() {
        Some(b'\r') => line.slice(..line.len() - 1),
        _ => line,
    }
}

impl<T: AsyncRead + Unpin> From<T> for LineReader<T> {
    fn from(value: T) -> Self {
        Self {
            buf: BytesMut::new(),
            maybe_lf_from: 0,
            reader: value,
            pending_error: None,
        }
    }
}
