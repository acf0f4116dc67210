//! Output masking for secret values.
//!
//! [`Masker`] rewrites secret occurrences in a buffer; [`MaskingWriter`]
//! applies it to a stream one line at a time.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use super::set::SecretSet;

/// Replacement written in place of every secret occurrence.
pub const MASK: &str = "******";

/// Replaces secret byte sequences with [`MASK`].
///
/// Matching is exact and case-sensitive. The scan is leftmost-first; when
/// several secrets start at the same offset the longest one wins. Matches
/// never overlap: scanning resumes right after each replaced secret.
///
/// # Example
///
/// ```
/// use sonar_env::secrets::{Masker, SecretSet};
///
/// let secrets: SecretSet = ["password"].into_iter().collect();
/// let masker = Masker::new(&secrets);
///
/// assert_eq!(masker.mask("the pass is: password"), "the pass is: ******");
/// ```
#[derive(Clone)]
pub struct Masker {
    /// Longest first, so the first hit at an offset is the longest.
    secrets: Arc<[Vec<u8>]>,
}

impl Masker {
    /// Build a masker for the given secrets.
    pub fn new(secrets: &SecretSet) -> Self {
        let mut ordered: Vec<Vec<u8>> = secrets.iter().map(|s| s.as_bytes().to_vec()).collect();
        ordered.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self {
            secrets: ordered.into(),
        }
    }

    /// True when there is nothing to mask.
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    /// Mask every secret occurrence in `input`.
    pub fn mask_bytes(&self, input: &[u8]) -> Vec<u8> {
        if self.is_empty() {
            return input.to_vec();
        }

        let mut out = Vec::with_capacity(input.len());
        let mut pos = 0;
        while pos < input.len() {
            let rest = &input[pos..];
            match self.secrets.iter().find(|secret| rest.starts_with(secret)) {
                Some(secret) => {
                    out.extend_from_slice(MASK.as_bytes());
                    pos += secret.len();
                }
                None => {
                    out.push(input[pos]);
                    pos += 1;
                }
            }
        }
        out
    }

    /// Mask every secret occurrence in a string.
    pub fn mask(&self, input: &str) -> String {
        // Secrets are whole UTF-8 strings, so matches fall on char boundaries.
        String::from_utf8(self.mask_bytes(input.as_bytes()))
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
    }

    /// Wrap `inner` in a line-buffered masking writer.
    pub fn writer<W: Write>(&self, inner: W) -> MaskingWriter<W> {
        MaskingWriter::new(inner, self.clone())
    }
}

impl fmt::Debug for Masker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Masker")
            .field("secrets", &self.secrets.len())
            .finish()
    }
}

/// Wrap an optional log sink in a masking writer.
///
/// Returns `None` when there is no sink, meaning the step needs no log
/// decoration. With an empty secret set the writer passes bytes through
/// untouched.
///
/// # Example
///
/// ```
/// use sonar_env::secrets::{decorate, SecretSet};
/// use std::io::Write;
///
/// let secrets: SecretSet = ["password"].into_iter().collect();
/// let mut log = Vec::new();
/// {
///     let mut out = decorate(Some(&mut log), &secrets).unwrap();
///     out.write_all(b"test password\n").unwrap();
/// }
/// assert_eq!(log, b"test ******\n");
///
/// assert!(decorate(None::<Vec<u8>>, &secrets).is_none());
/// ```
pub fn decorate<W: Write>(sink: Option<W>, secrets: &SecretSet) -> Option<MaskingWriter<W>> {
    sink.map(|inner| MaskingWriter::new(inner, Masker::new(secrets)))
}

/// Line buffer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Accumulating bytes of the current line.
    Buffering,
    /// The buffer holds a finished line waiting to go downstream.
    Flushing,
}

/// A writer that masks secret values line by line.
///
/// Bytes are buffered until a `\n` arrives; the completed line is then
/// masked and forwarded with its terminator. [`flush`](Write::flush) only
/// flushes the inner writer, so a secret split across writes is still
/// caught. [`close`](MaskingWriter::close) emits any trailing partial line;
/// dropping an unclosed writer does the same, ignoring errors.
///
/// When the inner writer fails before taking any byte of a masked line,
/// the line is handed back to the caller. Once part of it went downstream
/// the rest is kept and sent ahead of any later output.
pub struct MaskingWriter<W: Write> {
    inner: W,
    masker: Masker,
    line: Vec<u8>,
    /// Masked bytes accepted from the caller but not yet written.
    backlog: Vec<u8>,
    state: State,
    closed: bool,
}

impl<W: Write> MaskingWriter<W> {
    /// Wrap `inner`.
    pub fn new(inner: W, masker: Masker) -> Self {
        Self {
            inner,
            masker,
            line: Vec::new(),
            backlog: Vec::new(),
            state: State::Buffering,
            closed: false,
        }
    }

    /// Get a reference to the wrapped writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Bytes of the current, not yet terminated line.
    pub fn pending(&self) -> &[u8] {
        &self.line
    }

    /// The masker applied to every line.
    pub fn masker(&self) -> &Masker {
        &self.masker
    }

    /// Whether this writer rewrites anything at all.
    pub fn is_transparent(&self) -> bool {
        self.masker.is_empty()
    }

    /// Forward the buffered line if one is complete.
    ///
    /// Fails only when nothing of the line reached the inner writer; a
    /// partially written line moves its remainder to the backlog.
    fn forward_line(&mut self) -> io::Result<()> {
        if self.state != State::Flushing {
            return Ok(());
        }
        self.drain_backlog()?;

        let masked = self.masker.mask_bytes(&self.line);
        let (written, result) = write_partial(&mut self.inner, &masked);
        if written == 0 {
            result?;
        } else if let Err(err) = &result {
            tracing::debug!(error = %err, "masked line partially written");
        }

        self.backlog.extend_from_slice(&masked[written..]);
        self.line.clear();
        self.state = State::Buffering;
        Ok(())
    }

    /// Write out masked bytes left over from an earlier partial write.
    fn drain_backlog(&mut self) -> io::Result<()> {
        let (written, result) = write_partial(&mut self.inner, &self.backlog);
        self.backlog.drain(..written);
        result
    }

    /// Emit the trailing partial line and flush the inner writer.
    ///
    /// Calling `close` again is a no-op.
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        if !self.line.is_empty() {
            self.state = State::Flushing;
        }
        self.forward_line()?;
        self.drain_backlog()?;
        self.inner.flush()?;
        self.closed = true;
        Ok(())
    }
}

impl<W: Write> Write for MaskingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "masking writer is closed",
            ));
        }
        self.drain_backlog()?;
        if self.masker.is_empty() {
            return self.inner.write(buf);
        }

        let mut consumed = 0;
        for chunk in buf.split_inclusive(|b| *b == b'\n') {
            let mark = self.line.len();
            self.line.extend_from_slice(chunk);

            if chunk.ends_with(b"\n") {
                self.state = State::Flushing;
                if let Err(err) = self.forward_line() {
                    // Give the chunk back so the caller's retry does not duplicate it
                    self.line.truncate(mark);
                    self.state = State::Buffering;
                    return if consumed == 0 { Err(err) } else { Ok(consumed) };
                }
            }
            consumed += chunk.len();
        }
        Ok(consumed)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain_backlog()?;
        self.inner.flush()
    }
}

/// Write as much of `data` as `inner` accepts.
///
/// Returns the number of bytes written and the error that stopped it.
fn write_partial<W: Write>(inner: &mut W, data: &[u8]) -> (usize, io::Result<()>) {
    let mut written = 0;
    while written < data.len() {
        match inner.write(&data[written..]) {
            Ok(0) => return (written, Err(io::ErrorKind::WriteZero.into())),
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return (written, Err(e)),
        }
    }
    (written, Ok(()))
}

impl<W: Write> Drop for MaskingWriter<W> {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.close();
        }
    }
}

impl<W: Write> fmt::Debug for MaskingWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskingWriter")
            .field("masker", &self.masker)
            .field("pending", &self.line.len())
            .field("backlog", &self.backlog.len())
            .field("state", &self.state)
            .field("closed", &self.closed)
            .finish()
    }
}
