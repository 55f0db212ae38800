// Copyright (C) 2023, Ava Labs, Inc. All rights reserved.
// See the file LICENSE.md for licensing terms.

use std::io::{Cursor, ErrorKind, Read};

use metrics::counter;

use crate::logger::{debug, trace};

/// The error returned by [`RewindReader::rewind`] when no buffered data remains
/// usable, because the consumer read past the end of the captured bytes.
///
/// This is a normal, checkable outcome of reading too far, not a fault;
/// [`RewindReader::is_rewindable`] reports it without attempting the rewind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("cannot rewind unbuffered stream")]
pub struct RewindUnavailable;

impl From<RewindUnavailable> for std::io::Error {
    fn from(err: RewindUnavailable) -> Self {
        std::io::Error::new(ErrorKind::Unsupported, err)
    }
}

/// Where reads are currently served from.
///
/// `Accumulating` tees every byte delivered from the source into a growable
/// capture buffer. `Frozen` replays a snapshot of the capture, cursor first.
/// `Unbuffered` means the capture is gone and reads pass straight through to
/// the source; it is terminal.
#[derive(Debug)]
enum BufferState {
    Accumulating(Vec<u8>),
    Frozen(Cursor<Vec<u8>>),
    Unbuffered,
}

/// A [`Read`] adapter that buffers the bytes it delivers so the stream can be
/// rewound to its start and re-read.
///
/// Reads are forwarded to the wrapped source and captured until the first call
/// to [`rewind`](Self::rewind); from then on they replay the captured bytes,
/// falling back to the source once the capture is exhausted. Reading past the
/// end of the captured data (including reading the source to its natural end
/// before ever rewinding) permanently drops the capture, and any later rewind
/// fails with [`RewindUnavailable`].
#[derive(Debug)]
pub struct RewindReader<R> {
    source: R,
    buffer: BufferState,
}

impl<R: Read> RewindReader<R> {
    /// Returns a new `RewindReader` reading from `source`, with an empty
    /// capture buffer.
    #[must_use]
    pub const fn new(source: R) -> Self {
        Self {
            source,
            buffer: BufferState::Accumulating(Vec::new()),
        }
    }

    /// Like [`new`](Self::new), but pre-allocates the capture buffer for
    /// callers that know how much they will read before rewinding.
    #[must_use]
    pub fn with_capacity(capacity: usize, source: R) -> Self {
        Self {
            source,
            buffer: BufferState::Accumulating(Vec::with_capacity(capacity)),
        }
    }

    /// Rewinds the stream to its start.
    ///
    /// The first rewind freezes the bytes captured so far into a snapshot and
    /// replays it; later rewinds reset the snapshot back to its start without
    /// reallocating. Rewinding is idempotent while the snapshot remains live.
    ///
    /// # Errors
    ///
    /// Returns [`RewindUnavailable`] if the consumer has already read past the
    /// end of the captured data, either by draining a replayed snapshot and
    /// continuing into the source, or by reading the source to its natural end
    /// before ever rewinding.
    pub fn rewind(&mut self) -> Result<(), RewindUnavailable> {
        match &mut self.buffer {
            BufferState::Accumulating(capture) => {
                trace!("freezing {} captured bytes for replay", capture.len());
                counter!("rewind_reader.rewind", "outcome" => "ok").increment(1);
                let snapshot = Cursor::new(std::mem::take(capture));
                self.buffer = BufferState::Frozen(snapshot);
                Ok(())
            }
            BufferState::Frozen(snapshot) => {
                trace!(
                    "resetting replay snapshot of {} bytes",
                    snapshot.get_ref().len()
                );
                counter!("rewind_reader.rewind", "outcome" => "ok").increment(1);
                snapshot.set_position(0);
                Ok(())
            }
            BufferState::Unbuffered => {
                counter!("rewind_reader.rewind", "outcome" => "unavailable").increment(1);
                Err(RewindUnavailable)
            }
        }
    }

    /// Returns true if a call to [`rewind`](Self::rewind) would succeed.
    #[must_use]
    pub const fn is_rewindable(&self) -> bool {
        !matches!(self.buffer, BufferState::Unbuffered)
    }

    /// The number of bytes a successful rewind would make readable again:
    /// the capture length before the first rewind, the snapshot length while
    /// replaying, and 0 once the capture has been dropped.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        match &self.buffer {
            BufferState::Accumulating(capture) => capture.len(),
            BufferState::Frozen(snapshot) => snapshot.get_ref().len(),
            BufferState::Unbuffered => 0,
        }
    }

    /// Returns a reference to the wrapped source.
    #[must_use]
    pub const fn get_ref(&self) -> &R {
        &self.source
    }

    /// Returns a mutable reference to the wrapped source.
    ///
    /// Bytes read directly from the source bypass the capture buffer and will
    /// not be replayed after a rewind.
    #[must_use]
    pub const fn get_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Unwraps the reader, returning the source and discarding any captured
    /// bytes.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R: Read> Read for RewindReader<R> {
    #[expect(clippy::indexing_slicing)]
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        // A zero-byte read carries no end-of-stream signal, so it must not
        // trigger either buffering-loss transition below.
        if buf.is_empty() {
            return Ok(0);
        }
        match &mut self.buffer {
            BufferState::Accumulating(capture) => {
                let n = self.source.read(buf)?;
                if n == 0 {
                    // End of stream while still teeing. The consumer drained
                    // the capture in lockstep with the source, so drop it and
                    // retry once against the source in case more data has
                    // become available.
                    debug!(
                        "end of stream after {} captured bytes; dropping capture",
                        capture.len()
                    );
                    counter!("rewind_reader.unbuffered", "from" => "tee").increment(1);
                    self.buffer = BufferState::Unbuffered;
                    return self.source.read(buf);
                }
                capture.extend_from_slice(&buf[..n]);
                Ok(n)
            }
            BufferState::Frozen(snapshot) => {
                let n = snapshot.read(buf)?;
                if n == 0 {
                    // Snapshot exhausted mid-read; from here on the source is
                    // read directly and rewinding is no longer possible.
                    debug!("replay snapshot exhausted; continuing from source");
                    counter!("rewind_reader.unbuffered", "from" => "replay").increment(1);
                    self.buffer = BufferState::Unbuffered;
                    return self.source.read(buf);
                }
                Ok(n)
            }
            BufferState::Unbuffered => self.source.read(buf),
        }
    }
}
