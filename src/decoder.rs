use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{LogRecord, RECORD_SIZE};

/// Various errors which can arise while replaying a capture
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to open capture file {path:?}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read the capture stream after {frames} complete frames")]
    Read {
        frames: usize,
        #[source]
        source: io::Error,
    },
    #[error("failed to write a decoded frame")]
    Write(#[source] io::Error),
}

/// Pulls consecutive fixed-size records out of a capture byte stream.
///
/// The capture format has no sync marker between records: the stream is
/// trusted to start on a record boundary, and anything that shifts byte
/// alignment upstream (a dropped byte on the logger's storage path) makes
/// every following record decode to plausible-looking garbage that cannot be
/// detected here. Known limitation of the format.
///
/// A partial record at the very end of the stream (fewer than 16 bytes left)
/// ends the replay cleanly without producing a frame; the leftover bytes are
/// dropped and [`is_truncated`](Self::is_truncated) reports that it happened.
pub struct FrameDecoder<R> {
    reader: R,
    frames: usize,
    truncated: bool,
    done: bool,
}

impl<R: Read> FrameDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            frames: 0,
            truncated: false,
            done: false,
        }
    }

    /// Decodes the next record, or `None` once the stream is exhausted.
    ///
    /// Exhaustion is terminal: once `None` has been returned, every further
    /// call returns `None` without touching the reader.
    pub fn next_record(&mut self) -> Result<Option<LogRecord>, ReplayError> {
        if self.done {
            return Ok(None);
        }

        let mut buffer = [0u8; RECORD_SIZE];
        let mut filled = 0;

        while filled < RECORD_SIZE {
            match self.reader.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Err(ReplayError::Read {
                        frames: self.frames,
                        source: e,
                    });
                }
            }
        }

        if filled < RECORD_SIZE {
            self.done = true;

            if filled > 0 {
                self.truncated = true;
                debug!("dropping {} byte partial record at end of capture", filled);
            }

            return Ok(None);
        }

        self.frames += 1;

        Ok(Some(LogRecord::from_bytes(&buffer)))
    }

    /// Number of complete records decoded so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Whether the stream ended in the middle of a record.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl<R: Read> Iterator for FrameDecoder<R> {
    type Item = Result<LogRecord, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Opens a capture file for replay. A failed open is the only error this can
/// produce; everything after it comes from the decoder itself.
pub fn open_capture(path: &Path) -> Result<FrameDecoder<BufReader<File>>, ReplayError> {
    let file = File::open(path).map_err(|source| ReplayError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(FrameDecoder::new(BufReader::new(file)))
}
