// src/readers/linereader.rs

//! Implements a [`RawLineReader`], the lazy iterator of [`RawLine`]s of one
//! log source.
//!
//! Reads bytes up to each newline. Lines that are not valid UTF-8 are
//! skipped, one at a time, and counted; the rest of the source is still
//! read.

use crate::common::{Dialect, Error, FPath, NLu8, NodeId, Result};
use crate::data::event::RawLine;
use crate::readers::summary::SummaryLineReader;

use std::fmt;
use std::io::BufRead;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Initial capacity of the line buffer.
const LINE_CAPACITY: usize = 512;

/// Iterator of the [`RawLine`]s of a buffered reader.
///
/// Items are `Err` only for read failures; after the first `Err` the
/// iterator is done.
pub struct RawLineReader<R: BufRead> {
    reader: R,
    /// source path, for error messages
    path: FPath,
    dialect: Dialect,
    node: NodeId,
    buffer: Vec<u8>,
    done: bool,
    summary: SummaryLineReader,
}

impl<R: BufRead> fmt::Debug for RawLineReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RawLineReader")
            .field("path", &self.path)
            .field("dialect", &self.dialect)
            .field("node", &self.node)
            .field("done", &self.done)
            .field("summary", &self.summary)
            .finish()
    }
}

impl<R: BufRead> RawLineReader<R> {
    pub fn new(reader: R, path: FPath, dialect: Dialect, node: NodeId) -> RawLineReader<R> {
        defñ!("({:?}, {:?}, {:?})", path, dialect, node);
        RawLineReader {
            reader,
            path,
            dialect,
            node,
            buffer: Vec::with_capacity(LINE_CAPACITY),
            done: false,
            summary: SummaryLineReader::default(),
        }
    }

    pub fn summary(&self) -> SummaryLineReader {
        self.summary
    }

    pub fn path(&self) -> &FPath {
        &self.path
    }
}

impl<R: BufRead> Iterator for RawLineReader<R> {
    type Item = Result<RawLine>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buffer.clear();
            let read: usize = match self.reader.read_until(NLu8, &mut self.buffer) {
                Ok(val) => val,
                Err(err) => {
                    defo!("read_until Err {:?}", err);
                    self.done = true;
                    return Some(Err(Error::io(&self.path, err)));
                }
            };
            if read == 0 {
                self.done = true;
                break;
            }
            self.summary.LineReader_bytes += read as u64;
            let mut line: &[u8] = self.buffer.as_slice();
            if let Some(stripped) = line.strip_suffix(&[NLu8]) {
                line = stripped;
            }
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            match std::str::from_utf8(line) {
                Ok(text) => {
                    self.summary.LineReader_lines += 1;
                    return Some(Ok(RawLine::new(
                        text.to_string(),
                        self.dialect,
                        self.node.clone(),
                    )));
                }
                Err(_err) => {
                    defo!("skip undecodable line; {}", _err);
                    self.summary.LineReader_lines_undecodable += 1;
                }
            }
        }

        None
    }
}
