// src/printer/printers.rs

//! Specialized printer struct [`PrinterEvent`] and helper function
//! [`write_timeline_file`] for writing the timeline of [`Event`s].
//!
//! Each event is one line:
//!
//! ```text
//! <YYYY-MM-DD HH:MM:SS> <node> <raw text>
//! ```
//!
//! [`Event`s]: crate::data::event::Event

use crate::common::{Count, Error, FPath, NLu8, Result};
use crate::data::datetime::DATETIME_FORMAT_OUT;
use crate::data::event::Event;
use crate::debug::printers::de_err;
use crate::readers::helpers::fpath_to_path;

use std::io::{BufWriter, Write};
use std::path::Path;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::tempfile::{Builder, NamedTempFile};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// globals and constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Default path of the written timeline, CLI option `--output`.
pub const OUTPUT_FPATH_DEFAULT: &str = "ha_timeline.out";

const SPACE: &[u8] = b" ";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PrinterEvent
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Writes [`Event`]s as timeline lines to any [`Write`].
pub struct PrinterEvent<W: Write> {
    writer: W,
    /// events written
    printed: Count,
    /// bytes written
    printed_bytes: Count,
}

/// Macro to write to given writer. If there is an error then
/// `return Err`.
macro_rules! write_or_return {
    ($writer:expr, $slice_:expr, $printed:expr) => {
        match $writer.write_all($slice_) {
            Ok(_) => {
                $printed += $slice_.len() as Count;
            }
            Err(err) => {
                de_err!(
                    "{}.write({}) (len {})) error {}",
                    stringify!($writer),
                    stringify!($slice_),
                    $slice_.len(),
                    err
                );
                return Err(err);
            }
        }
    };
}

impl<W: Write> PrinterEvent<W> {
    pub fn new(writer: W) -> PrinterEvent<W> {
        PrinterEvent {
            writer,
            printed: 0,
            printed_bytes: 0,
        }
    }

    /// Write one `event` line.
    pub fn print_event(&mut self, event: &Event) -> std::io::Result<()> {
        let datetime: String = event.timestamp().format(DATETIME_FORMAT_OUT).to_string();
        write_or_return!(self.writer, datetime.as_bytes(), self.printed_bytes);
        write_or_return!(self.writer, SPACE, self.printed_bytes);
        write_or_return!(self.writer, event.node().as_bytes(), self.printed_bytes);
        write_or_return!(self.writer, SPACE, self.printed_bytes);
        write_or_return!(self.writer, event.raw_text().as_bytes(), self.printed_bytes);
        write_or_return!(self.writer, &[NLu8], self.printed_bytes);
        self.printed += 1;

        Ok(())
    }

    /// Write all `events`, in order.
    pub fn print_events(&mut self, events: &[Event]) -> std::io::Result<()> {
        for event in events.iter() {
            self.print_event(event)?;
        }

        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    pub const fn printed(&self) -> Count {
        self.printed
    }

    pub const fn printed_bytes(&self) -> Count {
        self.printed_bytes
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// writing the output file
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Mode of the written timeline file, like a file made by `>` redirection.
#[cfg(target_family = "unix")]
pub const OUTPUT_FILE_MODE: u32 = 0o644;

/// Write `events` to the file at `path`, replacing any file there.
///
/// The events are written to a temporary file in the same directory which
/// is renamed to `path` after the last event. On error, nothing is left at
/// `path`. Returns the count of events written.
pub fn write_timeline_file(path: &FPath, events: &[Event]) -> Result<Count> {
    defn!("({:?}, {} events)", path, events.len());
    let path_std: &Path = fpath_to_path(path);
    let dir: &Path = match path_std.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let ntf: NamedTempFile = Builder::new()
        .prefix(".hat-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|err| Error::io(path, err))?;
    defo!("ntf {:?}", ntf.path());

    let mut printer = PrinterEvent::new(BufWriter::new(ntf));
    printer
        .print_events(events)
        .map_err(|err| Error::io(path, err))?;
    printer.flush().map_err(|err| Error::io(path, err))?;
    let printed: Count = printer.printed();
    let ntf: NamedTempFile = printer
        .into_inner()
        .into_inner()
        .map_err(|err| Error::io(path, err.into_error()))?;
    #[cfg(target_family = "unix")]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut permissions = ntf
            .as_file()
            .metadata()
            .map_err(|err| Error::io(path, err))?
            .permissions();
        permissions.set_mode(OUTPUT_FILE_MODE);
        ntf.as_file()
            .set_permissions(permissions)
            .map_err(|err| Error::io(path, err))?;
    }
    ntf.persist(path_std)
        .map_err(|err| Error::io(path, err.error))?;
    defx!("wrote {} events", printed);

    Ok(printed)
}
