// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

//! Common imports, type aliases, the [`Dialect`] of a log source, and the
//! crate [`Error`] type.

use std::fmt;

#[doc(hidden)]
pub use std::fs::File;
#[doc(hidden)]
pub use std::path::Path;

use ::chrono::NaiveDateTime;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;
pub type FPaths = Vec<FPath>;
pub type FileOffset = u64;
pub type FileSz = u64;

/// A general-purpose counting type.
pub type Count = u64;

/// Identifier of a cluster node.
///
/// Either a host name (from a line header or a support bundle) or a
/// CLI slot label, [`NODE1`] or [`NODE2`]. Empty if unknown.
pub type NodeId = String;

/// CLI slot label of the first file passed to an option.
pub const NODE1: &str = "node1";
/// CLI slot label of the second file passed to an option.
pub const NODE2: &str = "node2";

/// Return the CLI slot label for the zero-based `slot`.
pub fn node_slot_label(slot: usize) -> NodeId {
    match slot {
        0 => NodeId::from(NODE1),
        1 => NodeId::from(NODE2),
        n => format!("node{}", n + 1),
    }
}

/// Single-byte newLine char as u8
#[allow(non_upper_case_globals)]
pub const NLu8: u8 = 10;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// log dialects
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The kind of log text within a file, regardless of where the file came
/// from.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum LogKind {
    /// Pacemaker daemon log, `pacemaker.log` or `corosync.log`.
    Pacemaker,
    /// System log, `messages` or `journal.log`.
    Syslog,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LogKind::Pacemaker => write!(f, "pacemaker"),
            LogKind::Syslog => write!(f, "syslog"),
        }
    }
}

/// Where a log line came from. Decided once when a source is resolved,
/// never re-sniffed per line.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Dialect {
    /// a plain Pacemaker log file
    Pacemaker,
    /// a plain system log file
    Syslog,
    /// a member of an `hb_report` bundle
    HbReport(LogKind),
    /// a member of a `sosreport` bundle
    SosReport(LogKind),
}

impl Dialect {
    /// The `LogKind` of text this dialect carries.
    pub const fn log_kind(&self) -> LogKind {
        match self {
            Dialect::Pacemaker => LogKind::Pacemaker,
            Dialect::Syslog => LogKind::Syslog,
            Dialect::HbReport(kind) => *kind,
            Dialect::SosReport(kind) => *kind,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Dialect::Pacemaker => write!(f, "pacemaker"),
            Dialect::Syslog => write!(f, "syslog"),
            Dialect::HbReport(kind) => write!(f, "hb_report/{}", kind),
            Dialect::SosReport(kind) => write!(f, "sosreport/{}", kind),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// All fatal conditions of _hatlib_.
///
/// Lines that match no category are not errors. Lines that are not valid
/// UTF-8 are skipped and counted, also not errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No input option was passed, or an option was passed too many files.
    #[error("{0}")]
    InputSelection(String),
    /// A bundle could not be opened, or an expected member is missing.
    #[error("archive {path:?}: {reason}")]
    ArchiveFormat { path: FPath, reason: String },
    /// A `begin` or `end` value is not `YYYY-MM-DD` or `YYYY-MM-DD-HH:MM`.
    #[error("timestamp {value:?} must be formatted YYYY-MM-DD or YYYY-MM-DD-HH:MM")]
    UnparsableTimestamp { value: String },
    /// `begin` is later than `end`.
    #[error("begin {begin} is later than end {end}")]
    InvalidRange {
        begin: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// Reading or writing a file failed.
    #[error("{path:?}: {source}")]
    Io {
        path: FPath,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn archive_format<S: Into<String>>(path: &FPath, reason: S) -> Error {
        Error::ArchiveFormat {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    pub fn io(path: &FPath, source: std::io::Error) -> Error {
        Error::Io {
            path: path.clone(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
