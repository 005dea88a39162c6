// src/readers/filepreprocessor.rs

//! Functions to turn user-passed paths into [`LogSource`]s, the log files
//! to classify.
//!
//! A plain log file is one `LogSource`. A support bundle is a `.tar` file,
//! maybe compressed, holding log files at known places:
//!
//! * `hb_report` (crm_report): one top directory with one directory per
//!   node. Node names are listed in `members.txt`, or else in the
//!   `ring0_addr` entries of `corosync.conf`. Each node directory holds
//!   `pacemaker.log` (or `corosync.log`) and `messages` (or `journal.log`).
//! * `sosreport`: one top directory with the node's `etc/` and `var/log/`.
//!   RHEL 8 and later log to `var/log/pacemaker/pacemaker.log`, earlier
//!   versions to `var/log/cluster/corosync.log`. The system log is
//!   `var/log/messages`.
//!
//! A compressed bundle is decompressed once to a temporary file. The
//! members of a `.tar` file are then read in place, one at a time, from
//! their byte offset within the `.tar` file.

use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Take};
use std::path::Path;
use std::sync::Arc;

use crate::common::{
    node_slot_label,
    Dialect,
    Error,
    FPath,
    FPaths,
    File,
    FileOffset,
    FileSz,
    LogKind,
    NodeId,
    Result,
};
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn, e_err, e_wrn};
use crate::readers::filedecompressor::{decompress_to_ntf, detect_compression, Compression};
use crate::readers::helpers::{fpath_to_path, tar_subpath_normalize};
use crate::readers::linereader::RawLineReader;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::tempfile::NamedTempFile;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// InputSelection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub const PACEMAKER_LOGS_MAX: usize = 2;
pub const SYSTEM_LOGS_MAX: usize = 2;
pub const HB_REPORTS_MAX: usize = 1;
pub const SOSREPORTS_MAX: usize = 2;

/// The user-passed input paths, validated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InputSelection {
    pacemaker_logs: FPaths,
    system_logs: FPaths,
    hb_reports: FPaths,
    sosreports: FPaths,
}

impl InputSelection {
    /// Fails with [`Error::InputSelection`] if all are empty or any has too
    /// many paths.
    pub fn new(
        pacemaker_logs: FPaths,
        system_logs: FPaths,
        hb_reports: FPaths,
        sosreports: FPaths,
    ) -> Result<InputSelection> {
        defn!();
        if pacemaker_logs.is_empty() && system_logs.is_empty() && hb_reports.is_empty() && sosreports.is_empty() {
            defx!("no input");
            return Err(Error::InputSelection(String::from(
                "specify at least one file to parse; a pacemaker log, a system log, an hb_report, or a sosreport",
            )));
        }
        for (paths, max, what) in [
            (&pacemaker_logs, PACEMAKER_LOGS_MAX, "pacemaker logs"),
            (&system_logs, SYSTEM_LOGS_MAX, "system logs"),
            (&hb_reports, HB_REPORTS_MAX, "hb_report"),
            (&sosreports, SOSREPORTS_MAX, "sosreports"),
        ] {
            if paths.len() > max {
                defx!("too many {}", what);
                return Err(Error::InputSelection(format!(
                    "specify at most {} {}, one per node; given {}",
                    max,
                    what,
                    paths.len()
                )));
            }
        }
        defx!();

        Ok(InputSelection {
            pacemaker_logs,
            system_logs,
            hb_reports,
            sosreports,
        })
    }

    pub fn pacemaker_logs(&self) -> &FPaths {
        &self.pacemaker_logs
    }

    pub fn system_logs(&self) -> &FPaths {
        &self.system_logs
    }

    pub fn hb_reports(&self) -> &FPaths {
        &self.hb_reports
    }

    pub fn sosreports(&self) -> &FPaths {
        &self.sosreports
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TarArchive
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A regular file within a `.tar` file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TarMember {
    /// normalized path within the `.tar` file, see [`tar_subpath_normalize`]
    pub subpath: FPath,
    /// byte offset of the file contents within the `.tar` file
    pub offset: FileOffset,
    pub size: FileSz,
}

/// An opened support bundle; the enumerated regular files of a `.tar`
/// file, decompressed to a temporary file if needed.
#[derive(Debug)]
pub struct TarArchive {
    /// user-passed path
    path: FPath,
    compression: Compression,
    /// the decompressed `.tar`, if `path` is compressed
    ntf: Option<NamedTempFile>,
    members: Vec<TarMember>,
    /// top directory common to all members, maybe empty
    prefix: FPath,
}

/// Path separator between a `.tar` file path and a path within it.
pub const SUBPATH_SEP: char = '|';

impl TarArchive {
    /// Open, maybe decompress, and enumerate the bundle at `path`.
    ///
    /// Any failure is an [`Error::ArchiveFormat`].
    pub fn open(path: &FPath) -> Result<TarArchive> {
        defn!("({:?})", path);
        let path_std: &Path = fpath_to_path(path);
        let archive_err = |err: Error| -> Error {
            match err {
                Error::Io { source, .. } => Error::archive_format(path, format!("cannot open: {}", source)),
                err => err,
            }
        };
        let compression: Compression = detect_compression(path_std).map_err(archive_err)?;
        defo!("compression {:?}", compression);
        let ntf: Option<NamedTempFile> = decompress_to_ntf(path_std, compression).map_err(archive_err)?;
        let mut archive = TarArchive {
            path: path.clone(),
            compression,
            ntf,
            members: Vec::new(),
            prefix: FPath::new(),
        };
        archive.members = archive.enumerate()?;
        if archive.members.is_empty() {
            defx!("no members");
            return Err(Error::archive_format(path, "no files found; is it a .tar file?"));
        }
        archive.prefix = common_top_directory(&archive.members);
        defx!("{} members, prefix {:?}", archive.members.len(), archive.prefix);

        Ok(archive)
    }

    /// Path of the readable `.tar` file, the temporary file if decompressed.
    fn tar_path(&self) -> &Path {
        match &self.ntf {
            Some(ntf) => ntf.path(),
            None => fpath_to_path(&self.path),
        }
    }

    fn enumerate(&self) -> Result<Vec<TarMember>> {
        defn!("({:?})", self.tar_path());
        let file: File = File::open(self.tar_path())
            .map_err(|err| Error::archive_format(&self.path, format!("cannot open: {}", err)))?;
        let mut archive: tar::Archive<BufReader<File>> = tar::Archive::new(BufReader::new(file));
        let entry_iter = archive
            .entries()
            .map_err(|err| Error::archive_format(&self.path, format!("cannot read .tar entries: {}", err)))?;
        let mut members: Vec<TarMember> = Vec::new();
        for entry_res in entry_iter {
            let entry: tar::Entry<BufReader<File>> = entry_res
                .map_err(|err| Error::archive_format(&self.path, format!("bad .tar entry: {}", err)))?;
            let etype: tar::EntryType = entry.header().entry_type();
            // TODO: handle tar types `symlink` and `hard_link`, currently they are ignored
            if !etype.is_file() {
                defo!("skip entry type {:?}", etype);
                continue;
            }
            let subpath: Cow<Path> = match entry.path() {
                Ok(val) => val,
                Err(_err) => {
                    defo!("entry.path() Err {:?}", _err);
                    continue;
                }
            };
            let member = TarMember {
                subpath: tar_subpath_normalize(&subpath),
                offset: entry.raw_file_position(),
                size: entry.size(),
            };
            defo!("{:?}", member);
            members.push(member);
        }
        defx!("{} members", members.len());

        Ok(members)
    }

    pub fn path(&self) -> &FPath {
        &self.path
    }

    pub const fn compression(&self) -> Compression {
        self.compression
    }

    pub fn members(&self) -> &[TarMember] {
        self.members.as_slice()
    }

    /// The top directory common to all members, maybe empty.
    pub fn prefix(&self) -> &FPath {
        &self.prefix
    }

    /// Find the member at `relative`, a path relative to the top directory.
    pub fn member(&self, relative: &str) -> Option<&TarMember> {
        let subpath: FPath = match self.prefix.is_empty() {
            true => FPath::from(relative),
            false => format!("{}/{}", self.prefix, relative),
        };
        let found = self.members.iter().find(|member| member.subpath == subpath);
        defñ!("({:?}) {:?}", subpath, found.is_some());

        found
    }

    /// Reader of the contents of `member`.
    pub fn open_member(&self, member: &TarMember) -> Result<BufReader<Take<File>>> {
        defñ!("({:?})", member);
        let fpath: FPath = self.describe_member(member);
        let mut file: File = File::open(self.tar_path()).map_err(|err| Error::io(&fpath, err))?;
        file.seek(SeekFrom::Start(member.offset))
            .map_err(|err| Error::io(&fpath, err))?;

        Ok(BufReader::new(file.take(member.size)))
    }

    /// Read all of a small `member`, e.g. `members.txt`.
    pub fn read_member_to_string(&self, member: &TarMember) -> Result<String> {
        let mut bytes: Vec<u8> = Vec::with_capacity(member.size as usize);
        self.open_member(member)?
            .read_to_end(&mut bytes)
            .map_err(|err| Error::io(&self.describe_member(member), err))?;

        Ok(String::from_utf8_lossy(&bytes).to_string())
    }

    /// Display path of `member`, e.g. `bundle.tar.bz2|top/node1/pacemaker.log`.
    pub fn describe_member(&self, member: &TarMember) -> FPath {
        format!("{}{}{}", self.path, SUBPATH_SEP, member.subpath)
    }
}

/// The first path component shared by all `members` if each is within it.
fn common_top_directory(members: &[TarMember]) -> FPath {
    let mut top: Option<&str> = None;
    for member in members.iter() {
        let (first, _rest) = match member.subpath.split_once('/') {
            Some(val) => val,
            None => return FPath::new(),
        };
        match top {
            None => top = Some(first),
            Some(top_) if top_ == first => {}
            Some(_) => return FPath::new(),
        }
    }

    FPath::from(top.unwrap_or(""))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogSource
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where the bytes of a [`LogSource`] are.
#[derive(Clone, Debug)]
pub enum SourceLocation {
    /// a plain file on the host filesystem
    File(FPath),
    /// a regular file within a bundle
    Member {
        archive: Arc<TarArchive>,
        member: TarMember,
    },
}

/// Boxed reader of a log source, sendable to a processing thread.
pub type SourceReader = Box<dyn BufRead + Send>;

/// One log file of one node, with its [`Dialect`] decided.
#[derive(Clone, Debug)]
pub struct LogSource {
    /// zero-based node slot; sources are merged in slot order
    pub slot: usize,
    pub node: NodeId,
    pub dialect: Dialect,
    pub location: SourceLocation,
}

impl LogSource {
    /// Display path of the source.
    pub fn describe(&self) -> FPath {
        match &self.location {
            SourceLocation::File(path) => path.clone(),
            SourceLocation::Member { archive, member } => archive.describe_member(member),
        }
    }

    /// Open the source for reading [`RawLine`]s.
    ///
    /// [`RawLine`]: crate::data::event::RawLine
    pub fn open(&self) -> Result<RawLineReader<SourceReader>> {
        defn!("({:?})", self.describe());
        let reader: SourceReader = match &self.location {
            SourceLocation::File(path) => {
                let file: File = File::open(fpath_to_path(path)).map_err(|err| Error::io(path, err))?;
                Box::new(BufReader::new(file))
            }
            SourceLocation::Member { archive, member } => Box::new(archive.open_member(member)?),
        };
        defx!();

        Ok(RawLineReader::new(reader, self.describe(), self.dialect, self.node.clone()))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// bundle resolution
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub const HB_MEMBERS_TXT: &str = "members.txt";
pub const HB_COROSYNC_CONF: &str = "corosync.conf";
/// Pacemaker log names within an `hb_report` node directory, by preference.
pub const HB_PACEMAKER_LOGS: [&str; 2] = ["pacemaker.log", "corosync.log"];
/// System log names within an `hb_report` node directory, by preference.
pub const HB_SYSLOGS: [&str; 2] = ["messages", "journal.log"];

pub const SOS_OS_RELEASE: &str = "etc/os-release";
pub const SOS_HOSTNAME: &str = "hostname";
pub const SOS_MESSAGES: &str = "var/log/messages";
/// Pacemaker log of RHEL 8 and later.
pub const SOS_PACEMAKER_LOG: &str = "var/log/pacemaker/pacemaker.log";
/// Pacemaker log of RHEL 7 and earlier.
pub const SOS_PACEMAKER_LOG_LEGACY: &str = "var/log/cluster/corosync.log";
/// First RHEL major version logging to [`SOS_PACEMAKER_LOG`].
pub const SOS_PACEMAKER_LOG_VERSION_MIN: u32 = 8;

/// Node names from the first line of an `hb_report` `members.txt`.
pub fn parse_members_txt(text: &str) -> Vec<NodeId> {
    text.lines()
        .next()
        .unwrap_or("")
        .split_whitespace()
        .map(NodeId::from)
        .collect()
}

/// Node names from the `ring0_addr` entries of a `corosync.conf`.
pub fn parse_corosync_conf_nodes(text: &str) -> Vec<NodeId> {
    let mut nodes: Vec<NodeId> = Vec::new();
    for line in text.lines() {
        let (key, value) = match line.split_once(':') {
            Some(val) => val,
            None => continue,
        };
        if key.trim() != "ring0_addr" {
            continue;
        }
        let node: NodeId = NodeId::from(value.trim());
        if !node.is_empty() && !nodes.contains(&node) {
            nodes.push(node);
        }
    }

    nodes
}

/// Major version from the `VERSION_ID` of an `os-release` file, e.g.
/// `VERSION_ID="8.4"` is `8`.
pub fn parse_os_release_version_major(text: &str) -> Option<u32> {
    text.lines()
        .filter_map(|line| line.trim().strip_prefix("VERSION_ID="))
        .map(|value| value.trim().trim_matches('"').trim_matches('\''))
        .filter_map(|value| value.split('.').next()?.parse::<u32>().ok())
        .next()
}

/// Node names of an `hb_report`, from `members.txt` or else
/// `corosync.conf`.
pub fn hb_report_nodes(archive: &TarArchive) -> Result<Vec<NodeId>> {
    defn!("({:?})", archive.path());
    if let Some(member) = archive.member(HB_MEMBERS_TXT) {
        let nodes = parse_members_txt(&archive.read_member_to_string(member)?);
        if !nodes.is_empty() {
            defx!("{} {:?}", HB_MEMBERS_TXT, nodes);
            return Ok(nodes);
        }
    }
    defo!("{} is missing or empty", HB_MEMBERS_TXT);
    if let Some(member) = archive.member(HB_COROSYNC_CONF) {
        let nodes = parse_corosync_conf_nodes(&archive.read_member_to_string(member)?);
        if !nodes.is_empty() {
            defx!("{} {:?}", HB_COROSYNC_CONF, nodes);
            return Ok(nodes);
        }
    }
    defx!("no nodes");

    Err(Error::archive_format(
        archive.path(),
        format!(
            "cannot identify cluster nodes; no {} or {} with node entries",
            HB_MEMBERS_TXT, HB_COROSYNC_CONF
        ),
    ))
}

/// The first of `names` found within the directory `dir` of `archive`.
fn first_member<'a>(archive: &'a TarArchive, dir: &str, names: &[&str]) -> Option<&'a TarMember> {
    names
        .iter()
        .find_map(|name| archive.member(&format!("{}/{}", dir, name)))
}

/// Resolve the log sources of an `hb_report` bundle, one pacemaker log and
/// one system log per node, nodes in slot order.
pub fn resolve_hb_report(path: &FPath) -> Result<Vec<LogSource>> {
    defn!("({:?})", path);
    let archive: Arc<TarArchive> = Arc::new(TarArchive::open(path)?);
    let nodes: Vec<NodeId> = hb_report_nodes(&archive)?;
    let mut sources: Vec<LogSource> = Vec::with_capacity(nodes.len() * 2);
    let mut found_pacemaker: bool = false;
    for (slot, node) in nodes.iter().enumerate() {
        match first_member(&archive, node, &HB_PACEMAKER_LOGS) {
            Some(member) => {
                found_pacemaker = true;
                sources.push(LogSource {
                    slot,
                    node: node.clone(),
                    dialect: Dialect::HbReport(LogKind::Pacemaker),
                    location: SourceLocation::Member {
                        archive: archive.clone(),
                        member: member.clone(),
                    },
                });
            }
            None => {
                e_wrn!("{:?}: no {} for node {:?}", path, HB_PACEMAKER_LOGS.join(" or "), node);
            }
        }
        match first_member(&archive, node, &HB_SYSLOGS) {
            Some(member) => {
                sources.push(LogSource {
                    slot,
                    node: node.clone(),
                    dialect: Dialect::HbReport(LogKind::Syslog),
                    location: SourceLocation::Member {
                        archive: archive.clone(),
                        member: member.clone(),
                    },
                });
            }
            None => {
                e_wrn!("{:?}: no {} for node {:?}", path, HB_SYSLOGS.join(" or "), node);
            }
        }
    }
    if !found_pacemaker {
        defx!("no pacemaker log");
        return Err(Error::archive_format(
            path,
            format!(
                "no {} found for nodes {:?}",
                HB_PACEMAKER_LOGS.join(" or "),
                nodes
            ),
        ));
    }
    defx!("{} sources", sources.len());

    Ok(sources)
}

/// Resolve the log sources of a `sosreport` bundle of one node.
pub fn resolve_sosreport(path: &FPath, slot: usize) -> Result<Vec<LogSource>> {
    defn!("({:?}, {})", path, slot);
    let archive: Arc<TarArchive> = Arc::new(TarArchive::open(path)?);

    let version_major: u32 = match archive.member(SOS_OS_RELEASE) {
        Some(member) => {
            match parse_os_release_version_major(&archive.read_member_to_string(member)?) {
                Some(val) => val,
                None => {
                    e_wrn!("{:?}: no VERSION_ID in {}", path, SOS_OS_RELEASE);
                    0
                }
            }
        }
        None => {
            e_wrn!("{:?}: {} is missing", path, SOS_OS_RELEASE);
            0
        }
    };
    defo!("version_major {}", version_major);
    let node: NodeId = match archive.member(SOS_HOSTNAME) {
        Some(member) => {
            let hostname: String = archive.read_member_to_string(member)?;
            match hostname.lines().next().map(str::trim) {
                Some(name) if !name.is_empty() => NodeId::from(name),
                _ => node_slot_label(slot),
            }
        }
        None => node_slot_label(slot),
    };
    defo!("node {:?}", node);

    let pacemaker_log: &str = if version_major >= SOS_PACEMAKER_LOG_VERSION_MIN {
        SOS_PACEMAKER_LOG
    } else {
        SOS_PACEMAKER_LOG_LEGACY
    };
    let member_pacemaker: TarMember = match archive.member(pacemaker_log) {
        Some(member) => member.clone(),
        None => {
            defx!("no {}", pacemaker_log);
            return Err(Error::archive_format(path, format!("no {} found", pacemaker_log)));
        }
    };
    let mut sources: Vec<LogSource> = vec![LogSource {
        slot,
        node: node.clone(),
        dialect: Dialect::SosReport(LogKind::Pacemaker),
        location: SourceLocation::Member {
            archive: archive.clone(),
            member: member_pacemaker,
        },
    }];
    match archive.member(SOS_MESSAGES) {
        Some(member) => sources.push(LogSource {
            slot,
            node,
            dialect: Dialect::SosReport(LogKind::Syslog),
            location: SourceLocation::Member {
                archive: archive.clone(),
                member: member.clone(),
            },
        }),
        None => {
            e_wrn!("{:?}: {} is missing", path, SOS_MESSAGES);
        }
    }
    defx!("{} sources", sources.len());

    Ok(sources)
}

/// Resolve all log sources of `selection`, ordered by node slot.
///
/// Within a slot the order is plain pacemaker log, plain system log,
/// `hb_report` sources, `sosreport` sources.
pub fn resolve_selection(selection: &InputSelection) -> Result<Vec<LogSource>> {
    defn!();
    let mut sources: Vec<LogSource> = Vec::new();
    for (slot, path) in selection.pacemaker_logs().iter().enumerate() {
        sources.push(LogSource {
            slot,
            node: node_slot_label(slot),
            dialect: Dialect::Pacemaker,
            location: SourceLocation::File(path.clone()),
        });
    }
    for (slot, path) in selection.system_logs().iter().enumerate() {
        sources.push(LogSource {
            slot,
            node: node_slot_label(slot),
            dialect: Dialect::Syslog,
            location: SourceLocation::File(path.clone()),
        });
    }
    for path in selection.hb_reports().iter() {
        sources.extend(resolve_hb_report(path)?);
    }
    for (slot, path) in selection.sosreports().iter().enumerate() {
        sources.extend(resolve_sosreport(path, slot)?);
    }
    // stable, keeps the order within a slot
    sources.sort_by_key(|source| source.slot);
    defx!("{} sources", sources.len());

    Ok(sources)
}
