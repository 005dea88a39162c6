// src/debug/helpers.rs

//! Miscellaneous helper functions for testing; temporary log files and
//! temporary support bundles.

use crate::common::FPath;
use crate::readers::filedecompressor::Compression;

use std::io::BufReader;
#[allow(unused_imports)] // XXX: clippy wrongly marks this as unused
use std::io::Write; // for `NamedTempFile.write_all`

use ::flate2::write::GzEncoder;
use ::lazy_static::lazy_static;
use ::si_trace_print::{dpfo, dpfñ};

#[doc(hidden)]
pub use ::tempfile::NamedTempFile;
#[doc(hidden)]
pub use ::tempfile::TempDir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile instances default to this file name prefix.
///
/// See <https://github.com/Stebalien/tempfile/issues/183>.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-hat-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    FPath::from(ntf.path().to_str().unwrap())
}

/// Testing helper function to write a `[u8]` to a temporary file.
pub fn create_temp_file_bytes(data: &[u8]) -> NamedTempFile {
    let mut ntf = match ::tempfile::Builder::new()
        // use known prefix for easier cleanup
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::new()..tempfile() return Err {}", err);
        }
    };
    match ntf.write_all(data) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }
    dpfñ!("{:?} ({} bytes)", ntf.path(), data.len());

    ntf
}

/// Testing helper function to write a `str` to a temporary file.
pub fn create_temp_file(data: &str) -> NamedTempFile {
    create_temp_file_bytes(data.as_bytes())
}

/// Create a temporary directory
pub fn create_temp_dir() -> TempDir {
    dpfñ!();
    ::tempfile::Builder::new()
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempdir()
        .unwrap()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary bundle helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Testing helper function to create the bytes of a `.tar` file holding
/// regular files `members`, each a (path, contents) pair.
pub fn create_tar_bytes(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = ::tar::Builder::new(Vec::<u8>::new());
    for (path, data) in members.iter() {
        dpfo!("append {:?} ({} bytes)", path, data.len());
        let mut header = ::tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(1616728238);
        header.set_entry_type(::tar::EntryType::Regular);
        builder
            .append_data(&mut header, path, *data)
            .unwrap();
    }

    builder.into_inner().unwrap()
}

/// Testing helper function to compress `data`.
///
/// `Compression::Bz2` is not supported; crate `bzip2-rs` only decompresses.
pub fn compress_bytes(data: &[u8], compression: Compression) -> Vec<u8> {
    match compression {
        Compression::Normal => data.to_vec(),
        Compression::Gz => {
            let mut encoder = GzEncoder::new(Vec::<u8>::new(), ::flate2::Compression::fast());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        Compression::Xz => {
            let mut compressed: Vec<u8> = Vec::new();
            let mut reader = BufReader::new(data);
            ::lzma_rs::xz_compress(&mut reader, &mut compressed).unwrap();
            compressed
        }
        Compression::Bz2 => {
            panic!("bzip2 compression is not supported by test helpers");
        }
    }
}

/// Testing helper function to write a support bundle, a `.tar` file holding
/// `members` compressed with `compression`, to a temporary file.
pub fn create_temp_bundle(members: &[(&str, &[u8])], compression: Compression) -> NamedTempFile {
    let tar_bytes: Vec<u8> = create_tar_bytes(members);

    create_temp_file_bytes(&compress_bytes(&tar_bytes, compression))
}
