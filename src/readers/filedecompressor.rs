// src/readers/filedecompressor.rs

//! The `filedecompressor` module is for decompressing bundle files to
//! temporary files.
//!
//! Compression is recognized by the leading "magic" bytes of a file, not by
//! the file name. `hb_report` bundles are usually `.tar.bz2` and sosreports
//! are usually `.tar.xz`, though either may be renamed or recompressed.

use std::fmt;
use std::io::{BufReader, BufWriter, Error as IoError, ErrorKind, Read, Write};
use std::path::Path;

use crate::common::{Error, FPath, File, FileSz, Result};
use crate::readers::helpers::{path_filesz, path_to_fpath};

use ::bzip2_rs::DecoderReader as Bz2DecoderReader;
// `flate2` is for gzip files.
use ::flate2::read::GzDecoder;
// `lzma_rs` is for xz files.
use ::lzma_rs;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::tempfile::{Builder, NamedTempFile};

/// Compression of a bundle file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Compression {
    /// not compressed, presumably a plain `.tar`
    Normal,
    Bz2,
    Gz,
    Xz,
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Compression::Normal => write!(f, "none"),
            Compression::Bz2 => write!(f, "bzip2"),
            Compression::Gz => write!(f, "gzip"),
            Compression::Xz => write!(f, "xz"),
        }
    }
}

const MAGIC_BZ2: &[u8] = b"BZh";
const MAGIC_GZ: &[u8] = &[0x1F, 0x8B];
const MAGIC_XZ: &[u8] = &[0xFD, b'7', b'z', b'X', b'Z', 0x00];
const MAGIC_LEN_MAX: usize = 6;

/// Map the leading bytes of a file to a `Compression`.
pub fn magic_to_compression(bytes: &[u8]) -> Compression {
    if bytes.starts_with(MAGIC_XZ) {
        Compression::Xz
    } else if bytes.starts_with(MAGIC_BZ2) {
        Compression::Bz2
    } else if bytes.starts_with(MAGIC_GZ) {
        Compression::Gz
    } else {
        Compression::Normal
    }
}

/// Read the leading bytes of the file at `path` and return it's
/// `Compression`.
pub fn detect_compression(path: &Path) -> Result<Compression> {
    defn!("({:?})", path);
    let fpath: FPath = path_to_fpath(path);
    let file: File = File::open(path).map_err(|err| Error::io(&fpath, err))?;
    let mut magic: Vec<u8> = Vec::with_capacity(MAGIC_LEN_MAX);
    file.take(MAGIC_LEN_MAX as u64)
        .read_to_end(&mut magic)
        .map_err(|err| Error::io(&fpath, err))?;
    let compression = magic_to_compression(&magic);
    defx!("return {:?}", compression);

    Ok(compression)
}

/// Copy all of `reader` into `writer`, returning the count of bytes copied.
fn copy_buffered<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> std::io::Result<FileSz> {
    const BUF_SZ: usize = 65536;
    let mut buf: Vec<u8> = vec![0; BUF_SZ];
    let mut copied: FileSz = 0;
    loop {
        let bytes_read: usize = reader.read(&mut buf)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buf[..bytes_read])?;
        copied += bytes_read as FileSz;
    }
    writer.flush()?;

    Ok(copied)
}

/// Decompress the file at `path_std` to a temporary file.
///
/// Return value `None` means no file was decompressed because it was not
/// needed as determined by `compression`.
pub fn decompress_to_ntf(path_std: &Path, compression: Compression) -> Result<Option<NamedTempFile>> {
    defn!("({:?}, {:?})", path_std, compression);
    let fpath: FPath = path_to_fpath(path_std);
    if compression == Compression::Normal {
        defx!("Compression::Normal; return Ok(None)");
        return Ok(None);
    }

    let ntf: NamedTempFile = Builder::new()
        .prefix("hat-")
        .suffix(".tar")
        .tempfile()
        .map_err(|err| Error::io(&fpath, err))?;
    defo!("ntf {:?}", ntf.path());
    let file_compressed: File = File::open(path_std).map_err(|err| Error::io(&fpath, err))?;
    let file_ntf: File = ntf.reopen().map_err(|err| Error::io(&fpath, err))?;
    let mut bufwriter: BufWriter<File> = BufWriter::new(file_ntf);

    let decompressed: std::io::Result<FileSz> = match compression {
        Compression::Normal => {
            return Ok(None);
        }
        Compression::Bz2 => {
            let mut decoder: Bz2DecoderReader<File> = Bz2DecoderReader::new(file_compressed);
            copy_buffered(&mut decoder, &mut bufwriter)
        }
        Compression::Gz => {
            let mut decoder: GzDecoder<File> = GzDecoder::new(file_compressed);
            copy_buffered(&mut decoder, &mut bufwriter)
        }
        Compression::Xz => {
            let mut bufreader: BufReader<File> = BufReader::new(file_compressed);
            match lzma_rs::xz_decompress(&mut bufreader, &mut bufwriter) {
                Ok(_) => bufwriter.flush().map(|_| path_filesz(ntf.path()).unwrap_or(0)),
                Err(lzma_rs::error::Error::IoError(ioerr)) => Err(ioerr),
                Err(err) => Err(IoError::new(ErrorKind::InvalidData, format!("xz_decompress failed: {}", err))),
            }
        }
    };
    match decompressed {
        Ok(_filesz) => {
            defx!("decompressed {} bytes to {:?}", _filesz, ntf.path());

            Ok(Some(ntf))
        }
        Err(err) => {
            defx!("decompress Err {:?}", err);

            Err(Error::archive_format(&fpath, format!("{} decompression failed: {}", compression, err)))
        }
    }
}
