// src/readers/helpers.rs

//! Miscellaneous helper functions for _Readers_.

use std::path::{Component, Path};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use crate::common::{FPath, FileSz};

/// Helper function for a slightly annoying set of calls.
pub fn path_to_fpath(path: &Path) -> FPath {
    // `PathBuf` to `String` https://stackoverflow.com/q/37388107/471376
    (*(path.to_string_lossy())).to_string()
}

/// Helper function for completeness.
pub fn fpath_to_path(path: &FPath) -> &Path {
    Path::new(path)
}

/// Return the size of the file.
pub fn path_filesz(path: &Path) -> Option<FileSz> {
    defn!("({:?})", path);
    let metadata = match std::fs::metadata(path) {
        Ok(val) => val,
        Err(_err) => {
            defx!("error {}, return None", _err);
            return None;
        }
    };
    let len: FileSz = metadata.len();
    defx!("return {}", len);

    Some(len)
}

/// Normalize a path within a `.tar` file to `/`-separated normal components,
/// e.g. `./hb_report/node1/pacemaker.log` becomes
/// `hb_report/node1/pacemaker.log`.
pub fn tar_subpath_normalize(path: &Path) -> FPath {
    let parts: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    parts.join("/")
}
