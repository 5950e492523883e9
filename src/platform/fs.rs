// Cerebro - platform/fs.rs
//
// Filesystem helpers for reading import files and writing snapshots.

use crate::util::constants;
use crate::util::error::CerebroError;
use std::io::{self, Write};
use std::path::Path;

/// Read the full content of an import file as a string.
///
/// Spreadsheet exports are frequently Windows-1252 rather than UTF-8; invalid
/// sequences are replaced rather than rejecting the whole file. Files larger
/// than `MAX_IMPORT_FILE_SIZE` are refused.
pub fn read_import_file(path: &Path) -> Result<String, CerebroError> {
    let io_err = |operation: &'static str| {
        move |source: io::Error| CerebroError::Io {
            path: path.to_path_buf(),
            operation,
            source,
        }
    };

    let size = std::fs::metadata(path).map_err(io_err("stat"))?.len();
    if size > constants::MAX_IMPORT_FILE_SIZE {
        return Err(CerebroError::InputTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: constants::MAX_IMPORT_FILE_SIZE,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err("read"))?;
    let text = String::from_utf8_lossy(&bytes);
    // Excel prefixes UTF-8 exports with a byte-order mark.
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// Write `bytes` to `path` atomically: write a sibling temp file, then rename.
///
/// Creates the parent directory if needed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("tmp");
    {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp, path)
}
