// src/hash.rs

//! SHA-256 digests of install layouts
//!
//! A layout digest covers every entry below a directory: relative path,
//! entry kind, executable bit, symlink target and file content. Two trees
//! with the same digest install the same files.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use walkdir::WalkDir;

/// Hex SHA-256 of a byte slice
pub fn sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Feed everything from `reader` into `hasher`
fn update_from_reader<R: Read>(hasher: &mut Sha256, reader: &mut R) -> io::Result<()> {
    let mut buffer = [0u8; 8192];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            return Ok(());
        }
        hasher.update(&buffer[..n]);
    }
}

/// Digest of the whole tree below `root`
///
/// Entries are visited in file-name order, so the result does not depend
/// on directory iteration order. The root itself is not part of the digest.
pub fn layout_digest(root: &Path) -> Result<String> {
    if !root.is_dir() {
        return Err(Error::NotFound(format!(
            "Layout root is not a directory: {}",
            root.display()
        )));
    }

    let mut hasher = Sha256::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::IoError(e.to_string()))?;
        let relative = relative.to_string_lossy().replace('\\', "/");
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            let target = fs::read_link(entry.path())?;
            hasher.update(b"L\0");
            hasher.update(relative.as_bytes());
            hasher.update(b"\0");
            hasher.update(target.to_string_lossy().as_bytes());
        } else if file_type.is_dir() {
            hasher.update(b"D\0");
            hasher.update(relative.as_bytes());
        } else {
            hasher.update(b"F\0");
            hasher.update(relative.as_bytes());
            hasher.update([0, u8::from(is_executable(entry.path())?)]);
            let mut file = File::open(entry.path())?;
            let mut content = Sha256::new();
            update_from_reader(&mut content, &mut file)?;
            hasher.update(content.finalize());
        }
        hasher.update(b"\n");
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> Result<bool> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::metadata(path)?.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> Result<bool> {
    Ok(false)
}
