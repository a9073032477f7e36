//! File system helpers shared by the resolver, linker and bundler

use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Lists the regular files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into. Symlinks count when they point at a
/// regular file; dangling links are left out.
pub fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Removes a file or a whole directory tree if present.
///
/// Returns whether anything was removed.
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    debug!("Removed {}", path.display());
    Ok(true)
}

/// Copies the contents of `src` into `dst`, preserving directory structure.
///
/// `dst` is created if needed and merged into if it already exists; files in
/// `src` overwrite same-named files in `dst`. When `dst` lies inside `src` its
/// subtree is skipped. Returns the number of files copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<usize> {
    if !src.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Source '{}' is not a directory", src.display()),
        ));
    }
    if dst.exists() && !dst.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Destination '{}' exists but is not a directory", dst.display()),
        ));
    }
    fs::create_dir_all(dst)?;

    let excluded = dst.canonicalize()?;
    let walker = WalkBuilder::new(src)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            entry
                .path()
                .canonicalize()
                .map(|path| path != excluded)
                .unwrap_or(true)
        })
        .build();

    let mut copied = 0;
    for entry in walker {
        let entry = entry.map_err(into_io_error)?;
        let path = entry.path();
        if path == src {
            continue;
        }

        let relative = path
            .strip_prefix(src)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let target = dst.join(relative);

        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &target)?;
            trace!("Copied {} -> {}", path.display(), target.display());
            copied += 1;
        }
    }

    debug!(
        "Copied {} file(s) from {} to {}",
        copied,
        src.display(),
        dst.display()
    );
    Ok(copied)
}

fn into_io_error(err: ignore::Error) -> io::Error {
    if err.is_io() {
        if let Some(io_err) = err.into_io_error() {
            return io_err;
        }
        return io::Error::new(io::ErrorKind::Other, "directory walk failed");
    }
    io::Error::new(io::ErrorKind::Other, err)
}

/// Resolves `path` against `base` unless it is already absolute.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
