//! Recursive subtree copy with merge semantics.
//!
//! Every entry in the source tree overwrites the entry of the same name in
//! the destination. Destination entries with no counterpart in the source are
//! left alone. Symlinks in the source are followed, so the destination always
//! receives regular files and directories. A directory symlink that resolves
//! to one of its own ancestors is rejected rather than followed.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};

use super::SyncError;

/// Copies the directory tree at `source` into `destination`, creating the
/// destination and any intermediate directories as needed.
///
/// Returns the number of files written.
///
/// # Errors
///
/// Returns [`SyncError::MissingDocs`] when `source` is absent or is not a
/// directory, and [`SyncError::Copy`] for any other I/O failure, including a
/// directory symlink that loops back to an ancestor. A failure part way
/// through leaves already copied entries in place.
pub fn copy_tree(source: &Utf8Path, destination: &Utf8Path) -> Result<usize, SyncError> {
    let source_dir = match Dir::open_ambient_dir(source, ambient_authority()) {
        Ok(dir) => dir,
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
        {
            return Err(SyncError::MissingDocs {
                path: source.to_path_buf(),
            });
        }
        Err(err) => return Err(copy_error(source, &err)),
    };

    Dir::create_ambient_dir_all(destination, ambient_authority())
        .map_err(|err| copy_error(destination, &err))?;
    let destination_dir = Dir::open_ambient_dir(destination, ambient_authority())
        .map_err(|err| copy_error(destination, &err))?;

    let root = resolve(source)?;
    let mut ancestors = vec![root];
    copy_entries(
        &source_dir,
        &destination_dir,
        source,
        destination,
        &mut ancestors,
    )
}

fn copy_entries(
    source: &Dir,
    destination: &Dir,
    source_path: &Utf8Path,
    destination_path: &Utf8Path,
    ancestors: &mut Vec<Utf8PathBuf>,
) -> Result<usize, SyncError> {
    let mut copied = 0;
    let entries = source
        .entries()
        .map_err(|err| copy_error(source_path, &err))?;

    for item in entries {
        let entry = item.map_err(|err| copy_error(source_path, &err))?;
        let name = entry
            .file_name()
            .map_err(|err| copy_error(source_path, &err))?;
        let from = source_path.join(&name);
        let to = destination_path.join(&name);

        let metadata = source
            .metadata(&name)
            .map_err(|err| copy_error(&from, &err))?;

        if metadata.is_dir() {
            let resolved = resolve(&from)?;
            if ancestors.contains(&resolved) {
                return Err(SyncError::Copy {
                    path: from,
                    message: String::from("symlink loop"),
                });
            }
            prepare_directory(destination, &name, &to)?;
            let child_source = source
                .open_dir(&name)
                .map_err(|err| copy_error(&from, &err))?;
            let child_destination = destination
                .open_dir(&name)
                .map_err(|err| copy_error(&to, &err))?;
            ancestors.push(resolved);
            copied += copy_entries(&child_source, &child_destination, &from, &to, ancestors)?;
            ancestors.pop();
        } else {
            prepare_file(destination, &name, &to)?;
            source
                .copy(&name, destination, &name)
                .map_err(|err| copy_error(&from, &err))?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Ensures `name` is a real directory inside `destination`, replacing a file
/// or symlink of the same name.
fn prepare_directory(destination: &Dir, name: &str, path: &Utf8Path) -> Result<(), SyncError> {
    match destination.symlink_metadata(name) {
        Ok(existing) if existing.is_dir() => Ok(()),
        Ok(_) => {
            destination
                .remove_file(name)
                .map_err(|err| copy_error(path, &err))?;
            destination
                .create_dir(name)
                .map_err(|err| copy_error(path, &err))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => destination
            .create_dir(name)
            .map_err(|create_err| copy_error(path, &create_err)),
        Err(err) => Err(copy_error(path, &err)),
    }
}

/// Clears a directory that occupies the slot a file is about to be written to.
fn prepare_file(destination: &Dir, name: &str, path: &Utf8Path) -> Result<(), SyncError> {
    match destination.symlink_metadata(name) {
        Ok(existing) if existing.is_dir() => destination
            .remove_dir_all(name)
            .map_err(|err| copy_error(path, &err)),
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(copy_error(path, &err)),
    }
}

/// Resolves symlinks so directories reached through different names compare
/// equal.
fn resolve(path: &Utf8Path) -> Result<Utf8PathBuf, SyncError> {
    path.canonicalize_utf8()
        .map_err(|err| copy_error(path, &err))
}

fn copy_error(path: &Utf8Path, err: &io::Error) -> SyncError {
    SyncError::Copy {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
