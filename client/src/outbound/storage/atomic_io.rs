//! Atomic replacement of small files.
//!
//! Writes go to a hidden sibling file which is synced and then renamed over
//! the target, so readers see either the old or the new contents.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `file_name` inside `dir` with `contents`.
///
/// # Errors
///
/// Returns an I/O error when `file_name` is not a plain file name or when the
/// temporary file cannot be written or renamed. The temporary file is
/// removed on failure.
pub(super) fn write_atomic(dir: &Dir, file_name: &Utf8Path, contents: &str) -> io::Result<()> {
    let mut components = file_name.components();
    let (Some(Utf8Component::Normal(name)), None) = (components.next(), components.next()) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{file_name}' is not a plain file name"),
        ));
    };
    let tmp_name = format!(
        ".{name}.tmp.{}.{}",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    );

    let written = write_synced(dir, &tmp_name, contents).and_then(|()| replace(dir, &tmp_name, name));
    if written.is_err() {
        drop(dir.remove_file(&tmp_name));
    }
    written?;

    // Directory sync is best-effort; not every platform supports it.
    drop(dir.open(".").and_then(|parent| parent.sync_all()));
    Ok(())
}

fn write_synced(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(windows)]
fn replace(dir: &Dir, tmp_name: &str, target: &str) -> io::Result<()> {
    match dir.remove_file(target) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, tmp_name: &str, target: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for atomic replacement.
    use super::*;
    use cap_std::ambient_authority;
    use tempfile::TempDir;

    fn scratch() -> (TempDir, Dir) {
        let temp = TempDir::new().expect("temp dir");
        let dir = Dir::open_ambient_dir(temp.path(), ambient_authority()).expect("open temp dir");
        (temp, dir)
    }

    #[test]
    fn replaces_existing_contents_without_leftovers() {
        let (_temp, dir) = scratch();
        let path = Utf8Path::new("session.json");

        write_atomic(&dir, path, "first").expect("first write");
        write_atomic(&dir, path, "second").expect("second write");

        assert_eq!(dir.read_to_string(path).expect("read back"), "second");
        let names: Vec<String> = dir
            .entries()
            .expect("list dir")
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        assert_eq!(names, vec!["session.json".to_owned()]);
    }

    #[test]
    fn rejects_nested_paths() {
        let (_temp, dir) = scratch();
        let error = write_atomic(&dir, Utf8Path::new("nested/session.json"), "x")
            .expect_err("nested paths are refused");
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }
}
