use crate::error::{AppError, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Advisory lock next to the database so only one instance writes to it.
/// Released (and the file removed) on drop.
#[derive(Debug)]
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl InstanceLock {
    pub fn lock_path(database: &Path) -> PathBuf {
        let mut name = database.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Returns `Ok(None)` when another live process holds the lock.
    pub fn acquire(database: &Path) -> Result<Option<Self>> {
        let path = Self::lock_path(database);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)?;

        if file.try_lock_exclusive().is_err() {
            return Ok(None);
        }

        // Holder's pid, for whoever finds the lock file
        file.set_len(0)?;
        write!(file, "{}", std::process::id()).map_err(AppError::Io)?;

        Ok(Some(Self { file, path }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_refused_until_release() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("bookmarks.sqlite");

        let first = InstanceLock::acquire(&db).unwrap();
        assert!(first.is_some());
        assert!(InstanceLock::acquire(&db).unwrap().is_none());

        drop(first);
        assert!(InstanceLock::acquire(&db).unwrap().is_some());
    }

    #[test]
    fn lock_file_sits_next_to_database() {
        let path = InstanceLock::lock_path(Path::new("/data/bookmarks.sqlite"));
        assert_eq!(path, PathBuf::from("/data/bookmarks.sqlite.lock"));
    }

    #[test]
    fn lock_file_holds_pid() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("b.sqlite");
        let lock = InstanceLock::acquire(&db).unwrap().unwrap();
        let content = std::fs::read_to_string(lock.path()).unwrap();
        assert_eq!(content, std::process::id().to_string());
    }
}
