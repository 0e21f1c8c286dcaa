//! Session persistence in a small JSON file.
//!
//! The file holds exactly two string values, `authToken` and `userRole`,
//! either of which may be absent. It is read once when the store opens and
//! rewritten atomically on every change; reads are served from memory.

use std::io;
use std::sync::{Mutex, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::atomic_io::write_atomic;
use crate::domain::ports::{TokenStore, TokenStoreError};
use crate::domain::{AuthToken, Role};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_role: Option<String>,
}

/// Token store backed by a JSON file.
#[derive(Debug)]
pub struct FileTokenStore {
    dir: Dir,
    file_name: Utf8PathBuf,
    location: Utf8PathBuf,
    values: Mutex<SessionFile>,
}

impl FileTokenStore {
    /// Open (creating if needed) `dir` and hydrate from `dir/file_name`.
    ///
    /// A missing file is an empty session. A file that cannot be parsed is
    /// also treated as empty, with a warning, and is overwritten on the next
    /// change.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError::Read`] when the directory cannot be created
    /// or opened, or the file exists but cannot be read.
    pub fn open(dir: &Utf8Path, file_name: &Utf8Path) -> Result<Self, TokenStoreError> {
        let location = dir.join(file_name);
        Dir::create_ambient_dir_all(dir, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(dir, ambient_authority()))
            .map(|handle| (handle, location))
            .map_err(|error| read_error(dir, &error))
            .and_then(|(handle, location)| {
                let values = hydrate(&handle, file_name, &location)?;
                Ok(Self {
                    dir: handle,
                    file_name: file_name.to_path_buf(),
                    location,
                    values: Mutex::new(values),
                })
            })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn location(&self) -> &Utf8Path {
        &self.location
    }

    fn read<T>(&self, f: impl FnOnce(&SessionFile) -> T) -> T {
        f(&self.values.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn update(&self, f: impl FnOnce(&mut SessionFile)) -> Result<(), TokenStoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = values.clone();
        f(&mut next);
        if next == *values {
            return Ok(());
        }
        let contents = serde_json::to_string_pretty(&next)
            .map_err(|error| TokenStoreError::write(error.to_string()))?;
        write_atomic(&self.dir, &self.file_name, &contents)
            .map_err(|error| TokenStoreError::write(format!("{}: {error}", self.location)))?;
        debug!(path = %self.location, "session file updated");
        *values = next;
        Ok(())
    }
}

fn hydrate(
    dir: &Dir,
    file_name: &Utf8Path,
    location: &Utf8Path,
) -> Result<SessionFile, TokenStoreError> {
    let contents = match dir.read_to_string(file_name) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(SessionFile::default()),
        Err(error) => return Err(read_error(location, &error)),
    };
    Ok(serde_json::from_str(&contents).unwrap_or_else(|error| {
        warn!(path = %location, %error, "ignoring unreadable session file");
        SessionFile::default()
    }))
}

fn read_error(path: &Utf8Path, error: &io::Error) -> TokenStoreError {
    TokenStoreError::read(format!("{path}: {error}"))
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Result<Option<AuthToken>, TokenStoreError> {
        let raw = self.read(|values| values.auth_token.clone());
        Ok(raw.and_then(|raw| {
            AuthToken::new(raw)
                .inspect_err(|error| warn!(%error, "ignoring malformed stored token"))
                .ok()
        }))
    }

    fn set_token(&self, token: &AuthToken) -> Result<(), TokenStoreError> {
        self.update(|values| values.auth_token = Some(token.expose().to_owned()))
    }

    fn clear_token(&self) -> Result<(), TokenStoreError> {
        self.update(|values| values.auth_token = None)
    }

    fn role(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.read(|values| values.user_role.clone()))
    }

    fn set_role(&self, role: Role) -> Result<(), TokenStoreError> {
        self.update(|values| values.user_role = Some(role.as_str().to_owned()))
    }

    fn clear_role(&self) -> Result<(), TokenStoreError> {
        self.update(|values| values.user_role = None)
    }
}
