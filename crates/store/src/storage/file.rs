use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::AsyncWriteExt;

use super::{KeyValueStorage, StorageError};

const FILE_EXTENSION: &str = "json";

/// Longest encoded key we will turn into a file name.
const MAX_ENCODED_KEY_LEN: usize = 200;

/// Storage that keeps each key in its own file under a root directory.
///
/// Keys are percent-encoded into file names, so `@GoMarketPlace:products`
/// lands in `%40GoMarketPlace%3Aproducts.json`. Writes go to a sibling
/// temporary file which is then renamed over the target.
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

impl FileStorage {
    /// Open storage rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        tracing::debug!(root = %root.display(), "Opened file storage");
        Ok(Self {
            root,
            tmp_counter: AtomicU64::new(0),
        })
    }

    /// Root directory holding the key files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` for empty or overly long keys.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let encoded = encode_key(key)?;
        Ok(self.root.join(format!("{encoded}.{FILE_EXTENSION}")))
    }

    fn tmp_path_for(&self, target: &Path) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let mut name = target.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{}.{n}.tmp", std::process::id()));
        target.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = self.tmp_path_for(&path);

        let write = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(value.as_bytes()).await?;
            file.sync_all().await?;
            tokio::fs::rename(&tmp, &path).await
        };

        if let Err(e) = write.await {
            // Best effort; the target file is untouched either way.
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

/// Percent-encode everything outside `[A-Za-z0-9._-]`.
fn encode_key(key: &str) -> Result<String, StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey {
            key: key.to_owned(),
            reason: "key cannot be empty",
        });
    }

    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }

    if encoded.len() > MAX_ENCODED_KEY_LEN {
        return Err(StorageError::InvalidKey {
            key: key.to_owned(),
            reason: "key is too long",
        });
    }
    Ok(encoded)
}
