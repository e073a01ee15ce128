use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{CritterError, CritterResult};

/// A single named entry of local persistent storage
#[async_trait]
pub trait CaughtStorage: Send + Sync {
    /// Raw stored content, `None` if nothing was ever written
    async fn read(&self) -> CritterResult<Option<String>>;

    /// Overwrite the entry wholesale
    async fn write(&self, content: &str) -> CritterResult<()>;
}

/// JSON file on disk
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CaughtStorage for FileStorage {
    async fn read(&self) -> CritterResult<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Caught-state file does not exist: {:?}", self.path);
                Ok(None)
            }
            Err(e) => Err(CritterError::io(&self.path, e)),
        }
    }

    async fn write(&self, content: &str) -> CritterResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CritterError::io(parent, e))?;
        }

        // Readers never observe a partially written entry
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .await
            .map_err(|e| CritterError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| CritterError::io(&self.path, e))?;

        debug!("Wrote caught state to {:?}", self.path);
        Ok(())
    }
}

/// In-process storage, for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryStorage {
    entry: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            entry: Mutex::new(Some(content.into())),
        }
    }

    pub async fn content(&self) -> Option<String> {
        self.entry.lock().await.clone()
    }
}

#[async_trait]
impl CaughtStorage for MemoryStorage {
    async fn read(&self) -> CritterResult<Option<String>> {
        Ok(self.entry.lock().await.clone())
    }

    async fn write(&self, content: &str) -> CritterResult<()> {
        *self.entry.lock().await = Some(content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_storage_missing_then_written() {
        let dir = std::env::temp_dir().join(format!("critterdex-storage-{}", std::process::id()));
        let storage = FileStorage::new(dir.join("nested").join("caught.json"));

        assert_eq!(storage.read().await.unwrap(), None);

        storage.write(r#"["Koi"]"#).await.unwrap();
        assert_eq!(storage.read().await.unwrap().as_deref(), Some(r#"["Koi"]"#));

        storage.write("[]").await.unwrap();
        assert_eq!(storage.read().await.unwrap().as_deref(), Some("[]"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
