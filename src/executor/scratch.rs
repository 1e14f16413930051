use crate::utils::filesystem::generate_scratch_dir;
use crate::utils::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Per-call directory holding staged request artifacts.
///
/// The directory is removed when the value is dropped, which covers normal
/// return, early `?` exits and a cancelled future alike.
#[derive(Debug)]
pub struct ScratchSpace {
    dir: PathBuf,
    artifacts: Vec<PathBuf>,
}

impl ScratchSpace {
    pub async fn create<P: AsRef<Path>>(root: P) -> Result<Self> {
        let dir = generate_scratch_dir(root);
        tokio::fs::create_dir_all(&dir).await?;
        debug!("Created scratch directory {}", dir.display());
        Ok(Self {
            dir,
            artifacts: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    pub async fn stage(&mut self, name: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(name);
        tokio::fs::write(&path, contents).await?;
        debug!("Staged {} ({} bytes)", name, contents.len());
        self.artifacts.push(path.clone());
        Ok(path)
    }
}

impl Drop for ScratchSpace {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => debug!("Removed scratch directory {}", self.dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove scratch directory {}: {}",
                self.dir.display(),
                e
            ),
        }
    }
}
