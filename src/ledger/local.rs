use std::path::{Path, PathBuf};
use tokio::fs;

use super::Ledger;

#[derive(Debug)]
pub struct FileStore(PathBuf);

impl FileStore {
    pub fn open(p: impl AsRef<Path>) -> Self {
        Self(p.as_ref().to_owned())
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// A missing file is a first run and loads as an empty ledger.
    pub async fn load(&self) -> crate::Result<Ledger> {
        if fs::try_exists(&self.0).await? {
            let bytes = fs::read(&self.0).await?;
            let ledger: Ledger = serde_json::from_slice(&bytes)?;
            log::info!(
                "[READING] {} ledger entries from {}",
                ledger.len(),
                self.0.display()
            );
            Ok(ledger)
        } else {
            log::info!("[CREATING] Empty ledger, {} not found", self.0.display());
            Ok(Ledger::default())
        }
    }

    /// Replaces the whole file.
    pub async fn save(&self, ledger: &Ledger) -> crate::Result<()> {
        if let Some(parent) = self.0.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(ledger)?;
        fs::write(&self.0, json).await?;
        log::info!(
            "[WRITING] {} ledger entries to {}",
            ledger.len(),
            self.0.display()
        );
        Ok(())
    }
}
