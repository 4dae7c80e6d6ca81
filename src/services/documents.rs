use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Writes uploaded KYC documents under `<uploads>/kyc/` and hands back the
/// URL path they are served from.
#[derive(Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store one document side for a user. The filename is derived from the
    /// user id, never from client input, so uploads cannot escape the
    /// directory or collide across users.
    pub async fn save_kyc(
        &self,
        user_id: &str,
        side: &str,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<String> {
        let ext = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(char::is_alphanumeric))
            .unwrap_or("jpg")
            .to_lowercase();

        let dir = self.root.join("kyc");
        tokio::fs::create_dir_all(&dir)
            .await
            .context("Failed to create upload directory")?;

        let filename = format!("{user_id}_{side}.{ext}");
        tokio::fs::write(dir.join(&filename), bytes)
            .await
            .context("Failed to write uploaded document")?;

        Ok(format!("/api/uploads/kyc/{filename}"))
    }
}
