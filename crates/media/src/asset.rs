use std::path::Path;

use tracing::{info, warn};

use crate::{download, placeholder};

/// How the welcome asset became available, if it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    /// The file was already on disk.
    Cached,
    Downloaded,
    /// A static placeholder was written instead.
    Generated,
    Unavailable,
}

impl AssetStatus {
    #[must_use]
    pub fn is_available(self) -> bool {
        self != Self::Unavailable
    }
}

/// Make sure a welcome animation exists at `path`.
///
/// An existing file is kept as is. Otherwise `url` is downloaded; if that is
/// not configured or fails, a placeholder image is generated. Never fails:
/// every problem is logged and reflected in the returned status.
pub async fn prepare_welcome_asset(path: &Path, url: Option<&str>) -> AssetStatus {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        info!(path = %path.display(), "welcome asset already present");
        return AssetStatus::Cached;
    }

    if let Some(url) = url.filter(|u| !u.is_empty()) {
        let result = match download::client() {
            Ok(client) => download::download_to(&client, url, path).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(bytes) => {
                info!(url, bytes, "welcome animation downloaded");
                return AssetStatus::Downloaded;
            },
            Err(e) => warn!(url, error = %e, "welcome animation download failed"),
        }
    }

    match placeholder::write_placeholder(path).await {
        Ok(()) => {
            info!(path = %path.display(), "generated placeholder welcome image");
            AssetStatus::Generated
        },
        Err(e) => {
            warn!(error = %e, "failed to generate placeholder welcome image");
            AssetStatus::Unavailable
        },
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    use crate::download::tests::{GIF_BYTES, spawn_media_server};

    #[tokio::test]
    async fn existing_file_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("welcome.gif");
        std::fs::write(&path, b"mine").unwrap();

        let status = prepare_welcome_asset(&path, Some("http://127.0.0.1:1/never")).await;

        assert_eq!(status, AssetStatus::Cached);
        assert_eq!(std::fs::read(&path).unwrap(), b"mine");
    }

    #[tokio::test]
    async fn missing_file_is_downloaded() {
        let addr = spawn_media_server().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("welcome.gif");

        let url = format!("http://{addr}/ok.gif");
        let status = prepare_welcome_asset(&path, Some(&url)).await;

        assert_eq!(status, AssetStatus::Downloaded);
        assert_eq!(std::fs::read(&path).unwrap(), GIF_BYTES);
    }

    #[tokio::test]
    async fn failed_download_generates_placeholder() {
        let addr = spawn_media_server().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("welcome.gif");

        let url = format!("http://{addr}/missing.gif");
        let status = prepare_welcome_asset(&path, Some(&url)).await;

        assert_eq!(status, AssetStatus::Generated);
        assert!(std::fs::read(&path).unwrap().starts_with(b"GIF8"));
    }

    #[tokio::test]
    async fn no_url_generates_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("welcome.gif");
        assert_eq!(
            prepare_welcome_asset(&path, None).await,
            AssetStatus::Generated
        );
    }

    #[tokio::test]
    async fn unwritable_destination_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("welcome.gif");
        let status = prepare_welcome_asset(&path, None).await;
        assert_eq!(status, AssetStatus::Unavailable);
        assert!(!status.is_available());
    }
}
