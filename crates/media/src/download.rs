use std::{path::Path, time::Duration};

use {tokio::io::AsyncWriteExt, tracing::debug};

use crate::{Error, Result, error::Context};

pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Some media hosts refuse requests without a browser user agent.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// HTTP client used for media downloads.
pub fn client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::external("failed to build http client", e))
}

/// Stream `url` into `dest`, returning the number of bytes written.
///
/// The body is written to a sibling `.part` file and renamed into place, so
/// `dest` never holds a truncated download.
pub async fn download_to(client: &reqwest::Client, url: &str, dest: &Path) -> Result<u64> {
    if url.is_empty() {
        return Err(Error::invalid_input("empty download url"));
    }

    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::external(format!("failed to fetch {url}"), e))?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let partial = dest.with_extension("part");
    let mut file = tokio::fs::File::create(&partial)
        .await
        .with_context(|| format!("failed to create {}", partial.display()))?;

    let mut written = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| Error::external(format!("failed to read body of {url}"), e))?
    {
        file.write_all(&chunk)
            .await
            .context("failed to write download")?;
        written += chunk.len() as u64;
    }
    file.flush()
        .await
        .context("failed to flush download")?;
    drop(file);

    tokio::fs::rename(&partial, dest)
        .await
        .with_context(|| format!("failed to move download to {}", dest.display()))?;

    debug!(url, bytes = written, path = %dest.display(), "download complete");
    Ok(written)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod tests {
    use std::net::SocketAddr;

    use {
        axum::{Router, http::StatusCode, routing::get},
        tokio::net::TcpListener,
    };

    use super::*;

    pub(crate) const GIF_BYTES: &[u8] = b"GIF89a-fake-animation";

    /// Serves `/ok.gif` and a failing `/missing.gif`.
    pub(crate) async fn spawn_media_server() -> SocketAddr {
        let app = Router::new()
            .route("/ok.gif", get(|| async { GIF_BYTES }))
            .route(
                "/missing.gif",
                get(|| async { (StatusCode::NOT_FOUND, "nope") }),
            );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn downloads_body_to_destination() {
        let addr = spawn_media_server().await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("welcome.gif");

        let n = download_to(&client().unwrap(), &format!("http://{addr}/ok.gif"), &dest)
            .await
            .unwrap();

        assert_eq!(n, GIF_BYTES.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), GIF_BYTES);
        assert!(!dest.with_extension("part").exists());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let addr = spawn_media_server().await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("welcome.gif");

        let err = download_to(
            &client().unwrap(),
            &format!("http://{addr}/missing.gif"),
            &dest,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Status { status: 404, .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn empty_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = download_to(&client().unwrap(), "", &dir.path().join("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }
}
