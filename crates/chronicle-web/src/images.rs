//! Image caching backed by the game's CDN.
//!
//! Submissions only carry image identifiers; this cache downloads the files
//! once so recorded content can be served without leaning on the upstream
//! CDN. Submission handlers already run on blocking threads, so the client
//! is the blocking one.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chronicle_core::images::{ImageCache, ImageKind};
use once_cell::sync::OnceCell;
use tracing::warn;

/// Downloads images on first sight and serves local paths afterwards.
///
/// The blocking HTTP client is created lazily: submission handlers run on
/// blocking threads, and reqwest's blocking client must not be built on a
/// runtime thread.
pub struct HttpImageCache {
    client: OnceCell<reqwest::blocking::Client>,
    base_url: String,
    cache_dir: PathBuf,
}

impl HttpImageCache {
    pub fn new(base_url: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: OnceCell::new(),
            base_url: base_url.into(),
            cache_dir: cache_dir.into(),
        }
    }

    fn client(&self) -> &reqwest::blocking::Client {
        self.client.get_or_init(|| {
            reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default()
        })
    }

    fn remote_url(&self, kind: ImageKind, id: &str) -> String {
        format!("{}/{}/{}.png", self.base_url, kind.directory(), id)
    }

    fn fetch(&self, kind: ImageKind, id: &str) -> anyhow::Result<()> {
        let dir = self.cache_dir.join(kind.directory());
        fs::create_dir_all(&dir)?;
        let bytes = self
            .client()
            .get(self.remote_url(kind, id))
            .send()?
            .error_for_status()?
            .bytes()?;
        fs::write(dir.join(format!("{id}.png")), &bytes)?;
        Ok(())
    }
}

impl ImageCache for HttpImageCache {
    fn cache_or_get(&self, kind: ImageKind, image_id: Option<&str>) -> Option<String> {
        let id = image_id?;
        if id.is_empty() {
            return None;
        }
        let local = self
            .cache_dir
            .join(kind.directory())
            .join(format!("{id}.png"));
        if !local.exists() {
            if let Err(error) = self.fetch(kind, id) {
                warn!(%error, id, "image fetch failed, keeping upstream url");
                return Some(self.remote_url(kind, id));
            }
        }
        Some(format!("/{}/{}.png", kind.directory(), id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_file_is_served_without_fetching() {
        let dir = std::env::temp_dir().join("chronicle-image-cache-test");
        fs::create_dir_all(dir.join("icons")).unwrap();
        fs::write(dir.join("icons/present.png"), b"png").unwrap();

        let cache = HttpImageCache::new("http://localhost:1", &dir);
        assert_eq!(
            cache.cache_or_get(ImageKind::Icon, Some("present")),
            Some("/icons/present.png".to_string())
        );
    }

    #[test]
    fn test_missing_image_falls_back_to_upstream_url() {
        let dir = std::env::temp_dir().join("chronicle-image-cache-test-miss");
        // Port 1 refuses connections, so the fetch fails fast.
        let cache = HttpImageCache::new("http://127.0.0.1:1", &dir);
        assert_eq!(
            cache.cache_or_get(ImageKind::Header, Some("absent")),
            Some("http://127.0.0.1:1/headers/absent.png".to_string())
        );
    }
}
