//! Image resolution for recorded content.

/// Which CDN directory an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Header,
    Icon,
    IconSmall,
}

impl ImageKind {
    pub fn directory(&self) -> &'static str {
        match self {
            Self::Header => "headers",
            Self::Icon => "icons",
            Self::IconSmall => "icons_small",
        }
    }
}

/// Resolves a game image identifier to a locally servable path, fetching and
/// caching the upstream file when configured to do so.
pub trait ImageCache: Send + Sync {
    /// Returns the local path for the image, or `None` when no identifier was
    /// supplied or the image could not be resolved.
    fn cache_or_get(&self, kind: ImageKind, image_id: Option<&str>) -> Option<String>;
}

/// Pass-through resolver that maps identifiers straight to their expected
/// local paths without touching the network.
#[derive(Debug, Default)]
pub struct NullImageCache;

impl ImageCache for NullImageCache {
    fn cache_or_get(&self, kind: ImageKind, image_id: Option<&str>) -> Option<String> {
        let id = image_id?;
        if id.is_empty() {
            return None;
        }
        Some(format!("/{}/{}.png", kind.directory(), id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cache_maps_directories() {
        let cache = NullImageCache;
        assert_eq!(
            cache.cache_or_get(ImageKind::Icon, Some("clock")),
            Some("/icons/clock.png".to_string())
        );
        assert_eq!(
            cache.cache_or_get(ImageKind::Header, Some("ladybones")),
            Some("/headers/ladybones.png".to_string())
        );
        assert_eq!(cache.cache_or_get(ImageKind::IconSmall, None), None);
        assert_eq!(cache.cache_or_get(ImageKind::Icon, Some("")), None);
    }
}
