//! # Store configuration DTO
//!
//! Pure data: TOML → [`StoreConfig`] mapping plus the v1 defaults. Loading
//! the file is the bootstrap's job.

use std::path::PathBuf;

use crate::builder::DEFAULT_MAX_FILE_BYTES;

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Per-file limit at enqueue time.
    pub max_file_bytes: u64,

    /// Full images above this size are re-compressed before upload.
    pub upload_recompress_threshold_bytes: u64,

    /// JPEG quality used for the re-compression pass.
    pub recompress_quality: u8,

    /// Longest edge of generated thumbnails, in pixels.
    pub thumbnail_max_edge: u32,

    /// Delete already-uploaded blobs when a package upload fails midway.
    pub cleanup_orphaned_uploads: bool,

    /// Inline previews longer than this are moved to the thumbnail cache
    /// before the cart is persisted.
    pub inline_threshold_bytes: usize,

    pub database_path: PathBuf,
    pub blob_dir: PathBuf,
    pub thumbnail_cache_dir: PathBuf,

    /// Empty means "no remote order API configured".
    pub order_api_url: String,

    /// Empty means uploads go to `blob_dir`.
    pub blob_upload_url: String,

    pub log_dir: PathBuf,
}

impl StoreConfig {
    /// v1 defaults, rooted at `base_dir`.
    pub fn defaults(base_dir: PathBuf) -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            upload_recompress_threshold_bytes: 5 * 1024 * 1024,
            recompress_quality: 60,
            thumbnail_max_edge: 200,
            cleanup_orphaned_uploads: false,
            inline_threshold_bytes: 16 * 1024,
            database_path: base_dir.join("cart.db"),
            blob_dir: base_dir.join("blobs"),
            thumbnail_cache_dir: base_dir.join("thumbnails"),
            order_api_url: String::new(),
            blob_upload_url: String::new(),
            log_dir: base_dir.join("logs"),
        }
    }

    /// Overlays values present in `toml_value` on top of `defaults(base_dir)`.
    pub fn from_toml(toml_value: &toml::Value, base_dir: PathBuf) -> anyhow::Result<Self> {
        let defaults = Self::defaults(base_dir);
        let get = |section: &str, key: &str| toml_value.get(section).and_then(|s| s.get(key));
        let get_u64 = |section: &str, key: &str, fallback: u64| -> anyhow::Result<u64> {
            match get(section, key).and_then(|v| v.as_integer()) {
                Some(v) => u64::try_from(v)
                    .map_err(|_| anyhow::anyhow!("{section}.{key} must not be negative")),
                None => Ok(fallback),
            }
        };
        let get_path = |section: &str, key: &str, fallback: PathBuf| {
            get(section, key)
                .and_then(|v| v.as_str())
                .map(PathBuf::from)
                .unwrap_or(fallback)
        };
        let get_string = |section: &str, key: &str, fallback: String| {
            get(section, key)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or(fallback)
        };

        let recompress_quality = get_u64("upload", "recompress_quality", defaults.recompress_quality.into())?;
        let thumbnail_max_edge = get_u64("upload", "thumbnail_max_edge", defaults.thumbnail_max_edge.into())?;
        let inline_threshold_bytes =
            get_u64("storage", "inline_threshold_bytes", defaults.inline_threshold_bytes as u64)?;

        Ok(Self {
            max_file_bytes: get_u64("upload", "max_file_bytes", defaults.max_file_bytes)?,
            upload_recompress_threshold_bytes: get_u64(
                "upload",
                "upload_recompress_threshold_bytes",
                defaults.upload_recompress_threshold_bytes,
            )?,
            recompress_quality: u8::try_from(recompress_quality.clamp(1, 100))?,
            thumbnail_max_edge: u32::try_from(thumbnail_max_edge)?,
            cleanup_orphaned_uploads: get("upload", "cleanup_orphaned_uploads")
                .and_then(|v| v.as_bool())
                .unwrap_or(defaults.cleanup_orphaned_uploads),
            inline_threshold_bytes: usize::try_from(inline_threshold_bytes)?,
            database_path: get_path("storage", "database_path", defaults.database_path),
            blob_dir: get_path("storage", "blob_dir", defaults.blob_dir),
            thumbnail_cache_dir: get_path("storage", "thumbnail_cache_dir", defaults.thumbnail_cache_dir),
            order_api_url: get_string("api", "order_api_url", defaults.order_api_url),
            blob_upload_url: get_string("api", "blob_upload_url", defaults.blob_upload_url),
            log_dir: get_path("logging", "log_dir", defaults.log_dir),
        })
    }
}
