use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::presigning::PresigningConfig;
use std::{path::Path, sync::Arc, time::Duration};
use thiserror::Error;
use uuid::Uuid;

/// Lifetime of a presigned upload URL.
pub const UPLOAD_URL_TTL: Duration = Duration::from_secs(600);

/// Key prefix for every uploaded cover and event image.
pub const UPLOAD_PREFIX: &str = "uploads";

/// Extension used when the original filename has no usable one.
const FALLBACK_EXTENSION: &str = "bin";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not presign upload: {0}")]
    Presign(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// True for `image/*` MIME types, the only uploads content records accept.
pub fn is_image_type(content_type: &str) -> bool {
    content_type
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

/// image_upload_key
///
/// Object key for a new image: `uploads/<uuid>.<ext>`. Only the extension of
/// the client's filename survives, lowercased; anything non-alphanumeric falls
/// back to `bin`.
pub fn image_upload_key(filename: &str) -> String {
    let extension = Path::new(filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

    format!("{}/{}.{}", UPLOAD_PREFIX, Uuid::new_v4(), extension)
}

/// Drops empty, `.` and `..` segments from an object key.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// MediaStorage
///
/// Bucket holding the images referenced by `coverImage` / `image`. Browsers
/// upload straight to the bucket through a presigned URL; the API never sees
/// the bytes.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Creates the bucket if missing. Called at start-up in the local
    /// environment only.
    async fn ensure_bucket(&self);

    /// A URL accepting one PUT of `key` with exactly `content_type`, valid for
    /// `UPLOAD_URL_TTL`.
    async fn presign_upload(&self, key: &str, content_type: &str) -> Result<String, StorageError>;
}

pub type StorageState = Arc<dyn MediaStorage>;

/// S3MediaStorage
///
/// S3-compatible bucket: MinIO locally, any S3 gateway in production. Uses
/// path-style addressing, which MinIO requires.
#[derive(Clone)]
pub struct S3MediaStorage {
    client: s3::Client,
    bucket: String,
}

impl S3MediaStorage {
    pub fn new(endpoint: &str, region: &str, access_key: &str, secret_key: &str, bucket: &str) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "culture-cms");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        Self {
            client: s3::Client::from_conf(config),
            bucket: bucket.to_string(),
        }
    }

    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        Self::new(
            &config.s3_endpoint,
            &config.s3_region,
            &config.s3_key,
            &config.s3_secret,
            &config.s3_bucket,
        )
    }
}

#[async_trait]
impl MediaStorage for S3MediaStorage {
    async fn ensure_bucket(&self) {
        match self.client.create_bucket().bucket(&self.bucket).send().await {
            Ok(_) => tracing::info!(bucket = %self.bucket, "media bucket created"),
            // Already-exists lands here too.
            Err(e) => tracing::debug!(bucket = %self.bucket, error = %e, "create_bucket skipped"),
        }
    }

    async fn presign_upload(&self, key: &str, content_type: &str) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(UPLOAD_URL_TTL)
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(sanitize_key(key))
            // Signed header: the browser must upload with the same Content-Type.
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        Ok(request.uri().to_string())
    }
}

/// MockMediaStorage
///
/// Deterministic bucket for tests; no network.
#[derive(Clone, Default)]
pub struct MockMediaStorage {
    /// When true, every presign fails as if the bucket were unreachable.
    pub should_fail: bool,
}

impl MockMediaStorage {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

#[async_trait]
impl MediaStorage for MockMediaStorage {
    async fn ensure_bucket(&self) {}

    async fn presign_upload(&self, key: &str, _content_type: &str) -> Result<String, StorageError> {
        if self.should_fail {
            return Err(StorageError::Unavailable("mock bucket offline".to_string()));
        }

        Ok(format!(
            "http://localhost:9000/mock-bucket/{}?signature=fake",
            sanitize_key(key)
        ))
    }
}
