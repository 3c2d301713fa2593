//! Object storage implementations.

mod memory;

#[cfg(feature = "s3")]
mod s3;

pub use memory::InMemoryObjectStore;

#[cfg(feature = "s3")]
pub use s3::S3ObjectStore;

/// S3-compatible object storage configuration.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2, ...).
    pub endpoint: Option<String>,
    /// Path-style addressing, required by most S3-compatible stores.
    pub path_style: bool,
    /// Overrides the computed public URL base (CDN domain etc.).
    pub public_base_url: Option<String>,
}

impl S3Config {
    /// Load configuration from environment variables. `None` when no
    /// bucket is configured, which puts the server in fallback mode.
    pub fn from_env() -> Option<Self> {
        let bucket = std::env::var("S3_BUCKET").ok()?;

        Some(Self {
            bucket,
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint: std::env::var("S3_ENDPOINT").ok(),
            path_style: std::env::var("S3_FORCE_PATH_STYLE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            public_base_url: std::env::var("S3_PUBLIC_BASE_URL").ok(),
        })
    }

    /// The deterministic public URL for an object key.
    pub fn public_url(&self, key: &str) -> String {
        if let Some(base) = &self.public_base_url {
            format!("{}/{}", base.trim_end_matches('/'), key)
        } else if let Some(endpoint) = &self.endpoint {
            format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
        } else if self.path_style {
            format!(
                "https://s3.{}.amazonaws.com/{}/{}",
                self.region, self.bucket, key
            )
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}
