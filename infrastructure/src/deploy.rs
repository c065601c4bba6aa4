//! Site deployment: copy the static site into the bucket, then render `config.json`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};
use mime::Mime;

use crate::error::{DeployError, DeployResult};
use crate::substitution;
use crate::unitok::{CONFIG_KEY, CONFIG_TEMPLATE};

/// A local file and the object it becomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub key: String,
    pub path: PathBuf,
    pub content_type: Mime,
}

/// Content type of a site file, by extension
#[must_use]
pub fn content_type(path: &Path) -> Mime {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("html" | "htm") => mime::TEXT_HTML_UTF_8,
        Some("css") => mime::TEXT_CSS_UTF_8,
        Some("js" | "mjs") => mime::APPLICATION_JAVASCRIPT_UTF_8,
        Some("json" | "map") => mime::APPLICATION_JSON,
        Some("txt") => mime::TEXT_PLAIN_UTF_8,
        Some("svg") => mime::IMAGE_SVG,
        Some("png") => mime::IMAGE_PNG,
        Some("jpg" | "jpeg") => mime::IMAGE_JPEG,
        Some("gif") => mime::IMAGE_GIF,
        Some("woff") => mime::FONT_WOFF,
        Some("woff2") => mime::FONT_WOFF2,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// Every file under `source` except the excluded keys, sorted by key
///
/// # Errors
///
/// Returns `DeployError::MissingSource` if `source` is not a directory, or `DeployError::Io`
pub fn plan(source: &Path, exclude: &[&str]) -> DeployResult<Vec<Upload>> {
    if !source.is_dir() {
        return Err(DeployError::MissingSource(source.display().to_string()));
    }

    let mut uploads = Vec::new();
    let mut pending = vec![source.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }

            let key = path
                .strip_prefix(source)
                .unwrap_or(&path)
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if exclude.contains(&key.as_str()) {
                tracing::debug!("Skipping excluded {key}");
                continue;
            }

            uploads.push(Upload {
                content_type: content_type(&path),
                key,
                path,
            });
        }
    }

    uploads.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(uploads)
}

/// Contents of a JSON string literal for `value`, without the surrounding quotes
fn json_string_contents(value: &str) -> DeployResult<String> {
    let quoted = serde_json::to_string(value)?;
    Ok(quoted
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(&quoted)
        .to_string())
}

/// `config.json` for the given API endpoint
///
/// The placeholder sits inside a JSON string, so the endpoint is escaped before substitution.
///
/// # Errors
///
/// Returns `DeployError::Placeholder` if the template needs a value that is not provided
pub fn config_document(api_endpoint: &str) -> DeployResult<String> {
    let values = BTreeMap::from([(
        "apiEndpoint".to_string(),
        json_string_contents(api_endpoint)?,
    )]);
    Ok(substitution::render(CONFIG_TEMPLATE, &values)?)
}

/// Uploads the site to a bucket
pub struct SiteDeployer {
    s3_client: Arc<S3Client>,
    bucket_name: String,
}

impl SiteDeployer {
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String) -> Self {
        Self {
            s3_client,
            bucket_name,
        }
    }

    async fn put(&self, key: &str, body: ByteStream, content_type: &Mime) -> DeployResult<()> {
        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type.as_ref())
            .body(body)
            .send()
            .await?;

        tracing::info!("Uploaded s3://{}/{key}", self.bucket_name);
        Ok(())
    }

    /// Copies `source` without `config.json`, then writes the rendered `config.json`
    ///
    /// Returns the uploaded keys, `config.json` last.
    ///
    /// # Errors
    ///
    /// Returns a `DeployError` if the site cannot be read, the config cannot be rendered,
    /// or an upload fails
    pub async fn deploy(&self, source: &Path, api_endpoint: &str) -> DeployResult<Vec<String>> {
        let config = config_document(api_endpoint)?;
        let uploads = plan(source, &[CONFIG_KEY])?;
        let mut keys = Vec::with_capacity(uploads.len() + 1);

        for upload in uploads {
            let body = ByteStream::from(tokio::fs::read(&upload.path).await?);
            self.put(&upload.key, body, &upload.content_type).await?;
            keys.push(upload.key);
        }

        self.put(
            CONFIG_KEY,
            ByteStream::from(config.into_bytes()),
            &mime::APPLICATION_JSON,
        )
        .await?;
        keys.push(CONFIG_KEY.to_string());

        Ok(keys)
    }
}
