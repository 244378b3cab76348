//! Image Storage
//!
//! Pass-through uploads of blog and executive images into the project's
//! public bucket. Files are stored under a random name that keeps the
//! original extension.

use async_trait::async_trait;
use reqwest::Method;

use super::client::BackendClient;
use super::error::BackendResult;

/// Folder inside the bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFolder {
    Blog,
    Executives,
}

impl ImageFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFolder::Blog => "blog",
            ImageFolder::Executives => "executives",
        }
    }
}

/// Object storage for uploaded images
#[async_trait(?Send)]
pub trait ImageStore {
    /// Store `bytes` at `path` inside the bucket
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> BackendResult<()>;

    /// Publicly readable URL of the object at `path`
    fn public_url(&self, path: &str) -> String;
}

/// Random object path for an uploaded file, e.g. `blog/3f2a...9c.png`
pub fn object_path(folder: ImageFolder, file_name: &str) -> String {
    let stem = uuid::Uuid::new_v4().simple().to_string();
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => {
            format!("{}/{}.{}", folder.as_str(), stem, ext.to_ascii_lowercase())
        }
        _ => format!("{}/{}", folder.as_str(), stem),
    }
}

/// Upload a file and return its public URL
pub async fn upload_image(
    store: &dyn ImageStore,
    folder: ImageFolder,
    file_name: &str,
    bytes: Vec<u8>,
    content_type: &str,
) -> BackendResult<String> {
    let path = object_path(folder, file_name);
    store.upload(&path, bytes, content_type).await?;
    tracing::info!(path = %path, "Uploaded image");
    Ok(store.public_url(&path))
}

/// Storage API client for one bucket
#[derive(Clone)]
pub struct BucketStore {
    client: BackendClient,
    bucket: String,
}

impl BucketStore {
    pub fn new(client: BackendClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait(?Send)]
impl ImageStore for BucketStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> BackendResult<()> {
        let url = self
            .client
            .endpoint(&format!("storage/v1/object/{}/{}", self.bucket, path));
        let request = self
            .client
            .request(Method::POST, &url)
            .header("Content-Type", content_type)
            .body(bytes);

        self.client.send(request).await?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.client
            .endpoint(&format!("storage/v1/object/public/{}/{}", self.bucket, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use httpmock::prelude::*;

    #[test]
    fn test_object_path_keeps_extension() {
        let path = object_path(ImageFolder::Blog, "Team Photo.JPG");
        assert!(path.starts_with("blog/"));
        assert!(path.ends_with(".jpg"));
        // "blog/" + 32 hex chars + ".jpg"
        assert_eq!(path.len(), 5 + 32 + 4);
    }

    #[test]
    fn test_object_path_without_extension() {
        let path = object_path(ImageFolder::Executives, "portrait");
        assert!(path.starts_with("executives/"));
        assert!(!path.contains('.'));
    }

    #[test]
    fn test_object_paths_are_unique() {
        assert_ne!(
            object_path(ImageFolder::Blog, "a.png"),
            object_path(ImageFolder::Blog, "a.png")
        );
    }

    #[tokio::test]
    async fn test_upload_returns_public_url() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path_contains("/storage/v1/object/implexa-images/blog/")
                    .header("content-type", "image/png")
                    .body("png-bytes");
                then.status(200).body(r#"{"Key":"implexa-images/blog/x.png"}"#);
            })
            .await;

        let config = BackendConfig {
            url: server.base_url(),
            anon_key: "anon".to_string(),
            ..BackendConfig::default()
        };
        let store = BucketStore::new(BackendClient::new(&config).unwrap(), "implexa-images");

        let url = upload_image(&store, ImageFolder::Blog, "cover.png", b"png-bytes".to_vec(), "image/png")
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(url.starts_with(&format!(
            "{}/storage/v1/object/public/implexa-images/blog/",
            server.base_url()
        )));
        assert!(url.ends_with(".png"));
    }
}
