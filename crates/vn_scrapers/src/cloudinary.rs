//! Cloudinary upload client.
//!
//! Unsigned preset upload: the remote image URL goes in the `file` field
//! and Cloudinary fetches it server-side. Everything lands in one logical
//! folder; filenames are kept and existing assets are never overwritten,
//! so re-ingesting a story cannot clobber a hosted image.

use async_trait::async_trait;
use serde::Deserialize;

use crate::assets::AssetHost;
use vn_core::{Error, Result};

const UPLOAD_FOLDER: &str = "news-thumbnails";
const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

pub struct CloudinaryHost {
    client: reqwest::Client,
    cloud_name: String,
    upload_preset: String,
    base_url: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl CloudinaryHost {
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}/image/upload", self.base_url, self.cloud_name)
    }
}

#[async_trait]
impl AssetHost for CloudinaryHost {
    async fn upload(&self, source_url: &str) -> Result<String> {
        let params = [
            ("file", source_url),
            ("upload_preset", self.upload_preset.as_str()),
            ("folder", UPLOAD_FOLDER),
            ("use_filename", "true"),
            ("unique_filename", "false"),
            ("overwrite", "false"),
        ];

        let response = self
            .client
            .post(self.endpoint())
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::Upload(format!("{}: {}", source_url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Upload(format!(
                "{}: unexpected status {}",
                source_url,
                response.status()
            )));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| Error::Upload(format!("{}: unreadable response: {}", source_url, e)))?;
        Ok(parsed.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_upload_returns_secure_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/image/upload"))
            .and(body_string_contains("upload_preset=tin-tuc"))
            .and(body_string_contains("folder=news-thumbnails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/news-thumbnails/anh.jpg"
            })))
            .mount(&server)
            .await;

        let host = CloudinaryHost::new("demo", "tin-tuc").with_base_url(server.uri());
        let hosted = host.upload("https://i.vn/anh.jpg").await.unwrap();
        assert!(hosted.ends_with("/news-thumbnails/anh.jpg"));
    }

    #[tokio::test]
    async fn test_upload_failure_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let host = CloudinaryHost::new("demo", "tin-tuc").with_base_url(server.uri());
        let result = host.upload("https://i.vn/anh.jpg").await;
        assert!(matches!(result, Err(Error::Upload(_))));
    }
}
