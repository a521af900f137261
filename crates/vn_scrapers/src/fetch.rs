use std::time::Duration;

use vn_core::{Error, RawDocument, Result};

/// Browser-like identification. Several publishers serve reduced or
/// blocked markup to default client strings.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| Error::Fetch(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Single GET per URL; no cookies, no retries. Retry policy, if any,
    /// belongs to the caller.
    pub async fn fetch(&self, url: &str) -> Result<RawDocument> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "{}: unexpected status {}",
                url,
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;

        Ok(RawDocument {
            url: url.to_string(),
            html,
        })
    }

    /// The underlying client, shared with collaborators that speak HTTP
    /// themselves (feed discovery).
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bai-viet.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><h1>ok</h1></html>"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let url = format!("{}/bai-viet.html", server.uri());
        let document = fetcher.fetch(&url).await.unwrap();
        assert_eq!(document.url, url);
        assert!(document.html.contains("<h1>ok</h1>"));
    }

    #[tokio::test]
    async fn test_fetch_non_2xx_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let result = fetcher.fetch(&format!("{}/missing", server.uri())).await;
        assert!(matches!(result, Err(Error::Fetch(_))));
    }
}
