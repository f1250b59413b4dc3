use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::FetchConfig;

/// A fetched page, with the URL it ended up at after redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub url: String,
    pub html: String,
}

#[derive(Debug)]
pub enum AcquisitionError {
    Timeout,
    Http(reqwest::Error),
    Status(StatusCode),
    Body(reqwest::Error),
    #[cfg(test)]
    Unavailable(String),
}

impl AcquisitionError {
    fn http(err: reqwest::Error) -> Self {
        if err.is_timeout() { AcquisitionError::Timeout } else { AcquisitionError::Http(err) }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AcquisitionError::Timeout => "timeout",
            AcquisitionError::Http(_) => "http",
            AcquisitionError::Status(_) => "status",
            AcquisitionError::Body(_) => "body",
            #[cfg(test)]
            AcquisitionError::Unavailable(_) => "unavailable",
        }
    }
}

impl std::fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcquisitionError::Timeout => write!(f, "request timed out"),
            AcquisitionError::Http(err) => write!(f, "http error: {err}"),
            AcquisitionError::Status(status) => write!(f, "unexpected status {status}"),
            AcquisitionError::Body(err) => write!(f, "could not read body: {err}"),
            #[cfg(test)]
            AcquisitionError::Unavailable(url) => write!(f, "no page queued for {url}"),
        }
    }
}

impl std::error::Error for AcquisitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AcquisitionError::Http(err) | AcquisitionError::Body(err) => Some(err),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Acquire {
    async fn acquire(&self, url: &str) -> Result<RenderedPage, AcquisitionError>;
}

pub struct HttpAcquirer {
    http: Client,
}

impl HttpAcquirer {
    pub fn new(cfg: &FetchConfig) -> Result<Self, AcquisitionError> {
        let http = Client::builder()
            .timeout(cfg.timeout)
            .user_agent(cfg.user_agent.clone())
            .build()
            .map_err(AcquisitionError::http)?;
        Ok(HttpAcquirer { http })
    }
}

#[async_trait]
impl Acquire for HttpAcquirer {
    async fn acquire(&self, url: &str) -> Result<RenderedPage, AcquisitionError> {
        let resp = self.http.get(url).send().await.map_err(AcquisitionError::http)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AcquisitionError::Status(status));
        }
        let final_url = resp.url().to_string();
        let html = resp.text().await.map_err(|e| {
            if e.is_timeout() { AcquisitionError::Timeout } else { AcquisitionError::Body(e) }
        })?;
        Ok(RenderedPage { url: final_url, html })
    }
}

#[cfg(test)]
pub use mock::MockAcquirer;

#[cfg(test)]
mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Serves canned pages keyed by URL; unknown URLs fail.
    #[derive(Default)]
    pub struct MockAcquirer {
        pages: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl MockAcquirer {
        pub fn new() -> Self { Self::default() }

        pub fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        pub fn calls(&self) -> Vec<String> { self.calls.lock().unwrap().clone() }
    }

    #[async_trait]
    impl Acquire for MockAcquirer {
        async fn acquire(&self, url: &str) -> Result<RenderedPage, AcquisitionError> {
            self.calls.lock().unwrap().push(url.to_string());
            match self.pages.get(url) {
                Some(html) => Ok(RenderedPage { url: url.to_string(), html: html.clone() }),
                None => Err(AcquisitionError::Unavailable(url.to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = AcquisitionError::Status(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "unexpected status 404 Not Found");
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn builds_http_client_from_config() {
        assert!(HttpAcquirer::new(&FetchConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn mock_serves_queued_pages() {
        let mock = MockAcquirer::new().with_page("https://a.edu/", "<p>hi</p>");
        let page = mock.acquire("https://a.edu/").await.unwrap();
        assert_eq!(page.html, "<p>hi</p>");
        assert!(mock.acquire("https://b.edu/").await.is_err());
        assert_eq!(mock.calls(), ["https://a.edu/", "https://b.edu/"]);
    }
}
