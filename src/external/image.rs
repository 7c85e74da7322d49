//! Species image lookup against the Wikipedia REST API.

use crate::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;

#[async_trait]
pub trait ImageLookup: Send + Sync {
    /// Image URL for `name`, or `None` when the source has no image for it.
    async fn image_for(&self, name: &str) -> Result<Option<String>, AppError>;
}

#[derive(Debug, Deserialize)]
struct ImageRef {
    source: String,
}

/// The parts of `/page/summary/{title}` that carry images.
#[derive(Debug, Deserialize)]
struct PageSummary {
    originalimage: Option<ImageRef>,
    thumbnail: Option<ImageRef>,
}

impl PageSummary {
    fn image(self) -> Option<String> {
        self.originalimage.or(self.thumbnail).map(|i| i.source)
    }
}

#[derive(Clone, Debug)]
pub struct WikipediaImages {
    client: reqwest::Client,
    base_url: String,
}

impl WikipediaImages {
    /// `base_url` is the REST root, e.g. `https://en.wikipedia.org/api/rest_v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        WikipediaImages {
            client,
            base_url: base_url.into(),
        }
    }

    fn summary_url(&self, name: &str) -> Result<reqwest::Url, AppError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| AppError::Upstream(format!("image api url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Upstream("image api url has no path".into()))?
            .pop_if_empty()
            .push("page")
            .push("summary")
            .push(&name.trim().replace(' ', "_"));
        Ok(url)
    }
}

#[async_trait]
impl ImageLookup for WikipediaImages {
    async fn image_for(&self, name: &str) -> Result<Option<String>, AppError> {
        let url = self.summary_url(name)?;
        tracing::debug!(%url, "image lookup");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("image lookup: {}", e)))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let summary: PageSummary = resp
            .error_for_status()
            .map_err(|e| AppError::Upstream(format!("image lookup: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("image lookup: {}", e)))?;
        Ok(summary.image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_url_encodes_title() {
        let images = WikipediaImages::new("https://en.wikipedia.org/api/rest_v1/");
        let url = images.summary_url(" Eurasian lynx ").unwrap();
        assert_eq!(url.as_str(), "https://en.wikipedia.org/api/rest_v1/page/summary/Eurasian_lynx");

        let url = images.summary_url("Chat/Dog").unwrap();
        assert!(url.as_str().ends_with("/page/summary/Chat%2FDog"));
    }

    #[test]
    fn bad_base_url_is_upstream_error() {
        let err = WikipediaImages::new("not a url").summary_url("Lynx").unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[test]
    fn original_image_preferred_over_thumbnail() {
        let summary: PageSummary = serde_json::from_value(serde_json::json!({
            "title": "Eurasian lynx",
            "thumbnail": { "source": "https://img/thumb.jpg", "width": 320 },
            "originalimage": { "source": "https://img/full.jpg", "width": 2000 }
        }))
        .unwrap();
        assert_eq!(summary.image().as_deref(), Some("https://img/full.jpg"));

        let summary: PageSummary = serde_json::from_value(serde_json::json!({ "title": "Nothing" })).unwrap();
        assert_eq!(summary.image(), None);
    }
}
