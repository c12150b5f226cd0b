//! Matching-service client: indicator catalog and paged filter application

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::config::ScreenerConfig;
use crate::error::ScanError;
use crate::models::indicators::IndicatorCatalog;
use crate::models::scan::{ScanRequest, ScanResponse};

/// Boundary to the external matching service.
#[async_trait]
pub trait ScreenerApi: Send + Sync {
    /// `GET {base}/metadata/indicators`
    async fn fetch_indicators(&self) -> Result<IndicatorCatalog, ScanError>;

    /// `POST {base}/filters/apply` for one page.
    async fn apply_filters(&self, request: &ScanRequest) -> Result<ScanResponse, ScanError>;
}

pub struct HttpScreenerClient {
    client: Client,
    base_url: String,
}

impl HttpScreenerClient {
    pub fn new(config: &ScreenerConfig) -> Self {
        Self::with_client(config.base_url(), Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Non-success responses carry their body text as the error message.
async fn read_json<T>(response: reqwest::Response) -> Result<T, ScanError>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ScanError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl ScreenerApi for HttpScreenerClient {
    async fn fetch_indicators(&self) -> Result<IndicatorCatalog, ScanError> {
        let url = self.endpoint("metadata/indicators");
        debug!(url = %url, "fetching indicator catalog");
        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }

    async fn apply_filters(&self, request: &ScanRequest) -> Result<ScanResponse, ScanError> {
        let url = self.endpoint("filters/apply");
        debug!(url = %url, offset = request.offset, limit = request.limit, "applying filters");
        let response = self.client.post(&url).json(request).send().await?;
        let result = read_json::<ScanResponse>(response).await;
        match &result {
            Ok(page) => debug!(rows = page.companies.len(), offset = request.offset, "page received"),
            Err(e) => error!(error = %e, offset = request.offset, "filter request failed"),
        }
        result
    }
}

/// Fetch the catalog once. Failures are logged and yield an empty catalog;
/// selectors then fall back to raw indicator keys.
pub async fn load_catalog(api: &dyn ScreenerApi) -> IndicatorCatalog {
    match api.fetch_indicators().await {
        Ok(catalog) => {
            info!(count = catalog.len(), "indicator catalog loaded");
            catalog
        }
        Err(e) => {
            warn!(error = %e, "indicator catalog unavailable, continuing with empty catalog");
            IndicatorCatalog::default()
        }
    }
}
