use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::PanelError;
use crate::Result;

// ─── Transport ────────────────────────────────────────────────────────────

/// The two kinds of round trip the panel makes: fetching the page and
/// posting a form to a mutation endpoint.
///
/// Both report a non-success status as an error. The panel never looks at
/// the body of a mutation response.
pub trait Transport: Send + Sync + 'static {
    fn get_page(&self, url: &str) -> impl Future<Output = Result<String>> + Send;

    fn post_form(
        &self,
        url: &str,
        fields: &[(&'static str, String)],
    ) -> impl Future<Output = Result<()>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn get_page(&self, url: &str) -> impl Future<Output = Result<String>> + Send {
        (**self).get_page(url)
    }

    fn post_form(
        &self,
        url: &str,
        fields: &[(&'static str, String)],
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).post_form(url, fields)
    }
}

// ─── HttpTransport ────────────────────────────────────────────────────────

/// [`Transport`] over HTTP with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PanelError::Client)?;
        Ok(Self { client })
    }

    fn check(url: &str, response: &reqwest::Response) -> Result<()> {
        let status = response.status();
        if !status.is_success() {
            return Err(PanelError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

impl Transport for HttpTransport {
    async fn get_page(&self, url: &str) -> Result<String> {
        let http = |source| PanelError::Http {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(http)?;
        Self::check(url, &response)?;
        let body = response.text().await.map_err(http)?;
        debug!(url, bytes = body.len(), "fetched page");
        Ok(body)
    }

    async fn post_form(&self, url: &str, fields: &[(&'static str, String)]) -> Result<()> {
        let response = self
            .client
            .post(url)
            .form(fields)
            .send()
            .await
            .map_err(|source| PanelError::Http {
                url: url.to_string(),
                source,
            })?;
        Self::check(url, &response)?;
        debug!(url, status = response.status().as_u16(), "posted form");
        Ok(())
    }
}
