use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::Serialize;

use crate::error::{ClientError, ClientResult};

/// Thin HTTP wrapper shared by the service clients.
///
/// Responses are returned as raw bytes so each caller decides how to parse
/// them; a non-2xx status is an [`ClientError::Api`].
#[derive(Clone, Debug)]
pub(crate) struct ServiceHttp {
    client: Client,
    base_url: String,
}

impl ServiceHttp {
    pub(crate) fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL {base_url:?}: {e}")))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL with a fixed path such as `/edit_component/`.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Join the base URL with path segments, percent-encoding each one.
    pub(crate) fn segment_url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn get(&self, url: impl reqwest::IntoUrl) -> ClientResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> ClientResult<Vec<u8>> {
        let response = self.client.post(url).json(body).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response(response: Response) -> ClientResult<Vec<u8>> {
        let status = response.status();

        if status.is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
