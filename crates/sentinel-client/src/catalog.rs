use std::time::Duration;

use sentinel_types::{Category, ModelEntry};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::transport::ServiceHttp;
use crate::wire::lenient_id;

/// Catalog listings come back either as a bare array or wrapped as
/// `{data, error}`; `data` may be null.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Wrapped {
        data: Option<Vec<T>>,
        error: Option<serde_json::Value>,
    },
}

impl<T> Listing<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            Listing::Bare(items) => items,
            Listing::Wrapped { data, error } => {
                if let Some(error) = error.filter(|e| !e.is_null()) {
                    warn!(error = %error, "Catalog reported an error");
                }
                data.unwrap_or_default()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawModel {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    glb_url: Option<String>,
}

impl RawModel {
    /// Entries without a usable URL cannot be displayed and are dropped.
    fn into_entry(self) -> Option<ModelEntry> {
        let glb_url = self.glb_url.filter(|u| !u.trim().is_empty())?;
        Some(ModelEntry {
            id: self.id.unwrap_or_else(|| glb_url.clone()),
            name: self
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Untitled model".into()),
            glb_url,
        })
    }
}

/// Parse a model listing, dropping entries with an empty or missing URL.
pub fn parse_catalog(body: &[u8]) -> ClientResult<Vec<ModelEntry>> {
    let listing: Listing<RawModel> = serde_json::from_slice(body)
        .map_err(|e| ClientError::Malformed(format!("unrecognized catalog listing: {e}")))?;

    let raw = listing.into_items();
    let total = raw.len();
    let models: Vec<ModelEntry> = raw.into_iter().filter_map(RawModel::into_entry).collect();

    if models.len() < total {
        debug!(
            dropped = total - models.len(),
            "Dropped catalog entries without a model URL"
        );
    }

    Ok(models)
}

/// Parse a category listing.
pub fn parse_categories(body: &[u8]) -> ClientResult<Vec<Category>> {
    let listing: Listing<Category> = serde_json::from_slice(body)
        .map_err(|e| ClientError::Malformed(format!("unrecognized category listing: {e}")))?;
    Ok(listing.into_items())
}

/// Client for the model catalog service.
pub struct CatalogClient {
    http: ServiceHttp,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            http: ServiceHttp::new(base_url, timeout)?,
        })
    }

    /// All public models.
    pub async fn list_models(&self) -> ClientResult<Vec<ModelEntry>> {
        let body = self.http.get(self.http.url("/public_glb_models/")).await?;
        parse_catalog(&body)
    }

    /// Model categories.
    pub async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        let body = self.http.get(self.http.url("/categories/")).await?;
        parse_categories(&body)
    }

    /// Models within one category.
    pub async fn models_in_category(&self, category: &str) -> ClientResult<Vec<ModelEntry>> {
        let url = self.http.segment_url(&["models", category])?;
        let body = self.http.get(url).await?;
        parse_catalog(&body)
    }
}
