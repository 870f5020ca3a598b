//! Model catalog commands

use sentinel_client::CatalogClient;
use sentinel_types::{Category, ModelEntry};
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliResult;
use crate::output::{print_output, OutputFormat};

#[derive(Serialize, Tabled)]
struct ModelRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    glb_url: String,
}

impl From<ModelEntry> for ModelRow {
    fn from(entry: ModelEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            glb_url: entry.glb_url,
        }
    }
}

#[derive(Serialize, Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    name: String,
}

impl From<Category> for CategoryRow {
    fn from(category: Category) -> Self {
        Self {
            name: category.name,
        }
    }
}

/// List models, optionally within one category
pub async fn models(
    client: &CatalogClient,
    category: Option<&str>,
    format: OutputFormat,
) -> CliResult<()> {
    let models = match category {
        Some(category) => client.models_in_category(category).await?,
        None => client.list_models().await?,
    };
    print_output(models.into_iter().map(ModelRow::from).collect(), format)
}

/// List model categories
pub async fn categories(client: &CatalogClient, format: OutputFormat) -> CliResult<()> {
    let categories = client.list_categories().await?;
    print_output(
        categories.into_iter().map(CategoryRow::from).collect(),
        format,
    )
}
