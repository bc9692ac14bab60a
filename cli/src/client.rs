use anyhow::{Context, Result};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

/// Outcome of creating one ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Created {
    Created,
    /// The server rejected it as a duplicate or invalid (400).
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientInput {
    pub name: String,
    pub measurement_unit: String,
}

pub struct Client {
    http: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl Client {
    pub fn new(server: &str, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: server.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: Response, action: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("{} failed with status {}: {}", action, status, body);
    }

    pub async fn tag_count(&self) -> Result<usize> {
        let url = format!("{}/api/tags", self.base);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {url}"))?;
        let tags: Vec<serde_json::Value> = Self::check(response, "Listing tags")
            .await?
            .json()
            .await
            .context("Failed to parse tag list")?;
        Ok(tags.len())
    }

    pub async fn create_ingredient(&self, ingredient: &IngredientInput) -> Result<Created> {
        let url = format!("{}/api/ingredients", self.base);
        let response = self
            .authed(self.http.post(&url))
            .json(ingredient)
            .send()
            .await
            .context("Failed to send ingredient")?;

        if response.status() == StatusCode::BAD_REQUEST {
            return Ok(Created::Rejected);
        }
        Self::check(response, "Creating ingredient").await?;
        Ok(Created::Created)
    }

    pub async fn shopping_cart_csv(&self) -> Result<Vec<u8>> {
        let url = format!("{}/api/recipes/download_shopping_cart", self.base);
        let response = self
            .authed(self.http.get(&url))
            .send()
            .await
            .context("Failed to send download request")?;
        let bytes = Self::check(response, "Download")
            .await?
            .bytes()
            .await
            .context("Failed to read response body")?;
        Ok(bytes.to_vec())
    }
}
