//! Sanity HTTP API backend.
//!
//! Reads go through the GROQ query endpoint and writes through the mutate
//! endpoint, both authenticated with a bearer token.

use super::{BoxFuture, ContentStore, PatchSet, StoreError, StoreResult};
use crate::documents::{CategoryLayout, GuestEntry};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

/// Default API version pinned for queries and mutations.
pub const DEFAULT_API_VERSION: &str = "2024-06-01";

const GUESTBOOK_QUERY: &str = r#"*[_type == "guestEntry"] | order(createdAt desc)"#;

const CATEGORY_LAYOUT_QUERY: &str = r#"{
  "sculptures": *[
    _type == "sculpture" &&
    defined(category->slug.current) &&
    category->slug.current == $slug
  ]{
    _id,
    title,
    description,
    top,
    left,
    left_percentage,
    width,
    width_percentage,
    height,
    "coverImage": coverImage.asset->url
  },
  "category": *[_type == "category" && slug.current == $slug][0]{
    _id,
    title,
    "slug": slug.current,
    background_color
  }
}"#;

/// Connection settings for a Sanity project.
#[derive(Debug, Clone)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Write-capable API token.
    pub token: Option<String>,
    /// Overrides `https://<project>.api.sanity.io`.
    pub api_host: Option<String>,
}

impl SanityConfig {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            token: None,
            api_host: None,
        }
    }

    fn host(&self) -> String {
        self.api_host
            .clone()
            .unwrap_or_else(|| format!("https://{}.api.sanity.io", self.project_id))
    }

    /// URL of the query endpoint with the query and its parameters encoded.
    pub fn query_url(&self, query: &str, params: &[(&str, &Value)]) -> StoreResult<Url> {
        let base = format!(
            "{}/v{}/data/query/{}",
            self.host().trim_end_matches('/'),
            self.api_version,
            self.dataset
        );
        let mut url = Url::parse(&base).map_err(|e| StoreError::Other(format!("invalid Sanity URL: {}", e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            for (name, value) in params {
                pairs.append_pair(&format!("${}", name), &value.to_string());
            }
        }
        Ok(url)
    }

    /// URL of the mutate endpoint, asking for the resulting documents back.
    pub fn mutate_url(&self) -> StoreResult<Url> {
        let base = format!(
            "{}/v{}/data/mutate/{}?returnDocuments=true",
            self.host().trim_end_matches('/'),
            self.api_version,
            self.dataset
        );
        Url::parse(&base).map_err(|e| StoreError::Other(format!("invalid Sanity URL: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct MutateResponse {
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Debug, Deserialize)]
struct MutationResult {
    #[serde(default)]
    document: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct LayoutResult {
    category: Option<crate::documents::Category>,
    #[serde(default)]
    sculptures: Vec<crate::documents::Sculpture>,
}

/// Store backed by a hosted Sanity dataset.
pub struct SanityStore {
    config: SanityConfig,
    client: reqwest::Client,
}

impl SanityStore {
    pub fn new(config: SanityConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &SanityConfig {
        &self.config
    }

    async fn query<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, &Value)],
    ) -> StoreResult<T> {
        let url = self.config.query_url(query, params)?;
        let mut request = self.client.get(url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        let body = send(request).await?;
        let response: QueryResponse<T> = serde_json::from_value(body)?;
        Ok(response.result)
    }

    async fn mutate(&self, mutation: Value) -> StoreResult<Value> {
        let mut request = self
            .client
            .post(self.config.mutate_url()?)
            .json(&json!({ "mutations": [mutation] }));
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        let body = send(request).await?;
        let response: MutateResponse = serde_json::from_value(body)?;
        response
            .results
            .into_iter()
            .find_map(|result| result.document)
            .ok_or_else(|| StoreError::Upstream("mutation returned no document".to_string()))
    }
}

/// Send a request and return its JSON body, mapping failures to upstream errors.
async fn send(request: reqwest::RequestBuilder) -> StoreResult<Value> {
    let response = request
        .send()
        .await
        .map_err(|e| StoreError::Upstream(e.to_string()))?;
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|e| StoreError::Upstream(format!("invalid response ({}): {}", status, e)))?;
    if !status.is_success() {
        return Err(StoreError::Upstream(
            upstream_message(&body).unwrap_or_else(|| format!("Sanity request failed with {}", status)),
        ));
    }
    Ok(body)
}

/// Pull a human-readable message out of a Sanity error body.
fn upstream_message(body: &Value) -> Option<String> {
    let error = body.get("error");
    error
        .and_then(|e| e.get("description"))
        .or_else(|| body.get("message"))
        .or(error)
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl ContentStore for SanityStore {
    fn create(&self, document: Value) -> BoxFuture<'_, StoreResult<Value>> {
        Box::pin(async move { self.mutate(json!({ "create": document })).await })
    }

    fn patch(&self, id: &str, set: PatchSet) -> BoxFuture<'_, StoreResult<Value>> {
        let mutation = json!({ "patch": { "id": id, "set": set } });
        Box::pin(async move { self.mutate(mutation).await })
    }

    fn guest_entries(&self, limit: usize) -> BoxFuture<'_, StoreResult<Vec<GuestEntry>>> {
        let query = format!(
            "{}[0...{}]{{ _id, name, message, createdAt }}",
            GUESTBOOK_QUERY, limit
        );
        Box::pin(async move { self.query(&query, &[]).await })
    }

    fn category_layout(&self, slug: &str) -> BoxFuture<'_, StoreResult<Option<CategoryLayout>>> {
        let slug = Value::String(slug.to_string());
        Box::pin(async move {
            let result: LayoutResult = self.query(CATEGORY_LAYOUT_QUERY, &[("slug", &slug)]).await?;
            Ok(result.category.map(|category| CategoryLayout {
                category,
                sculptures: result.sculptures,
            }))
        })
    }
}
