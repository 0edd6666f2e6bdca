//! A field definition store backed by a hosted row API.
//!
//! Speaks the PostgREST dialect: rows live at `{base}/rest/v1/{table}`,
//! filters are `column=eq.value` query parameters, ordering is
//! `order=column.asc`, and writes ask for the affected rows back with
//! `Prefer: return=representation`. Every request carries the tenant filter.
//!
//! Reads are retried on transient failures; writes are sent once.

use std::time::Duration;

use async_trait::async_trait;
use backoffice_core::{BackofficeError, BackofficeResult, Settings};
use backoffice_fields::FieldDefinition;
use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::error::{map_reqwest_error, StoreError};
use crate::store::{DefinitionQuery, FieldDefinitionPatch, FieldDefinitionStore};

const DEFAULT_TABLE: &str = "custom_field_definitions";

#[derive(Debug, Clone)]
pub struct RestStore {
    http: Client,
    endpoint: String,
    api_key: String,
    organization_id: String,
    max_retries: usize,
    retry_min_delay: Duration,
}

impl RestStore {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a store for `organization_id` at the given base URL.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        organization_id: impl Into<String>,
    ) -> Result<Self, StoreError> {
        Self::build(base_url, DEFAULT_TABLE, api_key.into(), organization_id.into(), Self::REQUEST_TIMEOUT)
    }

    /// Creates a store from the `store` and `organization_id` settings.
    pub fn from_settings(settings: &Settings) -> BackofficeResult<Self> {
        let organization_id = settings.require_organization_id()?;
        let store = &settings.store;
        if store.url.trim().is_empty() {
            return Err(BackofficeError::ImproperlyConfigured(
                "store.url is not set".to_string(),
            ));
        }
        url::Url::parse(&store.url).map_err(|e| {
            BackofficeError::ImproperlyConfigured(format!("store.url '{}' is invalid: {e}", store.url))
        })?;

        let timeout = if store.timeout_secs == 0 {
            Self::REQUEST_TIMEOUT
        } else {
            Duration::from_secs(store.timeout_secs)
        };
        Self::build(
            &store.url,
            &store.table,
            store.api_key.clone(),
            organization_id.to_string(),
            timeout,
        )
        .map(|s| s.with_max_retries(store.max_retries))
        .map_err(BackofficeError::from)
    }

    fn build(
        base_url: &str,
        table: &str,
        api_key: String,
        organization_id: String,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("backoffice-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/rest/v1/{table}", base_url.trim_end_matches('/')),
            api_key,
            organization_id,
            max_retries: 2,
            retry_min_delay: Duration::from_millis(200),
        })
    }

    /// Sets how many times a failed read is retried.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the first backoff delay between read retries.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_min_delay = delay;
        self
    }

    /// The table endpoint, `{base}/rest/v1/{table}`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: reqwest::Method) -> RequestBuilder {
        self.http
            .request(method, &self.endpoint)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(&[("organization_id", format!("eq.{}", self.organization_id))])
    }

    fn row_filter(&self, method: reqwest::Method, id: &str) -> RequestBuilder {
        self.request(method)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
    }

    async fn fetch(&self, query: &DefinitionQuery) -> Result<Vec<FieldDefinition>, StoreError> {
        let mut params: Vec<(&str, String)> = vec![("select", "*".to_string())];
        if query.visible_only {
            params.push(("is_visible", "eq.true".to_string()));
        }
        if let Some(category) = query.category {
            params.push(("field_category", format!("eq.{category}")));
        }
        if let Some(field_name) = &query.field_name {
            params.push(("field_name", format!("eq.{field_name}")));
        }
        if let Some(id) = &query.id {
            params.push(("id", format!("eq.{id}")));
        }
        params.push(("order", "sort_order.asc".to_string()));

        let res = self
            .request(reqwest::Method::GET)
            .query(&params)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let rows = read_rows(res).await?;
        Ok(parse_rows(rows))
    }
}

#[async_trait]
impl FieldDefinitionStore for RestStore {
    fn organization_id(&self) -> &str {
        &self.organization_id
    }

    async fn list(&self, query: &DefinitionQuery) -> Result<Vec<FieldDefinition>, StoreError> {
        debug!(endpoint = %self.endpoint, tenant = %self.organization_id, ?query, "listing field definitions");
        (|| async { self.fetch(query).await })
            .retry(
                &ExponentialBuilder::default()
                    .with_min_delay(self.retry_min_delay)
                    .with_max_delay(Duration::from_secs(5))
                    .with_max_times(self.max_retries)
                    .with_jitter(),
            )
            .when(StoreError::should_retry)
            .notify(|e, dur| {
                warn!(
                    "field definition fetch failed, retrying after {:.2}s: {}",
                    dur.as_secs_f64(),
                    e
                );
            })
            .await
    }

    async fn insert(&self, mut def: FieldDefinition) -> Result<FieldDefinition, StoreError> {
        def.check()?;
        def.organization_id = Some(self.organization_id.clone());
        let mut body = serde_json::to_value(&def)?;
        if let Some(row) = body.as_object_mut() {
            for column in ["id", "created_at", "updated_at"] {
                row.remove(column);
            }
        }

        debug!(tenant = %self.organization_id, field = %def.field_name, "inserting field definition");
        let res = self
            .http
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        first_row(read_rows(res).await?, || format!("inserted row for '{}'", def.field_name))
    }

    async fn update(
        &self,
        id: &str,
        patch: &FieldDefinitionPatch,
    ) -> Result<FieldDefinition, StoreError> {
        debug!(tenant = %self.organization_id, id, "updating field definition");
        let res = self
            .row_filter(reqwest::Method::PATCH, id)
            .json(patch)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        first_row(read_rows(res).await?, || format!("field definition {id}"))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        debug!(tenant = %self.organization_id, id, "deleting field definition");
        let res = self
            .row_filter(reqwest::Method::DELETE, id)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let rows = read_rows(res).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(format!("field definition {id}")));
        }
        Ok(())
    }
}

async fn read_rows(res: Response) -> Result<Vec<serde_json::Value>, StoreError> {
    match res.status() {
        s if s.is_success() => res
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|e| StoreError::Serde(e.to_string())),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Unauthorized),
        StatusCode::NOT_FOUND => {
            let body = res.text().await.unwrap_or_default();
            Err(StoreError::NotFound(body))
        }
        StatusCode::CONFLICT => {
            let body = res.text().await.unwrap_or_default();
            Err(StoreError::Conflict(body))
        }
        s => {
            let status = s.as_u16();
            let body = res.text().await.unwrap_or_default();
            Err(StoreError::Http { status, body })
        }
    }
}

/// Deserialises rows, skipping any that do not describe a known field.
fn parse_rows(rows: Vec<serde_json::Value>) -> Vec<FieldDefinition> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<FieldDefinition>(row) {
            Ok(def) => Some(def),
            Err(e) => {
                warn!(error = %e, "skipping unreadable field definition row");
                None
            }
        })
        .collect()
}

fn first_row(
    rows: Vec<serde_json::Value>,
    missing: impl FnOnce() -> String,
) -> Result<FieldDefinition, StoreError> {
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::NotFound(missing()))?;
    Ok(serde_json::from_value(row)?)
}
