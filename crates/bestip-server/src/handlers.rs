//! Route handlers

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse, Response};
use bestip_records::{first_column, parse_enriched};
use bestip_store::{keys, KvStore};
use chrono::Datelike;

use crate::dashboard::{self, DashboardPage};
use crate::error::{Result, ServerError};
use crate::AppState;

/// The four dataset values, read fresh for every request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
    pub ipv4_time: Option<String>,
    pub ipv6_time: Option<String>,
}

impl Datasets {
    /// Read all four keys; empty values count as absent
    pub async fn load(store: &dyn KvStore) -> Result<Self> {
        Ok(Self {
            ipv4: non_empty(store.get(keys::IPV4).await?),
            ipv6: non_empty(store.get(keys::IPV6).await?),
            ipv4_time: non_empty(store.get(keys::IPV4_TIME).await?),
            ipv6_time: non_empty(store.get(keys::IPV6_TIME).await?),
        })
    }

    /// Fail with 404 when neither address list is present
    pub fn ensure_any(&self) -> Result<()> {
        if self.ipv4.is_none() && self.ipv6.is_none() {
            return Err(ServerError::NotFound(
                "No data found for key \"ipv6\" or \"ipv4\"".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `/bestipv4`: newline-separated IPv4 addresses
pub async fn best_ipv4(State(state): State<AppState>) -> Result<Response> {
    let data = Datasets::load(state.store.as_ref()).await?;
    data.ensure_any()?;
    address_list(data.ipv4.as_deref(), "IPv4")
}

/// `/bestipv6`: newline-separated IPv6 addresses
pub async fn best_ipv6(State(state): State<AppState>) -> Result<Response> {
    let data = Datasets::load(state.store.as_ref()).await?;
    data.ensure_any()?;
    address_list(data.ipv6.as_deref(), "IPv6")
}

fn address_list(blob: Option<&str>, family: &str) -> Result<Response> {
    let blob = blob.ok_or_else(|| ServerError::NotFound(format!("No {} data found", family)))?;
    let body = first_column(blob).join("\n");

    tracing::debug!(family, bytes = body.len(), "serving address list");
    Ok(([(CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response())
}

/// Every other path: the HTML dashboard
pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>> {
    let data = Datasets::load(state.store.as_ref()).await?;
    data.ensure_any()?;

    let mode = state.config.parse_mode();
    let ipv4 = match data.ipv4.as_deref() {
        Some(blob) => parse_enriched(blob, mode)?,
        None => Vec::new(),
    };
    let ipv6 = match data.ipv6.as_deref() {
        Some(blob) => parse_enriched(blob, mode)?,
        None => Vec::new(),
    };

    tracing::debug!(ipv4 = ipv4.len(), ipv6 = ipv6.len(), "rendering dashboard");

    let page = DashboardPage {
        ipv4,
        ipv6,
        ipv4_time: data.ipv4_time,
        ipv6_time: data.ipv6_time,
        year: chrono::Utc::now().year(),
    };

    Ok(Html(dashboard::render(&page)))
}
