//! HTTP implementation of [`RosterClient`].

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::client::{BatchEntry, RawTrip, RosterClient};
use crate::diff::AdjustmentPatch;
use crate::error::{Error, Result};
use crate::models::{EditCategory, RosterFilters, TripId, TripRecord};
use crate::util::{compact_text, is_http_url, normalize_text_option};

/// Client for the scheduling backend's REST surface.
#[derive(Debug, Clone)]
pub struct HttpRosterClient {
    endpoint: String,
    bearer_token: Option<String>,
    client: reqwest::Client,
}

impl HttpRosterClient {
    /// Builds a client for the given base endpoint, which must carry an
    /// `http://` or `https://` scheme.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = normalize_endpoint(endpoint.into())?;
        Ok(Self {
            endpoint,
            bearer_token: None,
            client: reqwest::Client::builder().build()?,
        })
    }

    /// Attaches a bearer token sent with every request.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.bearer_token = normalize_text_option(Some(token.as_str()));
        self
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header("Accept", "application/json");
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Maps a failed response to the engine's error vocabulary:
    /// 401/403 on a write is an authorization denial for that category,
    /// everything else is a transport failure.
    async fn fail(response: reqwest::Response, category: Option<EditCategory>) -> Error {
        let status = response.status();
        if let (Some(category), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) =
            (category, status)
        {
            return Error::Authorization { category };
        }
        let body = response.text().await.unwrap_or_default();
        Error::Transport(parse_api_error(status, &body))
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", compact_text(trimmed), status.as_u16())
    }
}

fn normalize_endpoint(raw: String) -> Result<String> {
    let endpoint = normalize_text_option(Some(raw.as_str())).ok_or_else(|| {
        Error::Validation("backend endpoint must not be empty".to_string())
    })?;
    if is_http_url(&endpoint) {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(Error::Validation(
            "backend endpoint must include http:// or https://".to_string(),
        ))
    }
}

impl RosterClient for HttpRosterClient {
    async fn fetch_roster(
        &self,
        date: NaiveDate,
        filters: &RosterFilters,
    ) -> Result<Vec<TripRecord>> {
        let mut query = vec![("date", date.format("%Y-%m-%d").to_string())];
        query.extend(filters.to_query_pairs());

        let url = format!("{}/trips", self.endpoint);
        tracing::debug!(%url, %date, "fetching roster");
        let response = self
            .authorized(self.client.get(&url).query(&query))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(response, None).await);
        }

        let raw = response.json::<Vec<RawTrip>>().await?;
        Ok(raw.into_iter().map(RawTrip::into_record).collect())
    }

    async fn submit_batch_update(&self, updates: &[BatchEntry]) -> Result<()> {
        let url = format!("{}/trips/batch", self.endpoint);
        tracing::debug!(%url, count = updates.len(), "submitting batched update");
        let body = serde_json::json!({ "updates": updates });
        let response = self
            .authorized(self.client.patch(&url).json(&body))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(response, Some(EditCategory::Propagable)).await);
        }
        Ok(())
    }

    async fn submit_record_update(&self, id: TripId, patch: &AdjustmentPatch) -> Result<()> {
        let url = format!("{}/trips/{id}", self.endpoint);
        tracing::debug!(%url, "submitting record update");
        let response = self
            .authorized(self.client.patch(&url).json(patch))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(response, Some(EditCategory::Adjustment)).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_endpoint_rejects_invalid_values() {
        assert!(normalize_endpoint(String::new()).is_err());
        assert!(normalize_endpoint("api.example.com".to_string()).is_err());
    }

    #[test]
    fn normalize_endpoint_strips_trailing_slashes() {
        assert_eq!(
            normalize_endpoint("https://dispatch.example.com/api/".to_string()).unwrap(),
            "https://dispatch.example.com/api"
        );
    }

    #[test]
    fn api_error_prefers_structured_message() {
        let message = parse_api_error(
            StatusCode::BAD_GATEWAY,
            r#"{"message": "upstream scheduler unavailable"}"#,
        );
        assert_eq!(message, "upstream scheduler unavailable (502)");
    }

    #[test]
    fn api_error_falls_back_to_raw_body() {
        assert_eq!(
            parse_api_error(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            "boom (500)"
        );
        assert_eq!(parse_api_error(StatusCode::NOT_FOUND, "  "), "HTTP 404");
    }
}
