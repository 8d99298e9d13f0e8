//! Cost of attendance lookup against the institution's query service
//!
//! The service takes the lookup key as a `key` query parameter and answers
//! `{"row": [ {...} ]}`. An empty or absent `row` array means no match.

use super::CostLookup;
use crate::engine::CostRow;
use crate::error::CostLookupError;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    row: Option<Vec<CostRow>>,
}

/// First row of a query service response, if any
pub fn parse_query_response(body: &str) -> Result<Option<CostRow>, CostLookupError> {
    let response: QueryResponse = serde_json::from_str(body)?;
    Ok(response.row.and_then(|rows| rows.into_iter().next()))
}

/// HTTP adapter for the cost lookup
#[derive(Debug, Clone)]
pub struct HttpCostSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCostSource {
    pub fn new(url: impl Into<String>) -> Result<Self, CostLookupError> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, CostLookupError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn query(&self, key: &str) -> Result<Option<CostRow>, CostLookupError> {
        log::debug!("querying {} for cost key {:?}", self.url, key);
        let response = self
            .client
            .get(&self.url)
            .query(&[("key", key)])
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        parse_query_response(&body)
    }
}

impl CostLookup for HttpCostSource {
    fn fetch(&self, key: &str) -> impl Future<Output = Result<Option<CostRow>, CostLookupError>> + Send {
        self.query(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValue;

    #[test]
    fn test_parse_first_row() {
        let body = r#"{"row":[{"tuition":"48950","room_and_board":"15800"},{"tuition":"1"}]}"#;
        let row = parse_query_response(body).unwrap().unwrap();
        assert_eq!(row.tuition, Some(FieldValue::Text("48950".into())));
        assert_eq!(row.totals(true).direct, 64750.0);
    }

    #[test]
    fn test_empty_or_absent_row_is_a_miss() {
        assert_eq!(parse_query_response(r#"{"row":[]}"#).unwrap(), None);
        assert_eq!(parse_query_response(r#"{}"#).unwrap(), None);
        assert_eq!(parse_query_response(r#"{"row":null}"#).unwrap(), None);
    }

    #[test]
    fn test_malformed_body_is_a_decode_error() {
        assert!(matches!(
            parse_query_response("<html>busy</html>"),
            Err(CostLookupError::Decode(_))
        ));
    }

    #[test]
    fn test_client_builds() {
        let source = HttpCostSource::new("https://costs.example.edu/query").unwrap();
        assert_eq!(source.url(), "https://costs.example.edu/query");
    }
}
