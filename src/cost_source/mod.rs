//! Cost of attendance lookup adapters

mod http;
mod table;

pub use http::{parse_query_response, HttpCostSource};
pub use table::{CostTable, DEFAULT_COSTS_PATH};

use crate::engine::{CostOutcome, CostRow};
use crate::error::CostLookupError;
use std::future::Future;

/// Keyed lookup of one cost of attendance row
///
/// `Ok(None)` is a miss: the source answered but has no row for the key.
pub trait CostLookup: Send + Sync {
    fn fetch(&self, key: &str) -> impl Future<Output = Result<Option<CostRow>, CostLookupError>> + Send;
}

/// Collapse a lookup result into the outcome the engine folds
pub fn outcome_of(result: Result<Option<CostRow>, CostLookupError>) -> CostOutcome {
    match result {
        Ok(Some(row)) => CostOutcome::Found(row),
        Ok(None) => CostOutcome::NotFound,
        Err(e) => CostOutcome::Unavailable(e.to_string()),
    }
}

/// The configured cost source
#[derive(Debug, Clone)]
pub enum CostSource {
    Table(CostTable),
    Http(HttpCostSource),
}

impl CostLookup for CostSource {
    fn fetch(&self, key: &str) -> impl Future<Output = Result<Option<CostRow>, CostLookupError>> + Send {
        async move {
            match self {
                CostSource::Table(table) => table.fetch(key).await,
                CostSource::Http(http) => http.fetch(key).await,
            }
        }
    }
}

impl From<CostTable> for CostSource {
    fn from(table: CostTable) -> Self {
        CostSource::Table(table)
    }
}

impl From<HttpCostSource> for CostSource {
    fn from(http: HttpCostSource) -> Self {
        CostSource::Http(http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValue;

    #[test]
    fn test_outcome_of() {
        let row = CostRow {
            tuition: Some(FieldValue::Number(1.0)),
            ..CostRow::default()
        };
        assert_eq!(outcome_of(Ok(Some(row.clone()))), CostOutcome::Found(row));
        assert_eq!(outcome_of(Ok(None)), CostOutcome::NotFound);
        let failed = outcome_of(Err(CostLookupError::Task("cancelled".into())));
        assert!(matches!(failed, CostOutcome::Unavailable(reason) if reason.contains("cancelled")));
    }

    #[tokio::test]
    async fn test_source_dispatches_to_table() {
        let source = CostSource::from(CostTable::from_csv().unwrap());
        let row = source.fetch("spring_2027_on-campus_resident").await.unwrap();
        assert!(row.is_some());
        assert!(source.fetch("").await.unwrap().is_none());
    }
}
