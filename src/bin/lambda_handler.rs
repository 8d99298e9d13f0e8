//! AWS Lambda handler for net price estimates
//!
//! Accepts a form state as the JSON request body, runs the full
//! recalculation including the cost lookup, and returns the updated state
//! with its estimate summary.
//!
//! Supports Lambda Function URLs and API Gateway HTTP APIs (payload v2).
//!
//! Environment:
//! - `AID_COST_URL`: cost of attendance query service (takes precedence)
//! - `AID_COST_TABLE`: cost of attendance CSV (default data/cost_of_attendance.csv)
//! - `AID_TABLES_DIR`: rate table overlays (built-in tables when unset)

use aid_estimator::cost_source::DEFAULT_COSTS_PATH;
use aid_estimator::{
    AidEngine, CostSource, CostTable, EstimateSummary, FormState, HttpCostSource, Orchestrator, RateTables,
};
use aws_lambda_events::apigw::{ApiGatewayV2httpRequest, ApiGatewayV2httpResponse};
use aws_lambda_events::encodings::Body;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

/// Output from the estimate
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub state: FormState,
    pub summary: EstimateSummary,
    pub execution_time_ms: u64,
}

fn response(status: i64, body: String) -> ApiGatewayV2httpResponse {
    ApiGatewayV2httpResponse {
        status_code: status,
        body: Some(Body::Text(body)),
        ..Default::default()
    }
}

fn error_response(status: i64, message: &str) -> ApiGatewayV2httpResponse {
    response(status, serde_json::json!({ "error": message }).to_string())
}

fn cost_source() -> Result<CostSource, Error> {
    if let Ok(url) = env::var("AID_COST_URL") {
        log::info!("using cost lookup service {}", url);
        return Ok(HttpCostSource::new(url)?.into());
    }
    let path = env::var("AID_COST_TABLE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_COSTS_PATH));
    Ok(CostTable::from_csv_path(&path)?.into())
}

fn rate_tables() -> Result<Arc<RateTables>, Error> {
    match env::var("AID_TABLES_DIR") {
        Ok(dir) => Ok(Arc::new(RateTables::from_csv_path(&PathBuf::from(dir))?)),
        Err(_) => Ok(RateTables::shared()),
    }
}

/// Loaded once per container and shared by every invocation
struct Shared {
    engine: AidEngine,
    costs: Arc<CostSource>,
}

/// Lambda handler function
async fn handler(
    shared: &Shared,
    event: LambdaEvent<ApiGatewayV2httpRequest>,
) -> Result<ApiGatewayV2httpResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    if request.request_context.http.method.as_str() == "OPTIONS" {
        return Ok(response(200, String::new()));
    }
    if request.is_base64_encoded {
        return Ok(error_response(400, "Request body must be JSON text"));
    }

    let body = request.body.unwrap_or_default();
    let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
    let mut state: FormState = match serde_json::from_str(body) {
        Ok(state) => state,
        Err(e) => {
            return Ok(error_response(400, &format!("Invalid JSON: {}", e)));
        }
    };

    // each request is its own session, so fetch generations are per request
    let orchestrator = Orchestrator::new(shared.engine.clone(), Arc::clone(&shared.costs));
    orchestrator.recalculate_all(&mut state).await;
    let summary = EstimateSummary::from_state(&state);
    let payload = EstimateResponse {
        state,
        summary,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    match serde_json::to_string(&payload) {
        Ok(json) => Ok(response(200, json)),
        Err(e) => Ok(error_response(500, &format!("Failed to encode estimate: {}", e))),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let shared = Shared {
        engine: AidEngine::new(rate_tables()?)?,
        costs: Arc::new(cost_source()?),
    };
    let shared = &shared;

    run(service_fn(move |event| async move { handler(shared, event).await })).await
}
