// src/api/routes.rs

use serde::Serialize;
use std::{convert::Infallible, sync::Arc};
use tracing::{error, info, warn};
use warp::http::{Method, StatusCode};
use warp::reply::{self, Reply, Response};
use warp::{Filter, Rejection};

use super::error::{ApiError, SummaryEndpoint, BUDGET, MEMBERSHIP};
use crate::parse::{parse_budget, parse_membership};
use crate::sheets::{Row, RowFetcher};

/// Shared, read-only request context.
pub struct AppState<F> {
    pub spreadsheet_id: Option<String>,
    pub fetcher: F,
}

impl<F> AppState<F> {
    pub fn new(spreadsheet_id: Option<String>, fetcher: F) -> Self {
        Self {
            spreadsheet_id,
            fetcher,
        }
    }
}

fn with_state<F: RowFetcher>(
    state: Arc<AppState<F>>,
) -> impl Filter<Extract = (Arc<AppState<F>>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn load_summary<F, S>(
    state: &AppState<F>,
    endpoint: &SummaryEndpoint,
    parse: fn(&[Row]) -> S,
) -> Result<S, ApiError>
where
    F: RowFetcher,
{
    let spreadsheet_id = state
        .spreadsheet_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::Config(endpoint.missing_sheet_id))?;

    info!(endpoint = endpoint.name, "fetching spreadsheet with grid data");
    let rows = state
        .fetcher
        .fetch_rows(spreadsheet_id)
        .await
        .map_err(|e| {
            error!(endpoint = endpoint.name, error = %e, "spreadsheet fetch failed");
            endpoint.classify(&e)
        })?;

    info!(endpoint = endpoint.name, rows = rows.len(), "fetched rows");
    Ok(parse(&rows))
}

async fn summary_handler<F, S>(
    method: Method,
    state: Arc<AppState<F>>,
    endpoint: &'static SummaryEndpoint,
    parse: fn(&[Row]) -> S,
) -> Result<Response, Rejection>
where
    F: RowFetcher,
    S: Serialize,
{
    if method != Method::GET {
        warn!(endpoint = endpoint.name, %method, "method not allowed");
        return Ok(ApiError::MethodNotAllowed.into_response());
    }

    match load_summary(&state, endpoint, parse).await {
        Ok(summary) => Ok(reply::json(&summary).into_response()),
        Err(e) => Ok(e.into_response()),
    }
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "budgetcents-api"
    })))
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if err.is_not_found() {
        return Ok(ApiError::NotFound.into_response());
    }
    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(ApiError::MethodNotAllowed.into_response());
    }
    warn!(rejection = ?err, "unhandled rejection");
    Ok(reply::with_status(
        reply::json(&super::error::ErrorBody {
            error: "Bad request",
        }),
        StatusCode::BAD_REQUEST,
    )
    .into_response())
}

/// `/api/google-sheets/{budget,membershipStructure}` plus `/health`.
pub fn routes<F: RowFetcher>(
    state: Arc<AppState<F>>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let budget = warp::path!("api" / "google-sheets" / "budget")
        .and(warp::method())
        .and(with_state(state.clone()))
        .and_then(|method: Method, state: Arc<AppState<F>>| {
            summary_handler(method, state, &BUDGET, parse_budget)
        });

    let membership = warp::path!("api" / "google-sheets" / "membershipStructure")
        .and(warp::method())
        .and(with_state(state))
        .and_then(|method: Method, state: Arc<AppState<F>>| {
            summary_handler(method, state, &MEMBERSHIP, parse_membership)
        });

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    health
        .or(budget)
        .or(membership)
        .recover(handle_rejection)
        .with(warp::log("budgetcents::api"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::FetchError;
    use serde_json::Value;
    use tracing_subscriber::{fmt, EnvFilter};

    fn init_logging() {
        let _ = fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_test_writer()
            .try_init();
    }

    enum Canned {
        Rows(Vec<Row>),
        NoSheets,
        MissingCredentials,
        Broken,
    }

    impl RowFetcher for Canned {
        async fn fetch_rows(&self, _spreadsheet_id: &str) -> Result<Vec<Row>, FetchError> {
            match self {
                Canned::Rows(rows) => Ok(rows.clone()),
                Canned::NoSheets => Err(FetchError::NoSheetData),
                Canned::MissingCredentials => Err(FetchError::MissingCredentials),
                Canned::Broken => Err(FetchError::Url(url::ParseError::EmptyHost)),
            }
        }
    }

    fn grid(raw: &[&[&str]]) -> Vec<Row> {
        raw.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn sheet() -> Canned {
        Canned::Rows(grid(&[
            &["Expense Breakdown"],
            &["Venue", "$1,200"],
            &["Food", "800"],
            &["Grand Total", "2000"],
            &[""],
            &["AKPsi Membership Structure"],
            &["Pledges (12)"],
            &["Brothers:", "40"],
            &[""],
        ]))
    }

    fn state(id: Option<&str>, fetcher: Canned) -> Arc<AppState<Canned>> {
        Arc::new(AppState::new(id.map(str::to_string), fetcher))
    }

    async fn get(state: Arc<AppState<Canned>>, path: &str) -> (StatusCode, Value) {
        let resp = warp::test::request()
            .method("GET")
            .path(path)
            .reply(&routes(state))
            .await;
        let body = serde_json::from_slice(resp.body()).unwrap();
        (resp.status(), body)
    }

    #[tokio::test]
    async fn budget_endpoint_returns_summary() {
        init_logging();
        let (status, body) = get(state(Some("sheet"), sheet()), "/api/google-sheets/budget").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["expenseLabels"], serde_json::json!(["Venue", "Food"]));
        assert_eq!(body["totalExpenses"], 2000);
        assert_eq!(body["expensesWithoutNationals"], 2000);
    }

    #[tokio::test]
    async fn membership_endpoint_returns_summary() {
        init_logging();
        let (status, body) = get(
            state(Some("sheet"), sheet()),
            "/api/google-sheets/membershipStructure",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "labels": ["Pledges", "Brothers"],
                "values": [12, 40],
                "total": 52
            })
        );
    }

    #[tokio::test]
    async fn missing_sheet_id_is_a_config_error() {
        let (status, body) = get(state(None, sheet()), "/api/google-sheets/budget").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Google Sheets ID not configured in environment");

        let (status, body) = get(
            state(Some(""), sheet()),
            "/api/google-sheets/membershipStructure",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Google Sheets ID not configured");
    }

    #[tokio::test]
    async fn fetch_failures_hide_the_cause() {
        let (status, body) = get(state(Some("s"), Canned::Broken), "/api/google-sheets/budget").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            serde_json::json!({ "error": "Failed to fetch budget data from Google Sheets" })
        );
    }

    #[tokio::test]
    async fn shape_and_credential_errors() {
        let (status, body) = get(
            state(Some("s"), Canned::NoSheets),
            "/api/google-sheets/membershipStructure",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "No sheets found");

        let (status, body) = get(
            state(Some("s"), Canned::MissingCredentials),
            "/api/google-sheets/budget",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Google service account not configured");
    }

    #[tokio::test]
    async fn non_get_is_405() {
        let resp = warp::test::request()
            .method("POST")
            .path("/api/google-sheets/budget")
            .reply(&routes(state(Some("s"), sheet())))
            .await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn unknown_path_is_404_json() {
        let (status, body) = get(state(Some("s"), sheet()), "/api/google-sheets/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn health_reports_service() {
        let (status, body) = get(state(None, Canned::Broken), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }
}
