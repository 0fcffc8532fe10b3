// src/api/error.rs

use serde::Serialize;
use thiserror::Error;
use warp::http::StatusCode;
use warp::reply::{self, Reply, Response};

use crate::sheets::FetchError;

pub const MISSING_CREDENTIALS: &str = "Google service account not configured";

/// Everything a summary endpoint can answer with besides a summary.
///
/// Messages are fixed strings; causes are logged where they happen and
/// never reach the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    Config(&'static str),
    #[error("{0}")]
    Fetch(&'static str),
    #[error("{0}")]
    Shape(&'static str),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Not found")]
    NotFound,
}

#[derive(Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Config(_) | ApiError::Fetch(_) | ApiError::Shape(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl Reply for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        reply::with_status(reply::json(&ErrorBody { error: &message }), self.status())
            .into_response()
    }
}

/// Per-endpoint wording for each failure class.
#[derive(Debug)]
pub struct SummaryEndpoint {
    pub name: &'static str,
    pub missing_sheet_id: &'static str,
    pub no_sheets: &'static str,
    pub fetch_failed: &'static str,
}

impl SummaryEndpoint {
    pub fn classify(&self, err: &FetchError) -> ApiError {
        match err {
            FetchError::MissingCredentials => ApiError::Config(MISSING_CREDENTIALS),
            FetchError::NoSheetData => ApiError::Shape(self.no_sheets),
            FetchError::Credentials(_) | FetchError::Url(_) | FetchError::Transport(_) => {
                ApiError::Fetch(self.fetch_failed)
            }
        }
    }
}

pub const BUDGET: SummaryEndpoint = SummaryEndpoint {
    name: "budget",
    missing_sheet_id: "Google Sheets ID not configured in environment",
    no_sheets: "No sheets in spreadsheet",
    fetch_failed: "Failed to fetch budget data from Google Sheets",
};

pub const MEMBERSHIP: SummaryEndpoint = SummaryEndpoint {
    name: "membershipStructure",
    missing_sheet_id: "Google Sheets ID not configured",
    no_sheets: "No sheets found",
    fetch_failed: "Failed to fetch membership structure",
};
