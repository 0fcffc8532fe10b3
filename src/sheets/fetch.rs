// src/sheets/fetch.rs

use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::cells::sheet_rows;
use super::types::{Row, Spreadsheet};

pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("service account credentials not configured")]
    MissingCredentials,
    #[error("service account credentials rejected: {0}")]
    Credentials(#[source] gcp_auth::Error),
    #[error("bad spreadsheet url: {0}")]
    Url(#[from] url::ParseError),
    #[error("spreadsheet request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("spreadsheet has no sheets")]
    NoSheetData,
}

/// Anything that can hand back the flattened grid of a spreadsheet's first sheet.
pub trait RowFetcher: Send + Sync + 'static {
    fn fetch_rows(
        &self,
        spreadsheet_id: &str,
    ) -> impl Future<Output = Result<Vec<Row>, FetchError>> + Send;
}

/// Only used to log which account is in play; the key never leaves gcp_auth.
#[derive(Deserialize)]
struct AccountIdentity {
    client_email: Option<String>,
}

/// Reads grids through the Sheets v4 REST API with a service account.
///
/// A fresh token provider is built per request and there is a single attempt;
/// no retries, no caching.
#[derive(Clone)]
pub struct GoogleSheetsFetcher {
    client: Client,
    base: Url,
    credentials: Option<String>,
}

impl GoogleSheetsFetcher {
    pub fn new(client: Client, base: Url, credentials: Option<String>) -> Self {
        Self {
            client,
            base,
            credentials,
        }
    }

    async fn bearer_token(&self) -> Result<String, FetchError> {
        let json = self
            .credentials
            .as_deref()
            .ok_or(FetchError::MissingCredentials)?;

        match serde_json::from_str::<AccountIdentity>(json) {
            Ok(AccountIdentity {
                client_email: Some(email),
            }) => info!(client_email = %email, "created sheets client"),
            _ => info!("created sheets client (client_email not available)"),
        }

        let account = CustomServiceAccount::from_json(json).map_err(FetchError::Credentials)?;
        let token = account
            .token(&[SHEETS_READONLY_SCOPE])
            .await
            .map_err(FetchError::Credentials)?;
        Ok(token.as_str().to_string())
    }

    async fn fetch_spreadsheet(
        &self,
        spreadsheet_id: &str,
        token: &str,
    ) -> Result<Spreadsheet, FetchError> {
        let url = self
            .base
            .join(&format!("v4/spreadsheets/{}", spreadsheet_id))?;

        debug!(%url, "GET spreadsheet with grid data");
        let doc = self
            .client
            .get(url)
            .query(&[("includeGridData", "true")])
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json::<Spreadsheet>()
            .await?;
        Ok(doc)
    }

    /// Everything after token minting: one GET, then the first sheet's grid.
    pub(crate) async fn fetch_with_token(
        &self,
        spreadsheet_id: &str,
        token: &str,
    ) -> Result<Vec<Row>, FetchError> {
        let doc = self.fetch_spreadsheet(spreadsheet_id, token).await?;
        let Some(sheet) = doc.sheets.first() else {
            warn!("no sheets found in spreadsheet");
            return Err(FetchError::NoSheetData);
        };

        let title = sheet
            .properties
            .as_ref()
            .and_then(|p| p.title.as_deref())
            .unwrap_or("<untitled>");
        let rows = sheet_rows(sheet);
        info!(sheet = %title, rows = rows.len(), "fetched first sheet");
        Ok(rows)
    }
}

impl RowFetcher for GoogleSheetsFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch_rows(&self, spreadsheet_id: &str) -> Result<Vec<Row>, FetchError> {
        let token = self.bearer_token().await?;
        self.fetch_with_token(spreadsheet_id, &token).await
    }
}
