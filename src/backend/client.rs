// src/backend/client.rs

use anyhow::{bail, Context, Result};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, instrument, warn};
use url::Url;

use super::types::{
    BudgetApproval, BudgetRequest, Committee, MemberResponse, MemberStatus, Message, NewMember,
    NewRequest, RequestStatus, StatusUpdate,
};

/// What the backend sends alongside a non-2xx status.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Typed client for the membership/budget REST backend.
///
/// One request per call: no retries and no timeouts beyond reqwest's defaults.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base: Url,
}

impl BackendClient {
    /// `base` should end in `/` (see `config::parse_base`).
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("joining {} onto {}", path, self.base))
    }

    async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .with_context(|| format!("reading {} response", what))?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.or(b.message))
                .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
            warn!(%status, what, detail = %detail, "backend returned an error");
            bail!("{} failed with {}: {}", what, status, detail);
        }

        serde_json::from_slice(&body).with_context(|| format!("decoding {} response", what))
    }

    #[instrument(level = "info", skip(self, member), fields(user_id = %member.user_id))]
    pub async fn create_member(&self, member: &NewMember) -> Result<MemberResponse> {
        let url = self.url("createMember")?;
        debug!(%url, "POST");
        let resp = self
            .client
            .post(url)
            .json(member)
            .send()
            .await
            .context("POST createMember")?;
        Self::decode(resp, "createMember").await
    }

    #[instrument(level = "info", skip(self))]
    pub async fn get_member_data(&self, user_id: &str) -> Result<MemberResponse> {
        let url = self.url("getMemberData")?;
        let resp = self
            .client
            .get(url)
            .query(&[("userId", user_id)])
            .send()
            .await
            .context("GET getMemberData")?;
        Self::decode(resp, "getMemberData").await
    }

    #[instrument(level = "info", skip(self))]
    pub async fn get_committee_budgets(&self) -> Result<Vec<Committee>> {
        let resp = self
            .client
            .get(self.url("get_committee_budgets")?)
            .send()
            .await
            .context("GET get_committee_budgets")?;
        Self::decode(resp, "get_committee_budgets").await
    }

    #[instrument(level = "info", skip(self))]
    pub async fn get_committees(&self) -> Result<Vec<Committee>> {
        let resp = self
            .client
            .get(self.url("get_committees")?)
            .send()
            .await
            .context("GET get_committees")?;
        Self::decode(resp, "get_committees").await
    }

    #[instrument(level = "info", skip(self))]
    pub async fn update_status(&self, user_id: &str, status: MemberStatus) -> Result<MemberResponse> {
        let body = StatusUpdate {
            user_id: user_id.to_string(),
            status,
        };
        let resp = self
            .client
            .patch(self.url("updateStatus")?)
            .json(&body)
            .send()
            .await
            .context("PATCH updateStatus")?;
        Self::decode(resp, "updateStatus").await
    }

    #[instrument(level = "info", skip(self, committee), fields(name = %committee.name))]
    pub async fn add_committee(&self, committee: &Committee) -> Result<Message> {
        let resp = self
            .client
            .post(self.url("add_committee")?)
            .json(committee)
            .send()
            .await
            .context("POST add_committee")?;
        Self::decode(resp, "add_committee").await
    }

    /// The approval endpoint's reply shape is not fixed, so it is returned raw.
    #[instrument(level = "info", skip(self, approval), fields(name = %approval.name))]
    pub async fn approve_budget(&self, approval: &BudgetApproval) -> Result<serde_json::Value> {
        let resp = self
            .client
            .post(self.url("approveBudget")?)
            .json(approval)
            .send()
            .await
            .context("POST approveBudget")?;
        Self::decode(resp, "approveBudget").await
    }

    #[instrument(level = "info", skip(self))]
    pub async fn list_requests(&self, status: RequestStatus) -> Result<Vec<BudgetRequest>> {
        let path = status.list_path();
        let resp = self
            .client
            .get(self.url(path)?)
            .send()
            .await
            .with_context(|| format!("GET {}", path))?;
        Self::decode(resp, path).await
    }

    #[instrument(level = "info", skip(self, request), fields(department = %request.department))]
    pub async fn create_request(&self, request: &NewRequest) -> Result<Message> {
        let resp = self
            .client
            .post(self.url("requests/new")?)
            .json(request)
            .send()
            .await
            .context("POST requests/new")?;
        Self::decode(resp, "requests/new").await
    }

    #[instrument(level = "info", skip(self))]
    pub async fn update_request(&self, id: &str, status: RequestStatus) -> Result<Message> {
        let mut url = self.url("requests/")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("backend base {} cannot take a path", self.base))?
            .pop_if_empty()
            .push(id);
        let resp = self
            .client
            .post(url)
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await
            .context("POST requests/{id}")?;
        Self::decode(resp, "requests/{id}").await
    }
}
