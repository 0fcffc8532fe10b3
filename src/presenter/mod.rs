// src/presenter/mod.rs

pub mod chart;
pub mod source;

use anyhow::Result;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use chart::{
    ChartBackend, ChartConfig, ChartData, ChartFormat, ChartId, TerminalChartBackend,
    BUDGET_PALETTE, MEMBERSHIP_PALETTE,
};
pub use source::{HttpSummarySource, SummarySource};

/// What a presenter shows and where it gets it from.
#[derive(Debug, Clone, Copy)]
pub struct PresenterProfile {
    pub endpoint: &'static str,
    pub title: &'static str,
    pub loading: &'static str,
    pub failure: &'static str,
    pub palette: &'static [&'static str],
}

pub const BUDGET_PRESENTER: PresenterProfile = PresenterProfile {
    endpoint: "api/google-sheets/budget",
    title: "Expense Breakdown",
    loading: "Loading budget data...",
    failure: "Failed to fetch budget data",
    palette: &BUDGET_PALETTE,
};

pub const MEMBERSHIP_PRESENTER: PresenterProfile = PresenterProfile {
    endpoint: "api/google-sheets/membershipStructure",
    title: "AKPsi Membership Structure",
    loading: "Loading membership data...",
    failure: "Failed to fetch membership structure",
    palette: &MEMBERSHIP_PALETTE,
};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Unmounted,
    Loading(&'static str),
    Failed(String),
    Chart(ChartConfig),
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Unmounted => Ok(()),
            View::Loading(text) => f.write_str(text),
            View::Failed(msg) => write!(f, "Error: {}", msg),
            View::Chart(cfg) => write!(f, "{} ({} segments)", cfg.title, cfg.labels.len()),
        }
    }
}

enum State {
    Unmounted,
    Loading,
    Failed(String),
    Ready(ChartData, ChartConfig),
}

/// Fetches one summary per mount and keeps a single chart on screen for it.
///
/// The presenter owns at most one chart handle. A new chart always disposes
/// the previous one first, and unmounting (or dropping) the presenter both
/// disposes the chart and aborts a fetch that is still in flight.
pub struct ChartPresenter<S, B: ChartBackend> {
    profile: PresenterProfile,
    source: Arc<S>,
    backend: B,
    state: State,
    pending: Option<JoinHandle<Result<ChartData>>>,
    chart: Option<B::Handle>,
}

impl<S, B: ChartBackend> ChartPresenter<S, B> {
    pub fn profile(&self) -> &PresenterProfile {
        &self.profile
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_mounted(&self) -> bool {
        !matches!(self.state, State::Unmounted)
    }

    pub fn data(&self) -> Option<&ChartData> {
        match &self.state {
            State::Ready(data, _) => Some(data),
            _ => None,
        }
    }

    pub fn view(&self) -> View {
        match &self.state {
            State::Unmounted => View::Unmounted,
            State::Loading => View::Loading(self.profile.loading),
            State::Failed(msg) => View::Failed(msg.clone()),
            State::Ready(_, cfg) => View::Chart(cfg.clone()),
        }
    }

    fn release_chart(&mut self) {
        if let Some(handle) = self.chart.take() {
            self.backend.dispose(handle);
        }
    }

    /// Replace the current chart with one built from `data`.
    fn show(&mut self, data: ChartData) {
        let config = ChartConfig::doughnut(self.profile.title, &data, self.profile.palette);
        self.release_chart();
        match self.backend.create(&config) {
            Ok(handle) => {
                info!(title = self.profile.title, segments = config.labels.len(), "chart drawn");
                self.chart = Some(handle);
                self.state = State::Ready(data, config);
            }
            Err(e) => {
                warn!(title = self.profile.title, error = %format!("{:#}", e), "chart creation failed");
                self.state = State::Failed(e.to_string());
            }
        }
    }

    pub fn unmount(&mut self) {
        if let Some(task) = self.pending.take() {
            debug!(endpoint = self.profile.endpoint, "aborting in-flight fetch");
            task.abort();
        }
        self.release_chart();
        self.state = State::Unmounted;
    }
}

impl<S: SummarySource, B: ChartBackend> ChartPresenter<S, B> {
    pub fn new(profile: PresenterProfile, source: Arc<S>, backend: B) -> Self {
        Self {
            profile,
            source,
            backend,
            state: State::Unmounted,
            pending: None,
            chart: None,
        }
    }

    /// Start the one fetch this mount gets. Must run inside a tokio runtime.
    pub fn mount(&mut self) {
        if self.is_mounted() {
            self.unmount();
        }
        debug!(endpoint = self.profile.endpoint, "mounting");
        self.state = State::Loading;
        let source = Arc::clone(&self.source);
        self.pending = Some(tokio::spawn(async move { source.load().await }));
    }

    /// Wait for the mount's fetch and apply its result. A no-op when nothing
    /// is pending, including after `unmount`.
    pub async fn settle(&mut self) {
        let Some(task) = self.pending.take() else {
            return;
        };

        match task.await {
            Ok(Ok(data)) => self.show(data),
            Ok(Err(e)) => {
                warn!(endpoint = self.profile.endpoint, error = %format!("{:#}", e), "fetch failed");
                self.state = State::Failed(e.to_string());
            }
            Err(join) if join.is_cancelled() => {
                debug!(endpoint = self.profile.endpoint, "fetch cancelled");
            }
            Err(join) => {
                warn!(endpoint = self.profile.endpoint, error = %join, "fetch task failed");
                self.state = State::Failed(self.profile.failure.to_string());
            }
        }
    }
}

impl<S, B: ChartBackend> Drop for ChartPresenter<S, B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
