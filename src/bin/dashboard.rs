use anyhow::{bail, Result};
use budgetcents::{
    config::{parse_base, Config},
    parse::{BudgetSummary, MembershipSummary},
    presenter::{
        ChartFormat, ChartPresenter, HttpSummarySource, TerminalChartBackend, View,
        BUDGET_PRESENTER, MEMBERSHIP_PRESENTER,
    },
};
use clap::{Parser, ValueEnum};
use reqwest::Client;
use std::{io, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Panel {
    Budget,
    Membership,
    All,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Output {
    Text,
    Chartjs,
}

/// Draw the dashboard charts from a running summary API.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Which chart(s) to draw
    #[arg(value_enum, default_value_t = Panel::All)]
    panel: Panel,

    /// Summary API base URL (defaults to DASHBOARD_URL)
    #[arg(long)]
    url: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Output::Text)]
    format: Output,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let base = match &args.url {
        Some(url) => parse_base(Some(url), "")?,
        None => config.dashboard_url.clone(),
    };
    let format = match args.format {
        Output::Text => ChartFormat::Text,
        Output::Chartjs => ChartFormat::ChartJs,
    };
    info!(%base, panel = ?args.panel, "drawing dashboard");

    let client = Client::new();
    let mut views = Vec::new();

    if matches!(args.panel, Panel::Budget | Panel::All) {
        let source = HttpSummarySource::<BudgetSummary>::new(
            client.clone(),
            &base,
            BUDGET_PRESENTER.endpoint,
            BUDGET_PRESENTER.failure,
        )?;
        let mut presenter = ChartPresenter::new(
            BUDGET_PRESENTER,
            Arc::new(source),
            TerminalChartBackend::new(io::stdout(), format),
        );
        presenter.mount();
        eprintln!("{}", presenter.view());
        presenter.settle().await;
        views.push(presenter.view());
        presenter.unmount();
    }

    if matches!(args.panel, Panel::Membership | Panel::All) {
        let source = HttpSummarySource::<MembershipSummary>::new(
            client,
            &base,
            MEMBERSHIP_PRESENTER.endpoint,
            MEMBERSHIP_PRESENTER.failure,
        )?;
        let mut presenter = ChartPresenter::new(
            MEMBERSHIP_PRESENTER,
            Arc::new(source),
            TerminalChartBackend::new(io::stdout(), format),
        );
        presenter.mount();
        eprintln!("{}", presenter.view());
        presenter.settle().await;
        views.push(presenter.view());
        presenter.unmount();
    }

    let failures: Vec<_> = views
        .iter()
        .filter(|v| matches!(v, View::Failed(_)))
        .collect();
    for view in &failures {
        eprintln!("{}", view);
    }
    if !failures.is_empty() {
        bail!("{} of {} charts failed", failures.len(), views.len());
    }
    Ok(())
}
