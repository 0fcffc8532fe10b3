use anyhow::{Context, Result};
use budgetcents::{
    backend::{
        Activity, BackendClient, BudgetApproval, Committee, MemberStatus, MemberType, NewMember,
        NewRequest, RequestStatus,
    },
    config::{parse_base, Config},
};
use clap::{Parser, Subcommand};
use reqwest::Client;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Administrative calls against the membership/budget backend.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Backend base URL (defaults to API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new pledge or brother
    CreateMember {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        name: String,
        /// pledge | brother
        #[arg(long)]
        member_type: MemberType,
        #[arg(long)]
        pledge_class: String,
    },
    /// Look up one member and their dues
    Member { user_id: String },
    /// Change a member's dues status (ACTIVE | LOA | PART-TIME)
    SetStatus { user_id: String, status: MemberStatus },
    /// List committee budgets
    Committees {
        /// Include every stored field, not just name/budget/activities
        #[arg(long)]
        full: bool,
    },
    /// Create or replace a committee budget
    AddCommittee {
        #[arg(long)]
        name: String,
        #[arg(long)]
        budget: Option<f64>,
        /// Activity as NAME=COST; repeatable
        #[arg(long = "activity", value_parser = parse_activity)]
        activities: Vec<Activity>,
    },
    /// Approve a budget amount for a committee
    ApproveBudget {
        #[arg(long)]
        name: String,
        #[arg(long)]
        amount: f64,
    },
    /// List funding requests (pending | accepted | declined)
    Requests {
        #[arg(default_value = "pending")]
        status: RequestStatus,
    },
    /// File a funding request
    NewRequest {
        #[arg(long)]
        department: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        description: String,
        #[arg(long)]
        requester: String,
    },
    /// Accept or decline a funding request
    Decide { id: String, status: RequestStatus },
}

fn parse_activity(raw: &str) -> Result<Activity, String> {
    let (name, cost) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=COST, got {:?}", raw))?;
    let cost = cost
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad cost in {:?}: {}", raw, e))?;
    Ok(Activity {
        name: name.trim().to_string(),
        cost,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("rendering response")?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let base = match &args.api_base {
        Some(url) => parse_base(Some(url), "")?,
        None => Config::from_env()?.api_base,
    };
    info!(%base, command = ?args.command, "admin call");
    let backend = BackendClient::new(Client::new(), base);

    match args.command {
        Command::CreateMember {
            user_id,
            name,
            member_type,
            pledge_class,
        } => {
            let member = NewMember {
                name,
                member_type,
                pledge_class,
                user_id,
            };
            print_json(&backend.create_member(&member).await?)
        }
        Command::Member { user_id } => print_json(&backend.get_member_data(&user_id).await?),
        Command::SetStatus { user_id, status } => {
            print_json(&backend.update_status(&user_id, status).await?)
        }
        Command::Committees { full } => {
            let committees = if full {
                backend.get_committees().await?
            } else {
                backend.get_committee_budgets().await?
            };
            for c in &committees {
                info!(
                    name = %c.name,
                    budget = ?c.budget,
                    planned = c.activity_total(),
                    "committee"
                );
            }
            print_json(&committees)
        }
        Command::AddCommittee {
            name,
            budget,
            activities,
        } => {
            let committee = Committee {
                id: None,
                name,
                budget,
                activities,
            };
            print_json(&backend.add_committee(&committee).await?)
        }
        Command::ApproveBudget { name, amount } => {
            print_json(&backend.approve_budget(&BudgetApproval { name, amount }).await?)
        }
        Command::Requests { status } => print_json(&backend.list_requests(status).await?),
        Command::NewRequest {
            department,
            amount,
            description,
            requester,
        } => {
            let request = NewRequest {
                department,
                amount,
                description,
                requester,
            };
            print_json(&backend.create_request(&request).await?)
        }
        Command::Decide { id, status } => print_json(&backend.update_request(&id, status).await?),
    }
}
