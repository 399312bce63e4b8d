use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use finsight_assistant::Assistant;
use finsight_core::time::today_in;
use finsight_core::{Bucket, DateRange, Session, SessionRegistry, TransactionFilter};
use finsight_ingest::{CsvSource, FixtureSource, TransactionSource};
use std::path::PathBuf;
use tracing::{debug, warn};

mod chat;
mod config;
mod logging;
mod render;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "finsight",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FINSIGHT_BUILD_SHA"), ")"),
    about = "Personal finance analysis and budgeting assistant"
)]
struct Cli {
    /// User whose ledger is analysed
    #[arg(long, global = true, default_value = "demo")]
    user: String,

    /// Expenses ledger CSV (overrides config)
    #[arg(long, global = true)]
    expenses: Option<PathBuf>,

    /// Income ledger CSV (overrides config)
    #[arg(long, global = true)]
    income: Option<PathBuf>,

    /// Pin "today" instead of reading the clock (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Clone, Default)]
struct RangeArgs {
    /// First day included (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day included (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl RangeArgs {
    fn is_set(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    fn range(&self) -> Result<DateRange> {
        Ok(DateRange::new(self.from, self.to)?)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Totals, category shares, cashflow, top merchants and recent activity
    Dashboard {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// 50/30/20 budget recommendation next to actual monthly spending
    Budget,

    /// Detailed expense report for a date range
    Report {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Spending share per category
    Categories {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Expenses bucketed over time
    Trend {
        #[arg(long, default_value = "week")]
        bucket: Bucket,
    },

    /// Income against expenses per period
    Cashflow {
        #[arg(long, default_value = "month")]
        bucket: Bucket,
    },

    /// Merchants ranked by total spend
    Merchants {
        #[arg(long, default_value_t = 5)]
        top: usize,
    },

    /// Next month's projected spending
    Forecast,

    /// List expenses, newest first
    Expenses {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(long)]
        category: Option<String>,

        /// Substring of description or merchant
        #[arg(long)]
        search: Option<String>,
    },

    /// List income, newest first
    Income {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(long)]
        source: Option<String>,
    },

    /// Ask the assistant a single question
    Ask {
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },

    /// Interactive chat with the assistant
    Chat,

    /// Write the full analysis as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Manage ~/.finsight/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    if let Command::Config { command } = &cli.command {
        return match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                Ok(())
            }
        };
    }

    let cfg = config::load_config()?;
    let mut registry = SessionRegistry::new();
    let session = registry.get_or_load(&cli.user, |user| open_session(&cli, &cfg, user))?;

    run(&cli, session)
}

fn open_session(cli: &Cli, cfg: &Config, user: &str) -> Result<Session> {
    let today = match cli.today {
        Some(d) => d,
        None => today_in(&cfg.analysis.timezone)
            .with_context(|| format!("timezone {}", cfg.analysis.timezone))?,
    };

    let csv = CsvSource {
        expenses: cli.expenses.clone().or_else(|| cfg.data.expenses_csv.clone()),
        income: cli.income.clone().or_else(|| cfg.data.income_csv.clone()),
    };
    let source: Box<dyn TransactionSource> = if csv.expenses.is_none() && csv.income.is_none() {
        warn!(user, "no ledger configured; using generated demo data");
        Box::new(FixtureSource::new(today, cfg.data.fixture_days))
    } else {
        Box::new(csv)
    };

    let loaded = source.load(user)?;
    debug!(user, %today, "opening session");
    Ok(Session::load(
        user,
        today,
        cfg.analysis.session_settings(),
        loaded.into_transactions(),
    )?)
}

fn run(cli: &Cli, session: &Session) -> Result<()> {
    match &cli.command {
        Command::Dashboard { range } => {
            let range = if range.is_set() { Some(range.range()?) } else { None };
            let summary = session.dashboard(range);
            if cli.json {
                render::print_json(&summary)?;
            } else {
                render::print_dashboard(&summary);
            }
        }

        Command::Budget => {
            let allocation = session.budget()?;
            let status = session.budget_status()?;
            if cli.json {
                render::print_json(&serde_json::json!({
                    "allocation": allocation,
                    "status": status,
                }))?;
            } else {
                render::print_budget(&allocation, &status);
            }
        }

        Command::Report { range } => {
            let report = session.expense_report(&range.range()?);
            if cli.json {
                render::print_json(&report)?;
            } else {
                render::print_report(&report);
            }
        }

        Command::Categories { range } => {
            let shares = session.category_breakdown(&range.range()?);
            if cli.json {
                render::print_json(&shares)?;
            } else {
                render::print_shares(&shares);
            }
        }

        Command::Trend { bucket } => {
            let rows = session.expenses_over_time(*bucket);
            if cli.json {
                render::print_json(&rows)?;
            } else {
                render::print_periods(&rows);
            }
        }

        Command::Cashflow { bucket } => {
            let rows = session.income_vs_expense(*bucket);
            if cli.json {
                render::print_json(&rows)?;
            } else {
                render::print_cashflow(&rows);
            }
        }

        Command::Merchants { top } => {
            let rows = session.top_merchants(*top);
            if cli.json {
                render::print_json(&rows)?;
            } else {
                render::print_merchants(&rows);
            }
        }

        Command::Forecast => {
            let forecast = session.forecast()?;
            if cli.json {
                render::print_json(&forecast)?;
            } else {
                render::print_forecast(&forecast);
            }
        }

        Command::Expenses { range, category, search } => {
            let mut filter = TransactionFilter::new().with_range(range.range()?);
            if let Some(c) = category {
                filter = filter.with_label(c);
            }
            if let Some(s) = search {
                filter = filter.with_text(s);
            }
            let listing = session.expenses(&filter);
            if cli.json {
                render::print_json(&listing)?;
            } else {
                render::print_listing(&listing);
            }
        }

        Command::Income { range, source } => {
            let mut filter = TransactionFilter::new().with_range(range.range()?);
            if let Some(s) = source {
                filter = filter.with_label(s);
            }
            let listing = session.income(&filter);
            if cli.json {
                render::print_json(&listing)?;
            } else {
                render::print_listing(&listing);
            }
        }

        Command::Ask { question } => {
            let mut assistant = Assistant::new()?;
            let reply = assistant.reply(session, &question.join(" "))?;
            if cli.json {
                render::print_json(&serde_json::json!({ "response": reply }))?;
            } else {
                println!("{reply}");
            }
        }

        Command::Chat => chat::run_chat(session)?,

        Command::Export { out } => {
            let export = session.export();
            let body = serde_json::to_string_pretty(&export)?;
            match out {
                Some(p) => {
                    std::fs::write(p, body).with_context(|| format!("write {}", p.display()))?;
                    println!("Wrote {}", p.display());
                }
                None => println!("{body}"),
            }
        }

        Command::Config { .. } => unreachable!("handled before the session opens"),
    }

    Ok(())
}
