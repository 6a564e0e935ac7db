use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradewise_core::domain::request::{AdvisoryParams, ComparativeParams};
use tradewise_core::llm::anthropic::AnthropicClient;
use tradewise_core::market::fetch::{LatencyProfile, MarketDataService};
use tradewise_core::recommend;

#[derive(Debug, Parser)]
#[command(name = "tradewise")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare two stocks side by side.
    Analyze {
        /// First ticker symbol or quote-page URL.
        first: String,

        /// Second ticker symbol or quote-page URL.
        second: String,
    },

    /// Advice for one stock, tailored to investment parameters.
    Advise {
        /// Ticker symbol or quote-page URL.
        identifier: String,

        /// Amount of money to invest.
        #[arg(long)]
        amount: f64,

        /// Risk tolerance: low, medium, or high.
        #[arg(long, default_value = "medium")]
        risk: String,

        /// Trading goals, e.g. growth, income, or capital preservation.
        #[arg(long, default_value = "growth")]
        goals: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = tradewise_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let market = MarketDataService::synthesized(LatencyProfile::from_env());
    let llm = AnthropicClient::from_settings(&settings)?;

    let result = match args.command {
        Command::Analyze { first, second } => {
            recommend::comparative(&market, &llm, ComparativeParams { first, second }).await
        }
        Command::Advise {
            identifier,
            amount,
            risk,
            goals,
        } => {
            recommend::advisory(
                &market,
                &llm,
                AdvisoryParams {
                    identifier,
                    investment_amount: amount,
                    risk_tolerance: risk,
                    trading_goals: goals,
                },
            )
            .await
        }
    };

    match result {
        Ok(out) => {
            println!("{}", out.recommendation);
            Ok(())
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "recommendation run failed");
            Err(err)
        }
    }
}

fn init_sentry(settings: &tradewise_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
