use clap::Parser;
use tracing_subscriber::EnvFilter;

use hh_vacancies::collectors::hh::HeadHunter;
use hh_vacancies::collectors::runner;
use hh_vacancies::config::{Command, Config};
use hh_vacancies::db::Store;
use hh_vacancies::report;

async fn execute(store: &Store, config: &Config) -> anyhow::Result<()> {
    match config.resolved_command() {
        Command::Run {
            companies,
            report: report_args,
        } => {
            let source = HeadHunter::new(&config.api_url, &config.user_agent)?;
            runner::ingest(store, &source, &companies.names).await?;
            report::print_report(store, &report_args.keyword).await?;
        }
        Command::Ingest { companies } => {
            let source = HeadHunter::new(&config.api_url, &config.user_agent)?;
            runner::ingest(store, &source, &companies.names).await?;
        }
        Command::Report {
            report: report_args,
        } => {
            report::print_report(store, &report_args.keyword).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hh_vacancies=info")),
        )
        .init();

    let config = Config::parse();

    let store = Store::open(&config.database, config.run_migrations).await?;

    // Close the connection whether or not the command succeeded.
    let result = execute(&store, &config).await;
    store.close().await;

    if let Err(e) = &result {
        tracing::error!("Run failed: {e:#}");
    }
    result
}
