use clap::{Args, Parser};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped in the userinfo part of a connection URL.
const USERINFO_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub const DEFAULT_COMPANIES: &[&str] = &[
    "Яндекс",
    "Сбер",
    "Тинькофф",
    "Ростех",
    "ВКонтакте",
    "Газпром",
    "Гринатом",
    "ВТБ",
    "Альфа-Банк",
    "Huawei",
];

pub const DEFAULT_KEYWORD: &str = "python";

fn default_companies() -> Vec<String> {
    DEFAULT_COMPANIES.iter().map(|c| c.to_string()).collect()
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "hh-vacancies",
    about = "Collect hh.ru vacancies for a list of companies and report on them"
)]
pub struct Config {
    #[command(flatten)]
    pub database: DatabaseSettings,

    /// Run database migrations on startup
    #[arg(long, env = "RUN_MIGRATIONS", default_value = "true", action = clap::ArgAction::Set)]
    pub run_migrations: bool,

    /// Base URL of the vacancy search API
    #[arg(long, env = "HH_API_URL", default_value = "https://api.hh.ru")]
    pub api_url: String,

    /// User-Agent sent with every API request
    #[arg(long, env = "HH_USER_AGENT", default_value = "api-test-agent")]
    pub user_agent: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone)]
pub struct DatabaseSettings {
    /// Database host
    #[arg(long = "db-host", env = "DB_HOST", default_value = "localhost")]
    pub host: String,

    /// Database port
    #[arg(long = "db-port", env = "DB_PORT", default_value = "5432")]
    pub port: u16,

    /// Database user
    #[arg(long = "db-user", env = "DB_USER", default_value = "postgres")]
    pub user: String,

    /// Database password
    #[arg(
        long = "db-password",
        env = "DB_PASSWORD",
        default_value = "postgres",
        hide_env_values = true
    )]
    pub password: String,

    /// Database name, created on startup if missing
    #[arg(long = "db-name", env = "DB_NAME", default_value = "kyrsql")]
    pub name: String,
}

impl DatabaseSettings {
    /// Connection URL for the target database.
    pub fn database_url(&self) -> String {
        // IPv6 literals need brackets in the authority.
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        format!(
            "postgres://{}:{}@{}:{}/{}",
            utf8_percent_encode(&self.user, USERINFO_SET),
            utf8_percent_encode(&self.password, USERINFO_SET),
            host,
            self.port,
            utf8_percent_encode(&self.name, USERINFO_SET),
        )
    }
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch vacancies, store them, then print the report (default)
    Run {
        #[command(flatten)]
        companies: CompanyArgs,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Fetch and store vacancies without printing the report
    Ingest {
        #[command(flatten)]
        companies: CompanyArgs,
    },
    /// Print the report over what is already stored
    Report {
        #[command(flatten)]
        report: ReportArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CompanyArgs {
    /// Company to search for (repeatable)
    #[arg(long = "company", value_name = "NAME", default_values_t = default_companies())]
    pub names: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Keyword for the title filter section
    #[arg(long, default_value = DEFAULT_KEYWORD)]
    pub keyword: String,
}

impl Config {
    /// Resolve the command, defaulting to Run if none specified.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or_else(|| Command::Run {
            companies: CompanyArgs {
                names: default_companies(),
            },
            report: ReportArgs {
                keyword: DEFAULT_KEYWORD.to_string(),
            },
        })
    }
}
