use sqlx::migrate::MigrateDatabase;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};

use crate::config::DatabaseSettings;
use crate::error::AppError;
use crate::models::company::{Company, CompanyVacancyCount, CreateCompany};
use crate::models::vacancy::{CreateVacancy, Vacancy, VacancyListing};

/// Create the target database unless it already exists. The name is quoted
/// by the driver; a concurrent creator winning the race is not an error.
pub async fn ensure_database(settings: &DatabaseSettings) -> Result<(), AppError> {
    let url = settings.database_url();
    if Postgres::database_exists(&url).await? {
        tracing::info!("Database '{}' already exists", settings.name);
        return Ok(());
    }

    match Postgres::create_database(&url).await.map_err(AppError::from) {
        Ok(()) => {
            tracing::info!("Database '{}' created", settings.name);
            Ok(())
        }
        Err(e) if e.is_duplicate_database() => {
            tracing::info!("Database '{}' already exists", settings.name);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Single-connection pool: the whole run shares one session.
pub async fn create_pool(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Owned handle over the companies/vacancies schema. Every statement runs
/// in autocommit mode, so each insert is durable once it returns.
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Ensure the database exists, connect, and optionally bring the schema up.
    pub async fn open(settings: &DatabaseSettings, migrate: bool) -> Result<Self, AppError> {
        ensure_database(settings).await?;

        tracing::info!(
            "Connecting to database '{}' at {}:{}...",
            settings.name,
            settings.host,
            settings.port
        );
        let pool = create_pool(&settings.database_url()).await?;

        if migrate {
            tracing::info!("Running database migrations...");
            run_migrations(&pool).await?;
            tracing::info!("Migrations complete");
        }

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn insert_company(&self, name: &str, url: Option<&str>) -> Result<i32, AppError> {
        let input = CreateCompany {
            name: name.to_string(),
            url: url.map(String::from),
        };
        Company::create(&self.pool, &input).await
    }

    pub async fn insert_vacancy(&self, input: &CreateVacancy) -> Result<i32, AppError> {
        Vacancy::create(&self.pool, input).await
    }

    pub async fn companies_with_vacancy_counts(
        &self,
    ) -> Result<Vec<CompanyVacancyCount>, AppError> {
        Company::with_vacancy_counts(&self.pool).await
    }

    pub async fn all_vacancies(&self) -> Result<Vec<VacancyListing>, AppError> {
        Vacancy::list_all(&self.pool).await
    }

    pub async fn average_salary(&self) -> Result<Option<f64>, AppError> {
        Vacancy::average_salary(&self.pool).await
    }

    pub async fn vacancies_above_average_salary(&self) -> Result<Vec<VacancyListing>, AppError> {
        Vacancy::above_average_salary(&self.pool).await
    }

    pub async fn vacancies_matching_keyword(
        &self,
        keyword: &str,
    ) -> Result<Vec<VacancyListing>, AppError> {
        Vacancy::matching_keyword(&self.pool, keyword).await
    }

    /// Release the connection. Consumes the store so it cannot be reused.
    pub async fn close(self) {
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }
}
