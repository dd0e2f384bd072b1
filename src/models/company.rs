use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, sqlx::FromRow)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug)]
pub struct CreateCompany {
    pub name: String,
    pub url: Option<String>,
}

/// A company together with how many vacancies reference it.
#[derive(Debug, sqlx::FromRow)]
pub struct CompanyVacancyCount {
    pub name: String,
    pub vacancy_count: i64,
}

impl Company {
    /// Insert a company and return its generated id. Names are not unique;
    /// every call adds a new row.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<i32, AppError> {
        let id: i32 =
            sqlx::query_scalar("INSERT INTO companies (name, url) VALUES ($1, $2) RETURNING id")
                .bind(&input.name)
                .bind(&input.url)
                .fetch_one(pool)
                .await?;
        Ok(id)
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT id, name, url FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(company)
    }

    /// Every company with its vacancy count, including companies with none.
    pub async fn with_vacancy_counts(pool: &PgPool) -> Result<Vec<CompanyVacancyCount>, AppError> {
        let counts = sqlx::query_as::<_, CompanyVacancyCount>(
            "SELECT c.name, COUNT(v.id) AS vacancy_count FROM companies c LEFT JOIN vacancies v ON c.id = v.company_id GROUP BY c.id ORDER BY c.id",
        )
        .fetch_all(pool)
        .await?;
        Ok(counts)
    }
}
