use sqlx::PgPool;

use crate::error::AppError;

pub const DEFAULT_CURRENCY: &str = "RUR";

#[derive(Debug, sqlx::FromRow)]
pub struct Vacancy {
    pub id: i32,
    pub title: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub currency: Option<String>,
    pub company_id: Option<i32>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateVacancy {
    pub title: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub currency: String,
    pub company_id: i32,
    pub url: Option<String>,
}

/// Reporting view of a vacancy joined with its company. Missing salary
/// bounds read as 0.
#[derive(Debug, sqlx::FromRow)]
pub struct VacancyListing {
    pub title: String,
    pub company_name: String,
    pub salary_min: i32,
    pub salary_max: i32,
    pub url: Option<String>,
}

/// Midpoint of the salary range, integer-divided, absent bounds as 0.
const MIDPOINT: &str = "(COALESCE(v.salary_min, 0)::bigint + COALESCE(v.salary_max, 0)) / 2";

const LISTING_COLUMNS: &str = "v.title, c.name AS company_name, COALESCE(v.salary_min, 0) AS salary_min, COALESCE(v.salary_max, 0) AS salary_max, v.url FROM vacancies v JOIN companies c ON v.company_id = c.id";

impl Vacancy {
    pub async fn create(pool: &PgPool, input: &CreateVacancy) -> Result<i32, AppError> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO vacancies (title, salary_min, salary_max, currency, company_id, url) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&input.title)
        .bind(input.salary_min)
        .bind(input.salary_max)
        .bind(&input.currency)
        .bind(input.company_id)
        .bind(&input.url)
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<Option<Vacancy>, AppError> {
        let vacancy = sqlx::query_as::<_, Vacancy>(
            "SELECT id, title, salary_min, salary_max, currency, company_id, url FROM vacancies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(vacancy)
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<VacancyListing>, AppError> {
        let listings =
            sqlx::query_as::<_, VacancyListing>(&format!("SELECT {LISTING_COLUMNS} ORDER BY v.id"))
                .fetch_all(pool)
                .await?;
        Ok(listings)
    }

    /// Average salary midpoint over all vacancies. Vacancies without any
    /// salary count as 0. `None` when there are no vacancies.
    pub async fn average_salary(pool: &PgPool) -> Result<Option<f64>, AppError> {
        let avg: Option<f64> = sqlx::query_scalar(&format!(
            "SELECT AVG({MIDPOINT})::float8 FROM vacancies v"
        ))
        .fetch_one(pool)
        .await?;
        Ok(avg)
    }

    /// Vacancies whose midpoint is strictly above the current average.
    pub async fn above_average_salary(pool: &PgPool) -> Result<Vec<VacancyListing>, AppError> {
        let listings = sqlx::query_as::<_, VacancyListing>(&format!(
            "SELECT {LISTING_COLUMNS} WHERE {MIDPOINT} > (SELECT AVG({MIDPOINT}) FROM vacancies v) ORDER BY v.id"
        ))
        .fetch_all(pool)
        .await?;
        Ok(listings)
    }

    /// Vacancies whose title contains `keyword`, ignoring case.
    pub async fn matching_keyword(
        pool: &PgPool,
        keyword: &str,
    ) -> Result<Vec<VacancyListing>, AppError> {
        let listings = sqlx::query_as::<_, VacancyListing>(&format!(
            "SELECT {LISTING_COLUMNS} WHERE v.title ILIKE '%' || $1 || '%' ORDER BY v.id"
        ))
        .bind(escape_like(keyword))
        .fetch_all(pool)
        .await?;
        Ok(listings)
    }
}

/// Escape LIKE wildcards so the keyword matches literally.
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
