// Vacancy sources and the ingestion runner that feeds them into the store.

pub mod hh;
pub mod runner;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::vacancy::{CreateVacancy, DEFAULT_CURRENCY};

/// Something that can list vacancies for a company by name.
#[async_trait]
pub trait VacancySource: Send + Sync {
    /// Human-readable name used in log lines.
    fn name(&self) -> &str;

    /// Fetch vacancies mentioning `company_name`.
    ///
    /// `Ok(None)` means the source had nothing usable for this company and
    /// it should be skipped. `Err` is fatal for the run.
    async fn fetch(&self, company_name: &str) -> Result<Option<Vec<RawVacancy>>, AppError>;
}

/// One vacancy as returned by the search API, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVacancy {
    pub name: Option<String>,
    pub salary: Option<RawSalary>,
    pub alternate_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSalary {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub currency: Option<String>,
}

impl RawVacancy {
    /// Normalize into an insertable row for `company_id`. Returns `None`
    /// when the listing has no title.
    pub fn into_create_vacancy(self, company_id: i32) -> Option<CreateVacancy> {
        let title = self.name.filter(|n| !n.trim().is_empty())?;

        let (salary_min, salary_max, currency) = match self.salary {
            Some(salary) => (
                salary_bound(salary.from, "from", &title),
                salary_bound(salary.to, "to", &title),
                salary.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            ),
            None => (None, None, DEFAULT_CURRENCY.to_string()),
        };

        Some(CreateVacancy {
            title,
            salary_min,
            salary_max,
            currency,
            company_id,
            url: self.alternate_url,
        })
    }
}

/// Truncate a salary bound to INT. Values that are negative or do not fit
/// are dropped rather than clamped.
fn salary_bound(value: Option<f64>, bound: &str, title: &str) -> Option<i32> {
    let v = value?;
    if v.is_finite() && (0.0..=i32::MAX as f64).contains(&v) {
        Some(v as i32)
    } else {
        tracing::warn!("Ignoring out-of-range salary '{bound}' = {v} for '{title}'");
        None
    }
}
