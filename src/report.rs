use std::io::Write;

use crate::db::Store;
use crate::models::company::CompanyVacancyCount;
use crate::models::vacancy::VacancyListing;

/// Everything the console report shows, gathered up front so printing
/// cannot fail halfway through a database read.
#[derive(Debug)]
pub struct Report {
    pub company_counts: Vec<CompanyVacancyCount>,
    pub all_vacancies: Vec<VacancyListing>,
    pub average_salary: Option<f64>,
    pub above_average: Vec<VacancyListing>,
    pub keyword: String,
    pub keyword_matches: Vec<VacancyListing>,
}

impl Report {
    pub async fn collect(store: &Store, keyword: &str) -> anyhow::Result<Self> {
        Ok(Self {
            company_counts: store.companies_with_vacancy_counts().await?,
            all_vacancies: store.all_vacancies().await?,
            average_salary: store.average_salary().await?,
            above_average: store.vacancies_above_average_salary().await?,
            keyword: keyword.to_string(),
            keyword_matches: store.vacancies_matching_keyword(keyword).await?,
        })
    }

    pub fn write_to(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "Companies and vacancy counts:")?;
        for company in &self.company_counts {
            writeln!(
                out,
                "Company: {}, Vacancies: {}",
                company.name, company.vacancy_count
            )?;
        }

        writeln!(out, "\nAll vacancies:")?;
        for v in &self.all_vacancies {
            writeln!(
                out,
                "Vacancy: {}, Company: {}, Salary: {} - {}, Link: {}",
                v.title,
                v.company_name,
                v.salary_min,
                v.salary_max,
                v.url.as_deref().unwrap_or("-")
            )?;
        }

        match self.average_salary {
            Some(avg) => writeln!(out, "\nAverage salary: {avg:.2}")?,
            None => writeln!(out, "\nAverage salary: n/a")?,
        }

        writeln!(out, "\nVacancies with salary above average:")?;
        write_short(out, &self.above_average)?;

        writeln!(out, "\nVacancies matching keyword '{}':", self.keyword)?;
        write_short(out, &self.keyword_matches)?;

        Ok(())
    }
}

fn write_short(out: &mut impl Write, listings: &[VacancyListing]) -> std::io::Result<()> {
    for v in listings {
        writeln!(
            out,
            "Vacancy: {}, Company: {}, Salary: {} - {}",
            v.title, v.company_name, v.salary_min, v.salary_max
        )?;
    }
    Ok(())
}

/// Gather the report and print it to stdout.
pub async fn print_report(store: &Store, keyword: &str) -> anyhow::Result<()> {
    let report = Report::collect(store, keyword).await?;
    let stdout = std::io::stdout();
    report.write_to(&mut stdout.lock())?;
    Ok(())
}
