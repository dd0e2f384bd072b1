use crate::collectors::VacancySource;
use crate::db::Store;
use crate::error::AppError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub companies_inserted: usize,
    pub companies_skipped: usize,
    pub vacancies_inserted: usize,
    pub vacancies_dropped: usize,
}

/// Fetch vacancies for each company in turn and store them.
///
/// A company is stored whenever the source returns an item list, even an
/// empty one; a `None` from the source skips it. Source and database errors
/// abort the run, leaving already-inserted rows in place.
pub async fn ingest(
    store: &Store,
    source: &dyn VacancySource,
    companies: &[String],
) -> Result<IngestSummary, AppError> {
    let mut summary = IngestSummary::default();

    for company_name in companies {
        let Some(items) = source.fetch(company_name).await? else {
            tracing::info!("Skipping '{company_name}': no result from {}", source.name());
            summary.companies_skipped += 1;
            continue;
        };

        let company_id = store.insert_company(company_name, None).await?;
        summary.companies_inserted += 1;

        let mut inserted = 0;
        for raw in items {
            let Some(vacancy) = raw.into_create_vacancy(company_id) else {
                tracing::warn!("Dropping untitled vacancy for '{company_name}'");
                summary.vacancies_dropped += 1;
                continue;
            };
            store.insert_vacancy(&vacancy).await?;
            inserted += 1;
        }

        tracing::info!("Stored '{company_name}' (id {company_id}) with {inserted} vacancies");
        summary.vacancies_inserted += inserted;
    }

    tracing::info!(
        "Ingest completed: {} companies stored, {} skipped, {} vacancies stored, {} dropped",
        summary.companies_inserted,
        summary.companies_skipped,
        summary.vacancies_inserted,
        summary.vacancies_dropped
    );

    Ok(summary)
}
