use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use crate::collectors::{RawVacancy, VacancySource};
use crate::error::AppError;

/// Characters that encodeURIComponent does NOT encode.
const ENCODE_URI_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// hh.ru vacancy search. One request per company, first page only.
pub struct HeadHunter {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Option<Vec<RawVacancy>>,
}

impl HeadHunter {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, company_name: &str) -> String {
        format!(
            "{}/vacancies?text={}",
            self.base_url,
            utf8_percent_encode(company_name, ENCODE_URI_COMPONENT_SET)
        )
    }
}

#[async_trait]
impl VacancySource for HeadHunter {
    fn name(&self) -> &str {
        "hh.ru"
    }

    async fn fetch(&self, company_name: &str) -> Result<Option<Vec<RawVacancy>>, AppError> {
        let resp = self.client.get(self.search_url(company_name)).send().await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!("Failed to fetch vacancies for '{company_name}': {status}");
            return Ok(None);
        }

        let body: SearchResponse = resp.json().await?;
        Ok(parse_items(body, company_name))
    }
}

fn parse_items(body: SearchResponse, company_name: &str) -> Option<Vec<RawVacancy>> {
    match body.items {
        Some(items) => {
            tracing::debug!("Fetched {} vacancies for '{company_name}'", items.len());
            Some(items)
        }
        None => {
            tracing::warn!("Response for '{company_name}' has no 'items' field");
            None
        }
    }
}
