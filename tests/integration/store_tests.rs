//! Store tests: schema setup, inserts and the reporting queries.

use hh_vacancies::db::Store;
use hh_vacancies::models::company::Company;
use hh_vacancies::models::vacancy::Vacancy;

use crate::integration::common::{setup_store, start_postgres, vacancy};

#[tokio::test]
async fn test_open_creates_database_and_is_idempotent() {
    let (settings, _container) = start_postgres().await;

    let first = Store::open(&settings, true)
        .await
        .expect("first open should create the database");
    let company_id = first
        .insert_company("Huawei", None)
        .await
        .expect("insert should succeed");
    first.close().await;

    let second = Store::open(&settings, true)
        .await
        .expect("second open should accept the existing database");
    let counts = second.companies_with_vacancy_counts().await.unwrap();
    assert_eq!(counts.len(), 1, "existing rows survive a reopen");
    assert_eq!(counts[0].name, "Huawei");
    assert!(company_id > 0);
    second.close().await;
}

#[tokio::test]
async fn test_migrations_accept_preexisting_tables() {
    let (mut settings, _container) = start_postgres().await;
    settings.name = "legacy".to_string();

    // Tables created outside of sqlx migrations, as an older deployment would have.
    let bare = Store::open(&settings, false).await.expect("open without migrations");
    sqlx::query("CREATE TABLE companies (id SERIAL PRIMARY KEY, name VARCHAR(255) NOT NULL, url VARCHAR(255))")
        .execute(bare.pool())
        .await
        .unwrap();
    sqlx::query("INSERT INTO companies (name) VALUES ('Сбер')")
        .execute(bare.pool())
        .await
        .unwrap();
    bare.close().await;

    let store = Store::open(&settings, true)
        .await
        .expect("migrations should tolerate existing tables");
    let counts = store.companies_with_vacancy_counts().await.unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].name, "Сбер");
    assert_eq!(counts[0].vacancy_count, 0);
}

#[tokio::test]
async fn test_company_without_vacancies_reports_zero() {
    let (store, _container) = setup_store().await;

    let busy = store.insert_company("Яндекс", None).await.unwrap();
    store.insert_company("Гринатом", None).await.unwrap();
    store
        .insert_vacancy(&vacancy("Python Developer", busy, Some(100), Some(200)))
        .await
        .unwrap();
    store
        .insert_vacancy(&vacancy("Java Engineer", busy, None, None))
        .await
        .unwrap();

    let counts = store.companies_with_vacancy_counts().await.unwrap();
    let summary: Vec<(&str, i64)> = counts
        .iter()
        .map(|c| (c.name.as_str(), c.vacancy_count))
        .collect();
    assert_eq!(summary, vec![("Яндекс", 2), ("Гринатом", 0)]);
}

#[tokio::test]
async fn test_duplicate_company_names_are_separate_rows() {
    let (store, _container) = setup_store().await;

    let first = store.insert_company("ВТБ", None).await.unwrap();
    let second = store.insert_company("ВТБ", None).await.unwrap();
    assert_ne!(first, second);

    let counts = store.companies_with_vacancy_counts().await.unwrap();
    assert_eq!(counts.len(), 2);
}

#[tokio::test]
async fn test_all_vacancies_round_trip_company_name() {
    let (store, _container) = setup_store().await;

    let company_id = store.insert_company("Альфа-Банк", None).await.unwrap();
    store
        .insert_vacancy(&vacancy("Data Engineer", company_id, Some(150000), Some(250000)))
        .await
        .unwrap();

    let all = store.all_vacancies().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Data Engineer");
    assert_eq!(all[0].company_name, "Альфа-Банк");
    assert_eq!((all[0].salary_min, all[0].salary_max), (150000, 250000));
    assert_eq!(
        all[0].url.as_deref(),
        Some("https://hh.ru/vacancy/data-engineer")
    );

    let company = Company::get(store.pool(), company_id)
        .await
        .unwrap()
        .expect("company should exist");
    assert_eq!(company.id, company_id);
    assert_eq!(company.name, all[0].company_name);
    assert_eq!(company.url, None);
}

#[tokio::test]
async fn test_missing_salary_stored_null_reported_zero() {
    let (store, _container) = setup_store().await;

    let company_id = store.insert_company("Ростех", None).await.unwrap();
    let vacancy_id = store
        .insert_vacancy(&vacancy("Engineer", company_id, None, None))
        .await
        .unwrap();

    let stored = Vacancy::get(store.pool(), vacancy_id)
        .await
        .unwrap()
        .expect("vacancy should exist");
    assert_eq!(stored.salary_min, None);
    assert_eq!(stored.salary_max, None);
    assert_eq!(stored.currency.as_deref(), Some("RUR"));
    assert_eq!(stored.company_id, Some(company_id));

    let all = store.all_vacancies().await.unwrap();
    assert_eq!((all[0].salary_min, all[0].salary_max), (0, 0));
}

#[tokio::test]
async fn test_average_salary_counts_missing_salary_as_zero() {
    let (store, _container) = setup_store().await;

    let company_id = store.insert_company("Газпром", None).await.unwrap();
    store
        .insert_vacancy(&vacancy("Analyst", company_id, Some(100), Some(200)))
        .await
        .unwrap();
    store
        .insert_vacancy(&vacancy("Intern", company_id, None, None))
        .await
        .unwrap();

    let avg = store.average_salary().await.unwrap();
    assert_eq!(avg, Some(75.0));
}

#[tokio::test]
async fn test_average_salary_empty_store() {
    let (store, _container) = setup_store().await;
    assert_eq!(store.average_salary().await.unwrap(), None);
    assert!(store.vacancies_above_average_salary().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_above_average_is_strict() {
    let (store, _container) = setup_store().await;

    let company_id = store.insert_company("Сбер", None).await.unwrap();
    // Midpoints 100, 50 and 0: the average is exactly 50.
    store
        .insert_vacancy(&vacancy("Lead", company_id, Some(100), Some(100)))
        .await
        .unwrap();
    store
        .insert_vacancy(&vacancy("Middle", company_id, Some(50), Some(50)))
        .await
        .unwrap();
    store
        .insert_vacancy(&vacancy("Volunteer", company_id, None, None))
        .await
        .unwrap();

    assert_eq!(store.average_salary().await.unwrap(), Some(50.0));

    let above = store.vacancies_above_average_salary().await.unwrap();
    let titles: Vec<&str> = above.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, vec!["Lead"]);
}

#[tokio::test]
async fn test_above_average_recomputes_after_insert() {
    let (store, _container) = setup_store().await;

    let company_id = store.insert_company("Тинькофф", None).await.unwrap();
    store
        .insert_vacancy(&vacancy("Senior", company_id, Some(200), Some(200)))
        .await
        .unwrap();
    store
        .insert_vacancy(&vacancy("Junior", company_id, Some(100), Some(100)))
        .await
        .unwrap();
    assert_eq!(store.vacancies_above_average_salary().await.unwrap().len(), 1);

    store
        .insert_vacancy(&vacancy("Principal", company_id, Some(1000), Some(1000)))
        .await
        .unwrap();
    let above = store.vacancies_above_average_salary().await.unwrap();
    let titles: Vec<&str> = above.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, vec!["Principal"]);
}

#[tokio::test]
async fn test_keyword_match_is_case_insensitive_substring() {
    let (store, _container) = setup_store().await;

    let company_id = store.insert_company("ВКонтакте", None).await.unwrap();
    for title in ["Python Developer", "python-разработчик", "Java Engineer"] {
        store
            .insert_vacancy(&vacancy(title, company_id, None, None))
            .await
            .unwrap();
    }

    for keyword in ["python", "PYTHON"] {
        let matches = store.vacancies_matching_keyword(keyword).await.unwrap();
        let titles: Vec<&str> = matches.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["Python Developer", "python-разработчик"]);
        assert!(matches.iter().all(|v| v.company_name == "ВКонтакте"));
    }
}

#[tokio::test]
async fn test_keyword_wildcards_match_literally() {
    let (store, _container) = setup_store().await;

    let company_id = store.insert_company("Huawei", None).await.unwrap();
    store
        .insert_vacancy(&vacancy("C_Sharp Developer", company_id, None, None))
        .await
        .unwrap();
    store
        .insert_vacancy(&vacancy("CxSharp Developer", company_id, None, None))
        .await
        .unwrap();

    let matches = store.vacancies_matching_keyword("c_sharp").await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].title, "C_Sharp Developer");

    assert!(store.vacancies_matching_keyword("%").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_vacancy_requires_existing_company() {
    let (store, _container) = setup_store().await;

    let result = store
        .insert_vacancy(&vacancy("Orphan", 9999, None, None))
        .await;
    assert!(result.is_err(), "foreign key should reject unknown company");
}

#[tokio::test]
async fn test_close_releases_connection() {
    let (store, _container) = setup_store().await;
    let pool = store.pool().clone();

    store.close().await;
    assert!(pool.is_closed());
}
