//! Integration tests for the PostgreSQL repositories.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup.
//!
//! Run with: `DATABASE_URL=... cargo test --test postgres_integration -- --ignored`

use axioma_repository::{
    DetailQuery, IndicatorQuery, IndicatorRepository, PostgresIndicatorRepository,
    PostgresReserveRepository, PostgresUserRepository, RepositoryError, ReserveRepository,
    UserRepository,
};
use axioma_shared::{Language, NewUser};
use chrono::NaiveDate;
use std::str::FromStr;

async fn seed_reserve(pool: &sqlx::PgPool) {
    sqlx::query("INSERT INTO category (id, name) VALUES (1, 'Banco Central')")
        .execute(pool)
        .await
        .unwrap();

    for (categoria, subcategoria, valor, fecha) in [
        ("Depósitos", "Ahorros", "125000.50", "2024-08-01"),
        ("Depósitos", "Ahorros", "100000.00", "2024-08-01"),
        ("Préstamos", "Consumo", "85000.75", "2024-08-01"),
        ("Depósitos", "Ahorros", "1.00", "2024-07-01"),
        ("Depósitos", "Ahorros", "2.00", "2024-06-01"),
        ("Depósitos", "Ahorros", "3.00", "2024-05-01"),
    ] {
        sqlx::query(
            "INSERT INTO encaje_legal (banco, tipo, categoria, subcategoria, valor, fecha_corte, category_id)
             VALUES ('BCB', 'MN', $1, $2, $3::numeric, $4::date, 1)",
        )
        .bind(categoria)
        .bind(subcategoria)
        .bind(valor)
        .bind(fecha)
        .execute(pool)
        .await
        .unwrap();
    }
}

async fn seed_indicators(pool: &sqlx::PgPool) {
    sqlx::query(
        "INSERT INTO indicators (indicator_id, indicator_code, data_count, source) VALUES
            (1, 'NY.GDP.MKTP.CD', 50, 'World Bank'),
            (2, 'SP.POP.TOTL', 100, 'World Bank'),
            (3, 'EMPTY.DESC', 500, 'World Bank')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO indicators_lang (indicator_id, lang, indicator_name, description) VALUES
            (1, 'EN', 'GDP (current US$)', 'Gross domestic product at purchaser prices'),
            (1, 'ES', 'PIB (US$ a precios actuales)', 'Producto interno bruto a precios de comprador'),
            (2, 'EN', 'Population, total', 'Total population counts all residents'),
            (3, 'EN', 'No description', '')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO entities (entity_id, entity_code) VALUES (1, 'BOL'), (2, 'ARG'), (3, 'WLD')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO entities_lang (entity_id, lang, entity_name, entity_type) VALUES
            (1, 'EN', 'Bolivia', 'Country'),
            (2, 'EN', 'Argentina', 'Country'),
            (3, 'EN', 'World', 'Aggregate')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO time_periods (period_id, start_year, end_year, period_label) VALUES
            (1, 2021, 2021, '2021'),
            (2, 2020, 2020, '2020')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO data_values (entity_id, indicator_id, period_id, value) VALUES
            (1, 1, 1, 40.5),
            (1, 1, 2, 36.6),
            (2, 1, 1, 487.2),
            (3, 1, 1, NULL),
            (1, 2, 1, 12.0)",
    )
    .execute(pool)
    .await
    .unwrap();
}

// ============================================================================
// Reserve Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database via DATABASE_URL"]
async fn test_recent_cutoff_dates_limited_and_descending(pool: sqlx::PgPool) {
    seed_reserve(&pool).await;
    let repository = PostgresReserveRepository::new(pool);

    let dates = repository.recent_cutoff_dates(3).await.unwrap();

    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        ]
    );
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database via DATABASE_URL"]
async fn test_entries_for_dates_joins_category(pool: sqlx::PgPool) {
    seed_reserve(&pool).await;
    let repository = PostgresReserveRepository::new(pool);

    let date = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
    let entries = repository.entries_for_dates(&[date]).await.unwrap();

    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.source == "Banco Central"));
    assert_eq!(entries[0].value, bigdecimal::BigDecimal::from_str("125000.50").unwrap());
    assert!(repository.entries_for_dates(&[]).await.unwrap().is_empty());
}

// ============================================================================
// Indicator Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database via DATABASE_URL"]
async fn test_search_paths_share_text_filter(pool: sqlx::PgPool) {
    seed_indicators(&pool).await;
    let repository = PostgresIndicatorRepository::new(pool);

    let top = repository
        .search_indicators(&IndicatorQuery {
            text: None,
            limit: 10,
            lang: Language::En,
            user_id: None,
        })
        .await
        .unwrap();

    // EMPTY.DESC has the highest data_count but an empty description.
    let codes: Vec<_> = top.iter().map(|m| m.code.as_str()).collect();
    assert_eq!(codes, vec!["SP.POP.TOTL", "NY.GDP.MKTP.CD"]);
    assert!(top.iter().all(|m| m.is_favorite.is_none()));

    let keyword = repository
        .search_indicators(&IndicatorQuery {
            text: Some("domestic product".to_string()),
            limit: 10,
            lang: Language::En,
            user_id: None,
        })
        .await
        .unwrap();

    assert_eq!(keyword.len(), 1);
    assert_eq!(keyword[0].code, "NY.GDP.MKTP.CD");
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database via DATABASE_URL"]
async fn test_entity_links_skip_null_values(pool: sqlx::PgPool) {
    seed_indicators(&pool).await;
    let repository = PostgresIndicatorRepository::new(pool);

    let links = repository.entity_links(&[1], Language::En).await.unwrap();

    let names: Vec<_> = links.iter().map(|l| l.entity_name.as_str()).collect();
    assert_eq!(names, vec!["Argentina", "Bolivia"]);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database via DATABASE_URL"]
async fn test_detail_rows_require_language_rows(pool: sqlx::PgPool) {
    seed_indicators(&pool).await;
    let repository = PostgresIndicatorRepository::new(pool);

    let english = repository
        .detail_rows(&DetailQuery {
            indicator_code: "NY.GDP.MKTP.CD".to_string(),
            entity_codes: vec!["BOL".to_string()],
            lang: Language::En,
            entity_types: None,
        })
        .await
        .unwrap();
    let labels: Vec<_> = english.iter().map(|r| r.period_label.clone().unwrap()).collect();
    assert_eq!(labels, vec!["2020", "2021"]);

    // Entities have no Spanish rows.
    let spanish = repository
        .detail_rows(&DetailQuery {
            indicator_code: "NY.GDP.MKTP.CD".to_string(),
            entity_codes: vec!["BOL".to_string()],
            lang: Language::Es,
            entity_types: None,
        })
        .await
        .unwrap();
    assert!(spanish.is_empty());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database via DATABASE_URL"]
async fn test_detail_rows_restricted_by_entity_type(pool: sqlx::PgPool) {
    seed_indicators(&pool).await;
    sqlx::query("INSERT INTO data_values (entity_id, indicator_id, period_id, value) VALUES (3, 2, 1, 7900.0)")
        .execute(&pool)
        .await
        .unwrap();
    let repository = PostgresIndicatorRepository::new(pool);
    let query = |entity_types: Option<Vec<String>>| DetailQuery {
        indicator_code: "SP.POP.TOTL".to_string(),
        entity_codes: vec!["BOL".to_string(), "WLD".to_string()],
        lang: Language::En,
        entity_types,
    };

    let all = repository.detail_rows(&query(None)).await.unwrap();
    let codes: Vec<_> = all.iter().map(|r| r.entity_code.as_str()).collect();
    assert_eq!(codes, vec!["BOL", "WLD"]);

    let countries = repository
        .detail_rows(&query(Some(vec!["Country".to_string()])))
        .await
        .unwrap();
    let codes: Vec<_> = countries.iter().map(|r| r.entity_code.as_str()).collect();
    assert_eq!(codes, vec!["BOL"]);
    assert_eq!(countries[0].entity_type.as_deref(), Some("Country"));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database via DATABASE_URL"]
async fn test_search_marks_user_favorites(pool: sqlx::PgPool) {
    seed_indicators(&pool).await;
    let users = PostgresUserRepository::new(pool.clone());
    let user = users
        .insert_user(&NewUser {
            email: "ana@example.com".to_string(),
            name: None,
            phone: None,
            picture: None,
            email_verified: true,
            country_code: None,
        })
        .await
        .unwrap();
    users.upsert_favorite(user.id, 2, true).await.unwrap();
    let repository = PostgresIndicatorRepository::new(pool);

    for text in [Some("population gdp".to_string()), None] {
        let matches = repository
            .search_indicators(&IndicatorQuery {
                text,
                limit: 10,
                lang: Language::En,
                user_id: Some(user.id),
            })
            .await
            .unwrap();

        let flags: Vec<_> = matches
            .iter()
            .map(|m| (m.code.as_str(), m.is_favorite))
            .collect();
        assert_eq!(
            flags,
            vec![("SP.POP.TOTL", Some(true)), ("NY.GDP.MKTP.CD", Some(false))]
        );
    }
}

// ============================================================================
// User Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database via DATABASE_URL"]
async fn test_insert_user_converges_on_email(pool: sqlx::PgPool) {
    let repository = PostgresUserRepository::new(pool.clone());
    let new_user = NewUser {
        email: "ana@example.com".to_string(),
        name: Some("Ana".to_string()),
        phone: None,
        picture: None,
        email_verified: true,
        country_code: None,
    };

    let first = repository.insert_user(&new_user).await.unwrap();
    let second = repository.insert_user(&new_user).await.unwrap();

    assert_eq!(first.id, second.id);
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database via DATABASE_URL"]
async fn test_upsert_favorite_never_duplicates(pool: sqlx::PgPool) {
    seed_indicators(&pool).await;
    let repository = PostgresUserRepository::new(pool.clone());
    let user = repository
        .insert_user(&NewUser {
            email: "ana@example.com".to_string(),
            name: None,
            phone: None,
            picture: None,
            email_verified: true,
            country_code: None,
        })
        .await
        .unwrap();

    assert!(repository.upsert_favorite(user.id, 1, true).await.unwrap());
    assert!(repository.upsert_favorite(user.id, 1, true).await.unwrap());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_favorites")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let favorites = repository.list_favorites(user.id, Language::Es).await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].name.as_deref(), Some("PIB (US$ a precios actuales)"));

    assert!(!repository.upsert_favorite(user.id, 1, false).await.unwrap());
    assert!(repository.list_favorites(user.id, Language::En).await.unwrap().is_empty());

    let unknown = repository.upsert_favorite(user.id, 999, true).await;
    assert!(matches!(unknown, Err(RepositoryError::UnknownIndicator(999))));
}
