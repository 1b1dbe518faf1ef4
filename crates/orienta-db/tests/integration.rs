//! Offline unit tests for orienta-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use orienta_core::{AppConfig, Environment};
use orienta_db::{NewRespondent, PoolConfig, RespondentRow, ResultRow};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        questions_path: PathBuf::from("./config/questions.yaml"),
        careers_path: PathBuf::from("./config/careers.yaml"),
        profiles_path: PathBuf::from("./config/profiles.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        mail: None,
        mail_timeout_secs: 15,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`RespondentRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn respondent_row_has_expected_fields() {
    use chrono::Utc;

    let row = RespondentRow {
        id: 1_i64,
        first_name: "Ana".to_string(),
        last_name: "Quispe".to_string(),
        age: 16_i16,
        email: "ana.quispe@example.com".to_string(),
        created_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.age, 16);
    assert_eq!(row.email, "ana.quispe@example.com");
}

/// Compile-time smoke test for [`ResultRow`]: the profile column is nullable
/// and the tally is carried as JSON.
#[test]
fn result_row_has_expected_fields() {
    use chrono::Utc;

    let row = ResultRow {
        id: 3_i64,
        respondent_id: 1_i64,
        predominant_profile: None,
        tally: serde_json::json!({}),
        created_at: Utc::now(),
    };

    assert_eq!(row.respondent_id, 1);
    assert!(row.predominant_profile.is_none());
    assert!(row.tally.as_object().is_some_and(serde_json::Map::is_empty));
}

#[test]
fn new_respondent_carries_normalized_email() {
    let new = NewRespondent {
        first_name: "Ana".to_string(),
        last_name: "Quispe".to_string(),
        age: 14,
        email: "ana.quispe@example.com".to_string(),
    };
    assert_eq!(new.email, new.email.trim().to_lowercase());
}
