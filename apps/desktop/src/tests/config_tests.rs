use super::*;

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_target_picsum_listing() {
    let settings = Settings::default();
    assert_eq!(settings.endpoint, "https://picsum.photos/v2/list");
    assert!(settings.database_url.starts_with("sqlite:"));
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
        endpoint = "http://127.0.0.1:9000/v2/list"
        database_url = "sqlite://./tmp/photos.db"
        "#,
    )
    .expect("parse");

    assert_eq!(settings.endpoint, "http://127.0.0.1:9000/v2/list");
    assert_eq!(settings.database_url, "sqlite://./tmp/photos.db");
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let mut settings = Settings::default();
    apply_file(&mut settings, r#"endpoint = "http://mirror/list""#).expect("parse");

    assert_eq!(settings.endpoint, "http://mirror/list");
    assert_eq!(settings.database_url, Settings::default().database_url);
}

#[test]
fn malformed_file_is_an_error() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "endpoint = [").is_err());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_from(&[
            ("RANDOM_IMAGES_ENDPOINT", "http://plain/list"),
            ("APP__ENDPOINT", "http://app/list"),
            ("RANDOM_IMAGES_DATABASE_URL", "sqlite://./plain.db"),
        ]),
    );

    assert_eq!(settings.endpoint, "http://app/list");
    assert_eq!(settings.database_url, "sqlite://./plain.db");
}

#[test]
fn explicit_config_file_must_exist() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let missing = temp_root.path().join("absent.toml");
    assert!(load_settings(Some(&missing)).is_err());
}

#[test]
fn explicit_config_file_is_loaded() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let path = temp_root.path().join("random-images.toml");
    fs::write(&path, r#"database_url = "sqlite::memory:""#).expect("write config");

    let settings = load_settings(Some(&path)).expect("load");
    if std::env::var("RANDOM_IMAGES_DATABASE_URL").is_err()
        && std::env::var("APP__DATABASE_URL").is_err()
    {
        assert_eq!(settings.database_url, "sqlite::memory:");
    }
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn keeps_existing_sqlite_urls() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url("sqlite://./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn normalizes_windows_plain_path() {
    assert_eq!(
        normalize_database_url("C:\\Users\\alice\\photos.db"),
        "sqlite://C:/Users/alice/photos.db"
    );
}

#[test]
fn blank_database_url_falls_back_to_default() {
    assert_eq!(
        normalize_database_url("   "),
        Settings::default().database_url
    );
}

#[tokio::test]
async fn plain_path_from_env_is_prepared_and_openable() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("photos.sqlite3");
    let raw = db_path.to_string_lossy().to_string();

    let mut settings = Settings::default();
    apply_env(&mut settings, env_from(&[("APP__DATABASE_URL", raw.as_str())]));
    assert_eq!(settings.database_url, raw);

    let database_url = prepare_database_url(&settings.database_url).expect("prepare");
    assert!(database_url.starts_with("sqlite://"), "{database_url}");
    assert!(temp_root.path().join("nested").exists());

    let storage = storage::Storage::new(&database_url).await.expect("open sqlite");
    storage.health_check().await.expect("health check");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should be created: {}",
        db_path.display()
    );
}

#[test]
fn plain_path_from_config_file_gets_parent_dir() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("data").join("photos.sqlite3");

    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        &format!(
            "database_url = '{}'",
            db_path.to_string_lossy().replace('\\', "/")
        ),
    )
    .expect("parse");

    let database_url = prepare_database_url(&settings.database_url).expect("prepare");
    assert!(database_url.starts_with("sqlite://"));
    assert!(temp_root.path().join("data").exists());
}

#[test]
fn memory_url_is_left_alone() {
    assert_eq!(
        prepare_database_url("sqlite::memory:").expect("prepare"),
        "sqlite::memory:"
    );
}
