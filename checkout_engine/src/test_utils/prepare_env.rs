use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

/// Loads `.env.test` and initialises logging. Safe to call from every test.
pub fn prepare_test_env() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    trace!("🚀️ Logging initialised");
}

pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/test_snapshot_{}.db", dir.display(), rand::random::<u64>())
}

pub async fn drop_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("🚀️ Error dropping database {url}: {e:?}");
    }
}
