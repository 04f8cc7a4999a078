//! PostgreSQL test fixture
//!
//! Tests against a real database run only when `DATABASE_URL` is set; the
//! fixture returns `None` otherwise and the test returns early.

use codenest::backend::store::PgStore;

pub struct TestDatabase {
    store: PgStore,
}

impl TestDatabase {
    /// Connect and migrate, or `None` without `DATABASE_URL`
    pub async fn new() -> Option<Self> {
        let url = std::env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty())?;
        let store = PgStore::connect(&url)
            .await
            .expect("Failed to connect to the test database");
        Some(Self { store })
    }

    pub fn store(&self) -> &PgStore {
        &self.store
    }
}

/// Name that will not collide with rows from other tests
pub fn unique_name(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &suffix[..12])
}
