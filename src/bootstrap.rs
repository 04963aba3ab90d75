use std::path::{Path, PathBuf};

use crate::{TessellaConfig, TessellaResult, TessellaStore};

const DEFAULT_DB_NAME: &str = "tessella.sqlite";

pub fn load_or_init_config(base: &Path) -> TessellaResult<TessellaConfig> {
    let default_sqlite = base.join(DEFAULT_DB_NAME);
    TessellaConfig::load_or_init(base, &default_sqlite)
}

/// Open the store rooted at `base`, writing a default sqlite config there on
/// first use.
pub async fn open_store(base: &Path) -> TessellaResult<TessellaStore> {
    let config = load_or_init_config(base)?;
    TessellaStore::connect(&config, base).await
}

pub fn default_sqlite_path(base: &Path) -> PathBuf {
    base.join(DEFAULT_DB_NAME)
}

#[cfg(test)]
mod tests {
    use super::{default_sqlite_path, load_or_init_config, open_store};
    use tempfile::tempdir;

    #[tokio::test]
    async fn opens_store_with_default_config() {
        let dir = tempdir().expect("tempdir");
        let base = dir.path();
        let config = load_or_init_config(base).expect("config");
        assert_eq!(config.backend_name(), "sqlite");
        let store = open_store(base).await.expect("open store");
        assert!(default_sqlite_path(base).exists());
        let _ = store;

        // A second load reads the persisted file instead of rewriting it.
        let reloaded = load_or_init_config(base).expect("reload config");
        assert_eq!(reloaded.backend_name(), "sqlite");
    }
}
