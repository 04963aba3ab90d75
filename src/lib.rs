pub mod bootstrap;
pub mod config;
mod db;
mod error;
pub mod ids;
pub mod loader;
pub mod migration;
pub mod schema;
pub mod store;
pub mod time;
pub mod value;

pub use bootstrap::{default_sqlite_path, load_or_init_config, open_store};
pub use config::{DatabaseConfig, PoolConfig, TessellaConfig};
pub use error::{TessellaError, TessellaResult};
pub use ids::*;
pub use loader::{BulkWriteContext, ImportNotes, LoadReport, WriteOptions, WriteOutcome};
pub use schema::*;
pub use store::TessellaStore;
pub use time::*;
pub use value::*;
