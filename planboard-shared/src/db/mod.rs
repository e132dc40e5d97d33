/// Database access layer
///
/// - `pool`: PostgreSQL connection pool management
/// - `migrations`: embedded schema migrations

pub mod migrations;
pub mod pool;

pub use migrations::run_migrations;
pub use pool::{create_pool, health_check, DatabaseConfig};
