pub mod manager;
pub mod memory;
pub mod pg_access;
pub mod pg_rpc;
pub mod pg_store;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use pg_access::PgPermissionStore;
pub use pg_rpc::PgAnalytics;
pub use pg_store::PgEntityStore;
pub use store::{EntityStore, StoreError, ValidatedStore};
