pub mod local;

pub use local::{LocalEntityStore, LocalStore, LocalStoreError};
