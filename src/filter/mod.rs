pub mod agenda;
pub mod error;
pub mod filter;
pub mod filter_order;
pub mod group;
mod listable;
pub mod types;

pub use agenda::{agenda, upcoming_tasks, AgendaItem, AgendaKind};
pub use error::FilterError;
pub use filter::Filter;
pub use filter_order::FilterOrder;
pub use group::{group_by, humanize, Group};
pub use types::*;
