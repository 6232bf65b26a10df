pub mod config;
pub mod constants;
pub mod models;
pub mod reconcile;
pub mod store;

pub use config::CoreConfig;
pub use models::{IdInfo, Message, MessageId, Narrow, NarrowError, UnreadInfo};
pub use reconcile::{reconcile, resolve_target_id};
pub use store::{FilteredMessageList, MessageStore, SupersetCache, UnreadOracle, UnreadStore};
