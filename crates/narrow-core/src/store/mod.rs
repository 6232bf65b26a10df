pub mod filtered_list;
pub mod message_store;
pub mod unread_store;

pub use filtered_list::FilteredMessageList;
pub use message_store::{MessageStore, SupersetCache};
pub use unread_store::{UnreadOracle, UnreadStore};
