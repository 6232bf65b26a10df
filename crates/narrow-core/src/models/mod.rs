pub mod id_info;
pub mod message;
pub mod narrow;
pub mod term;
pub mod unread;

pub use id_info::{FetchAnchor, IdInfo};
pub use message::{Message, MessageFlags, MessageId, Recipient, UserId};
pub use narrow::{Narrow, NarrowError};
pub use term::{HasOperand, InOperand, IsOperand, Term, TermKind};
pub use unread::UnreadInfo;
