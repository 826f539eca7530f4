pub mod error;
pub mod message;
pub mod traits;
pub mod types;

pub use error::ScribeError;
pub use message::ChatMessage;
pub use traits::{Channel, ChatClient};
pub use types::{is_snowflake, ChannelKind, Principal, Recipient, UserRef};
