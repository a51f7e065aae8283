mod core;
mod models;
mod session;

pub use self::core::{Chat, ChatBuilder};
pub use self::models::{Message, Role, Thread};
pub use self::session::Session;
