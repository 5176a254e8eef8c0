pub mod manager;
pub mod store;

pub use manager::SessionManager;
pub use store::{FileSessionStore, MemorySessionStore, Session, SessionStore};
