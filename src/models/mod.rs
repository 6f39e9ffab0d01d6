pub mod event;

pub use event::{EventStatus, StoredEvent};
