pub mod callback;
pub mod dashboard;
pub mod events;
pub mod health;
