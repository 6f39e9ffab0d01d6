pub mod auth;
pub mod client;

pub use auth::{Credential, TokenCache};
pub use client::{RecordSink, SalesforceSink};
