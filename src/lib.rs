//! ENS Relay Server Library
//!
//! This module exposes the server components for testing purposes.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod salesforce;
pub mod store;
pub mod webhook;
