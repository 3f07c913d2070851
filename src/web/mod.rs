//! Web front end for the proxy.

pub mod api;
pub mod models;
