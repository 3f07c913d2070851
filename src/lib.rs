// src/lib.rs - prusa-proxy library surface
pub mod config;
pub mod error;
pub mod ops;
pub mod printer;
pub mod web;
