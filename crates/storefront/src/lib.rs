//! PBS storefront library.
//!
//! Cart store, checkout flow, product catalog and the JSON API built on them.
//! The binary in `main.rs` only wires configuration, telemetry and the
//! listener around [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
