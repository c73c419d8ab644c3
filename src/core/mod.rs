// src/core/mod.rs
//! HTTP access to the EmpleosNG API and request bookkeeping

pub mod api_client;
pub mod in_flight;

pub use api_client::ApiClient;
pub use in_flight::{InFlight, InFlightTicket, Operation, OperationKey};
