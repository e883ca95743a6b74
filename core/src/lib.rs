//! Ticket desk core: CSV ingestion, validation, filtering and round-robin
//! assignment of customer service tickets.
//!
//! The five pipeline components (`csv_decoder`, `normalizer`, `validator`,
//! `filter`, `round_robin`) are pure functions over in-memory data. `store`
//! and `pipeline` put them behind a SQLite-backed operator console.

pub mod boundary;
pub mod config;
pub mod csv_decoder;
pub mod error;
pub mod event;
pub mod filter;
pub mod manager;
pub mod name_generator;
pub mod normalizer;
pub mod pipeline;
pub mod rng;
pub mod round_robin;
pub mod sample_data;
pub mod stats;
pub mod store;
pub mod ticket;
pub mod types;
pub mod validator;
