//! Tally Core Library
//!
//! Score ledger, lock coordination, aggregation and report layout for the
//! Tally live competition scoring tool.

pub mod aggregate;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod lock;
pub mod logging;
pub mod model;
pub mod records;
pub mod report;
pub mod store;
