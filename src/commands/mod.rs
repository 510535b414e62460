//! CLI commands for tally

pub mod dispatch;
pub mod event;
pub mod format;
pub mod init;
pub mod report;
pub mod resolve;
pub mod results;
pub mod roster;
pub mod scoring;
