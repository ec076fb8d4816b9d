//! Command handlers: bridge CLI args -> config -> poller -> output.

pub mod clients;
pub mod config_cmd;
pub mod serve;
