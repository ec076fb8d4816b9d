pub mod client;
pub mod dhcp;
pub mod models;
pub mod wifi;

pub use client::RouterOsClient;
