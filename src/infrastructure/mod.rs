pub mod asset_store;
pub mod config;
pub mod files;
pub mod logging;
