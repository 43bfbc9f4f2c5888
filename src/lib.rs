pub mod codec;
pub mod common;
pub mod config;
pub mod network;
pub mod ui;
