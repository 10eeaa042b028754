pub mod config;
pub mod conflate;
pub mod output;
