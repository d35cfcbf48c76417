pub mod broadcast;
pub mod config;
pub mod serve;
