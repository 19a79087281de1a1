pub mod analyzers;
pub mod commands;
pub mod config;
pub mod output;
pub mod parser;
pub mod record;
