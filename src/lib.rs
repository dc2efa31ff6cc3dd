pub mod bot;
pub mod commands;
pub mod config;
pub mod error;
pub mod poll;

pub use bot::run;
