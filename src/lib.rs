// Allow some clippy lints project-wide for code style consistency
#![allow(clippy::uninlined_format_args)]

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod instance;
pub mod output;
pub mod scan;
