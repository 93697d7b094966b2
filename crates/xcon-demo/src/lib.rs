#![forbid(unsafe_code)]

//! Terminal host for the xcon console.

pub mod cli;
pub mod commands;
pub mod event;
pub mod logging;
pub mod terminal;
