//! Command implementations for SeqFV CLI

pub mod config;
pub mod view;
