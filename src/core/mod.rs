// src/core/mod.rs

pub mod action;
pub mod argument;
pub mod command;
pub mod config_loader;
pub mod dispatch;
pub mod error;
pub mod option;
pub mod params;
pub mod tokenizer;
pub mod types;
