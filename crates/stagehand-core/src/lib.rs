//! Core configuration types shared by the stagehand crates.

pub mod config;
pub mod settings;
