//! Common functionality for migration-map.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod city;
pub mod classify;
pub mod cli;
pub mod controller;
pub mod flow;
pub mod geometry;
pub mod id;
pub mod input;
pub mod log;
pub mod model;
pub mod output;
pub mod projection;
pub mod scene;
pub mod settings;
pub mod year;

#[cfg(test)]
mod fixture;

/// Get the config folder for the program.
///
/// Falls back on the current working directory if the platform has no config folder.
pub fn get_migration_map_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        return PathBuf::from(".");
    };
    config_dir.push("migration-map");

    config_dir
}
