pub use crate::error::{Error, Result};

pub mod blocks;
pub mod component;
pub mod config;
pub mod designator;
pub mod error;
pub mod graph;
pub mod heuristic;
pub mod repr;
pub mod units;

pub fn bus_bit(name: &str, index: usize) -> String {
    format!("{name}[{index}]")
}
