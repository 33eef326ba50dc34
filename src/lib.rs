pub mod algorithm;
pub mod common;
pub mod config;
pub mod error;
pub mod frontier;
pub mod map;
pub mod render;
pub mod scenario;
pub mod solver;
pub mod stat;
pub mod state;
