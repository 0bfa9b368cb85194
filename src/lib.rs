pub mod cli;
pub mod error;
pub mod exec;
pub mod git;
pub mod grid;
pub mod model;
pub mod output;
pub mod render;
pub mod stage;
