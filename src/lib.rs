pub mod board;
pub mod cli;
pub mod config;
pub mod github;
pub mod logging;
pub mod output;
pub mod render;
pub mod run;
