pub mod config;
pub mod export;
pub mod installs;
pub mod parse;
pub mod tokens;
