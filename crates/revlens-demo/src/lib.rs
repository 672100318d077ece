pub mod cli;
pub mod config;
pub mod render;
pub mod state;

pub use cli::*;
pub use config::*;
pub use state::*;
