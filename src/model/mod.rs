pub mod config;
pub mod map;
pub mod node;

pub use config::*;
pub use map::*;
pub use node::*;
