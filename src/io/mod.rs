pub mod config_io;
pub mod map_io;
pub mod state;
pub mod store;
