pub mod actions;
pub mod clipboard;
pub mod history;
pub mod layout;
pub mod tree;
