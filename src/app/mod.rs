pub mod cli;
pub mod config;
pub mod controller;
pub mod dialog;
pub mod export;
pub mod keys;
pub mod lock;
pub mod navigation;
pub mod state;

pub use controller::{Controller, Screen};
pub use state::*;
