pub mod action;
pub mod binding;
pub mod config;
pub mod error;
pub mod markup;
pub mod overlay;
pub mod phase;
pub mod region;
pub mod state;
pub mod types;

pub use error::{CallsError, Result};
