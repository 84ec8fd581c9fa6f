pub mod api;
pub mod book;
pub mod config;
pub mod error;
pub mod grasp;
pub mod lang;
pub mod problem;
pub mod render;
pub mod session;
pub mod store;
pub mod transport;

pub use error::{Error, Result};
