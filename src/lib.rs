pub mod api;
pub mod app;
pub mod catalog;
pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod pages;
pub mod session;
pub mod storage;
pub mod theme;
pub mod workflow;

pub use error::{ClientError, ClientResult};
