//! HTTP inbound adapter serving the HTML user workflows.

pub mod error;
pub mod health;
pub mod pages;
pub mod state;
pub mod users;

pub use error::ApiResult;
