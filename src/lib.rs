pub mod auth;
pub mod cache;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod services;

pub use db::create_pool;
pub use error::ApiError;
