//! HTTP API handlers for housing-api

pub mod health;
pub mod predicted_data;
pub mod process;
pub mod raw_data;
pub mod upload;

pub use health::{health_routes, root};
pub use predicted_data::get_predicted_data;
pub use process::process_data;
pub use raw_data::{delete_raw_data, get_raw_data};
pub use upload::upload_data;
