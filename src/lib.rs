pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod image_validator;
pub mod navigation;
pub mod router;
pub mod session;
pub mod token;
pub mod types;
pub mod utils;
pub mod views;

#[cfg(test)]
mod test_support;

pub use error::ClientError;
pub use session::Session;
pub use views::AppContext;
