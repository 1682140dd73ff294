//! HTTP request handlers.

mod health;
mod mirror;

pub use health::health_check;
pub use mirror::mirror_image;
