//! Application services layer.

pub mod blogs;
pub mod error;
pub mod repos;
