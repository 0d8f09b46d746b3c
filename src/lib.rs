//! A read-only blog feed: serves the posts of a static JSON catalogue that are due, newest first.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod util;
