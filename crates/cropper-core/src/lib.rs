pub mod compose;
pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod package;
pub mod session;
pub mod source;
pub mod transform;
