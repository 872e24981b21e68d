//! Data models

pub mod combined;
pub mod dataset;
pub mod history;
pub mod user;

pub use combined::*;
pub use dataset::*;
pub use history::*;
pub use user::*;
