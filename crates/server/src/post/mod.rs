pub mod db;
pub mod models;
pub mod mutations;
pub mod queries;

pub use models::{PostInput, PostPatch, PostRecord};
