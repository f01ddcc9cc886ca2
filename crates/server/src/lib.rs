//! Startup organizer: tags, startups, news links and a blog, served as
//! HTML pages and a JSON API.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod newslink;
pub mod post;
pub mod relations;
pub mod startup;
pub mod supervisor;
pub mod tag;
pub mod validation;

pub mod test_helpers;
