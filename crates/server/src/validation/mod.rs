pub mod fields;
pub mod slug;
pub mod uniqueness;
pub mod url;

pub use slug::{check_not_reserved, slugify, validate_slug};
pub use uniqueness::{GlobalEntity, SlugLookup, SlugScope, check_unique, unique_slug};
