// src/extractors/mod.rs
pub mod json;
pub mod path;

pub use json::ValidatedJson;
pub use path::{LinkPath, OrganisationPath};
