// src/api/handlers/mod.rs
pub mod organisation_handler;
pub mod system_handler;
