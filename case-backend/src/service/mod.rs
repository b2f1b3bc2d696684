// src/service/mod.rs
pub mod audit_log_service;
pub mod authorization_service;
pub mod bootstrap_service;
pub mod organisation_service;
