// src/repository/mod.rs
pub mod audit_log_repository;
pub mod organisation_membership_repository;
pub mod organisation_repository;
