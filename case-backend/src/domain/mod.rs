// src/domain/mod.rs
pub mod audit_log_model;
pub mod id_or_name;
pub mod organisation_link_model;
pub mod organisation_membership_model;
pub mod organisation_model;
pub mod permission;
pub mod property_update;
pub mod user_claims;
