// src/api/dto/mod.rs
pub mod organisation_dto;
