// src/domain/id_or_name.rs

use std::fmt;
use uuid::Uuid;

/// パスパラメータで受け取る組織の参照（UUID もしくは名前）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOrName {
    Id(Uuid),
    Name(String),
}

impl IdOrName {
    pub fn parse(value: &str) -> Self {
        match Uuid::parse_str(value) {
            Ok(id) => IdOrName::Id(id),
            Err(_) => IdOrName::Name(value.to_string()),
        }
    }
}

impl From<&str> for IdOrName {
    fn from(value: &str) -> Self {
        IdOrName::parse(value)
    }
}

impl From<String> for IdOrName {
    fn from(value: String) -> Self {
        match Uuid::parse_str(&value) {
            Ok(id) => IdOrName::Id(id),
            Err(_) => IdOrName::Name(value),
        }
    }
}

impl From<Uuid> for IdOrName {
    fn from(id: Uuid) -> Self {
        IdOrName::Id(id)
    }
}

impl fmt::Display for IdOrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdOrName::Id(id) => write!(f, "{}", id),
            IdOrName::Name(name) => f.write_str(name),
        }
    }
}
