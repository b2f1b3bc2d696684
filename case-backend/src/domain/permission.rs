// src/domain/permission.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 組織内でユーザーに付与される権限フラグ
///
/// 文字列表現（`manageOrganisation` など）は serde の定義に従う。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    ManageOrganisation,
    ManageUser,
    ManageCase,
    ManageAlert,
    ManageObservable,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Permission::ManageOrganisation,
        Permission::ManageUser,
        Permission::ManageCase,
        Permission::ManageAlert,
        Permission::ManageObservable,
    ];
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(name)) => f.write_str(&name),
            _ => Err(fmt::Error),
        }
    }
}
