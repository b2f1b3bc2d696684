// src/domain/user_claims.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWTに埋め込まれるユーザー情報
///
/// 所属組織と権限はトークンには含めず、リクエストごとにDBから読み込む。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    pub user_id: Uuid,
    pub login: String,
}
