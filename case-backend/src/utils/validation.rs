use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;
use validator::ValidationError;

/// 組織名用正規表現（英数字で始まり、英数字・空白・`.` `_` `-` のみ）
pub static ORGANISATION_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} ._\-]*$").unwrap());

pub const ORGANISATION_NAME_MAX_LENGTH: usize = 64;

/// 組織名バリデーション
///
/// UUIDとして解釈できる名前は `IdOrName` の解決が曖昧になるため拒否する。
pub fn validate_organisation_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() > ORGANISATION_NAME_MAX_LENGTH || name.trim_end() != name {
        return Err(name_error(
            "Organisation name must be 1-64 characters without trailing spaces",
        ));
    }

    if !ORGANISATION_NAME_REGEX.is_match(name) {
        return Err(name_error(
            "Organisation name must start with a letter or digit and contain only letters, digits, spaces, '.', '_' or '-'",
        ));
    }

    if Uuid::parse_str(name).is_ok() {
        return Err(name_error("Organisation name cannot be a UUID"));
    }

    Ok(())
}

fn name_error(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("invalid_organisation_name");
    error.message = Some(message.into());
    error
}
