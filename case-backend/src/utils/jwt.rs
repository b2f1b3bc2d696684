// src/utils/jwt.rs

use crate::domain::user_claims::UserClaims;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use uuid::Uuid;

/// JWT関連のエラー
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to decode JWT: {0}")]
    DecodingError(String),

    #[error("JWT token has expired")]
    TokenExpired,

    #[error("Invalid JWT token")]
    InvalidToken,

    #[error("Missing JWT secret key")]
    MissingSecretKey,

    #[error("Invalid JWT configuration: {0}")]
    ConfigurationError(String),
}

/// アクセストークンのClaims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
    /// Not before
    pub nbf: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// JWT ID
    pub jti: String,
    /// Token type
    pub typ: String,
    /// User information
    pub user: UserClaims,
}

/// JWT設定
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT秘密鍵
    pub secret_key: String,
    /// アクセストークンの有効期限（分）
    pub access_token_expiry_minutes: i64,
    /// 発行者
    pub issuer: String,
    /// 対象者
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            access_token_expiry_minutes: 15,
            issuer: "case-backend".to_string(),
            audience: "case-backend-users".to_string(),
        }
    }
}

impl JwtConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Result<Self, JwtError> {
        let secret_key = env::var("JWT_SECRET_KEY").map_err(|_| JwtError::MissingSecretKey)?;

        let access_token_expiry_minutes = env::var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|_| JwtError::ConfigurationError("Invalid access token expiry".to_string()))?;

        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "case-backend".to_string());

        let audience =
            env::var("JWT_AUDIENCE").unwrap_or_else(|_| "case-backend-users".to_string());

        Ok(Self {
            secret_key,
            access_token_expiry_minutes,
            issuer,
            audience,
        })
    }

    /// 秘密鍵の検証
    pub fn validate(&self) -> Result<(), JwtError> {
        if self.secret_key.len() < 32 {
            return Err(JwtError::ConfigurationError(
                "JWT secret key must be at least 32 characters".to_string(),
            ));
        }

        if self.access_token_expiry_minutes <= 0 {
            return Err(JwtError::ConfigurationError(
                "Access token expiry must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// JWTトークン管理
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtManager {
    /// 新しいJwtManagerを作成
    pub fn new(config: JwtConfig) -> Result<Self, JwtError> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// アクセストークンを生成
    pub fn generate_access_token(&self, user: UserClaims) -> Result<String, JwtError> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.config.access_token_expiry_minutes);

        let claims = AccessTokenClaims {
            sub: user.user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
            typ: "access".to_string(),
            user,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(JwtError::EncodingError)
    }

    /// アクセストークンを検証・デコード
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            _ => JwtError::DecodingError(e.to_string()),
        })?;

        // トークンタイプの検証
        if token_data.claims.typ != "access" {
            return Err(JwtError::InvalidToken);
        }

        Ok(token_data.claims)
    }

    /// アクセストークンの有効期限をISO 8601形式で取得
    pub fn get_access_token_expires_at(&self, claims: &AccessTokenClaims) -> String {
        DateTime::from_timestamp(claims.exp, 0)
            .unwrap_or_else(Utc::now)
            .to_rfc3339()
    }
}
