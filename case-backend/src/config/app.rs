use crate::utils::jwt::JwtConfig;
use dotenvy::dotenv;
use std::env;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub database_url: String,
    pub jwt: JwtConfig,
    /// 起動時に管理組織へ全権限で登録するユーザー
    pub initial_admin_user_id: Option<Uuid>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let initial_admin_user_id = match env::var("INITIAL_ADMIN_USER_ID") {
            Ok(value) if !value.trim().is_empty() => Some(
                Uuid::parse_str(value.trim())
                    .map_err(|_| "INITIAL_ADMIN_USER_ID must be a UUID".to_string())?,
            ),
            _ => None,
        };

        Ok(Self {
            environment,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| "Invalid PORT value")?,
            cors_allowed_origins: parse_origins(
                &env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            ),
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            jwt: JwtConfig::from_env().map_err(|e| e.to_string())?,
            initial_admin_user_id,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// テスト用の設定を作成
    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_allowed_origins: vec!["http://localhost:3001".to_string()],
            database_url: "sqlite::memory:".to_string(),
            jwt: JwtConfig {
                secret_key: "test-secret-key-that-is-at-least-32-characters-long".to_string(),
                ..JwtConfig::default()
            },
            initial_admin_user_id: None,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Backward compatibility
pub type Config = AppConfig;
