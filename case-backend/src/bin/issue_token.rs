use case_backend::domain::user_claims::UserClaims;
use case_backend::utils::jwt::{JwtConfig, JwtManager};
use std::env;
use uuid::Uuid;

/// 運用者向けのアクセストークン発行ツール
///
/// 使い方: issue-token <login> [user_id]
fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    let Some(login) = args.get(1).map(|s| s.trim().to_string()) else {
        eprintln!("Usage: issue-token <login> [user_id]");
        std::process::exit(1);
    };

    // ログイン名が空でないかチェック
    if login.is_empty() {
        eprintln!("Error: Login cannot be empty");
        std::process::exit(1);
    }

    let user_id = match args.get(2) {
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(id) => id,
            Err(_) => {
                eprintln!("Error: user_id must be a UUID");
                std::process::exit(1);
            }
        },
        None => Uuid::new_v4(),
    };

    let manager = match JwtConfig::from_env().and_then(JwtManager::new) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match manager.generate_access_token(UserClaims { user_id, login: login.clone() }) {
        Ok(token) => {
            println!("\n=== Access Token Issued ===");
            println!("Login: {}", login);
            println!("User ID: {}", user_id);
            println!("Token: {}", token);
            if let Ok(claims) = manager.verify_access_token(&token) {
                println!("Expires at: {}", manager.get_access_token_expires_at(&claims));
            }
            println!("\nTo grant administration rights at startup:");
            println!("INITIAL_ADMIN_USER_ID={}", user_id);
        }
        Err(e) => {
            eprintln!("Error issuing token: {}", e);
            std::process::exit(1);
        }
    }
}
