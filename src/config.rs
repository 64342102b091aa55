use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub cookie_secure: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            access_token_secret: env::var("ACCESS_TOKEN_SECRET").expect("ACCESS_TOKEN_SECRET must be set"),
            refresh_token_secret: env::var("REFRESH_TOKEN_SECRET").expect("REFRESH_TOKEN_SECRET must be set"),
            cookie_secure: env::var("COOKIE_SECURE").map(|v| v == "true" || v == "1").unwrap_or(false),
        }
    }
}
