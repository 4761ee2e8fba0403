use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expires_in_hours: i64,
    pub password_hash_iterations: u32,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    pub lead_rate_limit_max: u32,
    pub lead_rate_limit_window_secs: u64,
    pub trust_proxy: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = parse_var("PORT", 8080)?;
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let jwt_expires_in_hours = parse_var("JWT_EXPIRES_IN_HOURS", 24)?;
        let password_hash_iterations = parse_var("PASSWORD_HASH_ITERATIONS", 3)?;
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let lead_rate_limit_max = parse_var("LEAD_RATE_LIMIT_MAX", 5)?;
        let lead_rate_limit_window_secs = parse_var("LEAD_RATE_LIMIT_WINDOW_SECS", 60)?;
        let trust_proxy = parse_var("TRUST_PROXY", false)?;

        if jwt_expires_in_hours <= 0 {
            anyhow::bail!("JWT_EXPIRES_IN_HOURS must be positive");
        }
        if password_hash_iterations == 0 {
            anyhow::bail!("PASSWORD_HASH_ITERATIONS must be at least 1");
        }

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            jwt_expires_in_hours,
            password_hash_iterations,
            cors_origins,
            lead_rate_limit_max,
            lead_rate_limit_window_secs,
            trust_proxy,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {}: {}", name, e)),
        _ => Ok(default),
    }
}
