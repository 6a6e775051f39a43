use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Local wall-clock hour (0-23) at which the daily reminder sweep fires.
    pub sweep_hour: u32,
    pub cors_allowed_origins: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let sweep_hour: u32 = env::var("SWEEP_HOUR")
            .unwrap_or_else(|_| "6".to_string())
            .parse()
            .context("SWEEP_HOUR must be a valid number")?;
        anyhow::ensure!(sweep_hour < 24, "SWEEP_HOUR must be between 0 and 23");

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            sweep_hour,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
        })
    }
}
