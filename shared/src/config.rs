use std::{env, time::Duration};

use anyhow::Context;
use strum::EnumString;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub storage: StorageBackend,
    pub booking: BookingConfig,
    pub payment: PaymentConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new() -> anyhow::Result<Self> {
        let storage: StorageBackend = env_or("STORAGE_BACKEND", "postgres")
            .parse()
            .context("STORAGE_BACKEND must be `postgres` or `memory`")?;

        // インメモリ運用時は DB の設定を要求しない
        let database = match storage {
            StorageBackend::Postgres => DatabaseConfig {
                host: env::var("DATABASE_HOST")?,
                port: env::var("DATABASE_PORT")?.parse::<u16>()?,
                username: env::var("DATABASE_USERNAME")?,
                password: env::var("DATABASE_PASSWORD")?,
                database: env::var("DATABASE_NAME")?,
            },
            StorageBackend::Memory => DatabaseConfig::default(),
        };

        let booking = BookingConfig {
            lead_time_hours: env_or("BOOKING_LEAD_TIME_HOURS", "3")
                .parse::<i64>()
                .context("BOOKING_LEAD_TIME_HOURS must be an integer")?,
        };

        let payment = PaymentConfig {
            endpoint: env_or("PAYMENT_GATEWAY_URL", "http://localhost:9090"),
            api_key: env::var("PAYMENT_GATEWAY_API_KEY").ok(),
            timeout: Duration::from_millis(
                env_or("PAYMENT_TIMEOUT_MS", "5000")
                    .parse::<u64>()
                    .context("PAYMENT_TIMEOUT_MS must be an integer")?,
            ),
        };

        let server = ServerConfig {
            port: env_or("PORT", "8080").parse::<u16>()?,
        };

        Ok(Self {
            database,
            storage,
            booking,
            payment,
            server,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone, Copy)]
pub struct BookingConfig {
    pub lead_time_hours: i64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self { lead_time_hours: 3 }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9090".into(),
            api_key: None,
            timeout: Duration::from_secs(5),
        }
    }
}

pub struct ServerConfig {
    pub port: u16,
}
