use std::env::{self, VarError};
use std::net::SocketAddr;

use crate::error::{config_error, Error};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let database_url = lookup("DATABASE_URL")?;

        let max_connections = match optional(&lookup, "DATABASE_MAX_CONNECTIONS")? {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|count| *count > 0)
                .ok_or_else(|| config_error("DATABASE_MAX_CONNECTIONS"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let bind_addr = optional(&lookup, "BIND_ADDR")?
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| config_error("BIND_ADDR"))?;

        Ok(Self {
            database_url,
            max_connections,
            bind_addr,
        })
    }
}

fn optional<F>(lookup: &F, key: &str) -> Result<Option<String>, Error>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    match lookup(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
