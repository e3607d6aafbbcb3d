//! Environment-driven settings.
//!
//! Every value has a default so the server starts with no environment at all.
//! Unparsable values are replaced by their default and their keys collected in
//! `ignored` so they can be logged once tracing is up.

use std::env;
use std::str::FromStr;

use tracing::Level;

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE_NAME: &str = "campaigns";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Storage {
    MongoDb,
    Memory,
}

impl FromStr for Storage {
    type Err = ();

    fn from_str(s: &str) -> Result<Storage, ()> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Storage::MongoDb),
            "memory" => Ok(Storage::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// `MONGODB_URI`
    pub mongodb_uri: String,
    /// `DATABASE_NAME`
    pub database_name: String,
    /// `BIND_ADDRESS`
    pub bind_address: String,
    /// `LOG_LEVEL`
    pub log_level: Level,
    /// `STORAGE`
    pub storage: Storage,
    /// `SEED_DATABASE`
    pub seed_database: bool,
    pub ignored: Vec<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            log_level: Level::INFO,
            storage: Storage::MongoDb,
            seed_database: false,
            ignored: vec![],
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let mut ignored = vec![];
        Config {
            mongodb_uri: lookup("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            database_name: lookup("DATABASE_NAME").unwrap_or(defaults.database_name),
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            log_level: parse_or(&lookup, &mut ignored, "LOG_LEVEL", defaults.log_level),
            storage: parse_or(&lookup, &mut ignored, "STORAGE", defaults.storage),
            seed_database: lookup("SEED_DATABASE")
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(defaults.seed_database),
            ignored,
        }
    }
}

fn parse_or<F, T>(lookup: &F, ignored: &mut Vec<String>, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value.parse().unwrap_or_else(|_| {
            ignored.push(key.to_string());
            default
        }),
        None => default,
    }
}
