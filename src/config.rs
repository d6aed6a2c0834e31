use std::net::{IpAddr, SocketAddr};

use league_app::{LeagueSettings, domain::fixture::PairingKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub db_path: String,
    pub host: IpAddr,
    pub port: u16,
    pub league_name: String,
    pub pairing: PairingKind,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &'static str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let invalid = |name: &'static str, value: String| ConfigError::Invalid { name, value };

        let host_value = get("LEAGUE_HTTP_HOST", "0.0.0.0");
        let host = host_value
            .parse()
            .map_err(|_| invalid("LEAGUE_HTTP_HOST", host_value.clone()))?;

        let port_value = get("PORT", "8000");
        let port = port_value
            .trim()
            .parse()
            .map_err(|_| invalid("PORT", port_value.clone()))?;

        let pairing_value = get("LEAGUE_PAIRING", "random");
        let pairing = PairingKind::parse(&pairing_value)
            .ok_or_else(|| invalid("LEAGUE_PAIRING", pairing_value.clone()))?;

        Ok(Self {
            db_path: get("LEAGUE_DB_PATH", "instance/league.db"),
            host,
            port,
            league_name: get("LEAGUE_NAME", "FC 26"),
            pairing,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn league_settings(&self) -> LeagueSettings {
        LeagueSettings {
            league_name: self.league_name.clone(),
            pairing: self.pairing,
        }
    }
}
