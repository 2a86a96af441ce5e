use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};
use crate::manifest::ManifestConfig;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    /// Largest request body accepted by the upload routes.
    pub max_upload_bytes: usize,
    /// Answer CORS preflights for any origin.
    pub permissive_cors: bool,
    /// Served at `/.well-known/farcaster.json`.
    pub manifest: ManifestConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_upload_bytes: 10 * 1024 * 1024,
            permissive_cors: true,
            manifest: ManifestConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn from_toml(text: &str) -> GatewayResult<Self> {
        toml::from_str(text).map_err(|e| GatewayError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> GatewayResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = GatewayConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.max_upload_bytes, 10 * 1024 * 1024);
        assert!(c.permissive_cors);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: GatewayConfig = serde_json::from_str(r#"{"bind_addr": "0.0.0.0:8080"}"#).unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.max_upload_bytes, GatewayConfig::default().max_upload_bytes);
    }

    #[test]
    fn manifest_from_toml() {
        let c = GatewayConfig::from_toml(
            r#"
bind_addr = "0.0.0.0:8080"

[manifest]
name = "Folio"
home_url = "https://folio.example"
tags = ["books", "reviews"]
"#,
        )
        .unwrap();
        assert_eq!(c.manifest.name.as_deref(), Some("Folio"));
        assert_eq!(c.manifest.tags.len(), 2);
        assert!(c.manifest.header.is_none());
        assert!(c.permissive_cors);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        assert!(matches!(
            GatewayConfig::from_toml("max_upload_bytes = \"lots\""),
            Err(GatewayError::Config(_))
        ));
    }
}
