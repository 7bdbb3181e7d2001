use std::time::Duration;

use crate::error::{AppError, AppResult, ConfigError};
use crate::http::ClientSettings;
use crate::import::ImportPolicy;

use super::types::{ConfigFile, DurationValue};

/// Values given on the command line. Set options win over the config file;
/// boolean flags can only switch a feature on.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub insecure: bool,
    pub user_agent: Option<String>,
    pub pretty: bool,
    pub hex: bool,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientSettings,
    pub import: ImportPolicy,
    pub pretty: bool,
    pub hex: bool,
}

/// Merges built-in defaults, the config file and CLI overrides.
///
/// # Errors
///
/// Returns an error when a config duration is malformed.
pub fn resolve_settings(config: Option<&ConfigFile>, cli: &CliOverrides) -> AppResult<Settings> {
    let empty = ConfigFile::default();
    let config = config.unwrap_or(&empty);
    let mut client = ClientSettings::default();
    let mut import = ImportPolicy::default();

    if let Some(timeout) = cli.timeout {
        client.timeout = timeout;
    } else if let Some(timeout) = config.timeout.as_ref() {
        client.timeout = config_duration("timeout", timeout)?;
    }
    if let Some(connect_timeout) = cli.connect_timeout {
        client.connect_timeout = connect_timeout;
    } else if let Some(connect_timeout) = config.connect_timeout.as_ref() {
        client.connect_timeout = config_duration("connect_timeout", connect_timeout)?;
    }
    if let Some(redirect) = config.redirect {
        client.redirect_limit = redirect;
    }
    client.insecure = cli.insecure || config.insecure.unwrap_or(false);
    if let Some(user_agent) = cli.user_agent.clone().or_else(|| config.user_agent.clone()) {
        client.user_agent = (!user_agent.trim().is_empty()).then_some(user_agent);
    }

    if let Some(extensions) = config.unsupported_extensions.as_ref() {
        import.unsupported_extensions = extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
    }
    if let Some(max_bytes) = config.max_import_bytes {
        import.max_bytes = max_bytes;
    }

    Ok(Settings {
        client,
        import,
        pretty: cli.pretty || config.pretty.unwrap_or(false),
        hex: cli.hex || config.hex.unwrap_or(false),
    })
}

fn config_duration(field: &'static str, value: &DurationValue) -> AppResult<Duration> {
    value
        .to_duration()
        .map_err(|message| AppError::config(ConfigError::InvalidValue { field, message }))
}
