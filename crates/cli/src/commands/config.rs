use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use toml::Value;
use vquotes_core::config::{AppConfig, LoadOptions};

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let entries: Vec<(&str, String, Option<&str>)> = vec![
        ("database.url", config.database.url.clone(), Some("VQUOTES_DATABASE_URL")),
        (
            "database.max_connections",
            config.database.max_connections.to_string(),
            Some("VQUOTES_DATABASE_MAX_CONNECTIONS"),
        ),
        (
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            Some("VQUOTES_DATABASE_TIMEOUT_SECS"),
        ),
        ("server.bind_address", config.server.bind_address.clone(), Some("VQUOTES_SERVER_BIND_ADDRESS")),
        ("server.port", config.server.port.to_string(), Some("VQUOTES_SERVER_PORT")),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            Some("VQUOTES_SERVER_GRACEFUL_SHUTDOWN_SECS"),
        ),
        (
            "pricing.default_offer",
            config.pricing.default_offer.to_string(),
            Some("VQUOTES_PRICING_DEFAULT_OFFER"),
        ),
        ("logging.level", config.logging.level.clone(), Some("VQUOTES_LOGGING_LEVEL")),
        ("logging.format", format!("{:?}", config.logging.format).to_lowercase(), Some("VQUOTES_LOGGING_FORMAT")),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_var) in entries {
        let source =
            field_source(key, env_var, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(format!("  {key} = {value}  [{source}]"));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("vquotes.toml"), PathBuf::from("config/vquotes.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    toml::from_str::<Value>(&raw).ok()
}

fn field_source(
    key: &str,
    env_var: Option<&str>,
    file_doc: Option<&Value>,
    file_path: Option<&Path>,
) -> String {
    if let Some(var) = env_var {
        if env::var(var).map(|value| !value.trim().is_empty()).unwrap_or(false) {
            return format!("env:{var}");
        }
    }

    if let (Some(doc), Some(path)) = (file_doc, file_path) {
        if file_doc_has_key(doc, key) {
            return format!("file:{}", path.display());
        }
    }

    "default".to_string()
}

fn file_doc_has_key(doc: &Value, dotted_key: &str) -> bool {
    let mut current = doc;
    for part in dotted_key.split('.') {
        match current.get(part) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}
