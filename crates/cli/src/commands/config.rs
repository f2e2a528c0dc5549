use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use roomscout_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_key: Option<&str>| {
        field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "llm.provider",
        &format!("{:?}", config.llm.provider),
        source("llm.provider", Some("ROOMSCOUT_LLM_PROVIDER")),
    ));
    lines.push(render_line(
        "llm.model",
        &config.llm.model,
        source("llm.model", Some("ROOMSCOUT_LLM_MODEL")),
    ));
    lines.push(render_line(
        "llm.base_url",
        config.llm.base_url.as_deref().unwrap_or("<unset>"),
        source("llm.base_url", Some("ROOMSCOUT_LLM_BASE_URL")),
    ));

    let llm_api_key = if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" };
    lines.push(render_line(
        "llm.api_key",
        llm_api_key,
        source("llm.api_key", Some("ROOMSCOUT_LLM_API_KEY")),
    ));
    lines.push(render_line(
        "llm.timeout_secs",
        &config.llm.timeout_secs.to_string(),
        source("llm.timeout_secs", Some("ROOMSCOUT_LLM_TIMEOUT_SECS")),
    ));

    lines.push(render_line(
        "search.provider_timeout_secs",
        &config.search.provider_timeout_secs.to_string(),
        source("search.provider_timeout_secs", Some("ROOMSCOUT_SEARCH_PROVIDER_TIMEOUT_SECS")),
    ));
    lines.push(render_line(
        "search.simulate_latency",
        &config.search.simulate_latency.to_string(),
        source("search.simulate_latency", Some("ROOMSCOUT_SEARCH_SIMULATE_LATENCY")),
    ));

    lines.push(render_line(
        "catalog.dataset_path",
        &config.catalog.dataset_path.display().to_string(),
        source("catalog.dataset_path", Some("ROOMSCOUT_CATALOG_DATASET_PATH")),
    ));
    lines.push(render_line(
        "catalog.embeddings_path",
        &config.catalog.embeddings_path.display().to_string(),
        source("catalog.embeddings_path", Some("ROOMSCOUT_CATALOG_EMBEDDINGS_PATH")),
    ));

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", Some("ROOMSCOUT_SERVER_BIND_ADDRESS")),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", Some("ROOMSCOUT_SERVER_PORT")),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        source("server.graceful_shutdown_secs", Some("ROOMSCOUT_SERVER_GRACEFUL_SHUTDOWN_SECS")),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", Some("ROOMSCOUT_LOGGING_LEVEL")),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", Some("ROOMSCOUT_LOGGING_FORMAT")),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("roomscout.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/roomscout.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
