//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let mut config = store.load().await?;

    match key {
        "data_dir" => config.data_dir = Some(value.to_string()),
        "catalog_url" => config.catalog_url = Some(value.to_string()),
        "clip_min_secs" => config.clip_min_secs = Some(parse_secs(key, value)?),
        "clip_max_secs" => config.clip_max_secs = Some(parse_secs(key, value)?),
        _ => unreachable!(), // Already validated
    }

    // Reject a window that can never accept a clip
    if let (Some(min), Some(max)) = (config.clip_min_secs, config.clip_max_secs) {
        if min > max {
            return Err(ConfigError::ValidationError {
                key: key.to_string(),
                message: format!("clip_min_secs ({}) must not exceed clip_max_secs ({})", min, max),
            });
        }
    }

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;

    let value = match key {
        "data_dir" => config.data_dir,
        "catalog_url" => config.catalog_url,
        "clip_min_secs" => config.clip_min_secs.map(|v| v.to_string()),
        "clip_max_secs" => config.clip_max_secs.map(|v| v.to_string()),
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value(
        "data_dir",
        config.data_dir.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "catalog_url",
        config.catalog_url.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "clip_min_secs",
        &config
            .clip_min_secs
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "clip_max_secs",
        &config
            .clip_max_secs
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().display().to_string());
    Ok(())
}

fn parse_secs(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be a whole number of seconds".to_string(),
    })
}
