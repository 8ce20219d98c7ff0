use super::GateConfig;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use std::path::Path;

// Embed the default config at compile time
pub const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "COMMIT_GATE_";

/// Resolve the configuration for a repository rooted at `workdir`
///
/// Priority, lowest first: embedded defaults, user config, repository config,
/// `custom_config`, `COMMIT_GATE_*` environment variables.
pub fn load(custom_config: Option<&str>, workdir: &Path) -> Result<GateConfig> {
    tracing::trace!("CONFIG LOAD: Starting in {}", workdir.display());

    let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));
    figment = merge_any_format(figment, &user_config_base_path());
    figment = merge_any_format(figment, &workdir.join("commit-gate").to_string_lossy());

    if let Some(path) = custom_config {
        if !Path::new(path).is_file() {
            anyhow::bail!("Config file not found: {path}");
        }
        tracing::trace!("CONFIG LOAD: Applying custom config {}", path);
        figment = merge_by_extension(figment, path);
    }

    // Environment variables always have highest priority
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: GateConfig = figment
        .extract()
        .context("Failed to parse configuration")?;
    config.pre_commit.validate().context("Invalid pre_commit configuration")?;
    config.pre_push.validate().context("Invalid pre_push configuration")?;
    Ok(config)
}

/// Merge `<base>.toml`, `<base>.json`, `<base>.yaml` and `<base>.yml` when present
fn merge_any_format(figment: Figment, base: &str) -> Figment {
    figment
        .merge(Toml::file(format!("{base}.toml")))
        .merge(Json::file(format!("{base}.json")))
        .merge(Yaml::file(format!("{base}.yaml")))
        .merge(Yaml::file(format!("{base}.yml")))
}

/// Pick the provider from the file extension, defaulting to TOML
fn merge_by_extension(figment: Figment, path: &str) -> Figment {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => figment.merge(Json::file(path)),
        "yaml" | "yml" => figment.merge(Yaml::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}

fn user_config_base_path() -> String {
    match std::env::var("HOME") {
        Ok(home) => format!("{home}/.config/commit-gate/config"),
        Err(_) => "~/.config/commit-gate/config".to_string(),
    }
}
