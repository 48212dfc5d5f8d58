use crate::status::{AggregateOptions, DEFAULT_MAX_DEPTH, DEFAULT_OPERATION_MARKER};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_RELATIVE_PATH: &str = ".opsbook/config.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    pub version: u32,
    pub aggregate: Option<AggregateConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateConfig {
    pub operation_marker: Option<String>,
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawRepoConfig {
    version: Option<u32>,
    aggregate: Option<RawAggregateConfig>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawAggregateConfig {
    operation_marker: Option<String>,
    max_depth: Option<usize>,
}

pub fn repo_config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(CONFIG_RELATIVE_PATH)
}

pub fn load_repo_config(repo_root: &Path) -> Result<Option<RepoConfig>> {
    let path = repo_config_path(repo_root);
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("read repo config {}", path.display()))?;
    let parsed: RawRepoConfig =
        toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(validate_repo_config(parsed, &path)?))
}

fn validate_repo_config(raw: RawRepoConfig, path: &Path) -> Result<RepoConfig> {
    let version = raw
        .version
        .ok_or_else(|| anyhow::anyhow!("{} missing required `version`", path.display()))?;
    if version != 1 {
        bail!(
            "{} has unsupported version {version}; expected version = 1",
            path.display()
        );
    }

    let aggregate = raw
        .aggregate
        .map(|aggregate| {
            if let Some(max_depth) = aggregate.max_depth
                && max_depth == 0
            {
                bail!(
                    "{} has `[aggregate].max_depth = 0`; must be >= 1",
                    path.display()
                );
            }
            Ok(AggregateConfig {
                operation_marker: sanitize_optional(aggregate.operation_marker),
                max_depth: aggregate.max_depth,
            })
        })
        .transpose()?;

    Ok(RepoConfig { version, aggregate })
}

fn sanitize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Folds an optional repo config into concrete aggregation options,
/// falling back to the reference defaults key by key.
pub fn resolve_aggregate_options(config: Option<&RepoConfig>) -> AggregateOptions {
    let aggregate = config.and_then(|c| c.aggregate.as_ref());
    AggregateOptions {
        operation_marker: aggregate
            .and_then(|a| a.operation_marker.clone())
            .unwrap_or_else(|| DEFAULT_OPERATION_MARKER.to_string()),
        max_depth: aggregate
            .and_then(|a| a.max_depth)
            .unwrap_or(DEFAULT_MAX_DEPTH),
    }
}
