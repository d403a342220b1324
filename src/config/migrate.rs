//! Configuration file maintenance: detect and fill keys missing from older
//! config files without touching the values the user already set.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

fn defaults_mapping() -> AppResult<Mapping> {
    let value = serde_yaml::to_value(Config::default()).map_err(|e| AppError::Config(e.to_string()))?;
    match value {
        Value::Mapping(m) => Ok(m),
        _ => Err(AppError::Config("default config is not a mapping".into())),
    }
}

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path)?;
    match serde_yaml::from_str::<Value>(&content) {
        Ok(Value::Mapping(m)) => Ok(m),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(AppError::Config(format!(
            "{} does not contain a YAML mapping",
            path.display()
        ))),
        Err(e) => Err(AppError::Config(format!("failed to parse {}: {e}", path.display()))),
    }
}

/// Keys present in the default config but missing from the file.
pub fn missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let current = read_mapping(path)?;
    let defaults = defaults_mapping()?;

    Ok(defaults
        .keys()
        .filter(|k| !current.contains_key(*k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Add missing keys with their default values.
///   Returns:
///   Ok(n > 0) → config updated with n keys
///   Ok(0)     → no change needed
pub fn fill_missing_keys(path: &Path) -> AppResult<usize> {
    let mut current = read_mapping(path)?;
    let defaults = defaults_mapping()?;

    let mut added = 0;
    for (k, v) in defaults {
        if !current.contains_key(&k) {
            current.insert(k, v);
            added += 1;
        }
    }

    if added > 0 {
        let yaml = serde_yaml::to_string(&Value::Mapping(current))
            .map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(path, yaml)?;
    }

    Ok(added)
}
