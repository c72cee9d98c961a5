//! Loading field values from JSON or TOML files and `name=value` arguments.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use shared::domain::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Toml,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            _ => bail!(
                "cannot infer input format of '{}'; use a .json or .toml file",
                path.display()
            ),
        }
    }
}

pub fn load_values(path: &Path) -> Result<Vec<(Field, String)>> {
    let format = InputFormat::from_path(path)?;
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read input file '{}'", path.display()))?;
    parse_values(&raw, format).with_context(|| format!("invalid input file '{}'", path.display()))
}

/// Flat table of field name to number or string. Strings are kept verbatim.
pub fn parse_values(raw: &str, format: InputFormat) -> Result<Vec<(Field, String)>> {
    let mut values = Vec::new();
    match format {
        InputFormat::Json => {
            let table: serde_json::Map<String, serde_json::Value> =
                serde_json::from_str(raw).context("expected a JSON object")?;
            for (name, value) in table {
                let raw_value = match value {
                    serde_json::Value::String(text) => text,
                    serde_json::Value::Number(number) => number.to_string(),
                    serde_json::Value::Null => String::new(),
                    other => bail!("value for '{name}' must be a number or string, got {other}"),
                };
                values.push((name.parse::<Field>()?, raw_value));
            }
        }
        InputFormat::Toml => {
            let table: toml::Table = raw.parse().context("expected a TOML table")?;
            for (name, value) in table {
                let raw_value = match value {
                    toml::Value::String(text) => text,
                    toml::Value::Integer(number) => number.to_string(),
                    toml::Value::Float(number) => number.to_string(),
                    other => bail!(
                        "value for '{name}' must be a number or string, got {}",
                        other.type_str()
                    ),
                };
                values.push((name.parse::<Field>()?, raw_value));
            }
        }
    }
    Ok(values)
}

/// `radius_mean=17.99` -> (RadiusMean, "17.99"). The value may be empty.
pub fn parse_assignment(arg: &str) -> Result<(Field, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected <field>=<value>, got '{arg}'"))?;
    let field = name.trim().parse::<Field>().map_err(|err| err.to_string())?;
    Ok((field, value.to_string()))
}
