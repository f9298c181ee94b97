//! Per-format parsing into JSON values

use serde_json::Value;

/// Data formats understood by [`super::FileLoader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    /// YAML, also used for `.conf` since it accepts JSON bodies
    Yaml,
    Toml,
}

impl Format {
    /// Map a file extension (without dot) to a format
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yml" | "yaml" | "conf" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }

    /// Parse raw bytes; the error is a human-readable message
    pub fn parse(self, bytes: &[u8]) -> Result<Value, String> {
        match self {
            Format::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            Format::Yaml => {
                let mut yaml: serde_yaml::Value =
                    serde_yaml::from_slice(bytes).map_err(|e| e.to_string())?;
                // resolve `<<` merge keys before leaving YAML
                yaml.apply_merge().map_err(|e| e.to_string())?;
                serde_json::to_value(yaml).map_err(|e| e.to_string())
            }
            Format::Toml => {
                let contents =
                    std::str::from_utf8(bytes).map_err(|e| format!("Invalid UTF-8: {}", e))?;
                let value: toml::Value = toml::from_str(contents).map_err(|e| e.to_string())?;
                Ok(toml_to_json(value))
            }
        }
    }
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            Value::Object(table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect())
        }
    }
}
