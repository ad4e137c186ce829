use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Project configuration loaded from `.mcpgen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct McpgenConfig {
    pub input: String,
    /// Where `parse` writes the IR; stdout when unset.
    pub output: Option<String>,
    /// Treat integrity findings as errors.
    pub strict: bool,
    pub output_options: OutputOptions,
}

impl Default for McpgenConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: None,
            strict: true,
            output_options: OutputOptions::default(),
        }
    }
}

/// How the IR document is written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Indented JSON instead of a single line.
    pub pretty: bool,
    /// Include the `meta` provenance block.
    pub meta: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            meta: true,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".mcpgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<McpgenConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: McpgenConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# mcpgen configuration
input: openapi.yaml
# output: ir.json        # omit to write the IR to stdout
strict: true             # integrity findings fail the command

output_options:
  pretty: true           # indented JSON
  meta: true             # include irVersion / specDigest / generator
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = McpgenConfig::default();
        assert_eq!(config.input, "openapi.yaml");
        assert!(config.output.is_none());
        assert!(config.strict);
        assert!(config.output_options.pretty);
        assert!(config.output_options.meta);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: specs/petstore.yaml
output: build/ir.json
strict: false
output_options:
  pretty: false
  meta: false
"#;
        let config: McpgenConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "specs/petstore.yaml");
        assert_eq!(config.output.as_deref(), Some("build/ir.json"));
        assert!(!config.strict);
        assert!(!config.output_options.pretty);
        assert!(!config.output_options.meta);
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "input: api.yaml\n";
        let config: McpgenConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "api.yaml");
        // Defaults applied
        assert!(config.strict);
        assert!(config.output_options.pretty);
    }

    #[test]
    fn test_default_content_parses() {
        let config: McpgenConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.input, "openapi.yaml");
        assert!(config.output.is_none());
        assert!(config.strict);
    }

    #[test]
    fn test_load_missing_file() {
        let loaded = load_config(Path::new("/nonexistent/.mcpgen.yaml")).unwrap();
        assert!(loaded.is_none());
    }
}
