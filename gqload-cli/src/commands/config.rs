use anyhow::{Context, Result};
use gqload_config::{ConfigLoader, GqloadConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Load configuration from a file, or from defaults plus environment
pub fn load_config(config_path: Option<&PathBuf>) -> Result<GqloadConfig> {
    let loader = ConfigLoader::new();
    match config_path {
        Some(path) => loader
            .from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path)),
        None => loader
            .from_env()
            .context("Failed to load configuration from environment"),
    }
}

/// Handle configuration validation
pub fn handle_config_validate(config_file: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow::anyhow!("Configuration file not found: {:?}", config_file));
    }

    match load_config(Some(&config_file.to_path_buf())) {
        Ok(config) => {
            println!("✅ Configuration file is valid");
            println!(
                "   target {} | scenario {} | {} token(s) | {} collection(s) | {} product(s)",
                config.target.url,
                config.load.scenario,
                config.credentials.tokens.len(),
                config.pools.collection_ids.len(),
                config.pools.product_ids.len()
            );
            info!("Configuration validation passed");
            Ok(())
        }
        Err(e) => {
            println!("❌ Configuration validation failed: {:#}", e);
            error!("Configuration validation failed: {:#}", e);
            Err(e)
        }
    }
}

/// Handle configuration generation
pub fn handle_config_generate(output: &Path, force: bool) -> Result<()> {
    info!("Generating sample configuration at: {:?}", output);

    if output.exists() && !force {
        return Err(anyhow::anyhow!(
            "Output file already exists: {:?}. Use --force to overwrite.",
            output
        ));
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    fs::write(output, GqloadConfig::generate_sample()).context("Failed to write configuration file")?;

    println!("✅ Sample configuration generated at: {:?}", output);
    println!("📝 Add your tokens and id pools, then point target.url at the shop API");
    println!("🔧 Validate with: gqload config validate --config-file {:?}", output);

    Ok(())
}

/// Handle configuration display
pub fn handle_config_show(config_file: Option<&PathBuf>, format: &str) -> Result<()> {
    info!("Showing configuration (format: {})", format);

    let config = load_config(config_file)?;
    println!("{}", render_config(&config, format)?);
    Ok(())
}

fn render_config(config: &GqloadConfig, format: &str) -> Result<String> {
    let mut value = serde_json::to_value(config).context("Failed to serialize config")?;

    // Tokens are credentials; show how many there are, not what they are
    if let Some(tokens) = value
        .pointer_mut("/credentials/tokens")
        .and_then(|t| t.as_array_mut())
    {
        for token in tokens.iter_mut() {
            *token = serde_json::Value::String("***".to_string());
        }
    }

    match format.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::to_string(&value).context("Failed to serialize to YAML"),
        "json" => serde_json::to_string_pretty(&value).context("Failed to serialize to JSON"),
        _ => Err(anyhow::anyhow!(
            "Unknown output format: {}. Valid formats: yaml, json",
            format
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_then_validate() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("nested").join("gqload.yaml");

        handle_config_generate(&output, false).unwrap();
        assert!(output.exists());
        assert!(handle_config_generate(&output, false).is_err());
        handle_config_generate(&output, true).unwrap();

        handle_config_validate(&output).unwrap();
    }

    #[test]
    fn test_validate_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(handle_config_validate(&dir.path().join("absent.yaml")).is_err());
    }

    #[test]
    fn test_render_masks_tokens() {
        let mut config = GqloadConfig::default();
        config.credentials.tokens = vec!["secret-token".to_string()];

        let yaml = render_config(&config, "yaml").unwrap();
        assert!(!yaml.contains("secret-token"));
        assert!(yaml.contains("***"));

        let json = render_config(&config, "json").unwrap();
        assert!(!json.contains("secret-token"));

        assert!(render_config(&config, "toml").is_err());
    }
}
