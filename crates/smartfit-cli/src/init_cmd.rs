use crate::config::{self, CliOverrides, ConfigFile, GeminiSection, StorageSection};

/// Execute the `smartfit init` command: write config file.
pub fn run_init(overrides: &CliOverrides, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = ConfigFile {
        gemini: GeminiSection {
            api_key: overrides.api_key.clone(),
            model: overrides.model.clone(),
        },
        storage: StorageSection {
            data_dir: overrides.data_dir.clone(),
        },
    };

    config::save_config_to(&cfg, &path)?;

    println!("Config written to {}", path.display());
    match &cfg.gemini.api_key {
        Some(key) => println!("  gemini.api_key = {}", mask(key)),
        None => println!("  gemini.api_key not set (GEMINI_API_KEY will be used)"),
    }
    if let Some(model) = &cfg.gemini.model {
        println!("  gemini.model = {model}");
    }
    if let Some(dir) = &cfg.storage.data_dir {
        println!("  storage.data_dir = {}", dir.display());
    }
    println!();
    println!("Next: run `smartfit` to build your first plan.");

    Ok(())
}

/// Show only the first and last four characters of a secret.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
