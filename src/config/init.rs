use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use atomic_write_file::AtomicWriteFile;

use super::Config;
use crate::scoring::ScreeningModel;

const HEADER: &str = "\
# fracture-screen model weights.
# These produce a relative screening index, not a validated 10-year probability.
# Adjust them for local validation studies; remove a key to fall back to the built-in value.
";

/// Write a config file spelling out every built-in weight.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let config = Config {
        model: Some(ScreeningModel::default().to_config()),
    };
    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    // Create parent directories
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    let contents = format!("{}{}", HEADER, yaml);
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    log::debug!("Wrote default model config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::TempDir;

    #[test]
    fn test_written_config_loads_as_default_model() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        write_default_config(&path, false).unwrap();

        let config = load_config(Some(path)).unwrap();
        let model = ScreeningModel::from_config(&config.model.unwrap());
        assert_eq!(model, ScreeningModel::default());
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "{}\n").unwrap();

        let err = write_default_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");

        write_default_config(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("baseline"));
    }
}
