pub mod check;
pub mod diff;
pub mod init;
pub mod replay;

use std::path::Path;

use a11yx_core::PluginConfig;

/// Read `--config`, or the defaults when no file is given
pub fn load_config(path: Option<&Path>) -> Result<PluginConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(PluginConfig::from_toml_str(&text)?)
        }
        None => Ok(PluginConfig::default()),
    }
}
