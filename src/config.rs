use anyhow::Result;
use portfolio_input::ClickTiming;
use portfolio_interaction::InteractionConfig;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

/// Where the binary looks for its configuration when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config/portfolio.toml";

/// Everything tunable about the portfolio page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub interaction: InteractionConfig,
    pub input: ClickTiming,
    pub scene: SceneConfig,
    pub links: LinksConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of background stars.
    pub star_count: usize,
    /// Side of the cube the stars are scattered in, centred on the origin.
    pub star_spread: f32,
    /// Fixed seed for the starfield; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    /// Initial window size in pixels.
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// How far the page can be scrolled, in pixels.
    pub page_length: f32,
    /// Pixels scrolled per wheel line.
    pub pixels_per_line: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_count: 2000,
            star_spread: 500.0,
            seed: None,
            viewport_width: 1280,
            viewport_height: 720,
            page_length: 4000.0,
            pixels_per_line: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LinksConfig {
    pub github: String,
    pub linkedin: String,
    /// Sound played when the tetrahedron is clicked.
    pub sound: String,
    /// Hand URLs to the system browser. When off they are only logged.
    pub open_urls: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            github: "https://github.com/Yalpit?tab=repositories".to_string(),
            linkedin: "https://www.linkedin.com/in/charles-damaggio-297934243/".to_string(),
            sound: "stonk sound effect.mp3".to_string(),
            open_urls: false,
        }
    }
}

impl PortfolioConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<PortfolioConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    PortfolioConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound && path == Path::new(DEFAULT_CONFIG_PATH)
                {
                    warn!("Config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                PortfolioConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_interaction::DuplicatePolicy;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg: PortfolioConfig = toml::from_str(
            r#"
            [interaction]
            duplicate_policy = "reject"

            [scene]
            star_count = 10
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(cfg.interaction.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(cfg.scene.star_count, 10);
        assert_eq!(cfg.scene.seed, Some(7));
        assert_eq!(cfg.scene.star_spread, 500.0);
        assert_eq!(cfg.links, LinksConfig::default());
        assert_eq!(cfg.input, ClickTiming::default());
    }

    #[test]
    fn unreadable_or_broken_files_fall_back() {
        let dir = std::env::temp_dir().join(format!("portfolio3d-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("missing.toml");
        assert_eq!(PortfolioConfig::load_from_path(&missing), PortfolioConfig::default());

        let broken = dir.join("broken.toml");
        fs::write(&broken, "[scene\nstar_count = ").unwrap();
        assert_eq!(PortfolioConfig::load_from_path(&broken), PortfolioConfig::default());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn saved_file_loads_back() {
        let dir = std::env::temp_dir().join(format!("portfolio3d-save-{}", std::process::id()));
        let path = dir.join("nested").join("portfolio.toml");

        let mut cfg = PortfolioConfig::default();
        cfg.scene.seed = Some(42);
        cfg.links.open_urls = true;
        cfg.save_to_path(&path).unwrap();

        assert_eq!(PortfolioConfig::load_from_path(&path), cfg);
        fs::remove_dir_all(&dir).ok();
    }
}
