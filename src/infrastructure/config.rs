// Service configuration - file and environment layers over built-in defaults
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::gaps::DEFAULT_GAP_THRESHOLD;
use crate::domain::zones::{BandPalette, ZonePalette};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub latis: LatisSettings,
    #[serde(default)]
    pub gaps: GapSettings,
    #[serde(default)]
    pub themes: ThemeSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LatisSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for LatisSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/latis/".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GapSettings {
    pub enabled: bool,
    pub threshold: f64,
}

impl Default for GapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_GAP_THRESHOLD,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeConfig {
    pub zones: ZonePalette,
    pub bands: BandPalette,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeSettings {
    #[serde(default = "default_theme")]
    pub default: String,
    #[serde(flatten)]
    pub palettes: HashMap<String, ThemeConfig>,
}

fn default_theme() -> String {
    "light".to_string()
}

impl Default for ThemeSettings {
    fn default() -> Self {
        let mut palettes = HashMap::new();
        palettes.insert(
            "light".to_string(),
            ThemeConfig {
                zones: ZonePalette::new("#33ae1a", "#c6ba02", "#c70202"),
                bands: BandPalette {
                    warn: "rgba(223, 223, 0, 0.2)".to_string(),
                    bad: "rgba(255, 0, 0, 0.08)".to_string(),
                },
            },
        );
        palettes.insert(
            "dark".to_string(),
            ThemeConfig {
                zones: ZonePalette::new("#46d754", "#f0e546", "#e42929"),
                bands: BandPalette {
                    warn: "rgba(255, 255, 0, 0.2)".to_string(),
                    bad: "rgba(255, 0, 0, 0.25)".to_string(),
                },
            },
        );
        Self {
            default: default_theme(),
            palettes,
        }
    }
}

impl ThemeSettings {
    /// Look up a theme by name, falling back to the default theme.
    pub fn resolve(&self, name: Option<&str>) -> Option<&ThemeConfig> {
        name.and_then(|n| self.palettes.get(n))
            .or_else(|| self.palettes.get(&self.default))
    }
}

/// Builder preloaded with the built-in themes, so file and environment
/// layers override single palette entries instead of replacing the table.
fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = ThemeSettings::default();
    let mut builder = config::Config::builder().set_default("themes.default", defaults.default)?;
    for (name, theme) in defaults.palettes {
        let key = |path: &str| format!("themes.{}.{}", name, path);
        builder = builder
            .set_default(key("zones.good"), theme.zones.good)?
            .set_default(key("zones.warn"), theme.zones.warn)?
            .set_default(key("zones.bad"), theme.zones.bad)?
            .set_default(key("bands.warn"), theme.bands.warn)?
            .set_default(key("bands.bad"), theme.bands.bad)?;
    }
    Ok(builder)
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("CHART")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let settings = builder_with_defaults()?
        .add_source(config::File::with_name("config/chart").required(false))
        .add_source(environment())
        .build()?;

    Ok(settings.try_deserialize()?)
}
