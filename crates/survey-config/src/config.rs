//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// File name used for the persisted overlay settings.
pub const CONFIG_FILE_NAME: &str = "overlay.ron";

/// Top-level overlay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Overlay-wide toggles.
    pub overlay: OverlayConfig,
    /// Settings for the resource abundance provider.
    pub resource: ResourceOverlayConfig,
    /// Settings for the built-in procedural field provider.
    pub field: FieldConfig,
    /// Known bodies and their radii.
    pub bodies: Vec<BodyConfig>,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// How sampled amounts are stretched into the 0..=255 intensity range.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ScaleMode {
    /// Intensity grows linearly between cutoff and display max.
    #[default]
    Linear,
    /// Intensity grows with log2 of the amount. Cutoff is floored to 1.
    Logarithmic,
    /// Intensity grows with the square of the amount.
    Exponential,
}

/// Overlay-wide toggles, independent of the active provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    /// Registry key of the provider to activate.
    pub provider: String,
    /// Draw the overlay at all.
    pub show: bool,
    /// Show the hover tooltip.
    pub show_tooltip: bool,
    /// Show the tooltip outside the map view as well.
    pub flight_tooltip: bool,
    /// High-visibility magenta rendering instead of configured colors.
    pub bright: bool,
    /// Hide points the coverage source has not scanned yet.
    pub use_coverage: bool,
}

/// Per-resource display settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResourceConfig {
    /// Resource name as known by the abundance source.
    pub name: String,
    /// Name used when asking the coverage source for a scan type.
    /// Falls back to `name` when absent.
    pub scan_name: Option<String>,
    /// Amounts at or below this value render with `low_color`.
    pub cutoff: f64,
    /// RGBA color for amounts at or below the cutoff.
    pub low_color: [u8; 4],
    /// RGBA color reached at full intensity.
    pub high_color: [u8; 4],
}

/// Settings for the resource abundance provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResourceOverlayConfig {
    /// Name of the resource currently displayed.
    pub active_resource: String,
    /// Intensity scaling mode.
    pub scale: ScaleMode,
    /// Map intensity through the height gradient instead of `high_color`.
    pub colored_scale: bool,
    /// Ask the abundance source for biome-locked samples.
    pub biome_lock: bool,
    /// All resources the user can pick from.
    pub resources: Vec<ResourceConfig>,
}

/// Settings for the built-in procedural field provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    /// Base seed, mixed with the body id.
    pub seed: u64,
    /// Number of noise octaves.
    pub octaves: u32,
    /// Frequency of the first octave on the unit sphere.
    pub base_frequency: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Output value at full noise amplitude.
    pub amplitude: f64,
    /// Samples at or below this value render with `low_color`.
    pub cutoff: f64,
    /// Intensity scaling mode.
    pub scale: ScaleMode,
    /// Map intensity through the height gradient.
    pub colored_scale: bool,
    /// RGBA color for samples at or below the cutoff.
    pub low_color: [u8; 4],
    /// RGBA color reached at full intensity.
    pub high_color: [u8; 4],
}

/// A celestial body the overlay can be attached to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    /// Body name.
    pub name: String,
    /// Mean radius in kilometers.
    pub radius_km: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            provider: "resource".to_string(),
            show: true,
            show_tooltip: true,
            flight_tooltip: false,
            bright: false,
            use_coverage: false,
        }
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            scan_name: None,
            cutoff: 0.0,
            low_color: [0, 0, 0, 0],
            high_color: [255, 255, 255, 200],
        }
    }
}

impl ResourceConfig {
    /// Build a resource entry with a transparent low color.
    pub fn new(name: &str, high_color: [u8; 4]) -> Self {
        Self {
            name: name.to_string(),
            high_color,
            ..Default::default()
        }
    }

    /// Name to hand to the coverage source.
    pub fn scan_key(&self) -> &str {
        self.scan_name.as_deref().unwrap_or(&self.name)
    }
}

impl Default for ResourceOverlayConfig {
    fn default() -> Self {
        Self::failsafe()
    }
}

impl ResourceOverlayConfig {
    /// The fixed resource set used whenever persisted settings are unusable.
    pub fn failsafe() -> Self {
        let resources = vec![
            ResourceConfig::new("Karbonite", [255, 0, 0, 200]),
            ResourceConfig::new("Ore", [0, 255, 0, 200]),
            ResourceConfig::new("Water", [0, 0, 255, 200]),
            ResourceConfig::new("Minerals", [0, 255, 255, 200]),
            ResourceConfig::new("Substrate", [255, 0, 255, 200]),
            ResourceConfig::new("Uraninite", [255, 255, 0, 200]),
        ];
        Self {
            active_resource: resources[0].name.clone(),
            scale: ScaleMode::Linear,
            colored_scale: false,
            biome_lock: false,
            resources,
        }
    }

    /// The active resource entry, if the name resolves.
    pub fn active(&self) -> Option<&ResourceConfig> {
        self.find(&self.active_resource)
    }

    /// Look up a resource entry by name.
    pub fn find(&self, name: &str) -> Option<&ResourceConfig> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Mutable lookup by name.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut ResourceConfig> {
        self.resources.iter_mut().find(|r| r.name == name)
    }

    /// Repair an unusable resource section in place.
    ///
    /// An empty list is replaced by the failsafe set; a dangling active name
    /// is pointed at the first entry. Returns `true` if anything changed.
    pub fn repair(&mut self) -> bool {
        if self.resources.is_empty() {
            *self = Self::failsafe();
            return true;
        }
        if self.active().is_none() {
            self.active_resource = self.resources[0].name.clone();
            return true;
        }
        false
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            octaves: 5,
            base_frequency: 1.5,
            lacunarity: 2.0,
            persistence: 0.5,
            amplitude: 100.0,
            cutoff: 0.0,
            scale: ScaleMode::Linear,
            colored_scale: true,
            low_color: [0, 0, 0, 0],
            high_color: [255, 255, 255, 160],
        }
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            radius_km: 600.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl BodyConfig {
    /// Shorthand constructor.
    pub fn new(name: &str, radius_km: f64) -> Self {
        Self {
            name: name.to_string(),
            radius_km,
        }
    }

    /// The stock body list.
    pub fn stock() -> Vec<Self> {
        vec![
            Self::new("Kerbol", 261_600.0),
            Self::new("Moho", 250.0),
            Self::new("Eve", 700.0),
            Self::new("Gilly", 13.0),
            Self::new("Kerbin", 600.0),
            Self::new("Mun", 200.0),
            Self::new("Minmus", 60.0),
            Self::new("Duna", 320.0),
            Self::new("Ike", 130.0),
            Self::new("Dres", 138.0),
            Self::new("Jool", 6_000.0),
            Self::new("Laythe", 500.0),
            Self::new("Vall", 300.0),
            Self::new("Tylo", 600.0),
            Self::new("Bop", 65.0),
            Self::new("Pol", 44.0),
            Self::new("Eeloo", 210.0),
        ]
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// The built-in configuration used when nothing usable can be loaded.
    pub fn failsafe() -> Self {
        Self {
            bodies: BodyConfig::stock(),
            ..Default::default()
        }
    }

    /// Platform config directory for the overlay, if one exists.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("survey-overlay"))
    }

    /// Read one config file. `Ok(None)` means the file does not exist.
    pub fn read_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::read(path))?;
        let config: Config = ron::from_str(&contents).map_err(ConfigError::parse(path))?;
        Ok(Some(config))
    }

    /// Load the shipped base file, then the user's saved file on top.
    ///
    /// Missing layers are skipped. Layers that fail to read or parse are
    /// logged and skipped. The result is always usable: an empty resource
    /// list becomes the failsafe set and an empty body list the stock bodies.
    pub fn load_layered(base: &Path, user: &Path) -> Self {
        let mut config = Self::failsafe();
        for path in [base, user] {
            match Self::read_file(path) {
                Ok(Some(layer)) => {
                    info!("Loaded config layer from {}", path.display());
                    config = layer;
                }
                Ok(None) => debug!("No config at {}, skipping", path.display()),
                Err(e) => warn!("Could not load {}, ignoring layer: {e}", path.display()),
            }
        }
        if config.resource.repair() {
            warn!("Resource settings unusable, using failsafe resource set");
        }
        if config.bodies.is_empty() {
            config.bodies = BodyConfig::stock();
        }
        config
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if let Some(config) = Self::read_file(&config_path)? {
            info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::failsafe();
            config.save(config_dir)?;
            info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as [`CONFIG_FILE_NAME`].
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::write(config_dir))?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(false)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::write(&config_path))?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::read(&config_path))?;
        let new_config: Config =
            ron::from_str(&contents).map_err(ConfigError::parse(&config_path))?;

        if &new_config != self {
            info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Radius of the named body, if configured.
    pub fn body_radius_km(&self, name: &str) -> Option<f64> {
        self.bodies
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.radius_km)
    }
}
