//! Command-line argument parsing for the survey overlay.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{Config, ScaleMode};

/// Scale mode as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliScale {
    /// Linear intensity.
    Linear,
    /// Log2 intensity.
    Log,
    /// Squared intensity.
    Exp,
}

impl From<CliScale> for ScaleMode {
    fn from(s: CliScale) -> Self {
        match s {
            CliScale::Linear => ScaleMode::Linear,
            CliScale::Log => ScaleMode::Logarithmic,
            CliScale::Exp => ScaleMode::Exponential,
        }
    }
}

/// Survey overlay command-line arguments.
///
/// CLI values override settings loaded from `overlay.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "survey", about = "Planetary survey overlay")]
pub struct CliArgs {
    /// Provider registry key (e.g. "resource", "field").
    #[arg(long)]
    pub provider: Option<String>,

    /// Resource to display with the resource provider.
    #[arg(long)]
    pub resource: Option<String>,

    /// Intensity scaling mode.
    #[arg(long, value_enum)]
    pub scale: Option<CliScale>,

    /// Cutoff for the active resource.
    #[arg(long)]
    pub cutoff: Option<f64>,

    /// High-visibility rendering.
    #[arg(long)]
    pub bright: Option<bool>,

    /// Use the height gradient instead of the resource color.
    #[arg(long)]
    pub colored: Option<bool>,

    /// Hide points the coverage source has not scanned.
    #[arg(long)]
    pub coverage: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref provider) = args.provider {
            self.overlay.provider = provider.clone();
        }
        if let Some(ref name) = args.resource {
            self.resource.active_resource = name.clone();
        }
        if let Some(scale) = args.scale {
            self.resource.scale = scale.into();
            self.field.scale = scale.into();
        }
        if let Some(cutoff) = args.cutoff {
            let active = self.resource.active_resource.clone();
            if let Some(res) = self.resource.find_mut(&active) {
                res.cutoff = cutoff;
            }
            self.field.cutoff = cutoff;
        }
        if let Some(bright) = args.bright {
            self.overlay.bright = bright;
        }
        if let Some(colored) = args.colored {
            self.resource.colored_scale = colored;
            self.field.colored_scale = colored;
        }
        if let Some(coverage) = args.coverage {
            self.overlay.use_coverage = coverage;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        self.resource.repair();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::failsafe();
        let args = CliArgs {
            provider: Some("field".to_string()),
            resource: Some("Water".to_string()),
            scale: Some(CliScale::Log),
            cutoff: Some(5.0),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.overlay.provider, "field");
        assert_eq!(config.resource.active_resource, "Water");
        assert_eq!(config.resource.scale, ScaleMode::Logarithmic);
        assert_eq!(config.resource.find("Water").unwrap().cutoff, 5.0);
        // Non-overridden fields retain defaults
        assert_eq!(config.resource.find("Ore").unwrap().cutoff, 0.0);
        assert!(!config.overlay.bright);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::failsafe();
        let mut config = Config::failsafe();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_unknown_resource_repaired() {
        let mut config = Config::failsafe();
        let args = CliArgs {
            resource: Some("Unobtainium".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.resource.active_resource, "Karbonite");
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "survey",
            "--scale",
            "exp",
            "--bright",
            "true",
            "--coverage",
            "false",
        ]);
        assert_eq!(args.scale, Some(CliScale::Exp));
        assert_eq!(args.bright, Some(true));
        assert_eq!(args.coverage, Some(false));
        assert!(args.provider.is_none());
    }
}
