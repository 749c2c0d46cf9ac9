use crate::defaults::*;
use crate::errors::{Result, SpincurvError};
use crate::stencil::StencilSpacing;
use serde::{Deserialize, Serialize};

fn default_delta_bx() -> f64 {
    DELTA_BX
}
fn default_delta_by() -> f64 {
    DELTA_BY
}
fn default_delta_bz() -> f64 {
    DELTA_BZ
}

/// Stencil section of the configuration file.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StencilSettings {
    #[serde(default = "default_delta_bx")]
    pub delta_bx: f64,
    #[serde(default = "default_delta_by")]
    pub delta_by: f64,
    #[serde(default = "default_delta_bz")]
    pub delta_bz: f64,
}

impl Default for StencilSettings {
    fn default() -> Self {
        StencilSettings {
            delta_bx: DELTA_BX,
            delta_by: DELTA_BY,
            delta_bz: DELTA_BZ,
        }
    }
}

impl From<&StencilSettings> for StencilSpacing {
    fn from(settings: &StencilSettings) -> Self {
        StencilSpacing::new(settings.delta_bx, settings.delta_by, settings.delta_bz)
    }
}

/// Sweep configuration, read from `spincurv.toml`. Every field falls back to
/// the compiled defaults when absent.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Configuration {
    #[serde(default)]
    pub stencil: StencilSettings,
}

impl Configuration {
    pub fn from_toml(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| {
            SpincurvError::configuration(format!("could not parse {}: {}", CONFIG_FILE_NAME, e))
        })
    }
}

#[test]
fn empty_configuration_yields_defaults() {
    let config = Configuration::from_toml("").unwrap();
    assert_eq!(config.stencil.delta_bx, DELTA_BX);
    assert_eq!(config.stencil.delta_by, DELTA_BY);
    assert_eq!(config.stencil.delta_bz, DELTA_BZ);
    let spacing = StencilSpacing::from(&config.stencil);
    assert_eq!(spacing, StencilSpacing::default());
}

#[test]
fn partial_stencil_section_is_filled_in() {
    let config = Configuration::from_toml("[stencil]\ndelta_bz = 2.0e-4\n").unwrap();
    assert_eq!(config.stencil.delta_bx, DELTA_BX);
    assert_eq!(config.stencil.delta_bz, 2.0e-4);
}

#[test]
fn malformed_configuration_is_a_configuration_error() {
    match Configuration::from_toml("[stencil]\ndelta_bx = \"tiny\"\n") {
        Err(SpincurvError::Configuration { .. }) => {}
        _ => panic!("expected configuration error"),
    }
}
