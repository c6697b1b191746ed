use crate::cell::Shape;
use crate::color::{Color, ColorMode};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Style settings for one generation pass. Built once per request and read
/// immutably by the sampler; a change of settings means a new value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Parameters {
    /// Grid pitch in source pixels, at least 1. Each cell covers
    /// spacing x spacing source pixels.
    pub spacing: u32,

    /// Nominal dot diameter in output pixels.
    pub dot_size: f64,

    /// How sampled pixels map to fill colors.
    pub color_mode: ColorMode,

    /// Fill for every dot when the mode is `custom`.
    pub custom_color: Color,

    /// Background of the output surface and viewport.
    pub background_color: Color,

    /// Outline painted for each cell.
    pub shape: Shape,

    /// Scale dots by darkness. Dark samples reach the full dot size,
    /// light ones shrink toward 30% of it.
    pub size_by_brightness: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            spacing: 8,
            dot_size: 6.0,
            color_mode: ColorMode::BlackAndWhite,
            custom_color: Color::black(),
            background_color: Color::black(),
            shape: Shape::Circle,
            size_by_brightness: true,
        }
    }
}

impl Parameters {
    /// Reject settings the pipeline cannot work with. Callers check once
    /// up front; the sampler assumes validated input.
    pub fn validate(&self) -> Result<()> {
        if self.spacing == 0 {
            bail!("spacing must be at least 1");
        }

        if !self.dot_size.is_finite() || self.dot_size <= 0.0 {
            bail!("dot size must be a positive number");
        }

        Ok(())
    }
}
