use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// A fill or background color. Computed fills carry plain channel values,
/// configured ones keep the spelling they were given so it reappears
/// verbatim in markup output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    rgb: [u8; 3],
    css: Option<String>,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color {
            rgb: [r, g, b],
            css: None,
        }
    }

    /// Black under its common hex spelling, the default for configured
    /// colors.
    pub fn black() -> Self {
        Color {
            rgb: [0, 0, 0],
            css: Some("#000000".to_string()),
        }
    }

    /// Parse `#rgb`, `#rrggbb` or `rgb(r,g,b)`. Hex spellings are kept
    /// as written.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                bail!("invalid hex color: {}", s);
            }

            let rgb = match hex.len() {
                3 => [
                    u8::from_str_radix(&hex[0..1], 16)? * 17,
                    u8::from_str_radix(&hex[1..2], 16)? * 17,
                    u8::from_str_radix(&hex[2..3], 16)? * 17,
                ],
                6 => [
                    u8::from_str_radix(&hex[0..2], 16)?,
                    u8::from_str_radix(&hex[2..4], 16)?,
                    u8::from_str_radix(&hex[4..6], 16)?,
                ],
                _ => bail!("invalid hex color: {}", s),
            };

            return Ok(Color {
                rgb,
                css: Some(trimmed.to_string()),
            });
        }

        if let Some(body) = trimmed.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
            let channels = body
                .split(',')
                .map(|part| part.trim().parse::<u8>())
                .collect::<Result<Vec<_>, _>>()?;

            if channels.len() != 3 {
                bail!("invalid rgb() color: {}", s);
            }

            return Ok(Color::rgb(channels[0], channels[1], channels[2]));
        }

        bail!("unsupported color: {} (expected #rgb, #rrggbb or rgb(r,g,b))", s)
    }

    /// Channel values for raster painting.
    pub fn channels(&self) -> [u8; 3] {
        self.rgb
    }

    /// CSS literal for markup output. Configured colors come back as
    /// written, computed ones as `rgb(r,g,b)`.
    pub fn to_css(&self) -> String {
        match &self.css {
            Some(spelling) => spelling.clone(),
            None => format!("rgb({},{},{})", self.rgb[0], self.rgb[1], self.rgb[2]),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        Color::parse(&s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> String {
        color.to_css()
    }
}

/// How sampled pixels turn into fill colors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorMode {
    Color,
    Grayscale,
    BlackAndWhite,
    Custom,
}

impl std::str::FromStr for ColorMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "color" => Ok(ColorMode::Color),
            "grayscale" => Ok(ColorMode::Grayscale),
            "black-and-white" | "blackwhite" => Ok(ColorMode::BlackAndWhite),
            "custom" => Ok(ColorMode::Custom),
            _ => bail!(
                "unknown color mode: {} (expected color, grayscale, black-and-white or custom)",
                s
            ),
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColorMode::Color => "color",
            ColorMode::Grayscale => "grayscale",
            ColorMode::BlackAndWhite => "black-and-white",
            ColorMode::Custom => "custom",
        };

        write!(f, "{}", name)
    }
}

/// Perceptual brightness of a sample in `[0, 255]`. Left to right in f64;
/// the black-and-white threshold depends on this exact sequence.
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    r as f64 * 0.299 + g as f64 * 0.587 + b as f64 * 0.114
}

/// Fill for one sample under the given mode. `brightness` is the sample's
/// luminance, passed in so it is computed once per sample.
pub fn fill_for(mode: ColorMode, r: u8, g: u8, b: u8, brightness: f64, custom: &Color) -> Color {
    match mode {
        ColorMode::Color => Color::rgb(r, g, b),
        ColorMode::Grayscale => {
            let level = brightness.round() as u8;

            Color::rgb(level, level, level)
        }
        ColorMode::BlackAndWhite => {
            if brightness > 128.0 {
                Color::rgb(255, 255, 255)
            } else {
                Color::rgb(0, 0, 0)
            }
        }
        ColorMode::Custom => custom.clone(),
    }
}
