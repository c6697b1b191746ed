use crate::color::Color;
use anyhow::{bail, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outline painted for every sampled cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Square,
    Diamond,
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "circle" => Ok(Shape::Circle),
            "square" => Ok(Shape::Square),
            "diamond" => Ok(Shape::Diamond),
            _ => bail!("unknown shape: {} (expected circle, square or diamond)", s),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Circle => "circle",
            Shape::Square => "square",
            Shape::Diamond => "diamond",
        };

        write!(f, "{}", name)
    }
}

/// One styled primitive of the matrix, in output-space coordinates. The
/// center and radius are real-valued; odd spacings put centers between
/// pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub fill: Color,
    pub shape: Shape,
}

/// Grid and output dimensions implied by a source image and pitch. The
/// output covers whole cells only, so it can exceed the source by up to
/// `spacing - 1` per axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub cols: u32,
    pub rows: u32,
    pub width: u32,
    pub height: u32,
}

impl GridGeometry {
    pub fn new(source_width: u32, source_height: u32, spacing: u32) -> Self {
        let cols = (source_width + spacing - 1) / spacing;
        let rows = (source_height + spacing - 1) / spacing;

        GridGeometry {
            cols,
            rows,
            width: cols * spacing,
            height: rows * spacing,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }
}
