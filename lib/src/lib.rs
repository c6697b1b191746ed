pub mod cell;
pub mod color;
pub mod embed;
pub mod params;
pub mod raster;
pub mod svg;

use anyhow::Result;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use log::debug;

use crate::cell::{Cell, GridGeometry};
use crate::color::{fill_for, luminance};
use crate::params::Parameters;

/// Samples with an alpha below this count as holes in the matrix.
const ALPHA_THRESHOLD: u8 = 10;

/// Walk the sampling grid over the image, row-major, and produce the cell
/// sequence. Each grid position point-samples one source pixel; transparent
/// samples yield no cell.
pub fn sample_cells(img: &DynamicImage, par: &Parameters) -> Vec<Cell> {
    let (width, height) = img.dimensions();
    let geometry = GridGeometry::new(width, height, par.spacing);
    let pitch = par.spacing as f64;
    let mut cells = Vec::with_capacity(geometry.cell_count());

    for row in 0..geometry.rows {
        for col in 0..geometry.cols {
            let sample_x = (col * par.spacing).min(width - 1);
            let sample_y = (row * par.spacing).min(height - 1);
            let Rgba([r, g, b, a]) = img.get_pixel(sample_x, sample_y);

            if a < ALPHA_THRESHOLD {
                continue;
            }

            let brightness = luminance(r, g, b);

            let size = if par.size_by_brightness {
                scaled_dot_size(par.dot_size, brightness)
            } else {
                par.dot_size
            };

            cells.push(Cell {
                x: col as f64 * pitch + pitch / 2.0,
                y: row as f64 * pitch + pitch / 2.0,
                radius: size / 2.0,
                fill: fill_for(par.color_mode, r, g, b, brightness, &par.custom_color),
                shape: par.shape,
            });
        }
    }

    debug!(
        "sampled {} of {} cells on a {}x{} grid",
        cells.len(),
        geometry.cell_count(),
        geometry.cols,
        geometry.rows
    );

    cells
}

/// Dark samples keep the full nominal size, light ones shrink to 30% of
/// it, never below one output pixel.
fn scaled_dot_size(base: f64, brightness: f64) -> f64 {
    let factor = 1.0 - brightness / 255.0;

    (base * (0.3 + factor * 0.7)).max(1.0)
}

/// All output forms of one generation pass, produced from a single
/// sampling of the image.
pub struct Artifacts {
    pub geometry: GridGeometry,
    pub surface: RgbaImage,
    pub markup: String,
    pub data_uri: String,
    pub html: String,
}

/// Run the pipeline once: sample, then hand the same cell sequence to both
/// renderers and the embed builders.
pub fn generate(img: &DynamicImage, par: &Parameters) -> Result<Artifacts> {
    let (width, height) = img.dimensions();
    let geometry = GridGeometry::new(width, height, par.spacing);
    let cells = sample_cells(img, par);
    let surface = raster::render(&cells, &geometry, &par.background_color);
    let markup = svg::document(&cells, &geometry, &par.background_color).to_string();
    let data_uri = embed::png_data_uri(&surface)?;
    let html = embed::html_fragment(&data_uri, geometry.width, geometry.height);

    Ok(Artifacts {
        geometry,
        surface,
        markup,
        data_uri,
        html,
    })
}

/// Shrink the image to fit the given bounds, keeping its aspect ratio.
/// Images already inside the bounds pass through untouched.
pub fn fit_within(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (width, height) = img.dimensions();

    if width <= max_width && height <= max_height {
        return img;
    }

    img.thumbnail(max_width, max_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Shape;
    use crate::color::{Color, ColorMode};

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    fn grayscale_params(spacing: u32) -> Parameters {
        Parameters {
            spacing,
            dot_size: 4.0,
            color_mode: ColorMode::Grayscale,
            size_by_brightness: false,
            ..Parameters::default()
        }
    }

    #[test]
    fn red_square_samples_four_gray_cells() {
        let img = solid(4, 4, [255, 0, 0, 255]);
        let cells = sample_cells(&img, &grayscale_params(2));

        let centers: Vec<(f64, f64)> = cells.iter().map(|c| (c.x, c.y)).collect();

        assert_eq!(centers, vec![(1.0, 1.0), (3.0, 1.0), (1.0, 3.0), (3.0, 3.0)]);

        for cell in &cells {
            assert_eq!(cell.fill.to_css(), "rgb(76,76,76)");
            assert_eq!(cell.radius, 2.0);
            assert_eq!(cell.shape, Shape::Circle);
        }
    }

    #[test]
    fn custom_mode_uses_the_configured_fill_everywhere() {
        let img = solid(4, 4, [255, 0, 0, 255]);
        let par = Parameters {
            spacing: 2,
            color_mode: ColorMode::Custom,
            custom_color: Color::parse("#00ff00").unwrap(),
            ..Parameters::default()
        };

        let cells = sample_cells(&img, &par);

        assert_eq!(cells.len(), 4);

        for cell in &cells {
            assert_eq!(cell.fill.to_css(), "#00ff00");
        }
    }

    #[test]
    fn sampling_is_deterministic() {
        let mut surface = RgbaImage::from_pixel(6, 6, Rgba([200, 100, 50, 255]));
        surface.put_pixel(3, 2, Rgba([0, 0, 0, 255]));
        surface.put_pixel(4, 4, Rgba([10, 20, 30, 128]));
        let img = DynamicImage::ImageRgba8(surface);
        let par = Parameters {
            spacing: 2,
            color_mode: ColorMode::Color,
            ..Parameters::default()
        };

        assert_eq!(sample_cells(&img, &par), sample_cells(&img, &par));
    }

    #[test]
    fn transparent_samples_leave_holes() {
        let mut surface = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        surface.put_pixel(0, 0, Rgba([255, 255, 255, 0]));
        surface.put_pixel(2, 0, Rgba([255, 255, 255, 9]));
        let img = DynamicImage::ImageRgba8(surface);

        let cells = sample_cells(&img, &grayscale_params(2));
        let centers: Vec<(f64, f64)> = cells.iter().map(|c| (c.x, c.y)).collect();

        assert_eq!(centers, vec![(1.0, 3.0), (3.0, 3.0)]);
    }

    #[test]
    fn alpha_at_the_threshold_is_kept() {
        let img = solid(1, 1, [0, 0, 0, 10]);

        assert_eq!(sample_cells(&img, &grayscale_params(2)).len(), 1);

        let img = solid(1, 1, [0, 0, 0, 9]);

        assert!(sample_cells(&img, &grayscale_params(2)).is_empty());
    }

    #[test]
    fn partial_cells_sample_the_clamped_edge_pixel() {
        let img = solid(5, 3, [0, 0, 0, 255]);
        let cells = sample_cells(&img, &grayscale_params(4));

        let centers: Vec<(f64, f64)> = cells.iter().map(|c| (c.x, c.y)).collect();

        assert_eq!(centers, vec![(2.0, 2.0), (6.0, 2.0)]);
    }

    #[test]
    fn brightness_scales_dot_sizes_between_30_and_100_percent() {
        let par = Parameters {
            spacing: 2,
            dot_size: 10.0,
            color_mode: ColorMode::Grayscale,
            ..Parameters::default()
        };

        let dark = sample_cells(&solid(2, 2, [0, 0, 0, 255]), &par);
        let light = sample_cells(&solid(2, 2, [255, 255, 255, 255]), &par);

        assert_eq!(dark[0].radius, 5.0);
        assert!(light[0].radius >= 1.5 && light[0].radius < 1.6);
    }

    #[test]
    fn scaled_sizes_never_drop_below_one_pixel() {
        assert_eq!(scaled_dot_size(10.0, 0.0), 10.0);
        assert_eq!(scaled_dot_size(10.0, 255.0), 3.0);
        assert_eq!(scaled_dot_size(1.0, 255.0), 1.0);
        assert_eq!(scaled_dot_size(0.5, 255.0), 1.0);
    }

    #[test]
    fn generate_produces_consistent_artifacts() {
        let img = solid(5, 3, [128, 64, 32, 255]);
        let par = Parameters {
            spacing: 4,
            ..Parameters::default()
        };

        let artifacts = generate(&img, &par).unwrap();

        assert_eq!(artifacts.geometry, GridGeometry::new(5, 3, 4));
        assert_eq!(artifacts.surface.dimensions(), (8, 4));
        assert!(artifacts.markup.starts_with("<svg"));
        assert!(artifacts.markup.contains("viewBox=\"0 0 8 4\""));
        assert!(artifacts.data_uri.starts_with("data:image/png;base64,"));
        assert!(artifacts.html.contains(&artifacts.data_uri));
        assert!(artifacts.html.contains("width=\"8\""));
    }

    #[test]
    fn markup_lists_every_cell_in_order() {
        let mut surface = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        surface.put_pixel(2, 0, Rgba([0, 255, 0, 255]));
        surface.put_pixel(0, 2, Rgba([0, 0, 255, 255]));
        let img = DynamicImage::ImageRgba8(surface);
        let par = Parameters {
            spacing: 2,
            color_mode: ColorMode::Color,
            size_by_brightness: false,
            ..Parameters::default()
        };

        let cells = sample_cells(&img, &par);
        let artifacts = generate(&img, &par).unwrap();

        let circles: Vec<&str> = artifacts
            .markup
            .lines()
            .filter(|line| line.trim_start().starts_with("<circle"))
            .collect();

        assert_eq!(circles.len(), cells.len());

        for (tag, cell) in circles.iter().zip(cells.iter()) {
            assert_eq!(attr(tag, "cx"), format!("{:.1}", cell.x));
            assert_eq!(attr(tag, "cy"), format!("{:.1}", cell.y));
            assert_eq!(attr(tag, "r"), format!("{:.1}", cell.radius));
            assert_eq!(attr(tag, "fill"), cell.fill.to_css());
        }
    }

    fn attr(tag: &str, name: &str) -> String {
        let needle = format!(" {}=\"", name);
        let start = tag.find(&needle).unwrap() + needle.len();
        let end = tag[start..].find('"').unwrap() + start;

        tag[start..end].to_string()
    }

    #[test]
    fn fit_within_leaves_small_images_alone() {
        let img = solid(600, 500, [1, 2, 3, 255]);

        assert_eq!(fit_within(img, 600, 500).dimensions(), (600, 500));
    }

    #[test]
    fn fit_within_shrinks_to_the_bounds_preserving_aspect() {
        let img = solid(1200, 500, [1, 2, 3, 255]);
        let (width, height) = fit_within(img, 600, 500).dimensions();

        assert!(width <= 600 && height <= 500);
        assert_eq!(width, 600);
        assert_eq!(height, 250);
    }
}
