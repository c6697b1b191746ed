use crate::cell::{Cell, GridGeometry, Shape};
use crate::color::Color;
use image::{Rgba, RgbaImage};

/// Paint the cell sequence onto a fresh opaque surface, background first,
/// cells in sequence order.
pub fn render(cells: &[Cell], geometry: &GridGeometry, background: &Color) -> RgbaImage {
    let mut surface = RgbaImage::from_pixel(
        geometry.width,
        geometry.height,
        opaque(background.channels()),
    );

    for cell in cells {
        paint(&mut surface, cell);
    }

    surface
}

fn opaque(rgb: [u8; 3]) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}

/// Fill one shape. A pixel is covered when its center lies inside the
/// outline; parts outside the surface are clipped.
fn paint(surface: &mut RgbaImage, cell: &Cell) {
    let fill = opaque(cell.fill.channels());
    let left = ((cell.x - cell.radius).floor() as i64).max(0);
    let right = ((cell.x + cell.radius).ceil() as i64).min(i64::from(surface.width()) - 1);
    let top = ((cell.y - cell.radius).floor() as i64).max(0);
    let bottom = ((cell.y + cell.radius).ceil() as i64).min(i64::from(surface.height()) - 1);

    for py in top..=bottom {
        for px in left..=right {
            let dx = px as f64 + 0.5 - cell.x;
            let dy = py as f64 + 0.5 - cell.y;

            if covered(cell.shape, dx, dy, cell.radius) {
                surface.put_pixel(px as u32, py as u32, fill);
            }
        }
    }
}

fn covered(shape: Shape, dx: f64, dy: f64, radius: f64) -> bool {
    match shape {
        Shape::Circle => dx * dx + dy * dy <= radius * radius,
        Shape::Square => dx.abs() <= radius && dy.abs() <= radius,
        Shape::Diamond => dx.abs() + dy.abs() <= radius,
    }
}
