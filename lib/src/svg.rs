use crate::cell::{Cell, GridGeometry, Shape};
use crate::color::Color;
use svg::node::element::{Circle, Polygon, Rectangle};
use svg::Document;

/// Build the vector document for a cell sequence: viewport, one full-size
/// background rectangle, then one primitive per cell in sequence order.
pub fn document(cells: &[Cell], geometry: &GridGeometry, background: &Color) -> Document {
    let backdrop = Rectangle::new()
        .set("width", "100%")
        .set("height", "100%")
        .set("fill", background.to_css());

    let mut document = Document::new()
        .set("viewBox", (0, 0, geometry.width, geometry.height))
        .set("width", geometry.width)
        .set("height", geometry.height)
        .add(backdrop);

    for cell in cells {
        document = match cell.shape {
            Shape::Circle => document.add(circle(cell)),
            Shape::Square => document.add(square(cell)),
            Shape::Diamond => document.add(diamond(cell)),
        };
    }

    document
}

fn circle(cell: &Cell) -> Circle {
    Circle::new()
        .set("cx", fixed(cell.x))
        .set("cy", fixed(cell.y))
        .set("r", fixed(cell.radius))
        .set("fill", cell.fill.to_css())
}

fn square(cell: &Cell) -> Rectangle {
    Rectangle::new()
        .set("x", fixed(cell.x - cell.radius))
        .set("y", fixed(cell.y - cell.radius))
        .set("width", fixed(cell.radius * 2.0))
        .set("height", fixed(cell.radius * 2.0))
        .set("fill", cell.fill.to_css())
}

fn diamond(cell: &Cell) -> Polygon {
    let points = format!(
        "{},{} {},{} {},{} {},{}",
        fixed(cell.x),
        fixed(cell.y - cell.radius),
        fixed(cell.x + cell.radius),
        fixed(cell.y),
        fixed(cell.x),
        fixed(cell.y + cell.radius),
        fixed(cell.x - cell.radius),
        fixed(cell.y),
    );

    Polygon::new()
        .set("points", points)
        .set("fill", cell.fill.to_css())
}

/// Coordinates carry exactly one decimal so the markup is deterministic.
fn fixed(value: f64) -> String {
    format!("{:.1}", value)
}
