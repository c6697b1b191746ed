use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::RgbaImage;
use std::io::Cursor;

/// PNG-encode the surface and wrap it as an inline data URI.
pub fn png_data_uri(surface: &RgbaImage) -> Result<String> {
    let mut encoded = Vec::new();

    surface.write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&encoded)))
}

/// Self-contained image fragment around a data URI, with explicit
/// dimensions and fluid styling.
pub fn html_fragment(data_uri: &str, width: u32, height: u32) -> String {
    format!(
        "<!-- Dot Matrix Image -->\n<img src=\"{}\" alt=\"Dot Matrix\" width=\"{}\" height=\"{}\" style=\"display: block; max-width: 100%; height: auto;\" />",
        data_uri, width, height
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn data_uri_carries_base64_png() {
        let surface = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let uri = png_data_uri(&surface).unwrap();

        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = STANDARD.decode(payload).unwrap();

        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn fragment_wraps_the_uri_with_dimensions() {
        let html = html_fragment("data:image/png;base64,AAAA", 64, 48);

        assert!(html.starts_with("<!-- Dot Matrix Image -->\n<img "));
        assert!(html.contains("src=\"data:image/png;base64,AAAA\""));
        assert!(html.contains("width=\"64\""));
        assert!(html.contains("height=\"48\""));
        assert!(html.contains("alt=\"Dot Matrix\""));
        assert!(html.ends_with("/>"));
    }
}
