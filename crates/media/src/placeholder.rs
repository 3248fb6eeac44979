//! Static fallback image used when no animation can be downloaded.

use std::{io::Cursor, path::Path};

use {
    anyhow::{Context, Result},
    image::{DynamicImage, ImageFormat, Rgba, RgbaImage},
};

pub const WIDTH: u32 = 400;
pub const HEIGHT: u32 = 200;
pub const DARK_BLUE: Rgba<u8> = Rgba([0, 0, 139, 255]);

/// Encode a solid dark-blue GIF of the given size.
pub fn render(width: u32, height: u32) -> Result<Vec<u8>> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, DARK_BLUE));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Gif)
        .context("failed to encode placeholder")?;
    Ok(out.into_inner())
}

/// Write the default-size placeholder to `dest`.
pub async fn write_placeholder(dest: &Path) -> Result<()> {
    let data = render(WIDTH, HEIGHT)?;
    tokio::fs::write(dest, data)
        .await
        .with_context(|| format!("failed to write placeholder to {}", dest.display()))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use image::GenericImageView;

    use super::*;

    #[test]
    fn renders_decodable_gif_of_requested_size() {
        let data = render(WIDTH, HEIGHT).unwrap();
        assert!(data.starts_with(b"GIF8"));

        let img = image::load_from_memory_with_format(&data, ImageFormat::Gif).unwrap();
        assert_eq!(img.dimensions(), (WIDTH, HEIGHT));
        let px = img.get_pixel(10, 10);
        assert!(px[2] > px[0] && px[2] > px[1]);
    }

    #[tokio::test]
    async fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("welcome.gif");
        write_placeholder(&dest).await.unwrap();
        assert!(std::fs::metadata(&dest).unwrap().len() > 0);
    }
}
