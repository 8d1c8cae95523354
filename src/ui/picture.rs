use image::RgbImage;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use super::layout::centered_rect;

/// Draws an image with upper-half-block cells: each terminal cell shows two
/// vertically stacked pixels, the top one as foreground and the bottom one
/// as background. The image is scaled to fit, keeping its aspect ratio.
pub struct Picture<'a> {
    image: &'a RgbImage,
}

impl<'a> Picture<'a> {
    pub fn new(image: &'a RgbImage) -> Self {
        Self { image }
    }

    /// Cell size of the image once fitted into `area`.
    pub fn fitted_size(&self, area: Rect) -> (u16, u16) {
        let (iw, ih) = self.image.dimensions();
        if iw == 0 || ih == 0 || area.width == 0 || area.height == 0 {
            return (0, 0);
        }
        let max_w = area.width as u32;
        let max_h = area.height as u32 * 2;
        // scale = min(max_w / iw, max_h / ih), kept in integers
        let (w, h) = if max_w * ih <= max_h * iw {
            (max_w, (ih * max_w / iw).max(1))
        } else {
            ((iw * max_h / ih).max(1), max_h)
        };
        (w as u16, h.div_ceil(2) as u16)
    }
}

fn pixel_color(image: &RgbImage, x: u32, y: u32) -> Color {
    let [r, g, b] = image.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}

impl Widget for Picture<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (cols, rows) = self.fitted_size(area);
        if cols == 0 || rows == 0 {
            return;
        }
        let target = centered_rect(area, cols, rows);
        let (iw, ih) = self.image.dimensions();
        let px_rows = rows as u32 * 2;

        for row in 0..rows {
            for col in 0..cols {
                let sx = (col as u32 * iw / cols as u32).min(iw - 1);
                let top_y = ((row as u32 * 2) * ih / px_rows).min(ih - 1);
                let bottom_y = ((row as u32 * 2 + 1) * ih / px_rows).min(ih - 1);
                if let Some(cell) = buf.cell_mut((target.x + col, target.y + row)) {
                    cell.set_symbol("▀")
                        .set_fg(pixel_color(self.image, sx, top_y))
                        .set_bg(pixel_color(self.image, sx, bottom_y));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_fitted_size_keeps_aspect() {
        let img = RgbImage::new(96, 96);
        let picture = Picture::new(&img);
        // 40 columns, 10 rows = 40x20 pixels; height limits
        assert_eq!(picture.fitted_size(Rect::new(0, 0, 40, 10)), (20, 10));
        // 10 columns, 40 rows; width limits
        assert_eq!(picture.fitted_size(Rect::new(0, 0, 10, 40)), (10, 5));
    }

    #[test]
    fn test_render_half_blocks() {
        let mut img = RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]));
        img.put_pixel(0, 1, Rgb([255, 0, 0]));
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        Picture::new(&img).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 255, 255));
        assert_eq!(cell.bg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(1, 0)].bg, Color::Rgb(255, 255, 255));
    }
}
