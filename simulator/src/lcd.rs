//! 16x2 character LCD panel for the simulator.
//!
//! Holds the character contents the controller writes (same semantics as the
//! HD44780 on the board: every `show` clears the panel and writes line 1) and
//! renders them with embedded-graphics as a green backlit module.

use efi_common::StatusDisplay;
use efi_common::config::{LCD_COLUMNS, LCD_ROWS};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use profont::PROFONT_18_POINT;

// =============================================================================
// Panel Geometry and Colors
// =============================================================================

/// Character font of the panel.
const FONT: &MonoFont<'static> = &PROFONT_18_POINT;

/// Gap between character cells (px).
const CELL_GAP: u32 = 2;

/// Border around the character area (px).
const MARGIN: u32 = 8;

const CELL_WIDTH: u32 = FONT.character_size.width;
const CELL_HEIGHT: u32 = FONT.character_size.height;

/// Backlight.
pub const BACKLIGHT: Rgb565 = Rgb565::new(12, 50, 4);

/// Unlit character cell.
pub const CELL_COLOR: Rgb565 = Rgb565::new(10, 44, 3);

/// Lit pixels.
pub const INK: Rgb565 = Rgb565::new(2, 10, 2);

// =============================================================================
// LCD Panel
// =============================================================================

/// One line of the panel.
pub type LcdLine = String<LCD_COLUMNS>;

/// Simulated character LCD.
pub struct LcdPanel {
    lines: [LcdLine; LCD_ROWS],
    writes: u32,
}

impl LcdPanel {
    /// Rendered size of the panel.
    pub const SIZE: Size = Size::new(
        2 * MARGIN + LCD_COLUMNS as u32 * (CELL_WIDTH + CELL_GAP) - CELL_GAP,
        2 * MARGIN + LCD_ROWS as u32 * (CELL_HEIGHT + CELL_GAP) - CELL_GAP,
    );

    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| LcdLine::new()),
            writes: 0,
        }
    }

    /// Contents of line `row` (0-based).
    pub fn line(
        &self,
        row: usize,
    ) -> &str {
        self.lines.get(row).map_or("", |line| line.as_str())
    }

    /// Number of `show` calls so far.
    pub fn writes(&self) -> u32 { self.writes }

    /// Draw the panel with its top-left corner at `origin`.
    pub fn draw<D>(
        &self,
        target: &mut D,
        origin: Point,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        Rectangle::new(origin, Self::SIZE)
            .into_styled(PrimitiveStyle::with_fill(BACKLIGHT))
            .draw(target)?;

        let style = MonoTextStyle::new(FONT, INK);
        let cell_style = PrimitiveStyle::with_fill(CELL_COLOR);
        let mut buf = [0u8; 4];

        for (row, line) in self.lines.iter().enumerate() {
            let mut chars = line.chars();
            for col in 0..LCD_COLUMNS {
                let position = origin
                    + Point::new(
                        (MARGIN + col as u32 * (CELL_WIDTH + CELL_GAP)) as i32,
                        (MARGIN + row as u32 * (CELL_HEIGHT + CELL_GAP)) as i32,
                    );
                Rectangle::new(position, FONT.character_size)
                    .into_styled(cell_style)
                    .draw(target)?;

                if let Some(ch) = chars.next() {
                    Text::with_baseline(ch.encode_utf8(&mut buf), position, style, Baseline::Top).draw(target)?;
                }
            }
        }
        Ok(())
    }
}

impl Default for LcdPanel {
    fn default() -> Self { Self::new() }
}

impl StatusDisplay for LcdPanel {
    fn show(
        &mut self,
        text: &str,
    ) {
        for line in &mut self.lines {
            line.clear();
        }
        for ch in text.chars().take(LCD_COLUMNS) {
            let ch = if ch.is_ascii_graphic() || ch == ' ' { ch } else { '?' };
            self.lines[0].push(ch).ok();
        }
        self.writes = self.writes.wrapping_add(1);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;

    /// Plain framebuffer draw target.
    struct Canvas {
        size: Size,
        pixels: Vec<Rgb565>,
    }

    impl Canvas {
        fn new(size: Size) -> Self {
            Self {
                size,
                pixels: vec![Rgb565::BLACK; (size.width * size.height) as usize],
            }
        }

        fn pixel(
            &self,
            x: u32,
            y: u32,
        ) -> Rgb565 {
            self.pixels[(y * self.size.width + x) as usize]
        }
    }

    impl OriginDimensions for Canvas {
        fn size(&self) -> Size { self.size }
    }

    impl DrawTarget for Canvas {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(
            &mut self,
            pixels: I,
        ) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if point.x >= 0
                    && point.y >= 0
                    && (point.x as u32) < self.size.width
                    && (point.y as u32) < self.size.height
                {
                    let index = (point.y as u32 * self.size.width + point.x as u32) as usize;
                    self.pixels[index] = color;
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_show_writes_first_line() {
        let mut panel = LcdPanel::new();
        panel.show("38.49");
        assert_eq!(panel.line(0), "38.49");
        assert_eq!(panel.line(1), "");
        assert_eq!(panel.writes(), 1);
    }

    #[test]
    fn test_show_replaces_previous_text() {
        let mut panel = LcdPanel::new();
        panel.show("ENGINE_OFF");
        panel.show("1.2");
        assert_eq!(panel.line(0), "1.2");
    }

    #[test]
    fn test_show_truncates_and_sanitizes() {
        let mut panel = LcdPanel::new();
        panel.show("0123456789ABCDEFGH");
        assert_eq!(panel.line(0), "0123456789ABCDEF");

        panel.show("5°C");
        assert_eq!(panel.line(0), "5?C");
    }

    #[test]
    fn test_line_out_of_range() {
        assert_eq!(LcdPanel::new().line(5), "");
    }

    #[test]
    fn test_draw_fills_panel() {
        let mut canvas = Canvas::new(LcdPanel::SIZE);
        let mut panel = LcdPanel::new();
        panel.show("8");
        panel.draw(&mut canvas, Point::zero()).unwrap();

        // Border is backlight, the first cell contains ink
        assert_eq!(canvas.pixel(0, 0), BACKLIGHT);
        let first_cell_has_ink = (0..CELL_HEIGHT).any(|y| {
            (0..CELL_WIDTH).any(|x| canvas.pixel(MARGIN + x, MARGIN + y) == INK)
        });
        assert!(first_cell_has_ink);

        // Empty second cell has no ink
        let second_x = MARGIN + CELL_WIDTH + CELL_GAP;
        let second_cell_has_ink = (0..CELL_HEIGHT).any(|y| {
            (0..CELL_WIDTH).any(|x| canvas.pixel(second_x + x, MARGIN + y) == INK)
        });
        assert!(!second_cell_has_ink);
    }
}
