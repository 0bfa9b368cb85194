use crate::error::{Result, YearmapError};
use crate::grid::{week_ending_sunday, YearHeatmap, DAYS_PER_WEEK, WEEKS};
use crate::model::Cell;
use resvg::{tiny_skia, usvg};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: [u8; 3],
    pub alpha: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self { rgb: [r, g, b], alpha }
    }

    fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.rgb[0], self.rgb[1], self.rgb[2])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub no_activity: Rgba,
    pub has_activity: Rgba,
    pub text: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            no_activity: Rgba::new(0x80, 0x80, 0x80, 0.2),
            has_activity: Rgba::new(0x7f, 0xff, 0x00, 0.9),
            text: Rgba::new(0x80, 0x80, 0x80, 1.0),
        }
    }
}

impl Palette {
    pub fn fill(&self, cell: Cell) -> Option<Rgba> {
        match cell {
            Cell::OutsideYear => None,
            Cell::NoActivity => Some(self.no_activity),
            Cell::HasActivity => Some(self.has_activity),
        }
    }
}

/// Pixel geometry of the picture before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub slot: f32,
    pub gap: f32,
    pub margin_left: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            slot: 16.0,
            gap: 3.0,
            margin_left: 44.0,
            margin_top: 40.0,
            margin_right: 16.0,
            margin_bottom: 56.0,
        }
    }
}

impl Layout {
    pub fn width(&self) -> f32 {
        self.margin_left + WEEKS as f32 * self.slot + self.margin_right
    }

    pub fn height(&self) -> f32 {
        self.margin_top + DAYS_PER_WEEK as f32 * self.slot + self.margin_bottom
    }

    pub fn cell_size(&self) -> f32 {
        self.slot - self.gap
    }

    /// Top-left corner of the square for `(week, weekday)`; Monday is the top row.
    pub fn cell_origin(&self, week: usize, weekday: usize) -> (f32, f32) {
        let half_gap = self.gap / 2.0;
        (
            self.margin_left + week as f32 * self.slot + half_gap,
            self.margin_top + weekday as f32 * self.slot + half_gap,
        )
    }
}

pub struct Renderer {
    palette: Palette,
    layout: Layout,
    scale: f32,
    options: usvg::Options<'static>,
}

impl Renderer {
    pub fn new(palette: Palette, layout: Layout, scale: f32) -> Self {
        let mut fonts = usvg::fontdb::Database::new();
        fonts.load_system_fonts();
        debug!(faces = fonts.len(), "loaded system fonts");

        let options = usvg::Options {
            fontdb: Arc::new(fonts),
            ..usvg::Options::default()
        };

        Self {
            palette,
            layout,
            scale: if scale > 0.0 { scale } else { 1.0 },
            options,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn render_svg(&self, heatmap: &YearHeatmap) -> String {
        let l = &self.layout;
        let text = self.palette.text;
        let mut svg = String::new();

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = l.width(),
            h = l.height(),
        );

        let _ = writeln!(
            svg,
            r#"<text class="title" x="{x}" y="{y}" font-family="sans-serif" font-size="14" text-anchor="middle" fill="{fill}" fill-opacity="{a}">{title}</text>"#,
            x = l.margin_left + WEEKS as f32 * l.slot / 2.0,
            y = l.margin_top / 2.0 + 5.0,
            fill = text.hex(),
            a = text.alpha,
            title = heatmap.title(),
        );

        for (weekday, row) in heatmap.rows().iter().enumerate() {
            for (week, cell) in row.iter().enumerate() {
                let Some(fill) = self.palette.fill(*cell) else {
                    continue;
                };
                let (x, y) = l.cell_origin(week, weekday);
                let _ = writeln!(
                    svg,
                    r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" fill="{fill}" fill-opacity="{a}"/>"#,
                    s = l.cell_size(),
                    fill = fill.hex(),
                    a = fill.alpha,
                );
            }
        }

        for (weekday, label) in WEEKDAY_LABELS.iter().enumerate() {
            let _ = writeln!(
                svg,
                r#"<text class="y-label" x="{x}" y="{y}" font-family="sans-serif" font-size="10" text-anchor="end" fill="{fill}">{label}</text>"#,
                x = l.margin_left - 6.0,
                y = l.margin_top + weekday as f32 * l.slot + l.slot / 2.0 + 3.5,
                fill = text.hex(),
            );
        }

        for week in (0..WEEKS).step_by(2) {
            let Some(sunday) = week_ending_sunday(heatmap.year(), week) else {
                continue;
            };
            let x = l.margin_left + week as f32 * l.slot + l.slot / 2.0;
            let y = l.margin_top + DAYS_PER_WEEK as f32 * l.slot + 12.0;
            let _ = writeln!(
                svg,
                r#"<text class="x-label" x="{x}" y="{y}" transform="rotate(-45 {x} {y})" font-family="sans-serif" font-size="9" text-anchor="end" fill="{fill}">{label}</text>"#,
                fill = text.hex(),
                label = sunday.format("%b %d"),
            );
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Rasterize the heatmap to PNG bytes on a transparent canvas.
    pub fn render_png(&self, heatmap: &YearHeatmap) -> Result<Vec<u8>> {
        let svg = self.render_svg(heatmap);
        let tree = usvg::Tree::from_str(&svg, &self.options)
            .map_err(|e| YearmapError::Render(format!("Invalid heatmap scene: {e}")))?;

        let size = tree.size().to_int_size();
        let width = (size.width() as f32 * self.scale).ceil() as u32;
        let height = (size.height() as f32 * self.scale).ceil() as u32;
        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            YearmapError::Render(format!("Cannot allocate a {width}x{height} canvas"))
        })?;

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(self.scale, self.scale),
            &mut pixmap.as_mut(),
        );

        pixmap
            .encode_png()
            .map_err(|e| YearmapError::Render(format!("PNG encoding failed: {e}")))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Palette::default(), Layout::default(), 1.0)
    }
}
