// PNG snapshot of the committed fleet dataset
//
// Layout: one panel per equipment in a three-column grid. Each panel plots the
// daily series against a fixed 70-100 axis with a dashed KPI line and an
// average bar along the bottom.
use crate::domain::equipment::parse_hex_color;
use crate::domain::fleet::{EquipmentSeries, KPI_THRESHOLD};
use crate::domain::period::Period;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use std::io::Cursor;

const COLUMNS: u32 = 3;
const PANEL_WIDTH: u32 = 360;
const PANEL_HEIGHT: u32 = 220;
const GAP: u32 = 24;
const PADDING: u32 = 16;
const AVG_BAR_HEIGHT: u32 = 10;

const AXIS_MIN: f64 = 70.0;
const AXIS_MAX: f64 = 100.0;
const GRID_LINES: [f64; 4] = [70.0, 80.0, 90.0, 100.0];

const BACKGROUND: Rgb<u8> = Rgb([0xf8, 0xfa, 0xfc]);
const PANEL: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const BORDER: Rgb<u8> = Rgb([0xe2, 0xe8, 0xf0]);
const GRID: Rgb<u8> = Rgb([0xf1, 0xf5, 0xf9]);
const KPI_LINE: Rgb<u8> = Rgb([0xf4, 0x3f, 0x5e]);
const TRACK: Rgb<u8> = Rgb([0xe2, 0xe8, 0xf0]);

/// Canvas size in pixels for `count` panels at `scale`.
pub fn canvas_size(count: usize, scale: u32) -> (u32, u32) {
    let rows = (count as u32).div_ceil(COLUMNS);
    let width = GAP + COLUMNS * (PANEL_WIDTH + GAP);
    let height = GAP + rows * (PANEL_HEIGHT + GAP);
    (width * scale, height * scale)
}

pub fn render_png(series: &[EquipmentSeries], scale: u32) -> anyhow::Result<Vec<u8>> {
    let scale = scale.clamp(1, 4);
    let (width, height) = canvas_size(series.len(), scale);
    let mut canvas = Canvas {
        image: RgbImage::from_pixel(width, height, BACKGROUND),
        scale,
    };

    for (index, s) in series.iter().enumerate() {
        let column = index as u32 % COLUMNS;
        let row = index as u32 / COLUMNS;
        let x = GAP + column * (PANEL_WIDTH + GAP);
        let y = GAP + row * (PANEL_HEIGHT + GAP);
        canvas.draw_panel(x, y, s);
    }

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(canvas.image).write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

pub fn png_filename(period: Period) -> String {
    format!("Fleet_Dashboard_{}_{}.png", period.month_name(), period.year())
}

/// Draws in unscaled layout units; `scale` is applied per pixel.
struct Canvas {
    image: RgbImage,
    scale: u32,
}

impl Canvas {
    fn draw_panel(&mut self, x: u32, y: u32, series: &EquipmentSeries) {
        let color = series_color(series);

        self.fill_rect(x, y, PANEL_WIDTH, PANEL_HEIGHT, BORDER);
        self.fill_rect(x + 1, y + 1, PANEL_WIDTH - 2, PANEL_HEIGHT - 2, PANEL);
        // Header stripe in the equipment color
        self.fill_rect(x + 1, y + 1, PANEL_WIDTH - 2, 4, color);

        let plot_x = x + PADDING;
        let plot_y = y + PADDING + 4;
        let plot_w = PANEL_WIDTH - 2 * PADDING;
        let plot_h = PANEL_HEIGHT - 3 * PADDING - 4 - AVG_BAR_HEIGHT;

        let to_y = |value: f64| -> f64 {
            let clamped = value.clamp(AXIS_MIN, AXIS_MAX);
            plot_y as f64 + (AXIS_MAX - clamped) / (AXIS_MAX - AXIS_MIN) * plot_h as f64
        };

        for level in GRID_LINES {
            let gy = to_y(level).round() as u32;
            self.fill_rect(plot_x, gy, plot_w, 1, GRID);
        }

        let kpi_y = to_y(KPI_THRESHOLD).round() as u32;
        let mut dash_x = plot_x;
        while dash_x < plot_x + plot_w {
            let len = 6_u32.min(plot_x + plot_w - dash_x);
            self.fill_rect(dash_x, kpi_y, len, 1, KPI_LINE);
            dash_x += 10;
        }

        let readings = series.readings();
        let step = if series.days() > 1 {
            plot_w as f64 / (series.days() - 1) as f64
        } else {
            0.0
        };
        let points: Vec<(f64, f64)> = readings
            .iter()
            .enumerate()
            .map(|(i, r)| (plot_x as f64 + i as f64 * step, to_y(r.value)))
            .collect();

        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], color);
        }
        for &(px, py) in &points {
            self.fill_rect(px.round() as u32, py.round() as u32, 2, 2, color);
        }

        // Average bar: full track is 100%
        let bar_y = y + PANEL_HEIGHT - PADDING - AVG_BAR_HEIGHT;
        self.fill_rect(plot_x, bar_y, plot_w, AVG_BAR_HEIGHT, TRACK);
        let filled = (series.avg().clamp(0.0, 100.0) / 100.0 * plot_w as f64).round() as u32;
        self.fill_rect(plot_x, bar_y, filled, AVG_BAR_HEIGHT, color);
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
        let s = self.scale;
        let x_end = ((x + w) * s).min(self.image.width());
        let y_end = ((y + h) * s).min(self.image.height());
        for py in (y * s)..y_end {
            for px in (x * s)..x_end {
                self.image.put_pixel(px, py, color);
            }
        }
    }

    /// Bresenham line, one layout unit thick.
    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
        let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
        let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x0 >= 0 && y0 >= 0 {
                self.fill_rect(x0 as u32, y0 as u32, 1, 1, color);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

fn series_color(series: &EquipmentSeries) -> Rgb<u8> {
    let [r, g, b] = parse_hex_color(series.color).unwrap_or([0x64, 0x74, 0x8b]);
    Rgb([r, g, b])
}
