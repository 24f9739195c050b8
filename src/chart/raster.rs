// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! PNG rasterization of bar and line charts

use super::{ChartKind, ChartSpec};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use std::path::Path;

pub const CHART_WIDTH: u32 = 1024;
pub const CHART_HEIGHT: u32 = 768;

const MARGIN: i32 = 80;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([40, 40, 40]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const GRID_LINES: i32 = 5;

/// Series colours, cycled when there are more series than entries
pub const PALETTE: [Rgb<u8>; 8] = [
    Rgb([31, 119, 180]),
    Rgb([255, 127, 14]),
    Rgb([44, 160, 44]),
    Rgb([214, 39, 40]),
    Rgb([148, 103, 189]),
    Rgb([140, 86, 75]),
    Rgb([227, 119, 194]),
    Rgb([127, 127, 127]),
];

pub fn series_color(idx: usize) -> Rgb<u8> {
    PALETTE[idx % PALETTE.len()]
}

/// Render the chart and save it as PNG
pub fn render_png(spec: &ChartSpec, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    rasterize(spec)
        .save(path)
        .with_context(|| format!("Failed to save chart to {}", path.display()))?;
    Ok(())
}

/// Draw the chart into an image
pub fn rasterize(spec: &ChartSpec) -> RgbImage {
    let mut image = RgbImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, BACKGROUND);
    let plot = PlotArea::new(spec.max_value());

    plot.draw_grid(&mut image);

    match &spec.kind {
        ChartKind::Bar { values, .. } => {
            let slot = plot.width() as f64 / values.len().max(1) as f64;
            let bar_width = (slot * 0.6).max(1.0);
            for (idx, value) in values.iter().enumerate() {
                let left = plot.left as f64 + slot * idx as f64 + (slot - bar_width) / 2.0;
                let top = plot.y_to_px(*value);
                fill_rect(
                    &mut image,
                    left.round() as i32,
                    top,
                    (left + bar_width).round() as i32,
                    plot.bottom,
                    series_color(0),
                );
            }
        }
        ChartKind::Line { x, series } => {
            let x_min = x.iter().copied().min().unwrap_or(0) as f64;
            let x_max = x.iter().copied().max().unwrap_or(0) as f64;

            for (idx, s) in series.iter().enumerate() {
                let color = series_color(idx);
                let points: Vec<(i32, i32)> = x
                    .iter()
                    .zip(&s.values)
                    .map(|(&xv, &yv)| (plot.x_to_px(xv as f64, x_min, x_max), plot.y_to_px(yv)))
                    .collect();

                for pair in points.windows(2) {
                    draw_line(&mut image, pair[0], pair[1], 2, color);
                }
                for &(px, py) in &points {
                    fill_rect(&mut image, px - 4, py - 4, px + 4, py + 4, color);
                }

                // legend swatch, top right
                let top = MARGIN / 2 + idx as i32 * 18;
                let right = CHART_WIDTH as i32 - MARGIN / 2;
                fill_rect(&mut image, right - 14, top, right, top + 12, color);
            }
        }
    }

    plot.draw_axes(&mut image);
    image
}

struct PlotArea {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
    y_max: f64,
}

impl PlotArea {
    fn new(max_value: f64) -> Self {
        let y_max = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };
        Self {
            left: MARGIN,
            right: CHART_WIDTH as i32 - MARGIN,
            top: MARGIN,
            bottom: CHART_HEIGHT as i32 - MARGIN,
            y_max,
        }
    }

    fn width(&self) -> i32 {
        self.right - self.left
    }

    fn height(&self) -> i32 {
        self.bottom - self.top
    }

    fn y_to_px(&self, value: f64) -> i32 {
        let t = (value / self.y_max).clamp(0.0, 1.0);
        self.bottom - (t * self.height() as f64).round() as i32
    }

    fn x_to_px(&self, value: f64, min: f64, max: f64) -> i32 {
        if max <= min {
            return self.left + self.width() / 2;
        }
        let t = (value - min) / (max - min);
        self.left + (t * self.width() as f64).round() as i32
    }

    fn draw_grid(&self, image: &mut RgbImage) {
        for step in 1..=GRID_LINES {
            let y = self.bottom - self.height() * step / GRID_LINES;
            draw_line(image, (self.left, y), (self.right, y), 0, GRID);
        }
    }

    fn draw_axes(&self, image: &mut RgbImage) {
        draw_line(image, (self.left, self.bottom), (self.right, self.bottom), 1, AXIS);
        draw_line(image, (self.left, self.top), (self.left, self.bottom), 1, AXIS);
        for step in 0..=GRID_LINES {
            let y = self.bottom - self.height() * step / GRID_LINES;
            draw_line(image, (self.left - 6, y), (self.left, y), 0, AXIS);
        }
    }
}

fn put(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

fn fill_rect(image: &mut RgbImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>) {
    for y in y0.min(y1)..=y0.max(y1) {
        for x in x0.min(x1)..=x0.max(x1) {
            put(image, x, y, color);
        }
    }
}

/// Bresenham line with a square brush of radius `thickness`
fn draw_line(
    image: &mut RgbImage,
    from: (i32, i32),
    to: (i32, i32),
    thickness: i32,
    color: Rgb<u8>,
) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        fill_rect(image, x - thickness, y - thickness, x + thickness, y + thickness, color);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Series;
    use tempfile::TempDir;

    fn count(image: &RgbImage, color: Rgb<u8>) -> usize {
        image.pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn test_bar_heights_scale_with_value() {
        let spec = ChartSpec {
            title: "FPS simple".into(),
            x_label: "model".into(),
            y_label: "FPS".into(),
            kind: ChartKind::Bar {
                categories: vec!["a".into(), "b".into()],
                values: vec![50.0, 100.0],
            },
        };
        let image = rasterize(&spec);
        let plot = PlotArea::new(100.0);
        let slot = plot.width() / 2;
        let column = |idx: i32| -> usize {
            let x = (plot.left + slot * idx + slot / 2) as u32;
            (0..CHART_HEIGHT)
                .filter(|&y| *image.get_pixel(x, y) == series_color(0))
                .count()
        };

        let short = column(0);
        let tall = column(1);
        assert!(short > 0);
        assert!(tall > short * 3 / 2, "tall={tall} short={short}");
    }

    #[test]
    fn test_line_chart_draws_every_series() {
        let spec = ChartSpec {
            title: "FPS forward by point lights".into(),
            x_label: "point lights".into(),
            y_label: "FPS".into(),
            kind: ChartKind::Line {
                x: vec![50, 100, 150],
                series: vec![
                    Series {
                        label: "a".into(),
                        values: vec![90.0, 60.0, 30.0],
                    },
                    Series {
                        label: "b".into(),
                        values: vec![45.0, 40.0, 35.0],
                    },
                ],
            },
        };
        let image = rasterize(&spec);
        assert!(count(&image, series_color(0)) > 100);
        assert!(count(&image, series_color(1)) > 100);
        assert_eq!(count(&image, series_color(2)), 0);
    }

    #[test]
    fn test_zero_values_do_not_panic() {
        let spec = ChartSpec {
            title: "FPS simple".into(),
            x_label: "model".into(),
            y_label: "FPS".into(),
            kind: ChartKind::Bar {
                categories: vec!["a".into()],
                values: vec![0.0],
            },
        };
        let image = rasterize(&spec);
        assert_eq!(image.dimensions(), (CHART_WIDTH, CHART_HEIGHT));
    }

    #[test]
    fn test_png_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("fps.png");
        let spec = ChartSpec {
            title: "FPS simple".into(),
            x_label: "model".into(),
            y_label: "FPS".into(),
            kind: ChartKind::Bar {
                categories: vec!["a".into()],
                values: vec![42.0],
            },
        };
        render_png(&spec, &path).unwrap();

        use image::GenericImageView;
        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.dimensions(), (CHART_WIDTH, CHART_HEIGHT));
    }
}
