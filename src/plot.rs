//! SVG export of the stacked figure.

use crate::figure::{tick_decimals, Figure, Panel};
use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

/// Default canvas size in pixels
pub const DEFAULT_SIZE: (u32, u32) = (1200, 1400);

/// Write the figure to an SVG file, one row per panel
pub fn save_svg<P: AsRef<Path>>(figure: &Figure, path: P, size: (u32, u32)) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((figure.panels.len(), 1));
    for (panel, area) in figure.panels.iter().zip(areas.iter()) {
        draw_panel(panel, area)
            .with_context(|| format!("Failed to draw panel: {}", panel.label))?;
    }

    root.present()
        .with_context(|| format!("Failed to write plot: {}", path.display()))?;
    log::info!("Saved figure to {}", path.display());
    Ok(())
}

fn draw_panel(panel: &Panel, area: &DrawingArea<SVGBackend<'_>, Shift>) -> Result<()> {
    let (x_min, x_max) = panel.x_bounds;
    let (y_min, y_max) = panel.y_bounds;

    let ticks = panel.x_ticks.clone().unwrap_or_default();
    let decimals = tick_decimals(&ticks);
    let format_tick = move |v: &f64| format!("{:.*}", decimals, v);

    // Panels sit close together; only the bottom one reserves room for time labels
    let mut chart = ChartBuilder::on(area)
        .margin_top(4)
        .margin_bottom(2)
        .margin_left(10)
        .margin_right(20)
        .x_label_area_size(if ticks.is_empty() { 0 } else { 30 })
        .y_label_area_size(50)
        .build_cartesian_2d((x_min..x_max).with_key_points(ticks.clone()), y_min..y_max)?;

    chart
        .configure_mesh()
        .y_labels(4)
        .x_labels(ticks.len())
        .x_label_formatter(&format_tick)
        .light_line_style(WHITE)
        .draw()?;

    chart.draw_series(LineSeries::new(panel.points.iter().copied(), &BLUE))?;

    let (width, height) = area.dim_in_pixel();
    let label_style = TextStyle::from(("sans-serif", 16).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    area.draw(&Text::new(
        panel.label,
        ((width / 2) as i32, (height / 10) as i32),
        label_style,
    ))?;

    Ok(())
}
