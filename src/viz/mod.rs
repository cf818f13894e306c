//! Render a side-by-side comparison of two countries to **SVG**.
//!
//! - One panel per field (every indicator, then `TOTAL`), each with its own Y scale
//! - Two bars per panel, labelled with their values
//! - Legend band at the bottom naming both countries

pub mod util;

use crate::compare::Comparison;
use crate::models::{AggregatedCountryTable, CountryRow, Field};
use anyhow::{Result, anyhow};
use log::info;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_svg::SVGBackend;

use std::path::Path;

use util::{estimate_text_width_px, fmt_value, office_color, truncate_to_width, value_range};

/// Default chart size in pixels.
pub const DEFAULT_WIDTH: u32 = 1800;
pub const DEFAULT_HEIGHT: u32 = 600;

const LEGEND_H: i32 = 48;
const TITLE_PX: u32 = 13;

/// Plot the chosen and the selected country of a comparison, chosen first.
pub fn plot_comparison<P: AsRef<Path>>(
    table: &AggregatedCountryTable,
    cmp: &Comparison,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    plot_countries(table, [&cmp.chosen, &cmp.selected], out_path, width, height)
}

/// Plot two countries field by field.
pub fn plot_countries<P: AsRef<Path>>(
    table: &AggregatedCountryTable,
    rows: [&CountryRow; 2],
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    let out_path = out_path.as_ref();
    if width < 100 || height < (LEGEND_H as u32) * 2 {
        return Err(anyhow!("chart size {width}x{height} is too small"));
    }
    let fields: Vec<Field> = (0..table.indicators.len())
        .map(Field::Indicator)
        .chain(std::iter::once(Field::Total))
        .collect();

    let path_string = out_path.to_string_lossy().into_owned();
    {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(&root, table, &fields, rows)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    info!("wrote comparison chart to {}", out_path.display());
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    table: &AggregatedCountryTable,
    fields: &[Field],
    rows: [&CountryRow; 2],
) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let (_, root_h) = root.dim_in_pixel();
    let (plot_area, legend_area) = root.split_vertically(root_h as i32 - LEGEND_H);

    let panels = plot_area.split_evenly((1, fields.len()));
    for (panel, &field) in panels.iter().zip(fields) {
        let (panel_w, _) = panel.dim_in_pixel();
        let title = truncate_to_width(table.field_name(field), TITLE_PX, panel_w.saturating_sub(8));
        let values = [rows[0].get(field), rows[1].get(field)];
        let (lo, hi) = value_range(values[0].unwrap_or(0.0), values[1].unwrap_or(0.0));

        let mut chart = ChartBuilder::on(panel)
            .margin(8)
            .caption(title, (FontFamily::SansSerif, TITLE_PX as f64))
            .x_label_area_size(0)
            .y_label_area_size(44)
            .build_cartesian_2d(0.0f64..2.0f64, lo..hi)
            .map_err(|e| anyhow!("{:?}", e))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_x_axis()
            .y_labels(5)
            .y_label_formatter(&|v: &f64| fmt_value(*v))
            .label_style((FontFamily::SansSerif, 11))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;

        for (j, v) in values.into_iter().enumerate() {
            // a missing value gets no bar, only an NA label at the baseline
            if let Some(v) = v {
                let x0 = j as f64 + 0.15;
                let x1 = j as f64 + 0.85;
                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [(x0, 0.0), (x1, v)],
                        office_color(j).filled(),
                    )))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
            let label_style = TextStyle::from((FontFamily::SansSerif, 11).into_font())
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            chart
                .draw_series(std::iter::once(Text::new(
                    v.map_or_else(|| "NA".to_string(), fmt_value),
                    (j as f64 + 0.5, v.unwrap_or(0.0).max(0.0)),
                    label_style,
                )))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    draw_legend(&legend_area, rows)
}

/// Color swatch + country name for both countries, centered in the band.
fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: [&CountryRow; 2],
) -> Result<()> {
    const FONT_PX: u32 = 14;
    const SWATCH: i32 = 14;
    const GAP: i32 = 32;

    let (w, h) = area.dim_in_pixel();
    let widths: Vec<i32> = rows
        .iter()
        .map(|r| SWATCH + 6 + estimate_text_width_px(&r.country, FONT_PX) as i32)
        .collect();
    let total: i32 = widths.iter().sum::<i32>() + GAP;
    let mut x = ((w as i32 - total) / 2).max(8);
    let y = (h as i32 - SWATCH) / 2;

    for (idx, (row, item_w)) in rows.iter().zip(&widths).enumerate() {
        area.draw(&Rectangle::new(
            [(x, y), (x + SWATCH, y + SWATCH)],
            office_color(idx).filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        area.draw(&Text::new(
            row.country.clone(),
            (x + SWATCH + 6, y),
            (FontFamily::SansSerif, FONT_PX as f64).into_font().color(&BLACK),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        x += item_w + GAP;
    }
    Ok(())
}
