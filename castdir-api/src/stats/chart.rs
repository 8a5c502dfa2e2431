//! Chart rendering for statistics
//!
//! All requested sections are stacked vertically under one title showing the
//! total and recently updated counts. Output is SVG.

use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;

use super::aggregate::{self, Share};
use super::{Section, StatsError, StatsReport};

/// MIME type of the rendered chart
pub const CHART_CONTENT_TYPE: &str = "image/svg+xml";

const WIDTH: u32 = 640;
const PANEL_HEIGHT: u32 = 480;
const TITLE_HEIGHT: u32 = 60;
const FONT: &str = "sans-serif";

const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

fn render_err<E: std::fmt::Display>(e: E) -> StatsError {
    StatsError::Render(e.to_string())
}

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Render every section of the report into one SVG document
pub fn render_svg(report: &StatsReport) -> Result<String, StatsError> {
    let panels = report.sections.len().max(1) as u32;
    let height = TITLE_HEIGHT + PANEL_HEIGHT * panels;
    let mut svg = String::new();

    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let title = format!(
            "Total Actors: {}, Total Updates: {}",
            report.total, report.total_updated
        );
        let body = root
            .titled(&title, (FONT, 26).into_font())
            .map_err(render_err)?;

        let areas = body.split_evenly((report.sections.len().max(1), 1));
        for (section, area) in report.sections.iter().zip(areas.iter()) {
            match section {
                Section::Country(shares) => draw_pie(
                    area,
                    "The Percentage of Actors Per Country",
                    &aggregate::country_chart_slices(shares),
                )?,
                Section::Gender(shares) => {
                    draw_pie(area, "The Gender Distribution of Actors", shares)?
                }
                Section::Age(ages) => draw_age_bars(area, &aggregate::decade_bins(ages))?,
                Section::LifeStatus(status) => {
                    let slices = status
                        .map(|s| {
                            vec![
                                Share { label: "Live".to_string(), percent: s.alive },
                                Share { label: "Dead".to_string(), percent: s.dead },
                            ]
                        })
                        .unwrap_or_default();
                    draw_pie(area, "The Life Status of Actors", &slices)?
                }
            }
        }

        root.present().map_err(render_err)?;
    }

    Ok(svg)
}

fn draw_no_data(area: &Area<'_>) -> Result<(), StatsError> {
    let (w, h) = area.dim_in_pixel();
    area.draw(&Text::new(
        "No data",
        (w as i32 / 2 - 30, h as i32 / 2),
        (FONT, 18).into_font(),
    ))
    .map_err(render_err)
}

fn draw_pie(area: &Area<'_>, title: &str, slices: &[Share]) -> Result<(), StatsError> {
    let area = area
        .titled(title, (FONT, 20).into_font())
        .map_err(render_err)?;

    let slices: Vec<&Share> = slices.iter().filter(|s| s.percent > 0.0).collect();
    if slices.is_empty() {
        return draw_no_data(&area);
    }

    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;
    let sizes: Vec<f64> = slices.iter().map(|s| s.percent).collect();
    let labels: Vec<String> = slices.iter().map(|s| s.label.clone()).collect();
    let colors: Vec<RGBColor> = (0..slices.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style((FONT, 14).into_font());
    pie.percentages((FONT, 12).into_font().color(&WHITE));
    area.draw(&pie).map_err(render_err)
}

fn draw_age_bars(area: &Area<'_>, bins: &[(u32, u32)]) -> Result<(), StatsError> {
    if bins.is_empty() {
        let area = area
            .titled("The Age Distribution of Actors", (FONT, 20).into_font())
            .map_err(render_err)?;
        return draw_no_data(&area);
    }

    let y_max = bins.iter().map(|&(_, count)| count).max().unwrap_or(0) + 1;
    let y_max = y_max + y_max / 10;

    let mut chart = ChartBuilder::on(area)
        .caption("The Age Distribution of Actors", (FONT, 20).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0u32..100u32, 0u32..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(10)
        .x_desc("Age (per decade)")
        .y_desc("Number of Actors")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(bins.iter().map(|&(bin, count)| {
            Rectangle::new([(bin + 1, 0), (bin + 9, count)], PALETTE[0].filled())
        }))
        .map_err(render_err)?;

    chart
        .draw_series(bins.iter().map(|&(bin, count)| {
            Text::new(count.to_string(), (bin + 4, count), (FONT, 14).into_font())
        }))
        .map_err(render_err)?;

    Ok(())
}
