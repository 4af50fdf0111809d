#![cfg(not(tarpaulin_include))]
use std::collections::HashMap;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use indexmap::IndexMap;
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::binning::PrestigeCategories;
use crate::context::DashboardContext;
use crate::crosstab::CrossTab;
use crate::error::{Error, Result};
use crate::selection::Categorical;
use crate::stats::{BoxStats, LinearFit, kernel_density, linspace, sorted};
use crate::summary::{GroupSummary, SUMMARY_HEADERS};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

const FONT: &str = "sans-serif";

/// Configuration options for chart generation
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl ChartOptions {
    pub fn new(title: &str, x_label: &str, y_label: &str, width: u32, height: u32) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            width,
            height,
        }
    }
}

/// Colour of a category: `male` blue, `female` green, anything else from
/// the default palette by position.
pub fn category_color(label: &str, index: usize) -> RGBAColor {
    match label {
        "male" => BLUE.to_rgba(),
        "female" => GREEN.to_rgba(),
        _ => Palette99::pick(index).to_rgba(),
    }
}

/// Group `(category, value)` pairs by category in first-appearance order.
pub fn group_by_category(pairs: &[(&str, f64)]) -> Vec<(String, Vec<f64>)> {
    let mut groups: IndexMap<&str, Vec<f64>> = IndexMap::new();
    for &(category, value) in pairs {
        groups.entry(category).or_default().push(value);
    }
    groups
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Draw into an in-memory RGB bitmap and encode it as PNG.
fn render_png<F>(width: u32, height: u32, draw: F) -> Result<Vec<u8>>
where
    F: for<'a> FnOnce(&Area<'a>) -> DrawResult,
{
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| Error::Render(e.to_string()))?;
        draw(&root).map_err(|e| Error::Render(e.to_string()))?;
        root.present().map_err(|e| Error::Render(e.to_string()))?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&buffer, width, height, ColorType::Rgb8)
        .map_err(|e| Error::Render(e.to_string()))?;
    Ok(png)
}

fn label_style(size: f64) -> TextStyle<'static> {
    (FONT, size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top))
}

/// Renders the per-sex summary as a table image.
///
/// Header row on a dark background, body rows alternating, values rounded
/// to two decimals.
pub fn summary_table(summary: &[GroupSummary]) -> Result<Vec<u8>> {
    let width = 1000u32;
    let row_height = 40u32;
    let height = row_height * (summary.len() as u32 + 1);
    let col_width = (width / SUMMARY_HEADERS.len() as u32) as i32;

    render_png(width, height, |root| {
        let header_bg = RGBColor(0, 8, 62);
        let stripe = RGBColor(242, 229, 255);
        let rh = row_height as i32;

        let mut rows: Vec<[String; 5]> = vec![SUMMARY_HEADERS.map(str::to_string)];
        rows.extend(summary.iter().map(GroupSummary::cells));

        for (r, cells) in rows.iter().enumerate() {
            let top = r as i32 * rh;
            let (bg, fg) = match r {
                0 => (header_bg, WHITE),
                r if r % 2 == 1 => (stripe, BLACK),
                _ => (WHITE, BLACK),
            };
            root.draw(&Rectangle::new(
                [(0, top), (width as i32, top + rh)],
                bg.filled(),
            ))?;

            for (c, text) in cells.iter().enumerate() {
                let style = (FONT, 16)
                    .into_font()
                    .color(&fg)
                    .pos(Pos::new(HPos::Left, VPos::Center));
                root.draw(&Text::new(
                    text.clone(),
                    (c as i32 * col_width + 10, top + rh / 2),
                    style,
                ))?;
            }
        }
        Ok(())
    })
}

/// Violin chart of one numeric field, one violin per category.
///
/// Each violin is a mirrored kernel density estimate over the group's
/// range with the interquartile box drawn inside.
pub fn violin(groups: &[(String, Vec<f64>)], options: &ChartOptions) -> Result<Vec<u8>> {
    let all: Vec<f64> = groups.iter().flat_map(|(_, v)| v.iter().copied()).collect();
    let all = sorted(&all);
    let (y_min, y_max) = match (all.first(), all.last()) {
        (Some(&lo), Some(&hi)) if hi > lo => {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        }
        (Some(&lo), Some(_)) => (lo - 1.0, lo + 1.0),
        _ => (0.0, 1.0),
    };
    let n = groups.len().max(1) as f64;

    render_png(options.width, options.height, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(&options.title, (FONT, 22).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..n, y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()?;

        for (i, (name, values)) in groups.iter().enumerate() {
            let center = i as f64 + 0.5;
            let color = category_color(name, i);
            let values = sorted(values);

            if let (Some(&lo), Some(&hi)) = (values.first(), values.last()) {
                let grid = linspace(lo, hi, 100);
                let density = kernel_density(&values, &grid);
                let peak = density.iter().cloned().fold(0.0, f64::max);
                let scale = if peak > 0.0 { 0.4 / peak } else { 0.0 };

                let mut outline: Vec<(f64, f64)> = grid
                    .iter()
                    .zip(&density)
                    .map(|(&y, &d)| (center - d * scale, y))
                    .collect();
                outline.extend(
                    grid.iter()
                        .zip(&density)
                        .rev()
                        .map(|(&y, &d)| (center + d * scale, y)),
                );

                chart.draw_series(std::iter::once(Polygon::new(
                    outline.clone(),
                    color.mix(0.4).filled(),
                )))?;
                outline.push(outline[0]);
                chart.draw_series(std::iter::once(PathElement::new(
                    outline,
                    color.stroke_width(2),
                )))?;
            }

            if let Some(stats) = BoxStats::from_values(&values) {
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(center - 0.03, stats.q1), (center + 0.03, stats.q3)],
                    BLACK.mix(0.7).filled(),
                )))?;
                chart.draw_series(std::iter::once(Circle::new(
                    (center, stats.median),
                    3,
                    WHITE.filled(),
                )))?;
            }

            let (px, py) = chart.backend_coord(&(center, y_min));
            root.draw(&Text::new(name.clone(), (px, py + 8), label_style(15.0)))?;
        }
        Ok(())
    })
}

/// Horizontal box chart of income per sex, one facet per prestige
/// category, two facets per row.
pub fn prestige_box(prestige: &PrestigeCategories, options: &ChartOptions) -> Result<Vec<u8>> {
    let facets = prestige.income_by_bin();
    let labels: Vec<String> = (0..facets.len())
        .map(|i| prestige.label(i).unwrap_or_default().to_string())
        .collect();

    let mut sexes: Vec<&str> = Vec::new();
    let mut incomes = Vec::new();
    for &(sex, income) in facets.iter().flatten() {
        if !sexes.contains(&sex) {
            sexes.push(sex);
        }
        incomes.push(income);
    }
    let incomes = sorted(&incomes);
    let (x_min, x_max) = match (incomes.first(), incomes.last()) {
        (Some(&lo), Some(&hi)) if hi > lo => (lo, hi),
        (Some(&lo), Some(_)) => (lo - 1.0, lo + 1.0),
        _ => (0.0, 1.0),
    };
    let bands = sexes.len().max(1) as f64;

    render_png(options.width, options.height, |root| {
        let root = root.titled(&options.title, (FONT, 22).into_font())?;
        let rows = facets.len().div_ceil(2).max(1);
        let panels = root.split_evenly((rows, 2));

        for ((panel, samples), label) in panels.iter().zip(&facets).zip(&labels) {
            let mut chart = ChartBuilder::on(panel)
                .caption(
                    format!("Occupational Prestige Category={}", label),
                    (FONT, 14).into_font(),
                )
                .margin(8)
                .x_label_area_size(30)
                .y_label_area_size(50)
                .build_cartesian_2d(x_min..x_max, 0f64..bands)?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_labels(0)
                .x_labels(5)
                .x_desc(&options.x_label)
                .draw()?;

            for (j, sex) in sexes.iter().enumerate() {
                let values: Vec<f64> = samples
                    .iter()
                    .filter(|(s, _)| s == sex)
                    .map(|&(_, v)| v)
                    .collect();
                let Some(stats) = BoxStats::from_values(&values) else {
                    continue;
                };
                let color = category_color(sex, j);
                let mid = j as f64 + 0.5;

                chart.draw_series(std::iter::once(Rectangle::new(
                    [(stats.q1, mid - 0.3), (stats.q3, mid + 0.3)],
                    color.mix(0.3).filled(),
                )))?;
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(stats.q1, mid - 0.3), (stats.q3, mid + 0.3)],
                    color.stroke_width(2),
                )))?;
                chart.draw_series([
                    PathElement::new(
                        vec![(stats.median, mid - 0.3), (stats.median, mid + 0.3)],
                        color.stroke_width(2),
                    ),
                    PathElement::new(
                        vec![(stats.min, mid), (stats.q1, mid)],
                        color.stroke_width(1),
                    ),
                    PathElement::new(
                        vec![(stats.q3, mid), (stats.max, mid)],
                        color.stroke_width(1),
                    ),
                ])?;
                chart.draw_series(std::iter::once(Text::new(
                    sex.to_string(),
                    (x_min, mid + 0.45),
                    (FONT, 12).into_font().color(&color),
                )))?;
            }
        }
        Ok(())
    })
}

/// Scatter of two numeric fields coloured by category, with an ordinary
/// least squares trend line per category.
pub fn scatter_with_trend(
    groups: &[(String, Vec<(f64, f64)>)],
    options: &ChartOptions,
) -> Result<Vec<u8>> {
    let xs = sorted(&groups.iter().flat_map(|(_, p)| p.iter().map(|p| p.0)).collect::<Vec<_>>());
    let ys = sorted(&groups.iter().flat_map(|(_, p)| p.iter().map(|p| p.1)).collect::<Vec<_>>());
    let range = |s: &[f64]| match (s.first(), s.last()) {
        (Some(&lo), Some(&hi)) if hi > lo => (lo, hi),
        (Some(&lo), Some(_)) => (lo - 1.0, lo + 1.0),
        _ => (0.0, 1.0),
    };
    let (x_min, x_max) = range(&xs);
    let (y_min, y_max) = range(&ys);

    render_png(options.width, options.height, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(&options.title, (FONT, 22).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()?;

        for (i, (name, points)) in groups.iter().enumerate() {
            let color = category_color(name, i);
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.6).filled())),
                )?
                .label(name.as_str())
                .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));

            if let Some(fit) = LinearFit::ordinary_least_squares(points) {
                let lo = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
                let hi = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
                debug!("{} trend: slope {:.3}, intercept {:.3}", name, fit.slope, fit.intercept);
                chart.draw_series(LineSeries::new(
                    [(lo, fit.predict(lo)), (hi, fit.predict(hi))],
                    color.stroke_width(2),
                ))?;
            }
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    })
}

/// Grouped bar chart of a cross-tab: one group per x category, one bar
/// per y category, counts printed over the bars.
///
/// An empty cross-tab renders axes and a "no data" caption.
pub fn grouped_bar(table: &CrossTab, options: &ChartOptions) -> Result<Vec<u8>> {
    let nx = table.x_categories.len();
    let ny = table.y_categories.len();
    let y_max = (table.max_count() as f64 * 1.1).max(1.0);
    let title = if table.is_empty() {
        format!("{} (no data)", options.title)
    } else {
        options.title.clone()
    };

    render_png(options.width, options.height, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(&title, (FONT, 22).into_font())
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..nx.max(1) as f64, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .x_desc(table.x.name())
            .y_desc("Count")
            .draw()?;

        let bar = 0.8 / ny.max(1) as f64;
        for (j, y_value) in table.y_categories.iter().enumerate() {
            let color = category_color(y_value, j);
            let bars = (0..nx).map(|i| {
                let count = table.rows[i * ny + j].count as f64;
                let left = i as f64 + 0.1 + j as f64 * bar;
                Rectangle::new([(left, 0.0), (left + bar, count)], color.filled())
            });
            chart
                .draw_series(bars)?
                .label(y_value.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });

            for i in 0..nx {
                let count = table.rows[i * ny + j].count;
                let center = i as f64 + 0.1 + (j as f64 + 0.5) * bar;
                let (px, py) = chart.backend_coord(&(center, count as f64));
                let style = (FONT, 11)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Bottom));
                root.draw(&Text::new(count.to_string(), (px, py - 2), style))?;
            }
        }

        for (i, x_value) in table.x_categories.iter().enumerate() {
            let (px, py) = chart.backend_coord(&(i as f64 + 0.5, 0.0));
            root.draw(&Text::new(x_value.clone(), (px, py + 8), label_style(13.0)))?;
        }

        if ny > 0 {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }
        Ok(())
    })
}

/// Charts that do not depend on user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StaticChart {
    SummaryTable,
    IncomeViolin,
    PrestigeViolin,
    PrestigeBox,
    PrestigeIncomeScatter,
}

impl StaticChart {
    pub const ALL: [StaticChart; 5] = [
        StaticChart::SummaryTable,
        StaticChart::IncomeViolin,
        StaticChart::PrestigeViolin,
        StaticChart::PrestigeBox,
        StaticChart::PrestigeIncomeScatter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StaticChart::SummaryTable => "summary_table",
            StaticChart::IncomeViolin => "income_violin",
            StaticChart::PrestigeViolin => "prestige_violin",
            StaticChart::PrestigeBox => "prestige_box",
            StaticChart::PrestigeIncomeScatter => "prestige_income_scatter",
        }
    }

    /// Look up a chart by its `<name>.png` file name.
    pub fn from_file_name(file: &str) -> Option<Self> {
        let name = file.strip_suffix(".png")?;
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Build this chart from the context.
    pub fn render(self, ctx: &DashboardContext) -> Result<Vec<u8>> {
        match self {
            StaticChart::SummaryTable => summary_table(ctx.summary()),
            StaticChart::IncomeViolin => {
                let groups = group_by_category(&ctx.dataset().numeric_by_sex(|r| r.income));
                violin(
                    &groups,
                    &ChartOptions::new("Distribution of Income by Gender", "", "Income", 600, 600),
                )
            }
            StaticChart::PrestigeViolin => {
                let groups = group_by_category(&ctx.dataset().numeric_by_sex(|r| r.job_prestige));
                violin(
                    &groups,
                    &ChartOptions::new(
                        "Distribution of Occupation Prestige by Gender",
                        "",
                        "Occupational Prestige",
                        600,
                        600,
                    ),
                )
            }
            StaticChart::PrestigeBox => prestige_box(
                ctx.prestige(),
                &ChartOptions::new(
                    "Occupational Prestige Categories by Gender",
                    "Income",
                    "Gender",
                    1000,
                    600,
                ),
            ),
            StaticChart::PrestigeIncomeScatter => {
                let mut groups: IndexMap<&str, Vec<(f64, f64)>> = IndexMap::new();
                for r in ctx.dataset().respondents() {
                    if let (Some(sex), Some(prestige), Some(income)) =
                        (r.sex.as_deref(), r.job_prestige, r.income)
                    {
                        groups.entry(sex).or_default().push((prestige, income));
                    }
                }
                let groups: Vec<(String, Vec<(f64, f64)>)> = groups
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect();
                scatter_with_trend(
                    &groups,
                    &ChartOptions::new(
                        "Occupational Prestige Vs Income",
                        "Occupational Prestige",
                        "Income",
                        600,
                        600,
                    ),
                )
            }
        }
    }
}

/// PNG bytes of every static chart, rendered once at startup.
#[derive(Clone, Debug, Default)]
pub struct RenderedCharts {
    images: HashMap<StaticChart, Vec<u8>>,
}

impl RenderedCharts {
    pub fn render_all(ctx: &DashboardContext) -> Result<Self> {
        let mut images = HashMap::new();
        for chart in StaticChart::ALL {
            let png = chart.render(ctx)?;
            debug!("rendered {} ({} bytes)", chart.name(), png.len());
            images.insert(chart, png);
        }
        Ok(RenderedCharts { images })
    }

    pub fn get(&self, chart: StaticChart) -> Option<&[u8]> {
        self.images.get(&chart).map(Vec::as_slice)
    }
}

/// Render the interactive chart for a cross-tab.
pub fn crosstab_chart(table: &CrossTab) -> Result<Vec<u8>> {
    let title = format!("Number of respondents by {} and {}", table.x.name(), table.y.name());
    grouped_bar(table, &ChartOptions::new(&title, table.x.name(), "Count", 900, 500))
}
