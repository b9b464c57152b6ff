//! Panel chart drawing with plotters
//!
//! One function per panel. Each receives its own drawing area (one cell of
//! the dashboard grid) and the derived table of that panel. Empty tables are
//! drawn as a captioned notice instead of a chart.

use super::palettes::Palette;
use crate::context::Year;
use crate::panels::pyramid::{tick_label, PYRAMID_AXIS_LIMIT, PYRAMID_TICKS};
use crate::panels::{
    CategoryRevenue, DemographicPyramid, HeatmapMatrix, MonthlyRevenue, PriceDiscountBubbles,
    RatingByDimension,
};
use plotters::coord::ranged1d::SegmentedCoord;
use plotters::coord::types::{RangedCoordf64, RangedCoordi32};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Error type for drawing operations
pub type DrawError = Box<dyn std::error::Error>;
pub type DrawResult<T> = std::result::Result<T, DrawError>;

/// One grid cell of the page
pub type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Percent on x, age groups on y
type PyramidChart<'a, 'b> =
    ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, SegmentedCoord<RangedCoordi32>>>;

pub const MONTHLY_REVENUE_TITLE: &str = "Sales Revenue Performance by Month";
pub const CATEGORY_REVENUE_TITLE: &str = "Sales Performance by Categories";
pub const RATING_TITLE: &str = "Average Rating by Customer";
pub const BUBBLE_TITLE: &str = "Impact of Price and Discount on Sale";
pub const PYRAMID_TITLE: &str = "Demographic Distribution";
pub const HEATMAP_TITLE: &str = "Seasonal Sales Performance by Categories";

pub const BUBBLE_NOTE: &str = "Bubble size: Discount(%)";

const FONT: &str = "sans-serif";
const CAPTION_SIZE: i32 = 18;
const LABEL_SIZE: i32 = 12;

/// Panel title retitled with the selected year
pub fn caption(title: &str, year: Year) -> String {
    format!("{} in {}", title, year)
}

/// Label of a categorical axis position; only segment centers are labeled
fn segment_label<S: AsRef<str>>(value: &SegmentValue<i32>, labels: &[S]) -> String {
    match value {
        SegmentValue::CenterOf(i) if *i >= 0 => labels
            .get(*i as usize)
            .map(|s| s.as_ref().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Upper bound of a value axis with some headroom; never zero
fn headroom(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Caption plus a "No data" notice
pub fn draw_empty(area: &Area, title: &str, year: Year) -> DrawResult<()> {
    let inner = area.titled(&caption(title, year), (FONT, CAPTION_SIZE))?;
    let (width, height) = inner.dim_in_pixel();
    inner.draw(&Text::new(
        format!("No data for {}", year),
        (width as i32 / 2 - 50, height as i32 / 2),
        (FONT, 16).into_font().color(&BLACK.mix(0.6)),
    ))?;
    Ok(())
}

pub fn draw_monthly_revenue(
    area: &Area,
    data: &MonthlyRevenue,
    year: Year,
    palette: &Palette,
) -> DrawResult<()> {
    if data.is_empty() {
        return draw_empty(area, MONTHLY_REVENUE_TITLE, year);
    }

    let series = data.labeled();
    let labels: Vec<&str> = series.iter().map(|(month, _)| *month).collect();
    let y_max = headroom(series.iter().map(|(_, revenue)| *revenue).fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(area)
        .caption(caption(MONTHLY_REVENUE_TITLE, year), (FONT, CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(70)
        .build_cartesian_2d((0..labels.len() as i32).into_segmented(), 0f64..y_max)?;

    let x_fmt = |v: &SegmentValue<i32>| segment_label(v, &labels);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&x_fmt)
        .x_desc("Month")
        .y_desc("Sales Revenue")
        .label_style((FONT, LABEL_SIZE))
        .draw()?;

    let color = palette.series(0);
    let points: Vec<(SegmentValue<i32>, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, (_, revenue))| (SegmentValue::CenterOf(i as i32), *revenue))
        .collect();

    chart.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?;
    chart.draw_series(
        points
            .into_iter()
            .map(|point| Circle::new(point, 3, color.filled())),
    )?;

    Ok(())
}

pub fn draw_category_revenue(
    area: &Area,
    data: &CategoryRevenue,
    year: Year,
    palette: &Palette,
) -> DrawResult<()> {
    if data.is_empty() {
        return draw_empty(area, CATEGORY_REVENUE_TITLE, year);
    }

    let categories = data.categories();
    let age_groups = data.age_groups();
    let y_max = headroom(
        categories
            .iter()
            .map(|c| data.category_total(c))
            .fold(0.0, f64::max),
    );

    let mut chart = ChartBuilder::on(area)
        .caption(caption(CATEGORY_REVENUE_TITLE, year), (FONT, CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(70)
        .build_cartesian_2d((0..categories.len() as i32).into_segmented(), 0f64..y_max)?;

    let x_fmt = |v: &SegmentValue<i32>| segment_label(v, &categories);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(categories.len())
        .x_label_formatter(&x_fmt)
        .x_desc("Category")
        .y_desc("Sale")
        .label_style((FONT, LABEL_SIZE))
        .draw()?;

    // Running top of each category's stack
    let mut stack_top = vec![0.0; categories.len()];

    for (group_idx, age_group) in age_groups.iter().enumerate() {
        let color = palette.series(group_idx);
        let mut bars = Vec::new();
        for row in data.rows.iter().filter(|r| r.age_group == *age_group) {
            let Some(cat_idx) = categories.iter().position(|c| *c == row.category) else {
                continue;
            };
            let bottom = stack_top[cat_idx];
            stack_top[cat_idx] += row.revenue;
            bars.push(Rectangle::new(
                [
                    (SegmentValue::Exact(cat_idx as i32), bottom),
                    (SegmentValue::Exact(cat_idx as i32 + 1), stack_top[cat_idx]),
                ],
                color.filled(),
            ));
        }

        chart
            .draw_series(bars)?
            .label(age_group.to_string())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, LABEL_SIZE))
        .draw()?;

    Ok(())
}

pub fn draw_rating(
    area: &Area,
    data: &RatingByDimension,
    year: Year,
    palette: &Palette,
) -> DrawResult<()> {
    if data.is_empty() {
        return draw_empty(area, RATING_TITLE, year);
    }

    let labels: Vec<&str> = data.points.iter().map(|p| p.value.as_str()).collect();
    let y_max = headroom(data.points.iter().map(|p| p.rating).fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(area)
        .caption(caption(RATING_TITLE, year), (FONT, CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d((0..labels.len() as i32).into_segmented(), 0f64..y_max)?;

    let x_fmt = |v: &SegmentValue<i32>| segment_label(v, &labels);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&x_fmt)
        .x_desc(data.axis_label())
        .y_desc("Rating")
        .label_style((FONT, LABEL_SIZE))
        .draw()?;

    let color = palette.series(0);
    chart.draw_series(data.points.iter().enumerate().map(|(i, p)| {
        Circle::new(
            (SegmentValue::CenterOf(i as i32), p.rating),
            5,
            color.filled(),
        )
    }))?;

    Ok(())
}

pub fn draw_bubbles(
    area: &Area,
    data: &PriceDiscountBubbles,
    year: Year,
    palette: &Palette,
) -> DrawResult<()> {
    if data.is_empty() {
        return draw_empty(area, BUBBLE_TITLE, year);
    }

    let (_, height) = area.dim_in_pixel();
    let (plot_area, note_area) = area.split_vertically(height as i32 - 24);

    let min_price = data.points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let max_price = data.points.iter().map(|p| p.price).fold(0.0, f64::max);
    let pad = ((max_price - min_price) * 0.05).max(1.0);
    let y_max = headroom(data.points.iter().map(|p| p.sales_count as f64).fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(caption(BUBBLE_TITLE, year), (FONT, CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d((min_price - pad)..(max_price + pad), 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Price")
        .y_desc("Sale Count")
        .label_style((FONT, LABEL_SIZE))
        .draw()?;

    let max_discount = data.max_discount();
    let color = palette.series(0);
    chart.draw_series(data.points.iter().map(|p| {
        let scale = if max_discount > 0.0 {
            p.discount / max_discount
        } else {
            0.0
        };
        Circle::new(
            (p.price, p.sales_count as f64),
            3 + (scale * 15.0).round() as i32,
            color.mix(0.6).filled(),
        )
    }))?;

    note_area.draw(&Text::new(
        BUBBLE_NOTE,
        (12, 4),
        (FONT, LABEL_SIZE).into_font(),
    ))?;

    Ok(())
}

pub fn draw_pyramid(
    area: &Area,
    data: &DemographicPyramid,
    year: Year,
    palette: &Palette,
) -> DrawResult<()> {
    if data.is_empty() {
        return draw_empty(area, PYRAMID_TITLE, year);
    }

    let age_groups = data.age_groups();

    let mut chart = ChartBuilder::on(area)
        .caption(caption(PYRAMID_TITLE, year), (FONT, CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(
            -PYRAMID_AXIS_LIMIT..PYRAMID_AXIS_LIMIT,
            (0..age_groups.len() as i32).into_segmented(),
        )?;

    // Default x labels are suppressed; the fixed ticks are drawn below
    let x_fmt = |_: &f64| String::new();
    let y_fmt = |v: &SegmentValue<i32>| segment_label(v, &age_groups);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_label_formatter(&x_fmt)
        .y_labels(age_groups.len())
        .y_label_formatter(&y_fmt)
        .x_desc("Demographic in %")
        .label_style((FONT, LABEL_SIZE))
        .draw()?;

    draw_pyramid_ticks(area, &chart, age_groups.len() as i32)?;

    let series = [("Male", &data.male, 0usize), ("Female", &data.female, 1usize)];
    for (name, bars, color_idx) in series {
        let color = palette.series(color_idx);
        let rects: Vec<_> = bars
            .iter()
            .filter_map(|bar| {
                let idx = age_groups.iter().position(|g| *g == bar.age_group)? as i32;
                Some(Rectangle::new(
                    [
                        (bar.percent.min(0.0), SegmentValue::Exact(idx)),
                        (bar.percent.max(0.0), SegmentValue::Exact(idx + 1)),
                    ],
                    color.filled(),
                ))
            })
            .collect();

        chart
            .draw_series(rects)?
            .label(name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, LABEL_SIZE))
        .draw()?;

    Ok(())
}

/// Grid line and `tick_label` text at each fixed pyramid tick
fn draw_pyramid_ticks(
    area: &Area,
    chart: &PyramidChart,
    rows: i32,
) -> DrawResult<()> {
    let grid = BLACK.mix(0.15).stroke_width(1);
    let tick = BLACK.stroke_width(1);
    let (base_x, base_y) = area.get_base_pixel();
    let style =
        TextStyle::from((FONT, LABEL_SIZE).into_font()).pos(Pos::new(HPos::Center, VPos::Top));

    for &value in PYRAMID_TICKS.iter() {
        let (x, bottom) = chart.backend_coord(&(value, SegmentValue::Exact(0)));
        let (_, top) = chart.backend_coord(&(value, SegmentValue::Exact(rows)));
        let x = x - base_x;
        let (top, bottom) = (top - base_y, bottom - base_y);

        area.draw(&PathElement::new(vec![(x, top), (x, bottom)], grid))?;
        area.draw(&PathElement::new(vec![(x, bottom), (x, bottom + 5)], tick))?;
        area.draw(&Text::new(tick_label(value), (x, bottom + 7), style.clone()))?;
    }
    Ok(())
}

pub fn draw_heatmap(
    area: &Area,
    data: &HeatmapMatrix,
    year: Year,
    palette: &Palette,
) -> DrawResult<()> {
    if data.is_empty() {
        return draw_empty(area, HEATMAP_TITLE, year);
    }

    let (width, _) = area.dim_in_pixel();
    let (plot_area, key_area) = area.split_horizontally(width as i32 - 70);

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(caption(HEATMAP_TITLE, year), (FONT, CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (0..data.buckets.len() as i32).into_segmented(),
            (0..data.categories.len() as i32).into_segmented(),
        )?;

    let x_fmt = |v: &SegmentValue<i32>| segment_label(v, &data.buckets);
    let y_fmt = |v: &SegmentValue<i32>| segment_label(v, &data.categories);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(data.buckets.len())
        .x_label_formatter(&x_fmt)
        .y_labels(data.categories.len())
        .y_label_formatter(&y_fmt)
        .x_desc(data.granularity.label())
        .y_desc("Category")
        .label_style((FONT, LABEL_SIZE))
        .draw()?;

    let max = data.max_value().max(1) as f64;
    chart.draw_series(data.cells.iter().enumerate().flat_map(|(row, values)| {
        values.iter().enumerate().map(move |(column, value)| {
            let color = palette.scale(*value as f64 / max);
            Rectangle::new(
                [
                    (SegmentValue::Exact(column as i32), SegmentValue::Exact(row as i32)),
                    (
                        SegmentValue::Exact(column as i32 + 1),
                        SegmentValue::Exact(row as i32 + 1),
                    ),
                ],
                color.filled(),
            )
        })
    }))?;

    draw_color_key(&key_area, data.max_value(), palette)
}

/// Vertical color strip for the heatmap, labeled with 0 and the maximum
fn draw_color_key(area: &Area, max: i64, palette: &Palette) -> DrawResult<()> {
    const STEPS: i32 = 20;
    let (_, height) = area.dim_in_pixel();
    let top = 50;
    let bottom = (height as i32 - 50).max(top + STEPS);
    let step = (bottom - top) / STEPS;

    area.draw(&Text::new("Sales Count", (0, top - 20), (FONT, LABEL_SIZE)))?;
    for i in 0..STEPS {
        // Highest value at the top
        let t = 1.0 - i as f64 / (STEPS - 1) as f64;
        let y = top + i * step;
        area.draw(&Rectangle::new(
            [(10, y), (30, y + step)],
            palette.scale(t).filled(),
        ))?;
    }
    area.draw(&Text::new(max.to_string(), (34, top), (FONT, LABEL_SIZE)))?;
    area.draw(&Text::new("0", (34, top + STEPS * step - LABEL_SIZE), (FONT, LABEL_SIZE)))?;

    Ok(())
}
