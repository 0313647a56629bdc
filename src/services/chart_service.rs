use std::io::Cursor;
use std::ops::Range;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::ChartSettings;
use crate::models::{ChartPlan, ChartRequest, Horizons, PricePoint, PriceRange, Predictions, TrendOverlay};
use crate::utils::annotation::{field_text, format_number, value_text};
use crate::utils::fonts::{MONO_FAMILY, SANS_FAMILY};
use crate::utils::{load_fonts, Annotation, Canvas, RenderError};

const FIGURE_BG: RGBColor = RGBColor(0x1a, 0x1a, 0x1a);
const PLOT_BG: RGBColor = RGBColor(0x0d, 0x0d, 0x0d);
const HISTORY_COLOR: RGBColor = RGBColor(0x00, 0xff, 0x88);
const TREND_COLOR: RGBColor = RGBColor(0xff, 0xaa, 0x00);
const LABEL_COLOR: RGBColor = RGBColor(0xaa, 0xaa, 0xaa);
const FRAME_COLOR: RGBColor = RGBColor(0x44, 0x44, 0x44);

// Font sizes in pixels: matplotlib points at 150 dpi
const TITLE_SIZE: f64 = 37.0;
const AXIS_LABEL_SIZE: f64 = 25.0;
const TICK_SIZE: f64 = 21.0;
const BOX_TEXT_SIZE: f64 = 21.0;

const X_LABEL_AREA: u32 = 90;
const Y_LABEL_AREA: u32 = 150;
const RIGHT_MARGIN: u32 = 60;
const BOX_MARGIN: i32 = 20;
const BOX_PADDING: i32 = 14;

/// Slack kept between the x axis and the calendar limits, beyond one axis span
const AXIS_HEADROOM_DAYS: i64 = 366;
/// Narrowest price span, relative to the prices, that still yields distinct ticks
const MIN_RELATIVE_SPAN: f64 = 1e-9;

/// Horizon offsets from the last historical date
pub const ONE_MONTH_DAYS: i64 = 30;
pub const SIX_MONTHS_DAYS: i64 = 180;
pub const ONE_YEAR_DAYS: i64 = 365;

/// Parse the JSON payload passed on the command line
pub fn parse_request(json: &str) -> Result<ChartRequest, RenderError> {
    Ok(serde_json::from_str(json)?)
}

/// Convert raw history entries into dated points
pub fn price_points(request: &ChartRequest) -> Result<Vec<PricePoint>, RenderError> {
    if request.price_history.is_empty() {
        return Err(RenderError::InvalidInput("priceHistory must contain at least one entry".to_string()));
    }

    request
        .price_history
        .iter()
        .map(|entry| {
            let timestamp = DateTime::<Utc>::from_timestamp_millis(entry.timestamp).ok_or_else(|| {
                RenderError::InvalidInput(format!("Timestamp out of range: {}", entry.timestamp))
            })?;
            Ok(PricePoint { timestamp, price: entry.price })
        })
        .collect()
}

/// The three forecast ranges, when the 1 year horizon is present
///
/// A payload that names the 1 year horizon must also carry the shorter ones.
pub fn horizons(predictions: &Predictions) -> Result<Option<Horizons>, RenderError> {
    let Some(one_year) = predictions.one_year else {
        return Ok(None);
    };
    let require = |range: Option<PriceRange>, key: &str| {
        range.ok_or_else(|| RenderError::InvalidInput(format!("predictions is missing '{}'", key)))
    };

    Ok(Some(Horizons {
        one_month: require(predictions.one_month, "predicted1Month")?,
        six_months: require(predictions.six_months, "predicted6Months")?,
        one_year,
    }))
}

/// Four-point forecast line from the last known price through each horizon midpoint
///
/// Fails when a horizon date would fall past the end of the calendar.
pub fn trend_overlay(last: PricePoint, horizons: &Horizons) -> Result<TrendOverlay, RenderError> {
    let at = |days: i64| {
        last.timestamp
            .checked_add_signed(Duration::days(days))
            .ok_or_else(|| RenderError::InvalidInput(format!("Forecast {} days after {} is out of range", days, last.timestamp)))
    };
    let one_year_date = at(ONE_YEAR_DAYS)?;

    Ok(TrendOverlay {
        points: [
            last,
            PricePoint { timestamp: at(ONE_MONTH_DAYS)?, price: horizons.one_month.midpoint() },
            PricePoint { timestamp: at(SIX_MONTHS_DAYS)?, price: horizons.six_months.midpoint() },
            PricePoint { timestamp: one_year_date, price: horizons.one_year.midpoint() },
        ],
        band: [
            last,
            PricePoint { timestamp: one_year_date, price: horizons.one_year.max },
            PricePoint { timestamp: one_year_date, price: horizons.one_year.min },
        ],
    })
}

/// Lines of the top-left statistics box
pub fn stats_lines(stats: &Map<String, Value>) -> Vec<String> {
    let mut note = Annotation::new("Price Statistics:");
    note.add_row("Current", format!("{} WL", field_text(stats, "currentPrice")))
        .add_row("Average", format!("{} WL", field_text(stats, "avgPrice")))
        .add_row(
            "Range",
            format!("{} - {} WL", field_text(stats, "minPrice"), field_text(stats, "maxPrice")),
        )
        .add_row("Volatility", field_text(stats, "volatilityLevel"))
        .add_row("Risk", field_text(stats, "riskLevel"))
        .add_row("Trend", field_text(stats, "trend"));
    note.render()
}

/// Lines of the top-right predictions box
pub fn prediction_lines(horizons: &Horizons, confidence: Option<&Value>) -> Vec<String> {
    let range = |r: &PriceRange| format!("{}-{} WL", format_number(r.min), format_number(r.max));
    let confidence = confidence.map(value_text).unwrap_or_else(|| "N/A".to_string());

    let mut note = Annotation::new("Predictions:");
    note.add_row("1 Month", range(&horizons.one_month))
        .add_row("6 Months", range(&horizons.six_months))
        .add_row("1 Year", range(&horizons.one_year))
        .add_row("Confidence", format!("{}%", confidence));
    note.render()
}

/// Decide every element of the chart from the request
pub fn plan_chart(request: &ChartRequest) -> Result<ChartPlan, RenderError> {
    let history = price_points(request)?;

    let mut trend = None;
    let mut predictions_box = None;
    if let Some(predictions) = &request.predictions {
        if let Some(h) = horizons(predictions)? {
            let last = history[history.len() - 1];
            trend = Some(trend_overlay(last, &h)?);
            predictions_box = Some(prediction_lines(&h, predictions.confidence.as_ref()));
        }
    }

    let stats_box = request
        .stats
        .as_ref()
        .filter(|stats| !stats.is_empty())
        .map(stats_lines);

    Ok(ChartPlan {
        title: format!("{} - Price Analysis & Predictions", request.item_name.to_uppercase()),
        history,
        trend,
        stats_box,
        predictions_box,
    })
}

fn date_label(date: &DateTime<Utc>, span: Duration) -> String {
    if span < Duration::days(3) {
        date.format("%b %d %H:%M").to_string()
    } else {
        date.format("%b %d").to_string()
    }
}

fn dates_out_of_range() -> RenderError {
    RenderError::InvalidInput("Dates are too close to the limits of the calendar to plot".to_string())
}

/// Axis extents covering history, forecast and band, with padding
///
/// Fails when the padded dates leave the calendar, or the prices cannot be
/// laid out on a finite axis.
fn axis_ranges(plan: &ChartPlan) -> Result<((DateTime<Utc>, DateTime<Utc>), (f64, f64)), RenderError> {
    let mut points: Vec<PricePoint> = plan.history.clone();
    if let Some(trend) = &plan.trend {
        points.extend_from_slice(&trend.points);
        points.extend_from_slice(&trend.band);
    }

    let mut x_min = points[0].timestamp;
    let mut x_max = points[0].timestamp;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for p in &points {
        x_min = x_min.min(p.timestamp);
        x_max = x_max.max(p.timestamp);
        y_min = y_min.min(p.price);
        y_max = y_max.max(p.price);
    }

    let x_span = x_max - x_min;
    let x_pad = if x_max > x_min {
        Duration::milliseconds((x_span.num_milliseconds() as f64 * 0.02) as i64)
    } else {
        Duration::days(1)
    };
    let x_lo = x_min.checked_sub_signed(x_pad).ok_or_else(dates_out_of_range)?;
    let x_hi = x_max.checked_add_signed(x_pad).ok_or_else(dates_out_of_range)?;

    // Date tick generation steps past either end by up to one tick interval
    let headroom = x_span + Duration::days(AXIS_HEADROOM_DAYS);
    if x_lo.checked_sub_signed(headroom).is_none() || x_hi.checked_add_signed(headroom).is_none() {
        return Err(dates_out_of_range());
    }

    let magnitude = y_min.abs().max(y_max.abs());
    let span = if y_max > y_min {
        (y_max - y_min).max(magnitude * MIN_RELATIVE_SPAN)
    } else {
        (magnitude * 0.1).max(1.0)
    };
    let (y_lo, y_hi) = (y_min - span * 0.1, y_max + span * 0.1);
    if !(y_lo.is_finite() && y_hi.is_finite() && (y_hi - y_lo).is_finite()) {
        return Err(RenderError::InvalidInput(format!(
            "Prices between {} and {} cannot be plotted",
            y_min, y_max
        )));
    }

    Ok(((x_lo, x_hi), (y_lo, y_hi)))
}

/// Which top corner of the plot an annotation box hugs
#[derive(Debug, Clone, Copy)]
enum Corner {
    Left,
    Right,
}

/// Framed box of text lines inside the top of the plot area
fn draw_text_box(
    root: &Canvas,
    lines: &[String],
    plot: &(Range<i32>, Range<i32>),
    corner: Corner,
    border: RGBColor,
) -> Result<(), RenderError> {
    let mut text = MultiLineText::<(i32, i32), &str>::new((0, 0), (MONO_FAMILY, BOX_TEXT_SIZE).into_font().color(&WHITE));
    for line in lines {
        text.push_line(line.as_str());
    }
    let (w, h) = text
        .estimate_dimension()
        .map_err(|e| RenderError::draw("measure annotation box", e))?;

    let (box_w, box_h) = (w + 2 * BOX_PADDING, h + 2 * BOX_PADDING);
    let x0 = match corner {
        Corner::Left => plot.0.start + BOX_MARGIN,
        Corner::Right => plot.0.end - BOX_MARGIN - box_w,
    };
    let y0 = plot.1.start + BOX_MARGIN;
    text.relocate((x0 + BOX_PADDING, y0 + BOX_PADDING));

    let corners = [(x0, y0), (x0 + box_w, y0 + box_h)];
    root.draw(&Rectangle::new(corners, FIGURE_BG.mix(0.9).filled()))
        .map_err(|e| RenderError::draw("fill annotation box", e))?;
    root.draw(&Rectangle::new(corners, border.stroke_width(2)))
        .map_err(|e| RenderError::draw("outline annotation box", e))?;
    root.draw(&text)
        .map_err(|e| RenderError::draw("draw annotation text", e))?;
    Ok(())
}

/// Render the planned chart into an RGB image
///
/// Fonts must already be registered (see [`load_fonts`]).
pub fn render_chart(plan: &ChartPlan, width: u32, height: u32) -> Result<RgbImage, RenderError> {
    let ((x_min, x_max), (y_min, y_max)) = axis_ranges(plan)?;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&FIGURE_BG)
            .map_err(|e| RenderError::draw("fill canvas", e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&plan.title, (SANS_FAMILY, TITLE_SIZE, FontStyle::Bold).into_font().color(&WHITE))
            .margin(20)
            .margin_right(RIGHT_MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| RenderError::draw("build chart", e))?;

        chart
            .plotting_area()
            .fill(&PLOT_BG)
            .map_err(|e| RenderError::draw("fill plot area", e))?;

        let span = x_max - x_min;
        let date_formatter = |date: &DateTime<Utc>| date_label(date, span);
        chart
            .configure_mesh()
            .x_labels(8)
            .y_labels(8)
            .x_label_formatter(&date_formatter)
            .label_style((SANS_FAMILY, TICK_SIZE).into_font().color(&LABEL_COLOR))
            .axis_desc_style((SANS_FAMILY, AXIS_LABEL_SIZE).into_font().color(&LABEL_COLOR))
            .bold_line_style(WHITE.mix(0.2))
            .light_line_style(WHITE.mix(0.05))
            .axis_style(FRAME_COLOR)
            .x_desc("Date")
            .y_desc("Price (WL)")
            .draw()
            .map_err(|e| RenderError::draw("draw mesh", e))?;

        // Confidence band under the lines
        if let Some(trend) = &plan.trend {
            let band: Vec<(DateTime<Utc>, f64)> = trend.band.iter().map(|p| (p.timestamp, p.price)).collect();
            chart
                .draw_series(std::iter::once(Polygon::new(band, TREND_COLOR.mix(0.15).filled())))
                .map_err(|e| RenderError::draw("draw confidence band", e))?
                .label("Confidence Interval")
                .legend(|(x, y)| Rectangle::new([(x, y - 6), (x + 30, y + 6)], TREND_COLOR.mix(0.3).filled()));
        }

        chart
            .draw_series(LineSeries::new(
                plan.history.iter().map(|p| (p.timestamp, p.price)),
                HISTORY_COLOR.stroke_width(3),
            ))
            .map_err(|e| RenderError::draw("draw price line", e))?
            .label("Historical Prices")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], HISTORY_COLOR.stroke_width(3)));
        chart
            .draw_series(plan.history.iter().map(|p| Circle::new((p.timestamp, p.price), 4, HISTORY_COLOR.filled())))
            .map_err(|e| RenderError::draw("draw price points", e))?;

        if let Some(trend) = &plan.trend {
            let points: Vec<(DateTime<Utc>, f64)> = trend.points.iter().map(|p| (p.timestamp, p.price)).collect();
            chart
                .draw_series(DashedLineSeries::new(points.clone(), 14, 8, TREND_COLOR.stroke_width(2)))
                .map_err(|e| RenderError::draw("draw predicted trend", e))?
                .label("Predicted Trend")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], TREND_COLOR.stroke_width(2)));
            chart
                .draw_series(
                    points
                        .into_iter()
                        .map(|c| EmptyElement::at(c) + Rectangle::new([(-5, -5), (5, 5)], TREND_COLOR.filled())),
                )
                .map_err(|e| RenderError::draw("draw predicted points", e))?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerLeft)
            .margin(20)
            .label_font((SANS_FAMILY, TICK_SIZE).into_font().color(&WHITE))
            .background_style(FIGURE_BG.mix(0.8))
            .border_style(FRAME_COLOR)
            .draw()
            .map_err(|e| RenderError::draw("draw legend", e))?;

        let plot = chart.plotting_area().get_pixel_range();
        if let Some(lines) = &plan.stats_box {
            draw_text_box(&root, lines, &plot, Corner::Left, HISTORY_COLOR)?;
        }
        if let Some(lines) = &plan.predictions_box {
            draw_text_box(&root, lines, &plot, Corner::Right, TREND_COLOR)?;
        }

        root.present()
            .map_err(|e| RenderError::draw("render chart", e))?;
    }

    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| RenderError::InvalidInput(format!("Chart buffer does not match {}x{}", width, height)))
}

/// Output format from the file extension; PNG unless JPEG or GIF is asked for
fn output_format(path: &Path) -> ImageFormat {
    match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif)) => format,
        _ => ImageFormat::Png,
    }
}

/// Parse `json`, render the chart and write it to `output_path`
pub fn generate_chart(json: &str, output_path: &Path, settings: &ChartSettings) -> Result<(), RenderError> {
    let request = parse_request(json)?;
    let plan = plan_chart(&request)?;
    debug!(
        "Chart plan for '{}': {} points, trend: {}, stats box: {}",
        request.item_name,
        plan.history.len(),
        plan.trend.is_some(),
        plan.stats_box.is_some()
    );

    let fonts = load_fonts(&settings.fonts)?;
    debug!("Chart text fonts: {:?}", fonts);
    let image = render_chart(&plan, settings.width, settings.height)?;

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), output_format(output_path))?;
    std::fs::write(output_path, bytes)?;

    info!("Chart for '{}' written to {}", request.item_name, output_path.display());
    Ok(())
}
