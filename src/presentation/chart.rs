//! Horizontal ranked bar chart of failure occurrences, rendered to SVG.
use crate::analysis::OccurrenceCount;
use crate::error::ComputeError;
use plotters::coord::Shift;
use plotters::prelude::*;

const WIDTH: u32 = 1000;
const BAR_HEIGHT: u32 = 36;
const FRAME_HEIGHT: u32 = 140;

/// Renders the counts, highest first at the top. An empty series renders the
/// `placeholder` message instead of an empty axis.
pub fn render_ranking_svg(counts: &[OccurrenceCount], placeholder: &str) -> Result<String, ComputeError> {
    let height = FRAME_HEIGHT + BAR_HEIGHT * counts.len().max(1) as u32;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, height)).into_drawing_area();
        let drawn = if counts.is_empty() { draw_placeholder(&root, placeholder) } else { draw_ranking(&root, counts) };
        drawn.map_err(|e| ComputeError::Render(e.to_string()))?;
        root.present().map_err(|e| ComputeError::Render(e.to_string()))?;
    }
    Ok(svg)
}

fn draw_placeholder<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    message: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let (width, height) = root.dim_in_pixel();
    root.draw(&Text::new(
        message,
        (width as i32 / 2 - 90, height as i32 / 2 - 12),
        ("sans-serif", 24).into_font(),
    ))
}

fn draw_ranking<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    counts: &[OccurrenceCount],
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let rows = counts.len() as i32;
    let x_max = counts.iter().map(|count| count.occurrences).max().unwrap_or(0) as u32 + 1;
    // rank 0 is drawn on the top segment
    let label = |value: &SegmentValue<i32>| match value {
        SegmentValue::CenterOf(y) | SegmentValue::Exact(y) => usize::try_from(rows - 1 - y)
            .ok()
            .and_then(|rank| counts.get(rank))
            .map(|count| count.test_name.to_owned())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    };

    let mut chart = ChartBuilder::on(root)
        .caption("Most failed tests", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(240)
        .build_cartesian_2d(0u32..x_max, (0i32..rows).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(counts.len() + 1)
        .y_label_formatter(&label)
        .x_desc("Occurrences")
        .label_style(("sans-serif", 16))
        .draw()?;

    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(RGBColor(200, 0, 100).filled())
            .margin(6)
            .data(
                counts
                    .iter()
                    .enumerate()
                    .map(|(rank, count)| (rows - 1 - rank as i32, count.occurrences as u32)),
            ),
    )?;
    Ok(())
}
