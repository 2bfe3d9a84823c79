//! Progress-bar image rendering.
//!
//! One 1000x200 PNG: a framed horizontal bar, filled green up to the current
//! first-dose coverage, with a marker line at the milestone and a
//! days-remaining caption. Pure coordinate arithmetic plus Plotters bitmap
//! drawing; all numbers come in via the snapshot.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::StatsSnapshot;
use crate::error::AppError;

const IMAGE_WIDTH: u32 = 1000;
const IMAGE_HEIGHT: u32 = 200;

/// Inner bar geometry: x spans [50, 950], so 900 pixels represent [0, 1].
const BAR_X0: i32 = 50;
const BAR_SPAN: f64 = 900.0;
const BAR_Y0: i32 = 50;
const BAR_Y1: i32 = 150;

const BACKGROUND: RGBColor = RGBColor(254, 255, 254);
const BAR_GREEN: RGBColor = RGBColor(0, 128, 0);

/// Render the progress bar for `snapshot` to a PNG at `path`.
///
/// `milestone_ratio` positions the vertical marker; the fill level comes from
/// `snapshot.first_dose_ratio` (already clamped to [0, 1] by the core).
pub fn render_progress_bar(
    path: &Path,
    snapshot: &StatsSnapshot,
    milestone_ratio: f64,
) -> Result<(), AppError> {
    let root = BitMapBackend::new(path, (IMAGE_WIDTH, IMAGE_HEIGHT)).into_drawing_area();

    let draw_err = |e: &dyn std::fmt::Display| {
        AppError::new(2, format!("Failed to draw '{}': {e}", path.display()))
    };

    root.fill(&BACKGROUND).map_err(|e| draw_err(&e))?;

    // Outer frame.
    root.draw(&Rectangle::new(
        [(25, 25), (975, 175)],
        ShapeStyle {
            color: BLACK.to_rgba(),
            filled: false,
            stroke_width: 2,
        },
    ))
    .map_err(|e| draw_err(&e))?;

    // Empty bar.
    root.draw(&Rectangle::new(
        [(BAR_X0, BAR_Y0), (950, BAR_Y1)],
        BLACK.filled(),
    ))
    .map_err(|e| draw_err(&e))?;

    // Fill up to the current coverage.
    let fill_x = bar_x(snapshot.first_dose_ratio);
    if fill_x > BAR_X0 {
        root.draw(&Rectangle::new(
            [(BAR_X0, BAR_Y0), (fill_x, BAR_Y1)],
            BAR_GREEN.filled(),
        ))
        .map_err(|e| draw_err(&e))?;
    }

    // Milestone marker.
    let marker_x = bar_x(milestone_ratio);
    root.draw(&PathElement::new(
        vec![(marker_x, BAR_Y0), (marker_x, BAR_Y1)],
        ShapeStyle {
            color: BAR_GREEN.to_rgba(),
            filled: false,
            stroke_width: 4,
        },
    ))
    .map_err(|e| draw_err(&e))?;

    let caption = format!(
        "Days to {:.0}%: {}",
        snapshot.target_ratio * 100.0,
        snapshot.days_to_go
    );
    root.draw(&Text::new(
        caption,
        (200, 70),
        ("sans-serif", 50).into_font().color(&WHITE),
    ))
    .map_err(|e| draw_err(&e))?;

    root.present()
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;

    Ok(())
}

/// Map a coverage ratio in [0, 1] to an x pixel inside the bar.
fn bar_x(ratio: f64) -> i32 {
    BAR_X0 + (BAR_SPAN * ratio).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_x_spans_the_inner_bar() {
        assert_eq!(bar_x(0.0), 50);
        assert_eq!(bar_x(1.0), 950);
    }

    #[test]
    fn bar_x_rounds_to_the_nearest_pixel() {
        assert_eq!(bar_x(0.7), 50 + 630);
        // 900 * 0.6945 = 625.05 -> 625
        assert_eq!(bar_x(0.6945), 675);
    }
}
