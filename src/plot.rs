//! Diagnostic chart of a sample polyline with violating segments highlighted

use crate::monotone::{Point, Violation};
use anyhow::{anyhow, Result};
use plotters::prelude::*;

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    let pad = ((hi - lo) * 0.05).max(1e-9);
    (lo - pad, hi + pad)
}

/// Draws the samples as a black polyline and each violation as a red segment
pub fn plot_samples(samples: &[Point], violations: &[Violation], out_path: &str) -> Result<()> {
    if samples.is_empty() {
        return Err(anyhow!("nothing to plot: no samples"));
    }
    let (x_lo, x_hi) = samples.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
    let (y_lo, y_hi) = samples.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    let (x_lo, x_hi) = padded(x_lo, x_hi);
    let (y_lo, y_hi) = padded(y_lo, y_hi);

    let root = BitMapBackend::new(out_path, (1200, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(
            format!("Samples ({} violations)", violations.len()),
            ("sans-serif", 28),
        )
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
    chart.configure_mesh().draw()?;
    chart.draw_series(LineSeries::new(samples.iter().map(|p| (p.x, p.y)), &BLACK))?;
    for v in violations {
        chart.draw_series(LineSeries::new(
            [(v.x0, v.y0), (v.x1, v.y1)],
            RED.stroke_width(3),
        ))?;
        chart.draw_series(std::iter::once(Circle::new((v.x1, v.y1), 4, RED.filled())))?;
    }
    root.present()?;
    Ok(())
}
