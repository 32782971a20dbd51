//! Layout of the six-panel figure, independent of the drawing backend.

use crate::sample::{Column, SimulationSamples};

/// Number of stacked panels
pub const PANEL_COUNT: usize = 6;

/// Upper bound of the tick count on the shared time axis
const MAX_X_TICKS: usize = 6;

/// Autoscale margin, as a fraction of the data span
const MARGIN: f64 = 0.05;

/// How a panel's y-axis range is chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YRange {
    /// From zero up to the data maximum plus margin
    FromZero,
    /// Fixed range, whatever the data
    Fixed(f64, f64),
}

/// Static description of one panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSpec {
    pub label: &'static str,
    pub column: Column,
    pub y_range: YRange,
}

/// Panels from top to bottom. Only the last one shows time ticks.
pub const PANELS: [PanelSpec; PANEL_COUNT] = [
    PanelSpec {
        label: "avg latency",
        column: Column::AvgLatency,
        y_range: YRange::FromZero,
    },
    PanelSpec {
        label: "slowdown",
        column: Column::Slowdown,
        y_range: YRange::FromZero,
    },
    PanelSpec {
        label: "queue_length",
        column: Column::QueueLength,
        y_range: YRange::FromZero,
    },
    PanelSpec {
        label: "timeouts",
        column: Column::TimedOut,
        y_range: YRange::FromZero,
    },
    PanelSpec {
        label: "drop_p",
        column: Column::DropP,
        y_range: YRange::Fixed(0.0, 1.0),
    },
    PanelSpec {
        label: "rejected",
        column: Column::Rejected,
        y_range: YRange::FromZero,
    },
];

/// A panel with its axes resolved against the data
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub label: &'static str,
    /// Finite (t, value) pairs in file order
    pub points: Vec<(f64, f64)>,
    pub x_bounds: (f64, f64),
    pub y_bounds: (f64, f64),
    /// Tick positions on the time axis; `None` when ticks are suppressed
    pub x_ticks: Option<Vec<f64>>,
}

/// Six vertically stacked panels sharing one time axis
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub panels: Vec<Panel>,
}

impl Figure {
    pub fn from_samples(samples: &SimulationSamples) -> Self {
        let t = samples.t();
        // the shared time axis spans exactly the tick grid, so labels sit on ticks
        let ticks = nice_ticks(x_bounds(t), MAX_X_TICKS);
        let x_bounds = match (ticks.first(), ticks.last()) {
            (Some(&lo), Some(&hi)) if hi > lo => (lo, hi),
            _ => x_bounds(t),
        };
        let last = PANELS.len() - 1;

        let panels = PANELS
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let points: Vec<(f64, f64)> = t
                    .iter()
                    .zip(samples.series(spec.column))
                    .filter(|(x, y)| x.is_finite() && y.is_finite())
                    .map(|(x, y)| (*x, *y))
                    .collect();

                let y_bounds = match spec.y_range {
                    YRange::Fixed(lo, hi) => (lo, hi),
                    YRange::FromZero => (0.0, autoscale_top(points.iter().map(|p| p.1))),
                };

                Panel {
                    label: spec.label,
                    points,
                    x_bounds,
                    y_bounds,
                    x_ticks: (i == last).then(|| ticks.clone()),
                }
            })
            .collect();

        Self { panels }
    }
}

/// Time range of the data, widened when empty or degenerate
fn x_bounds(t: &[f64]) -> (f64, f64) {
    let Some((lo, hi)) = finite_range(t.iter().copied()) else {
        return (0.0, 1.0);
    };
    if hi > lo {
        (lo, hi)
    } else if lo == 0.0 {
        (0.0, 1.0)
    } else {
        (lo - lo.abs() * MARGIN, hi + hi.abs() * MARGIN)
    }
}

/// Top of an autoscaled axis whose bottom is pinned at zero
fn autoscale_top<I: Iterator<Item = f64>>(values: I) -> f64 {
    let Some((lo, hi)) = finite_range(values) else {
        return 1.0;
    };
    let top = if hi > lo {
        hi + (hi - lo) * MARGIN
    } else if hi == 0.0 {
        MARGIN
    } else {
        hi + hi.abs() * MARGIN
    };
    if top > 0.0 {
        top
    } else {
        1.0
    }
}

fn finite_range<I: Iterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Evenly spaced ticks on a 1/2/5 x 10^k step, widened outward to cover `bounds`
pub fn nice_ticks(bounds: (f64, f64), max_ticks: usize) -> Vec<f64> {
    let (lo, hi) = bounds;
    let span = hi - lo;
    if span.is_nan() || span <= 0.0 || max_ticks < 2 {
        return vec![lo];
    }

    let raw_step = span / (max_ticks - 1) as f64;
    let exponent = raw_step.log10().floor() as i32;
    let magnitude = 10f64.powi(exponent);
    let mantissa = [1i64, 2, 5, 10]
        .into_iter()
        .find(|m| *m as f64 * magnitude >= raw_step * (1.0 - 1e-9))
        .unwrap_or(10);
    let step = mantissa as f64 * magnitude;

    let first = (lo / step + 1e-9).floor() as i64;
    let last = (hi / step - 1e-9).ceil() as i64;
    (first..=last)
        .map(|k| {
            // whole units of the magnitude, so 0.6 comes out as 0.6
            let units = (k * mantissa) as f64;
            if exponent >= 0 {
                units * magnitude
            } else {
                units / 10f64.powi(-exponent)
            }
        })
        .collect()
}

/// Labels for evenly spaced ticks, with as many decimals as the step needs
pub fn tick_labels(ticks: &[f64]) -> Vec<String> {
    let decimals = tick_decimals(ticks);
    ticks.iter().map(|v| format!("{:.*}", decimals, v)).collect()
}

/// Decimal places that tell neighbouring ticks apart
pub fn tick_decimals(ticks: &[f64]) -> usize {
    match ticks {
        [a, b, ..] if b > a => (-(b - a).log10() - 1e-9).ceil().max(0.0) as usize,
        _ => 0,
    }
}
