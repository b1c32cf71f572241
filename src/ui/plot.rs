use eframe::egui::{Color32, Ui};
use egui_plot::{
    uniform_grid_spacer, AxisHints, Corner, HPlacement, Legend, Line, LineStyle, Plot, PlotPoints,
    PlotUi, Points,
};

use admit_trends::data::ProgramSeries;

use crate::color::SeriesColors;

const RIGHT_AXIS_LABEL: &str = "경쟁률 / 충원인원";

// ---------------------------------------------------------------------------
// Twin y-axis mapping
// ---------------------------------------------------------------------------

/// egui_plot has a single y coordinate space, so the right-hand axis
/// (competition ratio, fill count) is drawn by mapping its value range
/// linearly onto the plotted range of the left-hand axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwinAxis {
    primary: (f64, f64),
    secondary: (f64, f64),
}

fn padded_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        return None;
    }
    let magnitude = lo.abs().max(hi.abs());
    if hi - lo <= f64::EPSILON * magnitude.max(1.0) {
        let pad = (magnitude * 0.05).max(1.0);
        return Some((lo - pad, hi + pad));
    }
    Some((lo, hi))
}

impl TwinAxis {
    /// `primary` are left-axis values in plot coordinates; `secondary` are raw
    /// right-axis values.
    pub fn fit(
        primary: impl Iterator<Item = f64>,
        secondary: impl Iterator<Item = f64>,
    ) -> Self {
        let primary = padded_range(primary);
        let secondary = padded_range(secondary);
        let fallback = (0.0, 1.0);
        TwinAxis {
            primary: primary.or(secondary).unwrap_or(fallback),
            secondary: secondary.or(primary).unwrap_or(fallback),
        }
    }

    /// Right-axis value → plot coordinate.
    pub fn to_plot(&self, value: f64) -> f64 {
        let (p0, p1) = self.primary;
        let (s0, s1) = self.secondary;
        p0 + (value - s0) / (s1 - s0) * (p1 - p0)
    }

    /// Plot coordinate → right-axis value.
    pub fn from_plot(&self, y: f64) -> f64 {
        let (p0, p1) = self.primary;
        let (s0, s1) = self.secondary;
        s0 + (y - p0) / (p1 - p0) * (s1 - s0)
    }
}

/// Cutoff grades are drawn on a reversed axis: a lower (better) grade sits
/// higher on the chart.
fn cutoff_to_plot(grade: f64) -> f64 {
    -grade
}

/// Split a year-aligned series into contiguous runs of present values, so
/// missing years show up as gaps rather than interpolated lines.
pub fn segments(years: &[u16], values: &[Option<f64>], map: impl Fn(f64) -> f64) -> Vec<Vec<[f64; 2]>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (&year, value) in years.iter().zip(values) {
        match value {
            Some(v) => current.push([year as f64, map(*v)]),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

// ---------------------------------------------------------------------------
// Trend plot
// ---------------------------------------------------------------------------

fn draw_series(
    plot_ui: &mut PlotUi,
    name: &str,
    runs: Vec<Vec<[f64; 2]>>,
    color: Color32,
    style: LineStyle,
) {
    for run in runs {
        let line_points: PlotPoints = run.iter().copied().collect();
        let marker_points: PlotPoints = run.into_iter().collect();
        plot_ui.line(
            Line::new(line_points)
                .name(name)
                .color(color)
                .width(3.0)
                .style(style),
        );
        plot_ui.points(Points::new(marker_points).name(name).color(color).radius(4.0));
    }
}

/// Render the three-year trend of one program unit.
pub fn trend_plot(
    ui: &mut Ui,
    panel: usize,
    years: &[u16],
    series: &ProgramSeries,
    colors: &SeriesColors,
) {
    let twin = TwinAxis::fit(
        series.cutoff.iter().flatten().map(|&g| cutoff_to_plot(g)),
        series.ratio.iter().chain(&series.fill).flatten().copied(),
    );

    let left = AxisHints::new_y()
        .label(series.cutoff_axis_label.clone())
        // `+ 0.0` turns -0.0 into 0.0
        .formatter(|mark, _range| format!("{:.1}", -mark.value + 0.0));
    let right = AxisHints::new_y()
        .label(RIGHT_AXIS_LABEL)
        .placement(HPlacement::Right)
        .formatter(move |mark, _range| format!("{:.1}", twin.from_plot(mark.value)));

    let (first, last) = match (years.first(), years.last()) {
        (Some(&f), Some(&l)) => (f as f64, l as f64),
        _ => (0.0, 1.0),
    };

    Plot::new(("trend_plot", panel))
        .height(330.0)
        .legend(Legend::default().position(Corner::LeftTop))
        .x_axis_label("연도")
        .x_axis_formatter(|mark, _range| {
            if mark.value.fract().abs() < 1e-9 {
                format!("{:.0}", mark.value)
            } else {
                String::new()
            }
        })
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .custom_y_axes(vec![left, right])
        .include_x(first - 0.3)
        .include_x(last + 0.3)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            draw_series(
                plot_ui,
                "입결(등급)",
                segments(years, &series.cutoff, cutoff_to_plot),
                colors.cutoff,
                LineStyle::Solid,
            );
            draw_series(
                plot_ui,
                "경쟁률",
                segments(years, &series.ratio, |v| twin.to_plot(v)),
                colors.ratio,
                LineStyle::Dashed { length: 10.0 },
            );
            draw_series(
                plot_ui,
                "충원인원",
                segments(years, &series.fill, |v| twin.to_plot(v)),
                colors.fill,
                LineStyle::Dotted { spacing: 6.0 },
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEARS: [u16; 3] = [2023, 2024, 2025];

    #[test]
    fn missing_years_split_the_line() {
        let runs = segments(&YEARS, &[Some(2.1), None, Some(1.9)], |v| v);
        assert_eq!(runs, vec![vec![[2023.0, 2.1]], vec![[2025.0, 1.9]]]);

        let runs = segments(&YEARS, &[Some(2.1), Some(2.0), None], cutoff_to_plot);
        assert_eq!(runs, vec![vec![[2023.0, -2.1], [2024.0, -2.0]]]);

        assert!(segments(&YEARS, &[None, None, None], |v| v).is_empty());
    }

    #[test]
    fn twin_axis_maps_ranges_onto_each_other() {
        let twin = TwinAxis::fit([-3.0, -2.0].into_iter(), [10.0, 30.0].into_iter());
        assert_eq!(twin.to_plot(10.0), -3.0);
        assert_eq!(twin.to_plot(30.0), -2.0);
        assert_eq!(twin.to_plot(20.0), -2.5);
        assert!((twin.from_plot(twin.to_plot(17.0)) - 17.0).abs() < 1e-9);
    }

    #[test]
    fn twin_axis_survives_flat_or_missing_ranges() {
        // single value on each side: padded so the mapping stays finite
        let twin = TwinAxis::fit([-2.0].into_iter(), [5.0].into_iter());
        assert!(twin.to_plot(5.0).is_finite());

        // no cutoff values at all: right axis maps onto itself
        let twin = TwinAxis::fit(std::iter::empty(), [4.0, 8.0].into_iter());
        assert_eq!(twin.to_plot(6.0), 6.0);

        // flat and large: padding scales with the value
        let twin = TwinAxis::fit([-1e17].into_iter(), [3e16, 3e16].into_iter());
        let y = twin.to_plot(3e16);
        assert!(y.is_finite());
        assert!((twin.from_plot(y) - 3e16).abs() <= 3e16 * 1e-9);

        let twin = TwinAxis::fit(std::iter::empty(), std::iter::empty());
        assert_eq!(twin.from_plot(0.5), 0.5);
    }
}
