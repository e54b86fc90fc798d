//! Diagnostic plot renderers
//!
//! Thin side-effect layer: each renderer takes a reduced field or series
//! set, contour/axis levels and a destination path, writes one SVG and
//! returns nothing the pipeline consumes. Pressure axes are drawn on a
//! log scale from 1000 hPa down to 0.1 hPa, as the assessment plots
//! conventionally are.

use std::path::Path;

use plotters::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::field::{Dim, GriddedField, TimeSeries};

const PLOT_SIZE: (u32, u32) = (900, 600);

/// Pressure axis limits (hPa) shared by the field plots
const PRESSURE_AXIS_TOP_HPA: f64 = 0.1;
const PRESSURE_AXIS_BOTTOM_HPA: f64 = 1000.0;

/// Evenly spaced contour levels, inclusive of both ends
pub fn level_range(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    assert!(step > 0.0 && hi > lo, "levels need a positive span and step");
    let n = ((hi - lo) / step).round() as usize;
    (0..=n).map(|i| lo + step * i as f64).collect()
}

/// Latitude-pressure map of a time-collapsed zonal-mean field
pub fn plot_zonal_mean(
    field: &GriddedField,
    levels: &[f64],
    title: &str,
    path: &Path,
) -> Result<()> {
    assert_eq!(field.data().ndim(), 2, "zonal-mean plot needs a 2-D field");
    let lat_i = field.require_axis(Dim::Latitude)?;
    let p_i = field.require_axis(Dim::Pressure)?;
    let lats = &field.axes()[lat_i].values;
    let pressures = &field.axes()[p_i].values;
    let (lo, hi) = level_bounds(levels);

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            -90.0..90.0,
            PRESSURE_AXIS_BOTTOM_HPA.log10()..PRESSURE_AXIS_TOP_HPA.log10(),
        )
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc("Latitude")
        .y_desc("Pressure (hPa)")
        .y_label_formatter(&|v: &f64| format!("{:.1}", 10f64.powf(*v)))
        .draw()
        .map_err(plot_err)?;

    let lat_edges = cell_edges(lats);
    let p_edges: Vec<f64> = cell_edges(&pressures.iter().map(|&p| p.log10()).collect::<Vec<_>>());
    let mut cells = Vec::with_capacity(lats.len() * pressures.len());
    for pi in 0..pressures.len() {
        for li in 0..lats.len() {
            let v = value_at(field, p_i, pi, lat_i, li);
            cells.push(Rectangle::new(
                [
                    (lat_edges[li], p_edges[pi]),
                    (lat_edges[li + 1], p_edges[pi + 1]),
                ],
                diverging_color(v, lo, hi).filled(),
            ));
        }
    }
    chart.draw_series(cells).map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    debug!(path = %path.display(), "zonal-mean plot written");
    Ok(())
}

/// Time-pressure map of a latitude-collapsed field
pub fn plot_time_height(
    field: &GriddedField,
    levels: &[f64],
    title: &str,
    path: &Path,
) -> Result<()> {
    assert_eq!(field.data().ndim(), 2, "time-height plot needs a 2-D field");
    let t_i = field.require_axis(Dim::Time)?;
    let p_i = field.require_axis(Dim::Pressure)?;
    let times = &field.axes()[t_i].values;
    let pressures = &field.axes()[p_i].values;
    let (lo, hi) = level_bounds(levels);
    let (t_lo, t_hi) = padded_bounds(times);

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            t_lo..t_hi,
            PRESSURE_AXIS_BOTTOM_HPA.log10()..PRESSURE_AXIS_TOP_HPA.log10(),
        )
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc("Pressure (hPa)")
        .y_label_formatter(&|v: &f64| format!("{:.1}", 10f64.powf(*v)))
        .draw()
        .map_err(plot_err)?;

    let t_edges = cell_edges(times);
    let p_edges: Vec<f64> = cell_edges(&pressures.iter().map(|&p| p.log10()).collect::<Vec<_>>());
    let mut cells = Vec::with_capacity(times.len() * pressures.len());
    for ti in 0..times.len() {
        for pi in 0..pressures.len() {
            let v = value_at(field, t_i, ti, p_i, pi);
            cells.push(Rectangle::new(
                [(t_edges[ti], p_edges[pi]), (t_edges[ti + 1], p_edges[pi + 1])],
                diverging_color(v, lo, hi).filled(),
            ));
        }
    }
    chart.draw_series(cells).map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    debug!(path = %path.display(), "time-height plot written");
    Ok(())
}

/// Overlay labeled series as lines on one plot
pub fn plot_series_overlay(
    lines: &[(String, TimeSeries)],
    title: &str,
    x_desc: &str,
    y_desc: &str,
    path: &Path,
) -> Result<()> {
    assert!(!lines.is_empty(), "overlay plot needs at least one series");
    let mut t_all = Vec::new();
    let mut v_all = Vec::new();
    for (_, s) in lines {
        t_all.extend_from_slice(&s.times);
        v_all.extend_from_slice(&s.values);
    }
    let (t_lo, t_hi) = padded_bounds(&t_all);
    let (v_lo, v_hi) = padded_bounds(&v_all);

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(t_lo..t_hi, v_lo..v_hi)
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(plot_err)?;

    for (i, (label, series)) in lines.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        let points = series
            .times
            .iter()
            .zip(&series.values)
            .map(|(&t, &v)| (t, v));
        chart
            .draw_series(LineSeries::new(points, &color))
            .map_err(plot_err)?
            .label(label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color));
    }
    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    debug!(path = %path.display(), series = lines.len(), "overlay plot written");
    Ok(())
}

/// Scatter labeled (x, y) points on one plot
pub fn plot_scatter(
    points: &[(String, f64, f64)],
    title: &str,
    x_desc: &str,
    y_desc: &str,
    path: &Path,
) -> Result<()> {
    assert!(!points.is_empty(), "scatter plot needs at least one point");
    let xs: Vec<f64> = points.iter().map(|&(_, x, _)| x).collect();
    let ys: Vec<f64> = points.iter().map(|&(_, _, y)| y).collect();
    let (x_lo, x_hi) = padded_bounds(&xs);
    let (y_lo, y_hi) = padded_bounds(&ys);

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(plot_err)?;

    for (i, (label, x, y)) in points.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(std::iter::once(Circle::new((*x, *y), 6, color.filled())))
            .map_err(plot_err)?
            .label(label.clone())
            .legend(move |(lx, ly)| Circle::new((lx + 9, ly), 5, color.filled()));
    }
    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

fn plot_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Plot(e.to_string())
}

fn level_bounds(levels: &[f64]) -> (f64, f64) {
    let lo = levels.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = levels.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 1.0, lo + 1.0)
    }
}

fn padded_bounds(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi > lo {
        let pad = 0.05 * (hi - lo);
        (lo - pad, hi + pad)
    } else {
        (lo - 0.5, lo + 0.5)
    }
}

/// Cell edges at midpoints between coordinate values
fn cell_edges(centers: &[f64]) -> Vec<f64> {
    assert!(!centers.is_empty());
    let n = centers.len();
    let mut edges = Vec::with_capacity(n + 1);
    let first_step = if n > 1 { centers[1] - centers[0] } else { 1.0 };
    edges.push(centers[0] - first_step / 2.0);
    for i in 1..n {
        edges.push((centers[i - 1] + centers[i]) / 2.0);
    }
    let last_step = if n > 1 { centers[n - 1] - centers[n - 2] } else { 1.0 };
    edges.push(centers[n - 1] + last_step / 2.0);
    edges
}

/// Value of a 2-D field at positions along two named axes
fn value_at(field: &GriddedField, axis_a: usize, ia: usize, axis_b: usize, ib: usize) -> f64 {
    let mut idx = [0usize; 2];
    idx[axis_a] = ia;
    idx[axis_b] = ib;
    field.data()[ndarray::IxDyn(&idx)]
}

/// Blue-white-red diverging colour for a value within the level bounds
fn diverging_color(value: f64, lo: f64, hi: f64) -> RGBColor {
    let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    let lerp = |a: f64, b: f64, t: f64| (a + (b - a) * t).round() as u8;
    if t < 0.5 {
        let s = t * 2.0;
        RGBColor(lerp(33.0, 255.0, s), lerp(102.0, 255.0, s), lerp(172.0, 255.0, s))
    } else {
        let s = (t - 0.5) * 2.0;
        RGBColor(lerp(255.0, 178.0, s), lerp(255.0, 24.0, s), lerp(255.0, 43.0, s))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};

    use super::*;
    use crate::field::Axis;

    #[test]
    fn level_range_is_inclusive() {
        let levels = level_range(-120.0, 120.0, 10.0);
        assert_eq!(levels.len(), 25);
        assert_eq!(levels[0], -120.0);
        assert_eq!(levels[24], 120.0);
    }

    #[test]
    fn cell_edges_bracket_the_centers() {
        let edges = cell_edges(&[0.0, 1.0, 2.0]);
        assert_eq!(edges, vec![-0.5, 0.5, 1.5, 2.5]);
        assert_eq!(cell_edges(&[5.0]), vec![4.5, 5.5]);
    }

    #[test]
    fn diverging_color_endpoints() {
        assert_eq!(diverging_color(-1.0, -1.0, 1.0), RGBColor(33, 102, 172));
        assert_eq!(diverging_color(1.0, -1.0, 1.0), RGBColor(178, 24, 43));
        assert_eq!(diverging_color(0.0, -1.0, 1.0), RGBColor(255, 255, 255));
    }

    #[test]
    fn renders_a_zonal_mean_map() {
        let data =
            ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![-30.0, 0.0, 30.0, -10.0, 5.0, 10.0])
                .unwrap();
        let field = GriddedField::new(
            "u",
            "m s-1",
            data,
            vec![
                Axis::new(Dim::Pressure, vec![10.0, 100.0], "hPa"),
                Axis::new(Dim::Latitude, vec![-45.0, 0.0, 45.0], "degrees_north"),
            ],
        );
        let dir = std::env::temp_dir().join(format!("strat-plot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("zmean.svg");
        plot_zonal_mean(&field, &level_range(-40.0, 40.0, 10.0), "u", &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
