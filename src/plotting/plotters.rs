//! Drawing with the `plotters` bitmap backend
use std::{ops::Range, path::Path};

use plotters::prelude::*;

use crate::{
    impute::Imputation,
    plotting::PlotOptions,
    statistics,
    value::{CoordExt, Value},
};

// Matplotlib's default cycle: C0, C1, C2
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);
const KNOWN_COLOR: RGBColor = RGBColor(255, 127, 14);
const FILLED_COLOR: RGBColor = RGBColor(44, 160, 44);

pub fn draw<'a, T: Value>(
    imputation: &Imputation<T>,
    path: &'a Path,
    options: &PlotOptions<T>,
) -> Result<(), Error<'a>> {
    let completed = imputation.completed_points().as_f64().map_err(|_| Error::Cast)?;
    let known = imputation.known_points().as_f64().map_err(|_| Error::Cast)?;
    let filled = imputation.imputed_points().as_f64().map_err(|_| Error::Cast)?;

    let x_end = completed.len().saturating_sub(1).max(1) as f64;
    let y_range = match &options.y_range {
        Some(r) => cast(r.start)?..cast(r.end)?,
        None => padded_range(&completed),
    };

    let root = BitMapBackend::new(path, options.size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root);
    chart.margin(10).x_label_area_size(40).y_label_area_size(60);
    if !options.title.is_empty() {
        chart.caption(&options.title, (FontFamily::SansSerif, 18).into_font());
    }
    let mut chart = chart.build_cartesian_2d(0.0..x_end, y_range)?;

    let mut mesh = chart.configure_mesh();
    mesh.label_style((FontFamily::SansSerif, 12));
    if let Some(x_label) = &options.x_label {
        mesh.x_desc(x_label);
    }
    if let Some(y_label) = &options.y_label {
        mesh.y_desc(y_label);
    }
    mesh.draw()?;

    let line = ShapeStyle::from(LINE_COLOR).stroke_width(2);
    chart
        .draw_series(LineSeries::new(completed, line))?
        .label("Spline Interpolation")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));

    let dot = ShapeStyle::from(KNOWN_COLOR).filled();
    chart
        .draw_series(known.into_iter().map(|p| Circle::new(p, 3, dot)))?
        .label("Known Data")
        .legend(move |(x, y)| Circle::new((x + 10, y), 3, dot));

    let cross = ShapeStyle::from(FILLED_COLOR).stroke_width(2);
    chart
        .draw_series(filled.into_iter().map(|p| Cross::new(p, 4, cross)))?
        .label("Interpolated Points")
        .legend(move |(x, y)| Cross::new((x + 10, y), 4, cross));

    if !options.hide_legend {
        chart
            .configure_series_labels()
            .label_font((FontFamily::SansSerif, 12))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    root.present()?;
    tracing::debug!(path = %path.display(), "wrote plot");
    Ok(())
}

/// Range of the y-values, padded by 5% on each side
fn padded_range(points: &[(f64, f64)]) -> Range<f64> {
    let (min, max) = points.y_bounds().unwrap_or((0.0, 1.0));
    let spread = statistics::spread(points.y_iter());
    let pad = if spread > 0.0 { spread * 0.05 } else { 1.0 };
    (min - pad)..(max + pad)
}

fn cast<'root, T: Value>(value: T) -> Result<f64, Error<'root>> {
    num_traits::cast(value).ok_or(Error::Cast)
}

/// Error occurring during plotting
#[derive(Debug, thiserror::Error)]
pub enum Error<'root> {
    /// Error drawing the plot
    #[error("Error drawing plot: {0}")]
    Draw(#[from] DrawingAreaErrorKind<<BitMapBackend<'root> as DrawingBackend>::ErrorType>),

    /// Error casting a value
    #[error("A value could not be represented as f64")]
    Cast,
}
