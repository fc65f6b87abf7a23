//! Plotting filled series to PNG files
//!
//! Draws the completed series as a line, with the known samples and the filled gaps
//! marked on top, so you can see at a glance where the curve had to guess.
//! - Uses the [`plotters`] bitmap backend; everything is coerced to `f64` for drawing.
//!
//! Use [`plot_imputation`] directly, or the [`crate::plot!`] macro to write the image to
//! an automatically named file under `target/plot_output`.
//!
//! ```rust,no_run
//! # use gapfill::{Series, fill, plotting::{plot_imputation, PlotOptions}};
//! let series = Series::new(vec![Some(1.0), None, Some(4.0), None, Some(2.0)]);
//! let filled = fill(&series, 0.0).unwrap();
//!
//! plot_imputation(&filled, "filled.png".as_ref(), &PlotOptions::default()).unwrap();
//! ```
use std::{ops::Range, path::Path};

use crate::{impute::Imputation, value::Value};

mod plotters;
pub use self::plotters::Error;

pub use ::plotters as backend;

/// Options for plotting
#[derive(Debug, Clone)]
pub struct PlotOptions<T>
where
    T: Value,
{
    /// Caption for the plot
    pub title: String,

    /// X-axis label
    pub x_label: Option<String>,

    /// Y-axis label
    pub y_label: Option<String>,

    /// Size of the output image in pixels
    pub size: (u32, u32),

    /// Y-axis range. Defaults to the range of the completed series, padded by 5%
    pub y_range: Option<Range<T>>,

    /// Whether to show the legend
    pub hide_legend: bool,
}

impl<T: Value> Default for PlotOptions<T> {
    fn default() -> Self {
        Self {
            title: "Spline Interpolation Filling Missing Data (With Safe Predictions)".into(),
            x_label: Some("Index".into()),
            y_label: Some("Value".into()),
            size: (1000, 500),
            y_range: None,
            hide_legend: false,
        }
    }
}

/// Draws a filled series to a PNG file at `path`.
///
/// - The completed series is drawn as a line
/// - Known samples are drawn as filled circles
/// - Filled gaps are drawn as crosses
///
/// Plotting never changes the imputation; it is purely a side effect.
///
/// # Errors
/// Returns an error if a value cannot be represented as `f64`, or the image cannot be drawn or written.
pub fn plot_imputation<'a, T: Value>(
    imputation: &Imputation<T>,
    path: &'a Path,
    options: &PlotOptions<T>,
) -> Result<(), Error<'a>> {
    self::plotters::draw(imputation, path, options)
}

/// Plot an [`Imputation`] to a PNG file with a generated name.
///
/// Generates a filename based on the source file and line number; see [`crate::plot_filename!`].
/// - Creates the necessary directories if they don't exist.
/// - Evaluates to the [`std::path::PathBuf`] of the written file, or panics if plotting fails.
/// - If prefix is specified, it is prepended to the filename.
///
/// # Examples
/// ```ignore
/// plot!(filled);
/// plot!(filled, { title: "Sensor 4".to_string() });
/// plot!(filled, { hide_legend: true }, prefix = "sensor");
/// ```
#[macro_export]
macro_rules! plot {
    ($imputation:expr, { $( $name:ident : $value:expr ),* $(,)? } $( , prefix = $prefix:expr )?) => {{
        #[allow(unused_mut)] let mut options = $crate::plotting::PlotOptions::default();
        $( options.$name = $value; )*

        #[allow(unused)] let mut prefix: Option<String> = None; $( prefix = Some($prefix.to_string()); )?
        let path = $crate::plot_filename!(prefix);

        $crate::plotting::plot_imputation(&$imputation, &path, &options).expect("Failed to plot imputation");
        path
    }};

    ($imputation:expr $( , prefix = $prefix:expr )?) => {
        $crate::plot!($imputation, {} $(, prefix = $prefix)?)
    };
}

/// Generate a filename for a plot: `target/plot_output/{prefix}_{file}_line_{line}.png`
///
/// Creates the necessary directories if they don't exist.
/// The target directory can be moved with the `TARGET_DIR` environment variable.
///
/// `plot_filename!(Some("prefix"))` will prepend `prefix_` to the filename.
#[macro_export]
macro_rules! plot_filename {
    ($prefix:expr) => {{
        let prefix: Option<String> = $prefix.map(|s| s.to_string());
        let prefix = match prefix {
            Some(p) if !p.is_empty() => format!("{p}_"),
            _ => String::new(),
        };

        let file = file!().replace(['/', '\\'], "_");
        let line = line!();

        let target_dir = ::std::env::var("TARGET_DIR").unwrap_or_else(|_| "target".into());
        let plots_dir = ::std::path::Path::new(&target_dir).join("plot_output");
        let _ = std::fs::create_dir_all(&plots_dir);

        let filename = format!("{prefix}{file}_line_{line}.png");

        plots_dir.join(filename)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fill, Series};

    #[test]
    fn filename_has_prefix_and_location() {
        let path = crate::plot_filename!(Some("gaps"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("gaps_src_plotting.rs_line_"));
        assert!(name.ends_with(".png"));
        assert!(path.parent().unwrap().ends_with("plot_output"));

        let path = crate::plot_filename!(None::<&str>);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("src_plotting.rs_line_"));
    }

    #[test]
    fn default_options_describe_imputation() {
        let options = PlotOptions::<f64>::default();
        assert_eq!(options.x_label.as_deref(), Some("Index"));
        assert_eq!(options.y_label.as_deref(), Some("Value"));
        assert!(options.title.starts_with("Spline Interpolation"));
    }

    #[test]
    #[ignore = "text rendering needs a system sans-serif font"]
    fn writes_png() {
        let series = Series::from_nan_gaps((0..50).map(|i| {
            if i % 5 == 2 {
                f64::NAN
            } else {
                (f64::from(i) / 5.0).sin()
            }
        }));
        let filled = fill(&series, 0.1).unwrap();

        let path = crate::plot!(filled, { title: "Sine with gaps".to_string() }, prefix = "test");
        assert!(path.exists());
    }
}
