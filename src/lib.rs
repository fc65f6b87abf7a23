//! # gapfill
//! ## Fill the holes in your data with something believable
//!
//! Sensors drop out, logs lose lines, spreadsheets grow blank cells. This crate takes an ordered
//! sequence of samples where some are missing, and fills every gap with a value that follows
//! the shape of the data around it, without ever touching the values you already had.
//!
//! The pipeline for one [`Series`]:
//! - Fit a cubic smoothing spline through the known samples, using each sample's index as `x`
//! - Evaluate it at every gap, and clamp the prediction into the range of the known values
//! - If the spline can't be fitted, or predicts something non-finite, fall back to linear interpolation
//! - Copy the known values through unchanged, and verify that they were
//!
//! ```rust
//! use gapfill::{fill, Series};
//!
//! let series = Series::new(vec![Some(1.0), None, Some(3.0), None, Some(5.0)]);
//! let filled = fill(&series, 1.0).unwrap();
//!
//! assert_eq!(filled.gaps(), &[1, 3]);
//! assert!(filled.known_preserved());
//! gapfill::assert_completed!(series, filled.values());
//! ```
//!
//! # Core Concepts
//! - A [`Series`] is an ordered list of `Option<T>` samples. `None` is a gap.
//!     - Gaps are never encoded as numbers; `0.0` is a real sample.
//!     - Use [`Series::from_nan_gaps`] if your data marks gaps with NaN.
//! - The **smoothness** is the residual budget of the spline, see [`spline::SmoothingSpline`]:
//!     - `0` passes exactly through every known sample
//!     - Larger values trade closeness for a smoother curve
//! - An [`Imputer`] holds the [`ImputeOptions`] and the [`curve::CurveFitter`] used to fit a curve.
//!     - [`fill`] is shorthand for an imputer with the default spline fitter.
//! - An [`Imputation`] holds the completed values, along with which gaps were clamped or filled by the fallback.
//!
//! # Batches
//! [`fill_batch`] and [`fill_batch_strict`] fill many series at once, in parallel with the
//! `parallel` feature (on by default). See [`batch`].
//!
//! # Features
//! - `parallel` *(default)*: fill batches on a rayon pool
//! - `plotting`: render an [`Imputation`] to PNG, see `plotting`
//! - `transforms`: noise and random gaps for synthetic data, see `transforms`
//! - `cli`: the `gapfill` binary, which fills a JSON batch from a file
//!
//! # Testing utilities
//!
//! Assertion macros for imputation results live in [`test`].
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)] // The worst clippy lint
#![allow(clippy::cast_precision_loss)] // Indices are small enough to be exact
#![allow(clippy::similar_names)] //       Clippy does not get to decide what names are similar
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod test;

#[cfg(feature = "plotting")]
#[cfg_attr(docsrs, doc(cfg(feature = "plotting")))]
pub mod plotting;

#[cfg(feature = "transforms")]
#[cfg_attr(docsrs, doc(cfg(feature = "transforms")))]
pub mod transforms;

pub mod batch;
pub mod curve;
pub mod error;
pub mod impute;
pub mod interpolate;
pub mod series;
pub mod spline;
pub mod statistics;
pub mod value;

pub use batch::{fill_batch, fill_batch_strict, BatchReport, BatchResponse};
pub use error::{Error, Result};
pub use impute::{fill, Imputation, ImputeOptions, Imputer};
pub use series::{KnownSet, Series};

pub use nalgebra;
