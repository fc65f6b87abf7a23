//!
//! A quick way to see the imputer at work is to take a signal we know, break it, and fill it back in.
//!
//! Here I build a noisy sine wave, punch random gaps into it, fill them with a smoothing spline,
//! and compare the filled values against the clean signal.
//!
//! Run with `cargo run --example noisy_sine --features transforms,plotting`
//!
use gapfill::{
    error::Error,
    plot, statistics,
    transforms::{ApplyNoise, PunchGaps},
    Imputer, ImputeOptions,
};

fn main() -> Result<(), Error> {
    //
    // A clean sine wave, sampled 1000 times
    let truth: Vec<f64> = (0..1000).map(|i| (f64::from(i) * 0.01).sin()).collect();

    //
    // Some sensor noise, then 100 samples lost
    let noisy = truth.clone().apply_normal_noise(0.05, Some(1));
    let series = noisy.punch_gaps(100, Some(2));
    println!("{} of {} samples missing", series.gap_count(), series.len());

    //
    // The spline may miss each known sample by about the noise level
    let smoothness = 0.05 * 0.05 * series.known_count() as f64;
    let imputer = Imputer::new(ImputeOptions::default().with_smoothness(smoothness));
    let filled = imputer.fill(&series)?.verified()?;

    println!(
        "clamped: {}, fallback: {}",
        filled.clamped_gaps().len(),
        filled.fallback_gaps().len()
    );

    //
    // How close did the gaps come to the clean signal?
    let gaps = filled.gaps();
    let rmse = statistics::root_mean_squared_error(
        gaps.iter().map(|&i| truth[i]),
        gaps.iter().map(|&i| filled.values()[i]),
    );
    println!("RMSE at the gaps: {rmse:.4}");

    plot!(filled, { title: "Noisy sine, 100 gaps filled".to_string() });
    Ok(())
}
