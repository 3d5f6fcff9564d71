//! Recorded session replay
//!
//! Replays the notifications in `testdata/session.csv` through a telemetry
//! session, then plots raw and smoothed accelerometer data alongside the
//! estimated orientation.
//!
//! Run with: `cargo run --example replay [config.toml]`

use plotters::prelude::*;
use ring_telemetry::{OrientationSample, PipelineConfig, Sample, StreamKind, TelemetrySession};
use serde::Deserialize;
use std::error::Error;

#[derive(Debug, Deserialize)]
struct Notification {
    stream: StreamKind,
    payload: String,
}

fn decode_hex(hex: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    (0..hex.len())
        .step_by(2)
        .map(|i| Ok(u8::from_str_radix(&hex[i..i + 2], 16)?))
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    let mut session = TelemetrySession::with_config(config);
    session.connect();

    let mut reader = csv::Reader::from_path("testdata/session.csv")?;
    for result in reader.deserialize() {
        let record: Notification = result?;
        let bytes = decode_hex(&record.payload)?;
        let payload = (!bytes.is_empty()).then_some(bytes.as_slice());
        // Bad frames are logged by the session and skipped
        let _ = session.on_notification(record.stream, payload);
    }
    session.disconnect();

    for stream in StreamKind::ALL {
        let stats = session.stats(stream);
        println!(
            "{}: {} frames stored, {} dropped",
            stream, stats.accepted, stats.dropped
        );
    }

    let raw = session.history(StreamKind::Accel);
    let smoothed = session.smooth(StreamKind::Accel);
    let orientation = session.estimate_orientation()?;

    println!("Generating plots...");
    create_plots(&raw, &smoothed, &orientation)?;
    println!("✓ Plots saved to replay_plots.png");
    Ok(())
}

/// Cumulative time in seconds for each sample
fn seconds(deltas: impl Iterator<Item = u16>) -> Vec<f64> {
    deltas
        .scan(0.0, |t, d| {
            *t += f64::from(d) / 1000.0;
            Some(*t)
        })
        .collect()
}

fn create_plots(
    raw: &[Sample],
    smoothed: &[Sample],
    orientation: &[OrientationSample],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new("replay_plots.png", (1000, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically(400);

    let accel_time = seconds(raw.iter().map(|s| s.delta));
    let end = accel_time.last().copied().unwrap_or(1.0);

    let mut accel_chart = ChartBuilder::on(&upper)
        .caption("Accelerometer Y", ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..end, -1.5f64..1.5f64)?;

    accel_chart.configure_mesh().y_desc("g").draw()?;

    accel_chart
        .draw_series(LineSeries::new(
            accel_time.iter().zip(raw).map(|(t, s)| (*t, s.y)),
            &RED,
        ))?
        .label("Raw")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], RED));

    accel_chart
        .draw_series(LineSeries::new(
            accel_time.iter().zip(smoothed).map(|(t, s)| (*t, s.y)),
            &BLUE,
        ))?
        .label("Smoothed")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], BLUE));

    accel_chart.configure_series_labels().draw()?;

    let orientation_time = seconds(orientation.iter().map(|o| o.delta));
    let end = orientation_time.last().copied().unwrap_or(1.0);

    let mut euler_chart = ChartBuilder::on(&lower)
        .caption("Heading, Pitch, Roll", ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..end, -180f64..180f64)?;

    euler_chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Degrees")
        .draw()?;

    let series: [(&str, RGBColor, fn(&OrientationSample) -> f64); 3] = [
        ("Heading", BLUE, OrientationSample::heading),
        ("Pitch", GREEN, OrientationSample::pitch),
        ("Roll", RED, OrientationSample::roll),
    ];
    for (label, color, angle) in series {
        euler_chart
            .draw_series(LineSeries::new(
                orientation_time
                    .iter()
                    .zip(orientation)
                    .map(|(t, o)| (*t, angle(o))),
                &color,
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));
    }

    euler_chart.configure_series_labels().draw()?;

    root.present()?;
    Ok(())
}
