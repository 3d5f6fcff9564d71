use ring_telemetry::{Codec, Sample, StreamKind, TelemetrySession};

const SAMPLE_PERIOD_MS: u16 = 40; // 25 Hz

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let codec = Codec::new();
    let mut session = TelemetrySession::new();
    session.connect();

    for _ in 0..1000 {
        // this loop should run once per notification pair from the ring
        // replace with the accelerometer and gyroscope frames
        let accelerometer = Sample::new(SAMPLE_PERIOD_MS, 0.0, 0.0, 1.0);
        let gyroscope = Sample::new(SAMPLE_PERIOD_MS, 0.0, 0.0, 0.0);

        let accel_frame = codec.encode(&accelerometer, StreamKind::Accel);
        let gyro_frame = codec.encode(&gyroscope, StreamKind::Gyro);

        session
            .on_notification(StreamKind::Accel, Some(&accel_frame))
            .expect("valid accelerometer frame");
        session
            .on_notification(StreamKind::Gyro, Some(&gyro_frame))
            .expect("valid gyroscope frame");
    }

    session.disconnect();

    let orientation = session
        .estimate_orientation()
        .expect("both streams hold a full window");

    for o in orientation.iter().step_by(100) {
        println!(
            "Heading: {:.2}, Pitch: {:.2}, Roll: {:.2}",
            o.heading(),
            o.pitch(),
            o.roll()
        );
    }
}
