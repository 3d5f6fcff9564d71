//! Time reconstruction from per-sample deltas
//!
//! Each sample reports the milliseconds elapsed since the previous sample on
//! its stream. Summing into a `u64` gives a timeline that never wraps, even
//! though each individual delta is a 16-bit counter.

use crate::types::Sample;

/// Cumulative timestamp (ms) of every sample, the first at its own delta
pub fn timestamps(samples: &[Sample]) -> Vec<u64> {
    samples
        .iter()
        .scan(0u64, |elapsed, sample| {
            *elapsed += u64::from(sample.delta);
            Some(*elapsed)
        })
        .collect()
}

/// Pair each accelerometer sample with the gyroscope sample nearest in time
///
/// Returns index-aligned vectors of equal length (the accelerometer length),
/// ready for [`estimate`](crate::estimate). Ties go to the earlier gyroscope
/// sample. If `gyro` is empty both outputs are empty.
pub fn align_by_timestamp(accel: &[Sample], gyro: &[Sample]) -> (Vec<Sample>, Vec<Sample>) {
    if gyro.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let accel_times = timestamps(accel);
    let gyro_times = timestamps(gyro);

    let mut paired = Vec::with_capacity(accel.len());
    let mut j = 0;
    for &t in &accel_times {
        // Both timelines are non-decreasing, so the search only moves forward
        while j + 1 < gyro_times.len()
            && gyro_times[j + 1].abs_diff(t) < gyro_times[j].abs_diff(t)
        {
            j += 1;
        }
        paired.push(gyro[j]);
    }

    (accel.to_vec(), paired)
}
