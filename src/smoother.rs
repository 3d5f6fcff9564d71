//! Per-axis Kalman smoothing
//!
//! Each of the x, y and z series is run through its own scalar Kalman filter
//! (constant-position model, direct observation). The filters see the whole
//! series in one batch and are dropped when the call returns, so successive
//! calls never share state.

use crate::types::{KalmanSettings, Sample, SmoothingMode, StreamKind};

/// Mean and variance of a scalar Kalman filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanState {
    pub mean: f64,
    pub covariance: f64,
}

impl KalmanState {
    pub fn new(mean: f64, covariance: f64) -> Self {
        Self { mean, covariance }
    }

    /// Random-walk prediction: mean unchanged, variance grows by `process_noise`
    pub fn predict(&self, process_noise: f64) -> Self {
        Self {
            mean: self.mean,
            covariance: self.covariance + process_noise,
        }
    }

    /// Fold in one observation with variance `measurement_noise`
    pub fn correct(&self, observation: f64, measurement_noise: f64) -> Self {
        let innovation_covariance = self.covariance + measurement_noise;
        let gain = if innovation_covariance > 0.0 {
            self.covariance / innovation_covariance
        } else {
            0.0
        };
        Self {
            mean: self.mean + gain * (observation - self.mean),
            covariance: (1.0 - gain) * self.covariance,
        }
    }
}

/// Batch smoother applying one scalar filter per axis
#[derive(Debug, Clone, Copy, Default)]
pub struct Smoother {
    settings: KalmanSettings,
}

impl Smoother {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: KalmanSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> KalmanSettings {
        self.settings
    }

    /// Smooth every axis of `samples`
    ///
    /// The output has the same length and the same `delta` values as the
    /// input. An empty input yields an empty output without running any
    /// filter.
    pub fn smooth(&self, stream: StreamKind, samples: &[Sample]) -> Vec<Sample> {
        if samples.is_empty() {
            tracing::debug!(%stream, "Nothing to smooth");
            return Vec::new();
        }

        let xs: Vec<f64> = samples.iter().map(|s| s.x).collect();
        let ys: Vec<f64> = samples.iter().map(|s| s.y).collect();
        let zs: Vec<f64> = samples.iter().map(|s| s.z).collect();

        let xs = self.smooth_series(&xs);
        let ys = self.smooth_series(&ys);
        let zs = self.smooth_series(&zs);

        let smoothed: Vec<Sample> = samples
            .iter()
            .enumerate()
            .map(|(i, s)| Sample::new(s.delta, xs[i], ys[i], zs[i]))
            .collect();

        tracing::debug!(
            %stream,
            samples = smoothed.len(),
            mode = ?self.settings.mode,
            "Smoothed stream"
        );
        smoothed
    }

    /// Run one scalar series through a fresh filter
    pub fn smooth_series(&self, series: &[f64]) -> Vec<f64> {
        match self.settings.mode {
            SmoothingMode::Filter => self
                .forward_pass(series)
                .into_iter()
                .map(|(_, filtered)| filtered.mean)
                .collect(),
            SmoothingMode::RauchTungStriebel => self.rts_pass(series),
        }
    }

    /// Predicted and filtered state at every index
    fn forward_pass(&self, series: &[f64]) -> Vec<(KalmanState, KalmanState)> {
        let KalmanSettings {
            process_noise,
            measurement_noise,
            initial_mean,
            initial_covariance,
            ..
        } = self.settings;

        let mut state = KalmanState::new(initial_mean, initial_covariance);
        series
            .iter()
            .map(|&observation| {
                let predicted = state.predict(process_noise);
                state = predicted.correct(observation, measurement_noise);
                (predicted, state)
            })
            .collect()
    }

    fn rts_pass(&self, series: &[f64]) -> Vec<f64> {
        let steps = self.forward_pass(series);
        let Some(&(_, last)) = steps.last() else {
            return Vec::new();
        };

        let mut smoothed = vec![0.0; steps.len()];
        let mut next = last;
        smoothed[steps.len() - 1] = last.mean;

        for k in (0..steps.len() - 1).rev() {
            let filtered = steps[k].1;
            let predicted_next = steps[k + 1].0;
            let gain = if predicted_next.covariance > 0.0 {
                filtered.covariance / predicted_next.covariance
            } else {
                0.0
            };
            next = KalmanState {
                mean: filtered.mean + gain * (next.mean - predicted_next.mean),
                covariance: filtered.covariance
                    + gain * gain * (next.covariance - predicted_next.covariance),
            };
            smoothed[k] = next.mean;
        }

        smoothed
    }
}

/// Smooth `samples` with the default filter settings
pub fn smooth(stream: StreamKind, samples: &[Sample]) -> Vec<Sample> {
    Smoother::default().smooth(stream, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variance(series: &[f64]) -> f64 {
        let mean = series.iter().sum::<f64>() / series.len() as f64;
        series.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / series.len() as f64
    }

    #[test]
    fn test_empty_input() {
        assert!(smooth(StreamKind::Accel, &[]).is_empty());
        let rts = Smoother::with_settings(KalmanSettings {
            mode: SmoothingMode::RauchTungStriebel,
            ..Default::default()
        });
        assert!(rts.smooth(StreamKind::Gyro, &[]).is_empty());
    }

    #[test]
    fn test_preserves_length_and_delta() {
        let samples: Vec<Sample> = (0..50)
            .map(|i| Sample::new(i * 3, (i as f64).sin(), 1.0, -(i as f64)))
            .collect();

        for mode in [SmoothingMode::Filter, SmoothingMode::RauchTungStriebel] {
            let smoother = Smoother::with_settings(KalmanSettings {
                mode,
                ..Default::default()
            });
            let smoothed = smoother.smooth(StreamKind::Accel, &samples);
            assert_eq!(smoothed.len(), samples.len());
            for (out, input) in smoothed.iter().zip(&samples) {
                assert_eq!(out.delta, input.delta);
            }
        }
    }

    #[test]
    fn test_first_output_tracks_first_observation() {
        // With a very wide prior the first correction lands on the observation
        let smoothed = Smoother::new().smooth_series(&[5.0, 5.0]);
        assert!((smoothed[0] - 5.0).abs() < 1e-4);
        assert!((smoothed[1] - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_constant_series_is_preserved() {
        let series = vec![0.98; 100];
        let smoothed = Smoother::new().smooth_series(&series);
        assert!(smoothed.iter().all(|v| (v - 0.98).abs() < 1e-4));
    }

    #[test]
    fn test_reduces_alternating_noise() {
        let series: Vec<f64> = (0..200)
            .map(|i| 1.0 + if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();

        let filtered = Smoother::new().smooth_series(&series);
        assert!(variance(&filtered[10..]) < variance(&series[10..]));

        let rts = Smoother::with_settings(KalmanSettings {
            mode: SmoothingMode::RauchTungStriebel,
            ..Default::default()
        })
        .smooth_series(&series);
        assert!(variance(&rts[10..190]) < variance(&filtered[10..190]));
    }

    #[test]
    fn test_calls_are_independent() {
        let smoother = Smoother::new();
        let a = smoother.smooth_series(&[1.0, 2.0, 3.0]);
        smoother.smooth_series(&[100.0, -100.0]);
        let b = smoother.smooth_series(&[1.0, 2.0, 3.0]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_kalman_state_steps() {
        let state = KalmanState::new(0.0, 1.0).predict(1.0);
        assert_eq!(state.covariance, 2.0);

        let corrected = state.correct(3.0, 2.0);
        assert_eq!(corrected.mean, 1.5);
        assert_eq!(corrected.covariance, 1.0);
    }
}
