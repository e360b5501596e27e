//! Breathing rate from chest-mounted accelerometer samples.
//!
//! The phone rests on the chest and each breath shifts the magnitude of the
//! acceleration vector. Consecutive magnitudes that differ by more than a
//! threshold are counted, and the count is scaled to breaths per minute.

use serde::{Deserialize, Serialize};

/// Calibration for [`estimate_respiratory_rate`].
///
/// The defaults encode the sampling rate and capture length of the bundled
/// breathing recordings; they are not derived from the samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RespiratoryConfig {
    /// Leading samples dropped while the phone settles.
    pub warmup_samples: usize,
    /// Seed for the "previous magnitude" before the first counted sample.
    /// Placeholder value, not a measured baseline.
    pub initial_magnitude: f32,
    /// Minimum magnitude change between consecutive samples that counts.
    pub change_threshold: f64,
    pub count_divisor: f64,
    pub rate_scale: f64,
}

impl Default for RespiratoryConfig {
    fn default() -> Self {
        Self {
            warmup_samples: 11,
            initial_magnitude: 10.0,
            change_threshold: 0.15,
            count_divisor: 45.0,
            rate_scale: 30.0,
        }
    }
}

/// Number of consecutive-sample magnitude changes above the threshold.
///
/// Axes of different length are truncated to the shortest one.
pub fn count_amplitude_changes(x: &[f32], y: &[f32], z: &[f32], config: &RespiratoryConfig) -> u32 {
    let len = x.len().min(y.len()).min(z.len());
    let mut previous = config.initial_magnitude;
    let mut count = 0u32;

    for i in config.warmup_samples..len {
        let current = magnitude(x[i], y[i], z[i]);
        if f64::from((previous - current).abs()) > config.change_threshold {
            count += 1;
        }
        previous = current;
    }

    count
}

/// Breaths per minute. Fewer samples than the warm-up window yields 0.
pub fn estimate_respiratory_rate(x: &[f32], y: &[f32], z: &[f32], config: &RespiratoryConfig) -> u32 {
    let changes = count_amplitude_changes(x, y, z, config);
    changes_to_rate(changes, config)
}

fn changes_to_rate(changes: u32, config: &RespiratoryConfig) -> u32 {
    if config.count_divisor <= 0.0 {
        return 0;
    }
    // Truncates toward zero, so a lone change caused by the seed reads as 0.
    ((f64::from(changes) / config.count_divisor) * config.rate_scale) as u32
}

fn magnitude(x: f32, y: f32, z: f32) -> f32 {
    let (x, y, z) = (f64::from(x), f64::from(y), f64::from(z));
    (x * x + y * y + z * z).sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alternating_z(len: usize) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
        let z = (0..len)
            .map(|i| if i % 2 == 1 { 10.0 } else { 10.2 })
            .collect();
        (vec![0.0; len], vec![0.0; len], z)
    }

    #[test]
    fn short_series_yields_zero() {
        let config = RespiratoryConfig::default();
        for len in 0..=11 {
            let samples = vec![3.0f32; len];
            assert_eq!(
                estimate_respiratory_rate(&samples, &samples, &samples, &config),
                0,
                "len {len}"
            );
        }
    }

    #[test]
    fn alternating_magnitude_counts_every_step_after_the_first() {
        let config = RespiratoryConfig::default();
        let n = 57;
        let (x, y, z) = alternating_z(n);

        let changes = count_amplitude_changes(&x, &y, &z, &config);
        assert_eq!(changes as usize, n - 11 - 1);
        // 45 changes over the default window is 30 breaths per minute.
        assert_eq!(estimate_respiratory_rate(&x, &y, &z, &config), 30);
    }

    #[test]
    fn uniform_zero_samples_read_as_zero_rate() {
        let config = RespiratoryConfig::default();
        let zeros = vec![0.0f32; 50];
        // Only the jump away from the 10.0 seed crosses the threshold.
        assert_eq!(count_amplitude_changes(&zeros, &zeros, &zeros, &config), 1);
        assert_eq!(estimate_respiratory_rate(&zeros, &zeros, &zeros, &config), 0);
    }

    #[test]
    fn mismatched_axes_use_shortest_length() {
        let config = RespiratoryConfig::default();
        let (x, y, mut z) = alternating_z(57);
        z.truncate(12);
        assert_eq!(count_amplitude_changes(&x, &y, &z, &config), 0);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let config = RespiratoryConfig::default();
        let (x, y, z) = alternating_z(120);
        let first = estimate_respiratory_rate(&x, &y, &z, &config);
        let second = estimate_respiratory_rate(&x, &y, &z, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn small_changes_are_ignored() {
        let config = RespiratoryConfig::default();
        let z: Vec<f32> = (0..40).map(|i| 10.0 + (i % 2) as f32 * 0.1).collect();
        let zeros = vec![0.0f32; 40];
        assert_eq!(count_amplitude_changes(&zeros, &zeros, &z, &config), 0);
    }
}
