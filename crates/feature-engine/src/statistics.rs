//! Rolling Statistics and Rate of Change

/// Mean and standard deviation of one trailing window
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowStats {
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

impl WindowStats {
    /// Compute statistics over a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let m2: f64 = values
            .iter()
            .map(|&v| {
                let d = v - mean;
                d * d
            })
            .sum();
        let std_dev = (m2 / n).sqrt();

        Self { mean, std_dev }
    }
}

/// Trailing-window statistics for every position of `values`.
///
/// Position `i` covers `values[i + 1 - min(i + 1, window)..=i]`, so the
/// first positions use fewer samples (minimum one).
pub fn rolling(values: &[f64], window: usize) -> Vec<WindowStats> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            finite_or_zero(WindowStats::compute(&values[start..=i]))
        })
        .collect()
}

/// Per-step change divided by elapsed seconds.
///
/// `elapsed[i]` is the time since the previous sample (`None` for the first
/// one). Positions without a predecessor, and divisions that do not produce
/// a finite number, yield 0.
pub fn rate_of_change(values: &[f64], elapsed: &[Option<f64>]) -> Vec<f64> {
    debug_assert_eq!(values.len(), elapsed.len());

    values
        .iter()
        .zip(elapsed)
        .enumerate()
        .map(|(i, (&value, dt))| match dt {
            Some(dt) if i > 0 => zero_if_undefined((value - values[i - 1]) / dt),
            _ => 0.0,
        })
        .collect()
}

/// Replace NaN and infinities with 0
pub fn zero_if_undefined(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn finite_or_zero(stats: WindowStats) -> WindowStats {
    WindowStats {
        mean: zero_if_undefined(stats.mean),
        std_dev: zero_if_undefined(stats.std_dev),
    }
}
