//! Hand-built model bundle shared by the unit tests

use crate::{DecisionTree, ModelBundle, Node, RandomForest, StandardScaler};
use feature_engine::FEATURE_NAMES;
use std::path::PathBuf;

/// Training-time mean and scale of each engineered column
fn fitted(name: &str) -> (f64, f64) {
    match name {
        n if n.starts_with("vibration_rolling_std") => (0.15, 0.05),
        n if n.starts_with("vibration") && n.ends_with("rate_of_change") => (0.0, 0.001),
        n if n.starts_with("vibration") => (1.5, 0.2),
        n if n.starts_with("temperature_rolling_std") => (1.5, 0.5),
        n if n.starts_with("temperature") && n.ends_with("rate_of_change") => (0.0, 0.01),
        n if n.starts_with("temperature") => (75.0, 2.0),
        n if n.starts_with("flow_rate_rolling_std") => (2.5, 0.8),
        n if n.starts_with("flow_rate") && n.ends_with("rate_of_change") => (0.0, 0.01),
        n if n.starts_with("flow_rate") => (100.0, 3.0),
        "pressure" | "pressure_rolling_mean_1h" => (50.0, 1.0),
        "power" | "power_rolling_mean_1h" => (10.0, 0.5),
        "rpm" | "rpm_rolling_mean_1h" => (1800.0, 20.0),
        "hours_since_maintenance" => (360.0, 208.0),
        // Remaining std and rate columns
        _ => (0.0, 1.0),
    }
}

fn stump(names: &[String], feature: &str, threshold: f64, low: f64, high: f64) -> DecisionTree {
    let idx = names
        .iter()
        .position(|n| n == feature)
        .expect("feature present in test layout");
    DecisionTree::new(
        vec![
            Node::Split {
                feature: idx,
                threshold,
                left: 1,
                right: 2,
            },
            Node::Leaf { probability: low },
            Node::Leaf { probability: high },
        ],
        names.len(),
    )
    .expect("valid stump")
}

/// Bundle over all engineered columns in reverse canonical order.
///
/// Failure evidence: rolling vibration more than 2σ high, rolling
/// temperature more than 2.5σ high, flow rate more than 2σ low.
pub(crate) fn pump_bundle() -> ModelBundle {
    let names: Vec<String> = FEATURE_NAMES.iter().rev().map(|s| s.to_string()).collect();
    let (mean, scale): (Vec<f64>, Vec<f64>) = names.iter().map(|n| fitted(n)).unzip();

    let trees = vec![
        stump(&names, "vibration_rolling_mean_1h", 2.0, 0.05, 0.9),
        stump(&names, "temperature_rolling_mean_1h", 2.5, 0.1, 0.8),
        stump(&names, "flow_rate", -2.0, 0.7, 0.0),
    ];

    ModelBundle::new(
        RandomForest::new(names.len(), trees).expect("valid forest"),
        StandardScaler::new(mean, scale).expect("valid scaler"),
        names,
    )
    .expect("valid bundle")
}

/// Fresh per-test directory under the system temp dir
pub(crate) fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "inference-engine-{}-{}",
        label,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
