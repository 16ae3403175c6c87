//! Plain-text run report.
//!
//! Summarizes a completed run: timestamp, parameters, per-cell final oil
//! amounts, and field statistics. The report is built as a string so tests
//! can inspect it without touching the filesystem.

use std::path::Path;

use chrono::Local;

use crate::simulation::{SimulationConfig, SimulationResult};

/// Min / max / mean / standard deviation of the final field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// Compute field statistics over the final per-cell amounts.
///
/// Returns `None` for an empty field.
pub fn field_stats(result: &SimulationResult) -> Option<FieldStats> {
    if result.final_amounts.is_empty() {
        return None;
    }
    let n = result.final_amounts.len() as f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &(_, u) in &result.final_amounts {
        min = min.min(u);
        max = max.max(u);
        sum += u;
    }
    let mean = sum / n;
    let variance = result
        .final_amounts
        .iter()
        .map(|&(_, u)| (u - mean) * (u - mean))
        .sum::<f64>()
        / n;
    Some(FieldStats {
        min,
        max,
        mean,
        std_dev: variance.sqrt(),
    })
}

/// Render the final report as a string.
pub fn format_report(
    mesh_name: &str,
    config: &SimulationConfig,
    result: &SimulationResult,
) -> String {
    let mut out = String::new();
    out.push_str("=== oil transport simulation report ===\n");
    out.push_str(&format!(
        "generated: {}\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    out.push_str("--- parameters ---\n");
    out.push_str(&format!("mesh:           {mesh_name}\n"));
    out.push_str(&format!(
        "release point:  ({}, {})\n",
        config.x_star.x, config.x_star.y
    ));
    out.push_str(&format!("spread:         {}\n", config.spread));
    out.push_str(&format!(
        "time range:     [{}, {}]\n",
        config.t_start, config.t_end
    ));
    out.push_str(&format!("steps:          {}\n", result.n_steps));
    out.push_str(&format!("dt:             {:.6e}\n", result.dt));
    out.push_str(&format!("wall time:      {:.3}s\n\n", result.wall_time));

    out.push_str("--- final oil amounts ---\n");
    for &(id, u) in &result.final_amounts {
        out.push_str(&format!("{id}: {u:.12e}\n"));
    }
    out.push('\n');

    out.push_str("--- statistics ---\n");
    match field_stats(result) {
        Some(stats) => {
            out.push_str(&format!("min:  {:.12e}\n", stats.min));
            out.push_str(&format!("max:  {:.12e}\n", stats.max));
            out.push_str(&format!("mean: {:.12e}\n", stats.mean));
            out.push_str(&format!("std:  {:.12e}\n", stats.std_dev));
        }
        None => out.push_str("(no triangle cells)\n"),
    }
    out
}

/// Render the report and write it to `path`.
pub fn write_report(
    path: impl AsRef<Path>,
    mesh_name: &str,
    config: &SimulationConfig,
    result: &SimulationResult,
) -> std::io::Result<()> {
    let report = format_report(mesh_name, config, result);
    std::fs::write(path.as_ref(), report)?;
    log::info!("report written to {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellId;
    use glam::DVec2;

    fn result() -> SimulationResult {
        SimulationResult {
            final_amounts: vec![
                (CellId::new(0), 0.2),
                (CellId::new(1), 0.4),
                (CellId::new(2), 0.6),
            ],
            n_steps: 100,
            dt: 0.005,
            wall_time: 0.123,
        }
    }

    fn config() -> SimulationConfig {
        SimulationConfig::new(DVec2::new(0.35, 0.45), 100, 0.0, 0.5, 10)
    }

    #[test]
    fn test_stats_known_values() {
        let stats = field_stats(&result()).unwrap();
        assert!((stats.min - 0.2).abs() < 1e-14);
        assert!((stats.max - 0.6).abs() < 1e-14);
        assert!((stats.mean - 0.4).abs() < 1e-14);
        // variance = ((0.2)^2 + 0 + (0.2)^2) / 3
        let expected_std = (0.08 / 3.0_f64).sqrt();
        assert!((stats.std_dev - expected_std).abs() < 1e-14);
    }

    #[test]
    fn test_stats_empty_field() {
        let empty = SimulationResult {
            final_amounts: Vec::new(),
            n_steps: 1,
            dt: 1.0,
            wall_time: 0.0,
        };
        assert!(field_stats(&empty).is_none());
    }

    #[test]
    fn test_report_contains_sections() {
        let report = format_report("bay.msh", &config(), &result());
        assert!(report.contains("--- parameters ---"));
        assert!(report.contains("mesh:           bay.msh"));
        assert!(report.contains("release point:  (0.35, 0.45)"));
        assert!(report.contains("--- final oil amounts ---"));
        assert!(report.contains("c0:"));
        assert!(report.contains("c2:"));
        assert!(report.contains("--- statistics ---"));
    }

    #[test]
    fn test_write_report_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        write_report(&path, "bay.msh", &config(), &result()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("steps:          100"));
    }
}
