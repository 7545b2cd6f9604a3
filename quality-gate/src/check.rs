//! Pure threshold evaluation (§4.K). `evaluate` takes no collaborators and
//! touches no I/O, so it is trivially the pure function §8 property 8
//! demands: same `(config, metrics)` in, same `checks[]` out.

use domain::{GateCheck, GateResult, QualityGateConfig};

use crate::metrics::MetricsSnapshot;

/// `quality_score` formula, verbatim from spec §4.K, clamped to `[0,100]`.
pub fn quality_score(metrics: &MetricsSnapshot) -> f64 {
    let other_smells = metrics.total_smells.saturating_sub(metrics.critical_smells) as f64;
    let other_vulns =
        metrics.total_vulnerabilities.saturating_sub(metrics.critical_vulnerabilities) as f64;
    let complexity_penalty = (metrics.avg_complexity - 10.0).max(0.0) * 1.5;
    let duplication_penalty = metrics.duplication_percentage * 0.5;

    let score = 100.0
        - (3.0 * metrics.critical_smells as f64 + other_smells)
        - (4.0 * metrics.critical_vulnerabilities as f64 + other_vulns)
        - complexity_penalty
        - duplication_penalty;

    score.clamp(0.0, 100.0)
}

/// Evaluates the seven thresholds of §3 against a frozen metrics snapshot.
/// `run_id` is assigned by the caller (persistence is `QualityGateEngine`'s
/// job, not this function's) and only stitched into the returned result.
pub fn evaluate(config: &QualityGateConfig, metrics: &MetricsSnapshot, run_id: i64) -> GateResult {
    let score = quality_score(metrics);

    let checks = vec![
        GateCheck {
            name: "max_complexity".into(),
            passed: metrics.max_complexity <= config.max_complexity,
            value: metrics.max_complexity as f64,
            threshold: config.max_complexity as f64,
            message: format!(
                "highest cyclomatic complexity observed is {} (limit {})",
                metrics.max_complexity, config.max_complexity
            ),
        },
        GateCheck {
            name: "max_code_smells".into(),
            passed: metrics.total_smells <= config.max_code_smells,
            value: metrics.total_smells as f64,
            threshold: config.max_code_smells as f64,
            message: format!(
                "{} code smells found (limit {})",
                metrics.total_smells, config.max_code_smells
            ),
        },
        GateCheck {
            name: "max_critical_smells".into(),
            passed: metrics.critical_smells <= config.max_critical_smells,
            value: metrics.critical_smells as f64,
            threshold: config.max_critical_smells as f64,
            message: format!(
                "{} critical code smells found (limit {})",
                metrics.critical_smells, config.max_critical_smells
            ),
        },
        GateCheck {
            name: "max_vulnerabilities".into(),
            passed: metrics.total_vulnerabilities <= config.max_vulnerabilities,
            value: metrics.total_vulnerabilities as f64,
            threshold: config.max_vulnerabilities as f64,
            message: format!(
                "{} vulnerabilities found (limit {})",
                metrics.total_vulnerabilities, config.max_vulnerabilities
            ),
        },
        GateCheck {
            name: "max_critical_vulnerabilities".into(),
            passed: metrics.critical_vulnerabilities <= config.max_critical_vulnerabilities,
            value: metrics.critical_vulnerabilities as f64,
            threshold: config.max_critical_vulnerabilities as f64,
            message: format!(
                "{} critical vulnerabilities found (limit {})",
                metrics.critical_vulnerabilities, config.max_critical_vulnerabilities
            ),
        },
        GateCheck {
            name: "min_quality_score".into(),
            passed: score >= config.min_quality_score,
            value: score,
            threshold: config.min_quality_score,
            message: format!("quality score {score:.1} (minimum {})", config.min_quality_score),
        },
        GateCheck {
            name: "max_duplication_percentage".into(),
            passed: metrics.duplication_percentage <= config.max_duplication_percentage,
            value: metrics.duplication_percentage,
            threshold: config.max_duplication_percentage,
            message: format!(
                "{:.1}% duplicated lines (limit {:.1}%)",
                metrics.duplication_percentage, config.max_duplication_percentage
            ),
        },
    ];

    let passed = checks.iter().all(|c| c.passed);
    let block_merge = !passed && config.block_on_failure;
    let failed: Vec<&str> = checks.iter().filter(|c| !c.passed).map(|c| c.name.as_str()).collect();
    let summary = if passed {
        format!("quality gate passed ({}/{} checks)", checks.len(), checks.len())
    } else {
        format!("quality gate failed: {}", failed.join(", "))
    };

    GateResult { passed, block_merge, checks, summary, run_id, quality_score: score }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(critical_vulns: u32, score_hint_complexity: f64) -> MetricsSnapshot {
        MetricsSnapshot {
            symbol_count: 10,
            avg_complexity: score_hint_complexity,
            max_complexity: 5,
            total_smells: 0,
            critical_smells: 0,
            total_vulnerabilities: critical_vulns,
            critical_vulnerabilities: critical_vulns,
            duplication_percentage: 0.0,
        }
    }

    /// S7: config `{max_critical_vulns=0, min_quality_score=70}`, measured
    /// `{critical_vulns=1, quality_score=82}` -> failed, block_merge=true,
    /// both thresholds present in `checks[]` with the failing one flagged.
    #[test]
    fn scenario_s7_gate_blocks_on_critical_vuln() {
        let config = QualityGateConfig {
            max_critical_vulnerabilities: 0,
            min_quality_score: 70.0,
            block_on_failure: true,
            ..QualityGateConfig::default()
        };
        let result = evaluate(&config, &metrics(1, 2.0), 1);

        assert!(!result.passed);
        assert!(result.block_merge);
        let critical = result.checks.iter().find(|c| c.name == "max_critical_vulnerabilities").unwrap();
        assert!(!critical.passed);
        let score_check = result.checks.iter().find(|c| c.name == "min_quality_score").unwrap();
        assert!(score_check.passed, "a single critical vuln shouldn't also tank the score check");
    }

    #[test]
    fn passing_repo_never_blocks() {
        let config = QualityGateConfig::default();
        let result = evaluate(&config, &metrics(0, 3.0), 2);
        assert!(result.passed);
        assert!(!result.block_merge);
    }

    #[test]
    fn evaluate_is_pure() {
        let config = QualityGateConfig::default();
        let snapshot = metrics(0, 12.0);
        let a = evaluate(&config, &snapshot, 9);
        let b = evaluate(&config, &snapshot, 9);
        assert_eq!(a.passed, b.passed);
        assert_eq!(a.quality_score, b.quality_score);
        assert_eq!(a.checks.len(), b.checks.len());
    }

    #[test]
    fn complexity_penalty_only_applies_above_ten() {
        let low = quality_score(&metrics(0, 8.0));
        let high = quality_score(&metrics(0, 20.0));
        assert_eq!(low, 100.0);
        assert!(high < 100.0);
    }
}
