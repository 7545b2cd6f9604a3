//! Maintainability Index (§4.E), normalised to 0–100. No language has a
//! real Halstead volume computed from the textual scans this codebase
//! uses, so `V_halstead = max(1, LOC)` always applies and `mi_approximated`
//! is always `true`; the flag is kept on the record so a future parser
//! that does compute a real Halstead volume can turn it off per symbol.

pub struct MaintainabilityResult {
    pub mi: f64,
    pub approximated: bool,
}

pub fn maintainability_index(cyclomatic: u32, loc: u32) -> MaintainabilityResult {
    let v_halstead = (loc.max(1)) as f64;
    let loc_f = (loc.max(1)) as f64;
    let v = cyclomatic as f64;

    let raw = 171.0 - 5.2 * v_halstead.ln() - 0.23 * v - 16.2 * loc_f.ln();
    let mi = (raw.max(0.0).min(100.0)) * 100.0 / 171.0;

    MaintainabilityResult { mi, approximated: true }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mi_is_clamped_to_0_100_range() {
        let r = maintainability_index(1, 1);
        assert!(r.mi >= 0.0 && r.mi <= 100.0);
        assert!(r.approximated);
    }

    #[test]
    fn higher_complexity_lowers_mi() {
        let low = maintainability_index(2, 20);
        let high = maintainability_index(40, 20);
        assert!(high.mi < low.mi);
    }
}
