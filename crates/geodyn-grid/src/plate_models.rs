//! Built-in analytical plate motion models.
//!
//! ITRF2014-PMM (Altamimi et al., 2017): Cartesian rotation poles in
//! milliarcseconds per year. Identifiers take the form `ITRF2014-PMM:<PLATE>`.

use geodyn_core::models::EulerPole;

pub const ITRF2014_PMM_PREFIX: &str = "ITRF2014-PMM:";

const ITRF2014_PMM: &[(&str, f64, f64, f64)] = &[
    ("ANTA", -0.248, -0.324, 0.675),
    ("AUST", 1.504, 1.172, 1.228),
    ("EURA", -0.085, -0.531, 0.770),
    ("NOAM", 0.024, -0.694, -0.063),
    ("NUBI", 0.099, -0.614, 0.733),
    ("PCFC", -0.411, 1.036, -2.166),
    ("SOAM", -0.270, -0.301, -0.140),
];

/// Look up a built-in pole by identifier, e.g. `ITRF2014-PMM:NOAM`.
pub fn builtin_pole(id: &str) -> Option<EulerPole> {
    let plate = id.strip_prefix(ITRF2014_PMM_PREFIX)?;
    ITRF2014_PMM
        .iter()
        .find(|(name, ..)| name.eq_ignore_ascii_case(plate))
        .map(|&(name, wx, wy, wz)| EulerPole::new(format!("{ITRF2014_PMM_PREFIX}{name}"), wx, wy, wz))
}
