use std::fmt::Write as _;
use std::path::Path;

pub const HEADER: &str = "Age,SystolicBP,DiastolicBP,BS,BodyTemp,HeartRate,RiskLevel";

/// Balanced synthetic dataset where every vital rises with the risk level.
///
/// Labels use the messy spellings real uploads contain.
pub fn banded_rows(rows: usize) -> String {
    let mut csv = format!("{HEADER}\n");
    for i in 0..rows {
        let level = i % 3;
        let jitter = (i / 3 % 4) as u32;
        let (age, sbp, dbp, bs, temp, hr, label) = match level {
            0 => (19 + jitter, 95 + jitter, 60 + jitter, 6.1, 36.6, 66 + jitter, "low risk"),
            1 => (30 + jitter, 125 + jitter, 85 + jitter, 7.5, 37.4, 78 + jitter, " Mid Risk "),
            _ => (42 + jitter, 150 + jitter, 100 + jitter, 12.0, 39.0, 90 + jitter, "HIGH RISK"),
        };
        let _ = writeln!(csv, "{age},{sbp},{dbp},{bs},{temp},{hr},{label}");
    }
    csv
}

/// Forty rows where only age matters: below 30 gets `young`, the rest `old`.
pub fn age_threshold(young: &str, old: &str) -> String {
    let mut csv = format!("{HEADER}\n");
    for i in 0..40 {
        let age = 18 + i;
        let label = if age < 30 { young } else { old };
        let _ = writeln!(csv, "{age},120,80,5.0,98,75,{label}");
    }
    csv
}

pub fn write_csv(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create csv parent dirs");
    }
    std::fs::write(path, contents).expect("write csv");
}
