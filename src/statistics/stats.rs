use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use hashbrown::HashMap;
use serde::Serialize;

/// Agreement counts for one operation label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OpTally {
    pub checked: usize,
    pub mismatched: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DifferentialStats {
    cases: usize,
    per_op: HashMap<String, OpTally>,
}

impl DifferentialStats {
    pub fn new() -> Self {
        DifferentialStats {
            cases: 0,
            per_op: HashMap::new(),
        }
    }

    /// Record that a new set of inputs has been swept
    pub fn bump_cases(&mut self) {
        self.cases += 1
    }

    /// Record one backend comparison for `op`
    pub fn record(&mut self, op: &str, agreed: bool) {
        let tally = self.per_op.entry_ref(op).or_default();
        tally.checked += 1;
        if !agreed {
            tally.mismatched += 1;
        }
    }

    pub fn get_cases(&self) -> usize {
        self.cases
    }

    pub fn get_tally(&self, op: &str) -> OpTally {
        self.per_op.get(op).copied().unwrap_or_default()
    }

    pub fn get_checked(&self) -> usize {
        self.per_op.values().map(|t| t.checked).sum()
    }

    pub fn get_mismatched(&self) -> usize {
        self.per_op.values().map(|t| t.mismatched).sum()
    }

    /// Labels with at least one mismatch, sorted.
    pub fn mismatched_ops(&self) -> Vec<&str> {
        let mut ops: Vec<&str> = self
            .per_op
            .iter()
            .filter(|(_, t)| t.mismatched > 0)
            .map(|(op, _)| op.as_str())
            .collect();
        ops.sort_unstable();
        ops
    }

    pub fn merge(mut self, other: &DifferentialStats) -> Self {
        self.cases += other.cases;
        for (op, tally) in &other.per_op {
            let mine = self.per_op.entry_ref(op.as_str()).or_default();
            mine.checked += tally.checked;
            mine.mismatched += tally.mismatched;
        }
        self
    }

    /// Writes the statistics as pretty-printed JSON.
    pub fn dump(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self).map_err(io::Error::other)
    }
}

impl Default for DifferentialStats {
    fn default() -> Self {
        DifferentialStats::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_initialized_to_zero() {
        let stats = DifferentialStats::new();
        assert_eq!(stats.get_cases(), 0);
        assert_eq!(stats.get_checked(), 0);
        assert_eq!(stats.get_mismatched(), 0);
    }

    #[test]
    fn test_default_stats_initialized_to_zero() {
        let stats = DifferentialStats::default();
        assert_eq!(stats.get_cases(), 0);
        assert!(stats.mismatched_ops().is_empty());
    }

    #[test]
    fn test_bump_cases_multiple_times() {
        let mut stats = DifferentialStats::new();
        stats.bump_cases();
        stats.bump_cases();
        stats.bump_cases();
        assert_eq!(stats.get_cases(), 3);
        assert_eq!(stats.get_checked(), 0);
    }

    #[test]
    fn test_record_accumulates_per_op() {
        let mut stats = DifferentialStats::new();
        stats.record("add", true);
        stats.record("add", true);
        stats.record("div", false);
        assert_eq!(
            stats.get_tally("add"),
            OpTally {
                checked: 2,
                mismatched: 0
            }
        );
        assert_eq!(stats.get_tally("div").mismatched, 1);
        assert_eq!(stats.get_tally("never"), OpTally::default());
        assert_eq!(stats.get_checked(), 3);
        assert_eq!(stats.get_mismatched(), 1);
        assert_eq!(stats.mismatched_ops(), vec!["div"]);
    }

    #[test]
    fn test_merge() {
        let mut a = DifferentialStats::new();
        a.bump_cases();
        a.record("add", true);
        let mut b = DifferentialStats::new();
        b.bump_cases();
        b.record("add", false);
        b.record("min", true);

        let merged = a.merge(&b);
        assert_eq!(merged.get_cases(), 2);
        assert_eq!(
            merged.get_tally("add"),
            OpTally {
                checked: 2,
                mismatched: 1
            }
        );
        assert_eq!(merged.get_tally("min").checked, 1);
    }

    #[test]
    fn test_dump_writes_json() {
        let mut stats = DifferentialStats::new();
        stats.bump_cases();
        stats.record("i32x4 (128-bit)/add", true);
        let path = std::env::temp_dir().join("lanewise_stats_dump_test.json");
        stats.dump(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["cases"], 1);
        assert_eq!(json["per_op"]["i32x4 (128-bit)/add"]["checked"], 1);
        let _ = std::fs::remove_file(path);
    }
}
