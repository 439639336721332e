//! Read-only views of a tally snapshot for display

use std::fmt::Write as _;

/// Landing distribution for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u64>,
}

impl Histogram {
    pub fn new(counts: Vec<u64>) -> Self {
        Self { counts }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Average bin index of the landed balls
    pub fn mean_bin(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let weighted: f64 = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, &c)| i as f64 * c as f64)
            .sum();
        Some(weighted / total as f64)
    }

    /// Bar heights scaled so the tallest bar is `max_height`
    ///
    /// With nothing counted every bar is zero.
    pub fn bar_heights(&self, max_height: f32) -> Vec<f32> {
        let max = self.max();
        let scale = if max > 0 { max_height / max as f32 } else { 1.0 };
        self.counts.iter().map(|&c| c as f32 * scale).collect()
    }

    /// Counts an ideal board would produce for the same number of balls
    ///
    /// Bin `k` of `n + 1` bins receives `total * C(n, k) / 2^n`.
    pub fn expected(&self) -> Vec<f64> {
        let bins = self.counts.len();
        if bins == 0 {
            return Vec::new();
        }
        let n = bins - 1;
        let total = self.total() as f64;
        let denom = 2f64.powi(n as i32);
        binomial_row(n)
            .into_iter()
            .map(|c| total * c / denom)
            .collect()
    }

    /// Horizontal text bar chart, one line per bin
    pub fn render_text(&self, width: usize) -> String {
        let expected = self.expected();
        let mut out = String::new();
        for (i, height) in self.bar_heights(width as f32).iter().enumerate() {
            let bar = "#".repeat(height.round() as usize);
            let _ = writeln!(
                out,
                "{:>3} | {:<width$} {:>6} (expected {:.1})",
                i,
                bar,
                self.counts[i],
                expected[i],
                width = width
            );
        }
        let _ = write!(out, "total: {}", self.total());
        out
    }
}

/// Row `n` of Pascal's triangle, as floats so large rows do not overflow
fn binomial_row(n: usize) -> Vec<f64> {
    let mut row = vec![1.0f64; n + 1];
    for k in 1..n {
        row[k] = row[k - 1] * (n - k + 1) as f64 / k as f64;
    }
    row
}
