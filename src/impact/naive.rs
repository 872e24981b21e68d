//! Naive impact scoring: summed byte size against fixed thresholds.

use super::{ImpactInput, ImpactLevel, ImpactOutcome, ImpactResult};

/// Combined size below this is low impact (10 MB).
pub const LOW_THRESHOLD_BYTES: i64 = 10_000_000;

/// Combined size at or above this is high impact (1 GB).
pub const HIGH_THRESHOLD_BYTES: i64 = 1_000_000_000;

const BYTES_PER_MB: f64 = 1_000_000.0;

/// Sum sizes (missing treated as 0) and classify. Cannot fail; an empty
/// input list scores low with total 0.
pub fn assess(inputs: &[ImpactInput]) -> ImpactResult {
    let total_size: i64 = inputs
        .iter()
        .map(|input| input.size_bytes.unwrap_or(0))
        .sum();
    let total_mb = total_size as f64 / BYTES_PER_MB;

    let (level, explanation) = if total_size < LOW_THRESHOLD_BYTES {
        (
            ImpactLevel::Low,
            format!(
                "Combined size ({:.2} MB) is below threshold of {} MB",
                total_mb,
                LOW_THRESHOLD_BYTES / 1_000_000
            ),
        )
    } else if total_size < HIGH_THRESHOLD_BYTES {
        (
            ImpactLevel::Medium,
            format!(
                "Combined size ({:.2} MB) is between {} MB and {} MB",
                total_mb,
                LOW_THRESHOLD_BYTES / 1_000_000,
                HIGH_THRESHOLD_BYTES / 1_000_000
            ),
        )
    } else {
        (
            ImpactLevel::High,
            format!(
                "Combined size ({:.2} MB) exceeds threshold of {} MB",
                total_mb,
                HIGH_THRESHOLD_BYTES / 1_000_000
            ),
        )
    };

    ImpactResult {
        level,
        explanation,
        outcome: ImpactOutcome::Naive {
            total_size_bytes: total_size,
        },
    }
}
