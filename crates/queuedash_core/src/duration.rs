use crate::BucketSecs;

const UNITS: [(u64, &str); 4] = [(24 * 60 * 60, "d"), (60 * 60, "h"), (60, "m"), (1, "s")];

/// Compact duration label for a stat bucket, e.g. `300` -> `5m`, `5400` -> `1h 30m`.
pub fn short_duration(secs: BucketSecs) -> String {
    if secs == 0 {
        return "0s".to_string();
    }

    let mut remaining = secs;
    let mut parts = Vec::new();
    for (amount, unit) in UNITS {
        let count = remaining / amount;
        if count == 0 {
            continue;
        }
        remaining %= amount;
        parts.push(format!("{count}{unit}"));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::short_duration;

    #[test]
    fn formats_default_buckets() {
        let labels: Vec<_> = [300, 600, 1800, 3600]
            .into_iter()
            .map(short_duration)
            .collect();
        assert_eq!(labels, vec!["5m", "10m", "30m", "1h"]);
    }

    #[test]
    fn mixes_units_and_skips_zero_parts() {
        assert_eq!(short_duration(5400), "1h 30m");
        assert_eq!(short_duration(90_061), "1d 1h 1m 1s");
        assert_eq!(short_duration(86_405), "1d 5s");
        assert_eq!(short_duration(0), "0s");
    }
}
