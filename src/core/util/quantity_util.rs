//! Kubernetes resource quantity parsing.
//!
//! Parsing is permissive: a malformed body yields `0` instead of an error so a
//! single bad sample never aborts a whole metrics or listing response.

const KIB: i64 = 1024;
const MIB: i64 = 1024 * 1024;
const GIB: i64 = 1024 * 1024 * 1024;

pub struct QuantityUtil;

impl QuantityUtil {
    /// CPU quantity in cores. Accepts `"250m"`, `"123456n"` and plain `"2"` / `"0.5"`.
    /// Negative or non-finite values (`NaN`, `inf`) read as 0.
    pub fn parse_cpu(s: &str) -> f64 {
        let s = s.trim();
        let (body, divisor) = if let Some(nanos) = s.strip_suffix('n') {
            (nanos, 1_000_000_000.0)
        } else if let Some(millis) = s.strip_suffix('m') {
            (millis, 1000.0)
        } else {
            (s, 1.0)
        };

        body.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v / divisor)
            .unwrap_or(0.0)
    }

    /// Memory quantity in bytes. Accepts `Ki`, `Mi`, `Gi` suffixes and plain byte counts.
    pub fn parse_memory(s: &str) -> i64 {
        let s = s.trim();
        let scaled = |body: &str, factor: i64| {
            body.parse::<i64>()
                .ok()
                .and_then(|v| v.checked_mul(factor))
                .unwrap_or(0)
        };

        if let Some(body) = s.strip_suffix("Ki") {
            scaled(body, KIB)
        } else if let Some(body) = s.strip_suffix("Mi") {
            scaled(body, MIB)
        } else if let Some(body) = s.strip_suffix("Gi") {
            scaled(body, GIB)
        } else if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            s.parse::<i64>().unwrap_or(0)
        } else {
            0
        }
    }

    /// Share of `capacity` used, clamped to `[0, 100]`. Zero capacity reads as 0%.
    #[inline]
    pub fn usage_percent(used: f64, capacity: f64) -> f64 {
        let ratio = used / capacity;
        if capacity <= 0.0 || !ratio.is_finite() {
            return 0.0;
        }
        (ratio * 100.0).clamp(0.0, 100.0)
    }
}
