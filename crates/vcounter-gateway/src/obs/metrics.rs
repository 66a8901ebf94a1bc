//! In-process metrics registry rendered as Prometheus text.
//!
//! Counter/gauge/histogram families with dynamic labels backed by `DashMap`.
//! Label sets are stored as sorted `(key, value)` vectors so output order is
//! stable. Histogram buckets are integer microseconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

type LabelKey = Vec<(String, String)>;

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(r.key()), r.value().load(Ordering::Relaxed));
        }
    }
}

/// Unlabelled gauge (in-flight requests).
#[derive(Default)]
pub struct Gauge {
    v: AtomicI64,
}

impl Gauge {
    pub fn inc(&self) { self.v.fetch_add(1, Ordering::Relaxed); }
    pub fn dec(&self) { self.v.fetch_sub(1, Ordering::Relaxed); }
    pub fn get(&self) -> i64 { self.v.load(Ordering::Relaxed) }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} gauge\n{} {}", name, name, self.get());
    }
}

// 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 1s, 5s
const BUCKETS_MICROS: [u64; 9] = [1_000, 5_000, 10_000, 25_000, 50_000, 100_000, 250_000, 1_000_000, 5_000_000];

struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; BUCKETS_MICROS.len()],
}

impl Default for AtomicHistogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self.map.entry(label_key(labels)).or_default();
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);
        // cumulative
        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for r in self.map.iter() {
            let labels = label_str(r.key());
            let hist = r.value();
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let n = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, n);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);
            let _ = writeln!(out, "{}_sum{{{}}} {}", name, labels, hist.sum.load(Ordering::Relaxed));
            let _ = writeln!(out, "{}_count{{{}}} {}", name, labels, count);
        }
    }
}

#[derive(Default)]
pub struct ServiceMetrics {
    /// Counter endpoint responses by `outcome` (ok / error).
    pub requests: CounterVec,
    /// Failures by stable client `code` and `source` (store / internal).
    pub errors: CounterVec,
    pub in_flight: Gauge,
    /// Store round-trips by `op` and `result`. Microseconds.
    pub store_duration: HistogramVec,
    draining: AtomicBool,
}

impl ServiceMetrics {
    pub fn set_draining(&self) { self.draining.store(true, Ordering::Relaxed); }
    pub fn is_draining(&self) -> bool { self.draining.load(Ordering::Relaxed) }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.requests.render("vcounter_requests_total", &mut out);
        self.errors.render("vcounter_errors_total", &mut out);
        self.in_flight.render("vcounter_requests_in_flight", &mut out);
        self.store_duration.render("vcounter_store_duration_micros", &mut out);
        let _ = writeln!(out, "# TYPE vcounter_draining gauge\nvcounter_draining {}", u8::from(self.is_draining()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_order_independent() {
        let m = ServiceMetrics::default();
        m.requests.inc(&[("outcome", "ok"), ("route", "/x")]);
        m.requests.inc(&[("route", "/x"), ("outcome", "ok")]);
        assert_eq!(m.requests.get(&[("outcome", "ok"), ("route", "/x")]), 2);
    }

    #[test]
    fn histogram_buckets_are_cumulative() {
        let m = ServiceMetrics::default();
        m.store_duration.observe(&[("op", "read")], Duration::from_millis(3));
        let text = m.render();

        assert!(text.contains("vcounter_store_duration_micros_bucket{op=\"read\",le=\"1000\"} 0"));
        assert!(text.contains("vcounter_store_duration_micros_bucket{op=\"read\",le=\"5000\"} 1"));
        assert!(text.contains("vcounter_store_duration_micros_bucket{op=\"read\",le=\"+Inf\"} 1"));
        assert!(text.contains("vcounter_store_duration_micros_count{op=\"read\"} 1"));
    }

    #[test]
    fn draining_gauge_flips() {
        let m = ServiceMetrics::default();
        assert!(m.render().contains("vcounter_draining 0"));
        m.set_draining();
        assert!(m.render().contains("vcounter_draining 1"));
    }
}
