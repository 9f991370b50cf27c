use crate::error::Result;
use crate::jvm::types::{GcInterval, TelemetrySample};
use crate::metrics::pairing::GC_FINISH_PENDING;
use crate::metrics::store::TelemetryStore;
use chrono::DateTime;
use serde::Serialize;
use std::fmt::Write;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    Table,
    Json,
}

#[derive(Serialize)]
struct Report {
    item_count: usize,
    capacity: usize,
    max_heap_size: i64,
    samples: Vec<TelemetrySample>,
    gc_intervals: Vec<GcInterval>,
}

pub fn render(store: &TelemetryStore, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Table => render_table(store),
        ReportFormat::Json => render_json(store),
    }
}

pub fn render_json(store: &TelemetryStore) -> Result<String> {
    let report = Report {
        item_count: store.item_count(),
        capacity: store.capacity(),
        max_heap_size: store.max_heap_size(),
        samples: (0..store.item_count()).map(|i| store.get_sample(i)).collect(),
        gc_intervals: store.gc_intervals(),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn render_table(store: &TelemetryStore) -> Result<String> {
    let mut out = String::new();

    writeln!(
        out,
        "{:<12} {:>12} {:>12} {:>8} {:>8}  {}",
        "TIME", "USED", "TOTAL", "THREADS", "CLASSES", "GC (start..finish)"
    )?;
    writeln!(out, "{}", "-".repeat(80))?;

    for index in 0..store.item_count() {
        let row = store.get_sample(index);
        writeln!(
            out,
            "{:<12} {:>12} {:>12} {:>8} {:>8}  {}",
            format_timestamp(row.timestamp),
            row.used_memory,
            row.total_memory,
            row.total_threads,
            row.loaded_classes,
            format_gc_slots(&row.gc_starts, &row.gc_finishes),
        )?;
    }

    let intervals = store.gc_intervals();
    writeln!(out)?;
    writeln!(
        out,
        "Samples: {}  Capacity: {}  GC intervals: {}",
        store.item_count(),
        store.capacity(),
        intervals.len()
    )?;

    let total_pause: i64 = intervals.iter().filter_map(GcInterval::duration).sum();
    let open = intervals.iter().filter(|i| i.finish.is_none()).count();
    writeln!(out, "Total GC time: {}  Open: {}", total_pause, open)?;

    Ok(out)
}

fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|t| t.format("%H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn format_gc_slots(starts: &[i64], finishes: &[i64]) -> String {
    starts
        .iter()
        .zip(finishes)
        .map(|(start, &finish)| {
            if finish == GC_FINISH_PENDING {
                format!("{}..", start)
            } else {
                format!("{}..{}", start, finish)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jvm::types::MonitoredSample;
    use std::str::FromStr;

    fn store() -> TelemetryStore {
        let mut store = TelemetryStore::new(4);
        store.record_sample(MonitoredSample {
            timestamp: 1_000,
            free_memory: 200,
            total_memory: 1_000,
            user_threads: 5,
            system_threads: 2,
            loaded_classes: 700,
            gc_starts: vec![10],
            ..Default::default()
        });
        store.record_sample(MonitoredSample {
            timestamp: 2_000,
            free_memory: 600,
            total_memory: 1_000,
            user_threads: 5,
            system_threads: 2,
            loaded_classes: 701,
            gc_finishes: vec![25],
            ..Default::default()
        });
        store
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(ReportFormat::from_str("json").unwrap(), ReportFormat::Json);
        assert_eq!(ReportFormat::from_str("table").unwrap(), ReportFormat::Table);
        assert!(ReportFormat::from_str("csv").is_err());
        assert_eq!(ReportFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&store()).unwrap();

        assert!(table.contains("00:00:01.000"));
        assert!(table.contains("00:00:02.000"));
        assert!(table.contains("10..25"));
        assert!(table.contains("Samples: 2  Capacity: 4  GC intervals: 1"));
        assert!(table.contains("Total GC time: 15  Open: 0"));
    }

    #[test]
    fn test_render_table_open_interval() {
        let mut store = TelemetryStore::new(2);
        store.record_sample(MonitoredSample {
            gc_starts: vec![40],
            ..Default::default()
        });

        let table = render_table(&store).unwrap();
        assert!(table.contains("40.."));
        assert!(table.contains("Open: 1"));
    }

    #[test]
    fn test_render_table_unmatched_starts() {
        let mut store = TelemetryStore::new(2);
        store.record_sample(MonitoredSample {
            gc_starts: vec![10, 20],
            ..Default::default()
        });

        let table = render(&store, ReportFormat::Table).unwrap();
        assert!(table.contains("Total GC time: 0  Open: 2"));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&store()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["item_count"], 2);
        assert_eq!(value["samples"][0]["used_memory"], 800);
        assert_eq!(value["samples"][1]["gc_starts"][0], 10);
        assert_eq!(value["gc_intervals"][0]["finish"], 25);
    }
}
