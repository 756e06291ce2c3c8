pub mod error_tracking;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::dtos::ImportReport;

/// In-process counters rendered on `/metrics`.
#[derive(Default)]
pub struct AppMetrics {
    request_count: AtomicU64,
    error_count: AtomicU64,
    auth_failure_count: AtomicU64,
    forbidden_count: AtomicU64,
    repairs_created: AtomicU64,
    import_rows_applied: AtomicU64,
    import_rows_failed: AtomicU64,
    latency_total_ms: AtomicU64,
    latency_count: AtomicU64,
}

impl AppMetrics {
    pub fn record_request(&self, status: u16, latency_ms: u64) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        match status {
            401 => {
                self.auth_failure_count.fetch_add(1, Ordering::Relaxed);
            }
            403 => {
                self.forbidden_count.fetch_add(1, Ordering::Relaxed);
            }
            500..=u16::MAX => {
                self.error_count.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
        self.latency_total_ms
            .fetch_add(latency_ms, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_repair_created(&self) {
        self.repairs_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_import(&self, report: &ImportReport) {
        let applied = (report.created + report.updated) as u64;
        self.import_rows_applied
            .fetch_add(applied, Ordering::Relaxed);
        self.import_rows_failed
            .fetch_add(report.errors.len() as u64, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self, db_size: u32, db_idle: usize) -> String {
        let count = self.latency_count.load(Ordering::Relaxed).max(1);
        let avg_latency = self.latency_total_ms.load(Ordering::Relaxed) as f64 / count as f64;

        format!(
            concat!(
                "# TYPE http_requests_total counter\n",
                "http_requests_total {}\n",
                "# TYPE http_error_total counter\n",
                "http_error_total {}\n",
                "# TYPE auth_failures_total counter\n",
                "auth_failures_total {}\n",
                "# TYPE forbidden_total counter\n",
                "forbidden_total {}\n",
                "# TYPE repairs_created_total counter\n",
                "repairs_created_total {}\n",
                "# TYPE import_rows_applied_total counter\n",
                "import_rows_applied_total {}\n",
                "# TYPE import_rows_failed_total counter\n",
                "import_rows_failed_total {}\n",
                "# TYPE http_latency_avg_ms gauge\n",
                "http_latency_avg_ms {:.2}\n",
                "# TYPE db_pool_size gauge\n",
                "db_pool_size {}\n",
                "# TYPE db_pool_idle gauge\n",
                "db_pool_idle {}\n",
            ),
            self.request_count.load(Ordering::Relaxed),
            self.error_count.load(Ordering::Relaxed),
            self.auth_failure_count.load(Ordering::Relaxed),
            self.forbidden_count.load(Ordering::Relaxed),
            self.repairs_created.load(Ordering::Relaxed),
            self.import_rows_applied.load(Ordering::Relaxed),
            self.import_rows_failed.load(Ordering::Relaxed),
            avg_latency,
            db_size,
            db_idle,
        )
    }
}
