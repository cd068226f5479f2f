use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    spins: AtomicU64,
    exhausted: AtomicU64,
    conflicts: AtomicU64,
    inventory_write_errors: AtomicU64,
}

impl Metrics {
    pub fn record_spin(&self) {
        self.spins.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_conflict(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_inventory_write_error(&self) {
        self.inventory_write_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn spins(&self) -> u64 {
        self.spins.load(Ordering::Relaxed)
    }

    pub fn conflicts(&self) -> u64 {
        self.conflicts.load(Ordering::Relaxed)
    }

    pub fn inventory_write_errors(&self) -> u64 {
        self.inventory_write_errors.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self, history_delivered: u64, history_failed: u64) -> String {
        let spins = self.spins.load(Ordering::Relaxed);
        let exhausted = self.exhausted.load(Ordering::Relaxed);
        let conflicts = self.conflicts.load(Ordering::Relaxed);
        let write_errors = self.inventory_write_errors.load(Ordering::Relaxed);

        format!(
            "# TYPE wheel_spins_total counter\n\
wheel_spins_total {}\n\
# TYPE wheel_exhausted_total counter\n\
wheel_exhausted_total {}\n\
# TYPE wheel_decrement_conflicts_total counter\n\
wheel_decrement_conflicts_total {}\n\
# TYPE wheel_inventory_write_errors_total counter\n\
wheel_inventory_write_errors_total {}\n\
# TYPE wheel_history_delivered_total counter\n\
wheel_history_delivered_total {}\n\
# TYPE wheel_history_failed_total counter\n\
wheel_history_failed_total {}\n",
            spins, exhausted, conflicts, write_errors, history_delivered, history_failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prometheus_output_lists_every_counter() {
        let metrics = Metrics::default();
        metrics.record_spin();
        metrics.record_spin();
        metrics.record_conflict();
        let text = metrics.render_prometheus(5, 1);
        assert!(text.contains("wheel_spins_total 2\n"));
        assert!(text.contains("wheel_decrement_conflicts_total 1\n"));
        assert!(text.contains("wheel_exhausted_total 0\n"));
        assert!(text.contains("wheel_history_delivered_total 5\n"));
        assert!(text.contains("wheel_history_failed_total 1\n"));
    }
}
