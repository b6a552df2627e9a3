//! Running statistics for a simulation

/// Counters updated by `IntersectionModel::step()`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimStats {
    /// Ticks simulated so far
    pub ticks: u64,
    pub vehicles_spawned: usize,
    pub vehicles_exited: usize,
    /// Sum of `wait_ticks` over all exited vehicles
    pub exited_wait_ticks: u64,
    /// Longest wait of any exited vehicle
    pub max_wait_ticks: u32,
    /// Number of times the open axis flipped
    pub signal_changes: u64,
}

impl SimStats {
    pub(crate) fn record_exit(&mut self, wait_ticks: u32) {
        self.vehicles_exited += 1;
        self.exited_wait_ticks += u64::from(wait_ticks);
        self.max_wait_ticks = self.max_wait_ticks.max(wait_ticks);
    }

    /// Mean wait of exited vehicles, in ticks
    pub fn average_wait(&self) -> f32 {
        if self.vehicles_exited == 0 {
            0.0
        } else {
            self.exited_wait_ticks as f32 / self.vehicles_exited as f32
        }
    }

    /// Share of spawned vehicles that have left the field, as a percentage
    pub fn throughput(&self) -> f32 {
        if self.vehicles_spawned == 0 {
            0.0
        } else {
            self.vehicles_exited as f32 / self.vehicles_spawned as f32 * 100.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Ticks: {} | Spawned: {} | Exited: {} | Avg wait: {:.1} ticks",
            self.ticks,
            self.vehicles_spawned,
            self.vehicles_exited,
            self.average_wait()
        )
    }
}
