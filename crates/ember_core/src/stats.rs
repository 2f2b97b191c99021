//! Engine statistics.

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Particles spawned this tick (0 or 1).
    pub spawned: usize,
    /// Particles removed for leaving the bottom edge.
    pub culled: usize,
    /// Glows drawn.
    pub drawn: usize,
    /// Live particles after the cull.
    pub alive: usize,
}

/// Totals since mount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Ticks rendered.
    pub ticks: u64,
    /// Particles ever spawned.
    pub total_spawned: u64,
    /// Particles ever culled.
    pub total_culled: u64,
    /// Largest live population seen after a cull.
    pub peak_alive: usize,
}

impl EngineStats {
    /// Folds one tick into the totals.
    pub fn record(&mut self, tick: &TickStats) {
        self.ticks += 1;
        self.total_spawned += tick.spawned as u64;
        self.total_culled += tick.culled as u64;
        self.peak_alive = self.peak_alive.max(tick.alive);
    }

    /// Particles spawned and not yet culled.
    #[must_use]
    pub const fn outstanding(&self) -> u64 {
        self.total_spawned - self.total_culled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates() {
        let mut stats = EngineStats::default();
        stats.record(&TickStats {
            spawned: 1,
            culled: 0,
            drawn: 1,
            alive: 1,
        });
        stats.record(&TickStats {
            spawned: 1,
            culled: 1,
            drawn: 2,
            alive: 1,
        });

        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.total_spawned, 2);
        assert_eq!(stats.total_culled, 1);
        assert_eq!(stats.peak_alive, 1);
        assert_eq!(stats.outstanding(), 1);
    }
}
