//! Branch-probability rules that taper the room graph with depth.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchPolicy {
    pub base_chance: f64,
    pub decay_per_depth: f64,
}

impl BranchPolicy {
    /// Spreads a total decay of `0.5` evenly over `max_depth` levels.
    pub fn tapered(base_chance: f64, max_depth: u32) -> Self {
        Self { base_chance, decay_per_depth: 0.5 / f64::from(max_depth.max(1)) }
    }

    /// Probability that a room at `depth` grows another neighbour.
    pub fn chance(&self, depth: u32) -> f64 {
        self.base_chance - f64::from(depth) * self.decay_per_depth
    }
}
