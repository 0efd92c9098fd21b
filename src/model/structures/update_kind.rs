use serde::{Deserialize, Serialize};

/// How a period record came to hold its current value
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    /// Seeded from the global prior, not yet finalized
    Initial,
    /// Carried forward from the previous period, not yet finalized
    Carried,
    /// Finalized by the conjugate update
    Observed,
    /// Finalized by the decay pass
    Decayed
}

impl UpdateKind {
    pub fn is_final(&self) -> bool {
        matches!(self, UpdateKind::Observed | UpdateKind::Decayed)
    }
}
