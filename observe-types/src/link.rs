use crate::ElementId;
use serde::{Deserialize, Serialize};

/// A link-index record: observation `obs` annotates feature `link`.
///
/// Stored without direction; the export engine always reads it as
/// observation → feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub obs: ElementId,
    pub link: ElementId,
}

impl Link {
    #[must_use]
    pub fn new(obs: impl Into<ElementId>, link: impl Into<ElementId>) -> Self {
        Self {
            obs: obs.into(),
            link: link.into(),
        }
    }
}
