pub mod json_store;
pub mod memory;
pub mod schema;

use std::ops::BitOr;

use thiserror::Error;

use crate::store::schema::PersistedState;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Which pieces of a `PersistedState` a mutation touched. A store only has to
/// write those.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Changed {
    pub config: bool,
    pub text: bool,
    pub progress: bool,
    /// The active line index.
    pub cursor: bool,
    /// Global counters and letter statistics.
    pub stats: bool,
}

impl Changed {
    pub const NONE: Changed = Changed {
        config: false,
        text: false,
        progress: false,
        cursor: false,
        stats: false,
    };
    pub const ALL: Changed = Changed {
        config: true,
        text: true,
        progress: true,
        cursor: true,
        stats: true,
    };
    pub const CONFIG: Changed = Changed {
        config: true,
        ..Changed::NONE
    };
    pub const TEXT: Changed = Changed {
        text: true,
        ..Changed::NONE
    };
    pub const PROGRESS: Changed = Changed {
        progress: true,
        ..Changed::NONE
    };
    pub const CURSOR: Changed = Changed {
        cursor: true,
        ..Changed::NONE
    };
    pub const STATS: Changed = Changed {
        stats: true,
        ..Changed::NONE
    };
}

impl BitOr for Changed {
    type Output = Changed;

    fn bitor(self, rhs: Changed) -> Changed {
        Changed {
            config: self.config || rhs.config,
            text: self.text || rhs.text,
            progress: self.progress || rhs.progress,
            cursor: self.cursor || rhs.cursor,
            stats: self.stats || rhs.stats,
        }
    }
}

/// Where a practice session keeps its state between runs.
///
/// `load` never fails: missing or unreadable pieces come back as defaults.
pub trait StateStore {
    fn load(&self) -> PersistedState;
    /// Write the pieces of `state` named by `changed`.
    fn save(&self, state: &PersistedState, changed: Changed) -> Result<(), StoreError>;
}
