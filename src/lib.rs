use clap::ValueEnum;

pub mod catalog;
pub mod error;
pub mod export;
pub mod harness;
pub mod orchestrator;
pub mod protocol;
pub mod provider;
pub mod schema;
pub mod stats;
pub mod validate;

pub use error::{BenchError, Result};

use schema::Category;

/// Algorithm family to benchmark.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum Family {
    /// Classical baselines followed by every enabled post-quantum family.
    #[default]
    All,
    /// Classical baselines only (RSA-OAEP, RSA-PSS, ECDSA, Ed25519).
    Classical,
    /// RSA-OAEP key transport.
    LegacyKem,
    /// RSA-PSS, ECDSA P-256 and Ed25519.
    LegacySig,
    MlKem,
    Hqc,
    MlDsa,
    SlhDsa,
}

impl Family {
    pub fn includes(self, category: Category) -> bool {
        match self {
            Family::All => true,
            Family::Classical => matches!(category, Category::LegacyKem | Category::LegacySig),
            Family::LegacyKem => category == Category::LegacyKem,
            Family::LegacySig => category == Category::LegacySig,
            Family::MlKem => category == Category::MlKem,
            Family::Hqc => category == Category::Hqc,
            Family::MlDsa => category == Category::MlDsa,
            Family::SlhDsa => category == Category::SlhDsa,
        }
    }
}
