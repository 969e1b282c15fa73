//! Routing Direction Module
//!
//! The direction is derived, not transmitted: it is computed exactly once
//! from the envelope's origin chain at intake time and threaded through the
//! rest of the lifecycle, instead of being re-derived from `origin` at each
//! step. Keeping it an explicit value avoids divergence if more chains are
//! added later.

use serde::{Deserialize, Serialize};

use crate::envelope::ChainNetwork;

/// Origin-to-destination routing classification of an intent.
///
/// Directions are asymmetric: `BASE_TO_SOLANA` requires waiting for the
/// prove/finalize phases before the gateway can report success, while
/// `SOLANA_TO_BASE` is fire-and-forget (a queued receipt is a sufficient
/// synchronous answer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Base origin, Solana destination (multi-phase finality)
    BaseToSolana,
    /// Solana origin, Base destination (fire-and-forget)
    SolanaToBase,
}

impl Direction {
    /// Computes the direction from the envelope's origin chain.
    pub fn from_origin(origin: ChainNetwork) -> Self {
        match origin {
            ChainNetwork::Base => Direction::BaseToSolana,
            ChainNetwork::Solana => Direction::SolanaToBase,
        }
    }

    /// Whether this direction requires the prove/finalize polling path
    /// before the gateway may report success.
    pub fn requires_finality(self) -> bool {
        matches!(self, Direction::BaseToSolana)
    }

    /// Canonical wire name of the direction (e.g. `"BASE_TO_SOLANA"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::BaseToSolana => "BASE_TO_SOLANA",
            Direction::SolanaToBase => "SOLANA_TO_BASE",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_origin() {
        assert_eq!(
            Direction::from_origin(ChainNetwork::Base),
            Direction::BaseToSolana
        );
        assert_eq!(
            Direction::from_origin(ChainNetwork::Solana),
            Direction::SolanaToBase
        );
    }

    #[test]
    fn test_only_base_to_solana_requires_finality() {
        assert!(Direction::BaseToSolana.requires_finality());
        assert!(!Direction::SolanaToBase.requires_finality());
    }

    #[test]
    fn test_direction_wire_names() {
        let json = serde_json::to_string(&Direction::BaseToSolana).unwrap();
        assert_eq!(json, "\"BASE_TO_SOLANA\"");
        let json = serde_json::to_string(&Direction::SolanaToBase).unwrap();
        assert_eq!(json, "\"SOLANA_TO_BASE\"");
    }
}
