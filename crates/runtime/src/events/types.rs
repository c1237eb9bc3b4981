//! Payloads published on each topic.

use serde::{Deserialize, Serialize};
use warfare_core::{
    CombatError, CombatOutcome, CombatType, HexCoord, MoveFailure, MoveRequest, UnitId,
};

/// Combat resolution reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// An attack was resolved and every combat effect is committed.
    Resolved { outcome: Box<CombatOutcome> },

    /// An attack request was refused; the state is unchanged.
    Rejected {
        attacker: UnitId,
        defender: UnitId,
        combat_type: CombatType,
        error: CombatError,
    },
}

/// Progress of the deferred advances that combat requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MovementEvent {
    Requested(MoveRequest),

    Completed {
        unit: UnitId,
        from: HexCoord,
        to: HexCoord,
    },

    /// The unit could no longer be moved when the traversal finished.
    Failed {
        request: MoveRequest,
        reason: MoveFailure,
    },

    /// The traversal itself was abandoned before reaching the target.
    Aborted { request: MoveRequest, reason: String },
}
