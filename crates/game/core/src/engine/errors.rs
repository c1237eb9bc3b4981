//! Error types for the combat engine.

use crate::combat::CombatType;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{FactionId, HexCoord, UnitId};

/// Why an attack is not allowed right now.
///
/// Rules are checked in declaration order and the first failure is reported.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackRejection {
    #[error("a unit cannot attack itself")]
    SameUnit,

    #[error("both units belong to {0}")]
    SameOwner(FactionId),

    #[error("{attacker} and {defender} are not at war")]
    NotAtWar {
        attacker: FactionId,
        defender: FactionId,
    },

    #[error("attacker has no movement left")]
    NoMovementLeft,

    #[error("attacker has already attacked this turn")]
    CannotAttack,

    #[error("attacker has no {0} strength")]
    NoStrength(CombatType),

    #[error("target is {distance} cells away, reach is {reach}")]
    OutOfRange { distance: u32, reach: u32 },

    #[error("target stands on a mountain")]
    TargetOnMountain,

    #[error("attacker could not occupy {0}")]
    CannotOccupyTarget(HexCoord),

    #[error("attacker cannot see {0}")]
    TargetNotVisible(HexCoord),

    #[error("attacker is not set up for a ranged attack")]
    NotReadyForRangedAttack,
}

impl AttackRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SameUnit => "same_unit",
            Self::SameOwner(_) => "same_owner",
            Self::NotAtWar { .. } => "not_at_war",
            Self::NoMovementLeft => "no_movement_left",
            Self::CannotAttack => "cannot_attack",
            Self::NoStrength(_) => "no_strength",
            Self::OutOfRange { .. } => "out_of_range",
            Self::TargetOnMountain => "target_on_mountain",
            Self::CannotOccupyTarget(_) => "cannot_occupy_target",
            Self::TargetNotVisible(_) => "target_not_visible",
            Self::NotReadyForRangedAttack => "not_ready_for_ranged_attack",
        }
    }
}

/// Errors surfaced by the combat engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("location {0} is not on the map")]
    LocationNotOnMap(HexCoord),

    #[error("{combat_type} attack performed while not allowed: {reason}")]
    PreconditionViolated {
        combat_type: CombatType,
        reason: AttackRejection,
    },
}

impl CombatError {
    pub(crate) fn precondition(combat_type: CombatType, reason: AttackRejection) -> Self {
        Self::PreconditionViolated {
            combat_type,
            reason,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::UnitNotFound(_) | Self::LocationNotOnMap(_))
    }

    /// The validity rule that failed, for precondition violations.
    pub fn rejection(&self) -> Option<&AttackRejection> {
        match self {
            Self::PreconditionViolated { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnitNotFound(_) | Self::LocationNotOnMap(_) => ErrorSeverity::Validation,
            Self::PreconditionViolated { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnitNotFound(_) => "COMBAT_UNIT_NOT_FOUND",
            Self::LocationNotOnMap(_) => "COMBAT_LOCATION_NOT_ON_MAP",
            Self::PreconditionViolated { .. } => "COMBAT_PRECONDITION_VIOLATED",
        }
    }
}
