//! The standard post-combat responders.
mod conquest;
mod destruction;
mod movement;
mod plunder;
mod sack;

pub use conquest::CityConquestResponder;
pub use destruction::DestructionResponder;
pub use movement::ForcedMovementResponder;
pub use plunder::PlunderResponder;
pub use sack::CitySackResponder;
