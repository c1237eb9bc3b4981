//! Turns runtime events into readable battle log lines.
use std::collections::HashMap;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};
use warfare_content::Scenario;
use warfare_core::{CombatEvent, FactionId, GameState, TemplateOracle, UnitId};
use warfare_runtime::{BattleEvent, Event, MovementEvent, Topic};

/// Names units and factions as they were when the scenario was staged.
#[derive(Clone, Debug, Default)]
pub struct Narrator {
    units: HashMap<UnitId, String>,
    factions: HashMap<FactionId, String>,
}

impl Narrator {
    pub fn new(scenario: &Scenario) -> Self {
        let units = scenario
            .state
            .units
            .values()
            .map(|unit| {
                let name = match scenario.state.cities.values().find(|c| c.facade == unit.id) {
                    Some(city) => city.name.clone(),
                    None => scenario
                        .templates
                        .template(unit.template)
                        .map(|template| format!("{} #{}", template.name, unit.id.0))
                        .unwrap_or_else(|| format!("unit #{}", unit.id.0)),
                };
                (unit.id, name)
            })
            .collect();
        let factions = scenario
            .state
            .factions
            .values()
            .map(|faction| (faction.id, faction.name.clone()))
            .collect();
        Self { units, factions }
    }

    fn unit(&self, id: UnitId) -> String {
        self.units
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("unit #{}", id.0))
    }

    fn faction(&self, id: FactionId) -> String {
        self.factions
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("faction #{}", id.0))
    }

    pub fn describe_battle(&self, event: &BattleEvent) -> Vec<String> {
        match event {
            BattleEvent::Resolved { outcome } => {
                let results = &outcome.results;
                let mut lines = vec![format!(
                    "{} attacks {} ({}): deals {}, takes {}",
                    self.unit(results.attacker),
                    self.unit(results.defender),
                    results.info.combat_type,
                    results.damage_to_defender,
                    results.damage_to_attacker,
                )];
                lines.extend(outcome.events.iter().map(|e| self.describe_effect(e)));
                lines
            }
            BattleEvent::Rejected {
                attacker,
                defender,
                combat_type,
                error,
            } => vec![format!(
                "{} cannot {} attack {}: {}",
                self.unit(*attacker),
                combat_type,
                self.unit(*defender),
                error
            )],
        }
    }

    fn describe_effect(&self, event: &CombatEvent) -> String {
        match *event {
            CombatEvent::UnitDestroyed { unit, owner, .. } => {
                format!("  {} of {} is destroyed", self.unit(unit), self.faction(owner))
            }
            CombatEvent::UnitCaptured { unit, from, to } => format!(
                "  {} is captured from {} by {}",
                self.unit(unit),
                self.faction(from),
                self.faction(to)
            ),
            CombatEvent::CityCaptured { city, from, to } => format!(
                "  city #{} falls: {} -> {}",
                city.0,
                self.faction(from),
                self.faction(to)
            ),
            CombatEvent::CitySacked {
                city, to, gold, ..
            } => format!("  {} sacks city #{} for {gold} gold", self.faction(to), city.0),
            CombatEvent::GoldRaided { from, to, gold } => format!(
                "  {} plunders {gold} gold from {}",
                self.faction(to),
                self.faction(from)
            ),
            CombatEvent::BountyAwarded {
                faction,
                victim,
                gold,
            } => format!(
                "  {} earns {gold} gold for defeating {}",
                self.faction(faction),
                self.unit(victim)
            ),
        }
    }

    pub fn describe_movement(&self, event: &MovementEvent) -> String {
        match event {
            MovementEvent::Requested(request) => {
                format!("{} advances to {}", self.unit(request.unit), request.to)
            }
            MovementEvent::Completed { unit, to, .. } => {
                format!("{} arrives at {to}", self.unit(*unit))
            }
            MovementEvent::Failed { request, reason } => {
                format!("{} could not advance: {reason}", self.unit(request.unit))
            }
            MovementEvent::Aborted { request, reason } => {
                format!("{} stopped short: {reason}", self.unit(request.unit))
            }
        }
    }

    /// Summary of treasuries and city ownership.
    pub fn summarize(&self, state: &GameState) -> Vec<String> {
        let treasuries = state.factions.values().map(|faction| {
            format!(
                "{}: {} gold, happiness {}",
                faction.name, faction.gold, faction.net_happiness
            )
        });
        let cities = state.cities.values().map(|city| {
            let hitpoints = state
                .unit(city.facade)
                .map(|facade| facade.hitpoints.current)
                .unwrap_or_default();
            format!(
                "{} (pop {}): held by {}, {hitpoints} HP",
                city.name,
                city.population,
                self.faction(city.owner)
            )
        });
        treasuries.chain(cities).collect()
    }

    /// Logs every battle and movement event until the runtime shuts down.
    pub async fn follow(
        self,
        mut battle_rx: broadcast::Receiver<Event>,
        mut movement_rx: broadcast::Receiver<Event>,
    ) {
        let mut battle_open = true;
        let mut movement_open = true;
        while battle_open || movement_open {
            let (topic, received) = tokio::select! {
                event = battle_rx.recv(), if battle_open => (Topic::Battle, event),
                event = movement_rx.recv(), if movement_open => (Topic::Movement, event),
                else => break,
            };
            match received {
                Ok(Event::Battle(event)) => {
                    for line in self.describe_battle(&event) {
                        info!("{line}");
                    }
                }
                Ok(Event::Movement(event)) => info!("{}", self.describe_movement(&event)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(?topic, skipped, "battle log fell behind");
                }
                Err(RecvError::Closed) => match topic {
                    Topic::Battle => battle_open = false,
                    Topic::Movement => movement_open = false,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warfare_content::ContentFactory;
    use warfare_core::{AttackRejection, CombatError, CombatType};

    fn narrator() -> Narrator {
        let scenario = ContentFactory::bundled()
            .load_scenario("river_ford")
            .unwrap();
        Narrator::new(&scenario)
    }

    #[test]
    fn units_are_named_after_templates_and_cities() {
        let narrator = narrator();
        assert_eq!(narrator.unit(UnitId(3)), "Archer #3");
        assert_eq!(narrator.unit(UnitId(100)), "Valeford");
        assert_eq!(narrator.unit(UnitId(42)), "unit #42");
    }

    #[test]
    fn rejections_explain_the_failed_rule() {
        let lines = narrator().describe_battle(&BattleEvent::Rejected {
            attacker: UnitId(1),
            defender: UnitId(1),
            combat_type: CombatType::Melee,
            error: CombatError::PreconditionViolated {
                combat_type: CombatType::Melee,
                reason: AttackRejection::SameUnit,
            },
        });
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Spearman #1 cannot melee attack Spearman #1"));
        assert!(lines[0].ends_with("a unit cannot attack itself"));
    }

    #[test]
    fn summary_lists_treasuries_then_cities() {
        let scenario = ContentFactory::bundled()
            .load_scenario("river_ford")
            .unwrap();
        let lines = Narrator::new(&scenario).summarize(&scenario.state);
        assert_eq!(lines[0], "Kingdom of Aster: 120 gold, happiness 0");
        assert_eq!(lines[1], "Vale Confederacy: 150 gold, happiness -4");
        assert!(lines[2].starts_with("Valeford (pop 5): held by Vale Confederacy"));
    }
}
