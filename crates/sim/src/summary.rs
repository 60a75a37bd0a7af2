//! Per-fighter tallies accumulated over a fight.

use std::fmt;

use combat_core::{Arena, ArenaTick, AttackReceiveType, EntityId};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FighterTally {
    pub id: u32,
    pub name: String,
    pub damage_dealt: i64,
    pub strikes: u32,
    pub hits: u32,
    pub crits: u32,
    pub misses: u32,
    /// Dodged or parried strikes.
    pub avoided: u32,
    pub resisted: u32,
    pub kills: u32,
    pub life_left: i32,
    pub alive: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DuelSummary {
    pub seed: u64,
    pub ticks: u32,
    pub elapsed: f32,
    /// Life lost to damage-over-time auras on both sides.
    pub periodic_damage: i64,
    pub fighters: Vec<FighterTally>,
    pub winner: Option<String>,
}

impl DuelSummary {
    pub fn new(seed: u64, fighters: impl IntoIterator<Item = (EntityId, String)>) -> Self {
        Self {
            seed,
            ticks: 0,
            elapsed: 0.0,
            periodic_damage: 0,
            fighters: fighters
                .into_iter()
                .map(|(id, name)| FighterTally {
                    id: id.0,
                    name,
                    alive: true,
                    ..FighterTally::default()
                })
                .collect(),
            winner: None,
        }
    }

    fn tally_mut(&mut self, id: EntityId) -> Option<&mut FighterTally> {
        self.fighters.iter_mut().find(|t| t.id == id.0)
    }

    /// Fold one arena update into the tallies.
    pub fn record(&mut self, tick: &ArenaTick) {
        self.ticks += 1;
        self.periodic_damage += i64::from(tick.periodic_damage);

        for report in &tick.reports {
            let Some(tally) = self.tally_mut(report.attacker) else {
                continue;
            };
            tally.strikes += 1;
            tally.damage_dealt += i64::from(report.result.total());
            match report.result.receive {
                AttackReceiveType::Hit => tally.hits += 1,
                AttackReceiveType::Crit => {
                    tally.hits += 1;
                    tally.crits += 1;
                }
                AttackReceiveType::Miss => tally.misses += 1,
                AttackReceiveType::Dodge | AttackReceiveType::Parry => tally.avoided += 1,
                AttackReceiveType::Resisted => tally.resisted += 1,
            }
            if report.killed {
                tally.kills += 1;
            }
        }
    }

    /// Read final life from the arena and decide the winner.
    pub fn finish(&mut self, arena: &Arena) {
        self.elapsed = arena.elapsed();
        for tally in &mut self.fighters {
            let statable = arena
                .combatant(EntityId(tally.id))
                .and_then(|c| c.statable.as_ref());
            tally.life_left = statable.map_or(0, |s| s.life());
            tally.alive = statable.is_some_and(|s| !s.is_dead());
        }

        let mut alive = self.fighters.iter().filter(|t| t.alive);
        self.winner = match (alive.next(), alive.next()) {
            (Some(only), None) => Some(only.name.clone()),
            _ => None,
        };
    }
}

impl fmt::Display for DuelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "seed {} | {} ticks | {:.2}s simulated | {} periodic damage",
            self.seed, self.ticks, self.elapsed, self.periodic_damage
        )?;
        writeln!(
            f,
            "{:<14} {:>7} {:>7} {:>5} {:>5} {:>6} {:>7} {:>8} {:>6}",
            "fighter",
            "damage",
            "strikes",
            "hits",
            "crits",
            "misses",
            "avoided",
            "resisted",
            "life"
        )?;
        for t in &self.fighters {
            let mut life = t.life_left.to_string();
            if !t.alive {
                life.push_str(" (dead)");
            }
            writeln!(
                f,
                "{:<14} {:>7} {:>7} {:>5} {:>5} {:>6} {:>7} {:>8} {:>6}",
                t.name,
                t.damage_dealt,
                t.strikes,
                t.hits,
                t.crits,
                t.misses,
                t.avoided,
                t.resisted,
                life
            )?;
        }
        match &self.winner {
            Some(name) => write!(f, "winner: {name}"),
            None => write!(f, "winner: none (draw)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{AttackDamageResult, AttackReport, DamageTags};

    fn report(attacker: u32, receive: AttackReceiveType, damage: i32, killed: bool) -> AttackReport {
        AttackReport {
            attacker: EntityId(attacker),
            defender: EntityId(if attacker == 1 { 2 } else { 1 }),
            result: AttackDamageResult::landed(receive, damage, DamageTags::melee()),
            killed,
            applied_auras: Vec::new(),
        }
    }

    fn summary() -> DuelSummary {
        DuelSummary::new(
            9,
            [
                (EntityId(1), "Knight".to_string()),
                (EntityId(2), "Ranger".to_string()),
            ],
        )
    }

    #[test]
    fn record_classifies_every_receive_type() {
        let mut summary = summary();
        summary.record(&ArenaTick {
            reports: vec![
                report(1, AttackReceiveType::Hit, 10, false),
                report(1, AttackReceiveType::Crit, 25, false),
                report(1, AttackReceiveType::Miss, 0, false),
                report(1, AttackReceiveType::Parry, 0, false),
                report(2, AttackReceiveType::Resisted, 4, false),
                report(2, AttackReceiveType::Dodge, 0, false),
            ],
            periodic_damage: 3,
            ..ArenaTick::default()
        });

        let knight = &summary.fighters[0];
        assert_eq!(knight.damage_dealt, 35);
        assert_eq!((knight.strikes, knight.hits, knight.crits), (4, 2, 1));
        assert_eq!((knight.misses, knight.avoided), (1, 1));

        let ranger = &summary.fighters[1];
        assert_eq!((ranger.resisted, ranger.avoided, ranger.damage_dealt), (1, 1, 4));
        assert_eq!(summary.periodic_damage, 3);
        assert_eq!(summary.ticks, 1);
    }

    #[test]
    fn unknown_attackers_are_ignored() {
        let mut summary = summary();
        summary.record(&ArenaTick {
            reports: vec![report(7, AttackReceiveType::Hit, 10, true)],
            ..ArenaTick::default()
        });
        assert!(summary.fighters.iter().all(|t| t.strikes == 0));
    }

    #[test]
    fn display_names_the_winner() {
        let mut summary = summary();
        summary.fighters[1].alive = false;
        summary.winner = Some("Knight".to_string());
        let text = summary.to_string();
        assert!(text.contains("winner: Knight"));
        assert!(text.contains("(dead)"));
    }
}
