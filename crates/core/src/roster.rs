//! Minimal enemy bookkeeping used by headless drivers and tests.

use std::collections::BTreeSet;

use slotmap::SlotMap;

use crate::battle::EnemyFactory;
use crate::types::{EnemyId, WorldPos};

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub kind: String,
    pub pos: WorldPos,
    pub alive: bool,
}

/// Reference [`EnemyFactory`] that stores enemies in a slot map.
///
/// With [`EnemyRoster::with_kinds`] it refuses kinds outside the given set,
/// the way a real factory rejects unknown enemy names.
#[derive(Clone, Debug, Default)]
pub struct EnemyRoster {
    enemies: SlotMap<EnemyId, Enemy>,
    known_kinds: Option<BTreeSet<String>>,
}

impl EnemyRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kinds(kinds: &[&str]) -> Self {
        Self {
            enemies: SlotMap::with_key(),
            known_kinds: Some(kinds.iter().map(|kind| kind.to_string()).collect()),
        }
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(id)
    }

    pub fn kill(&mut self, id: EnemyId) -> bool {
        match self.enemies.get_mut(id) {
            Some(enemy) if enemy.alive => {
                enemy.alive = false;
                true
            }
            _ => false,
        }
    }

    pub fn kill_all(&mut self) -> usize {
        let living: Vec<EnemyId> = self.living().collect();
        for &id in &living {
            self.kill(id);
        }
        living.len()
    }

    pub fn living(&self) -> impl Iterator<Item = EnemyId> + '_ {
        self.enemies.iter().filter(|(_, enemy)| enemy.alive).map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }
}

impl EnemyFactory for EnemyRoster {
    fn create(&mut self, kind: &str, pos: WorldPos) -> Option<EnemyId> {
        if let Some(known) = &self.known_kinds
            && !known.contains(kind)
        {
            return None;
        }
        Some(self.enemies.insert(Enemy { kind: kind.to_string(), pos, alive: true }))
    }

    fn is_alive(&self, id: EnemyId) -> bool {
        self.enemies.get(id).is_some_and(|enemy| enemy.alive)
    }
}
