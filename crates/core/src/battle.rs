//! Enemy-wave battles that gate a room's exits.
//!
//! A battle is idle until its room seals, spawns one wave at a time through
//! an [`EnemyFactory`], and advances once every enemy of the current wave
//! reports dead. Completion is terminal.

use crate::template::BattleTemplate;
use crate::types::{EnemyId, WorldPos};

/// Creates enemies and answers liveness queries for their handles.
pub trait EnemyFactory {
    /// `None` means the kind is unknown and the spawn is skipped.
    fn create(&mut self, kind: &str, pos: WorldPos) -> Option<EnemyId>;
    fn is_alive(&self, id: EnemyId) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BattleEvent {
    WaveSpawned { wave: usize, requested: u32, spawned: usize },
    WaveCleared { wave: usize },
    Completed,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnemyWave {
    spawn_requests: Vec<(String, u32)>,
    spawned: Vec<EnemyId>,
    in_progress: bool,
}

impl EnemyWave {
    pub fn new(spawn_requests: Vec<(String, u32)>) -> Self {
        Self { spawn_requests, spawned: Vec::new(), in_progress: false }
    }

    pub fn requested(&self) -> u32 {
        self.spawn_requests.iter().map(|(_, count)| count).sum()
    }

    pub fn spawned(&self) -> &[EnemyId] {
        &self.spawned
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Spawns every requested enemy once; later calls do nothing.
    pub fn spawn(
        &mut self,
        enemies: &mut dyn EnemyFactory,
        spawn_pos: &mut dyn FnMut() -> Option<WorldPos>,
    ) -> usize {
        if self.in_progress {
            return 0;
        }
        self.in_progress = true;

        for (kind, count) in &self.spawn_requests {
            for _ in 0..*count {
                let Some(pos) = spawn_pos() else {
                    log::debug!("no open spawn tile for '{kind}', skipping");
                    continue;
                };
                match enemies.create(kind, pos) {
                    Some(id) => self.spawned.push(id),
                    None => log::warn!("enemy factory cannot create '{kind}', skipping"),
                }
            }
        }
        self.spawned.len()
    }

    /// True once every spawned enemy is dead. A wave that spawned nothing is done.
    pub fn is_done(&self, enemies: &dyn EnemyFactory) -> bool {
        self.spawned.iter().all(|&id| !enemies.is_alive(id))
    }

    fn release(&mut self) {
        self.spawned.clear();
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Battle {
    waves: Vec<EnemyWave>,
    current_wave: usize,
    completed: bool,
}

impl Battle {
    pub fn new(waves: Vec<EnemyWave>) -> Self {
        Self { waves, current_wave: 0, completed: false }
    }

    pub fn from_template(template: &BattleTemplate) -> Self {
        let waves = template
            .waves
            .iter()
            .map(|wave| wave.iter().map(|(kind, count)| (kind.clone(), *count)).collect::<Vec<_>>())
            .map(EnemyWave::new)
            .collect();
        Self::new(waves)
    }

    pub fn waves(&self) -> &[EnemyWave] {
        &self.waves
    }

    pub fn current_wave(&self) -> usize {
        self.current_wave
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Advances the battle by one frame.
    ///
    /// Spawns the current wave if it has not been spawned, moves on once it
    /// is cleared, and completes after the last wave. Completed battles
    /// return no events.
    pub fn update(
        &mut self,
        enemies: &mut dyn EnemyFactory,
        spawn_pos: &mut dyn FnMut() -> Option<WorldPos>,
    ) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        if self.completed {
            return events;
        }

        if let Some(wave) = self.waves.get_mut(self.current_wave) {
            if !wave.in_progress() {
                let spawned = wave.spawn(enemies, spawn_pos);
                events.push(BattleEvent::WaveSpawned {
                    wave: self.current_wave,
                    requested: wave.requested(),
                    spawned,
                });
            }
            if wave.is_done(enemies) {
                events.push(BattleEvent::WaveCleared { wave: self.current_wave });
                self.current_wave += 1;
            }
        }

        if self.current_wave >= self.waves.len() {
            self.completed = true;
            events.push(BattleEvent::Completed);
        }
        events
    }

    /// Drops every enemy handle without touching progress.
    pub fn abandon(&mut self) {
        for wave in &mut self.waves {
            wave.release();
        }
    }
}
