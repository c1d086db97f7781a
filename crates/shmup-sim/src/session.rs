//! The session context: one per loaded scene.
//!
//! `Session` owns the configuration, the weapon registry, the hecs world of
//! spawned entities, the seeded RNG and the timer queue. It is advanced in
//! simulated time by the host and never touches global state, so tearing a
//! session down (dropping it) cancels every pending timer with it.

use std::collections::VecDeque;
use std::time::Duration;

use hecs::{ComponentError, Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use shmup_core::commands::SessionCommand;
use shmup_core::components::Enemy;
use shmup_core::config::{ConfigError, SessionConfig};
use shmup_core::enums::{SessionPhase, WeaponType};
use shmup_core::events::SessionEvent;
use shmup_core::state::SessionSnapshot;
use shmup_core::types::{Position, SimTime};
use shmup_core::weapons::{WeaponDefinition, WeaponRegistry};

use crate::host::BoundsProvider;
use crate::systems;
use crate::timer::{TimerId, TimerQueue};

/// Deferred work owned by the session's timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTask {
    /// Attempt one enemy spawn, then reschedule.
    SpawnEnemy,
    /// Ask the host to reload the initial scene.
    Restart,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),
    #[error("entity {0:?} is not an enemy")]
    NotAnEnemy(Entity),
}

/// A running game session.
pub struct Session {
    config: SessionConfig,
    registry: WeaponRegistry,
    world: World,
    rng: ChaCha8Rng,
    timers: TimerQueue<SessionTask>,
    bounds: Box<dyn BoundsProvider>,
    phase: SessionPhase,
    time: SimTime,
    spawn_enemies: bool,
    spawn_interval: Duration,
    restart_delay: Duration,
    spawn_timer: Option<TimerId>,
    spawn_firings: u64,
    command_queue: VecDeque<SessionCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Validate `config` and build an uninitialized session. The weapon
    /// registry is built here, once; no timers run until `start`.
    pub fn new(
        config: SessionConfig,
        bounds: impl BoundsProvider + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawn_interval = config.spawn_interval()?;
        let restart_delay = config.restart_delay()?;
        let registry = WeaponRegistry::build(&config.weapon_definitions);

        Ok(Self {
            registry,
            world: World::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            timers: TimerQueue::new(),
            bounds: Box::new(bounds),
            phase: SessionPhase::Uninitialized,
            time: SimTime::default(),
            spawn_enemies: config.spawn_enemies,
            spawn_interval,
            restart_delay,
            spawn_timer: None,
            spawn_firings: 0,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            config,
        })
    }

    /// Start the session: the first spawn attempt fires one interval from now.
    /// Calling it again has no effect.
    pub fn start(&mut self) {
        if self.phase != SessionPhase::Uninitialized {
            return;
        }
        self.spawn_timer = Some(
            self.timers
                .schedule(self.spawn_interval, SessionTask::SpawnEnemy),
        );
        self.phase = SessionPhase::Running;
        info!(
            scene = %self.config.initial_scene,
            interval_secs = self.spawn_interval.as_secs_f64(),
            weapons = self.registry.len(),
            "session started"
        );
    }

    /// Cancel every pending timer and clear the world.
    pub fn teardown(&mut self) {
        self.timers.clear();
        self.spawn_timer = None;
        self.world.clear();
        self.command_queue.clear();
        debug!("session torn down");
    }

    /// Queue a command for processing at the start of the next step.
    pub fn queue_command(&mut self, command: SessionCommand) {
        self.command_queue.push_back(command);
    }

    /// Advance simulated time by `dt`. Every timer that falls due fires in
    /// order, with the world integrated up to each firing time first, so a
    /// large step behaves like many small ones. Returns the resulting snapshot.
    pub fn advance(&mut self, dt: Duration) -> SessionSnapshot {
        self.advance_until_reload(dt).0
    }

    /// Like `advance`, but the step ends early when the restart timer fires:
    /// nothing runs past the reload request. Returns the snapshot and the
    /// part of `dt` left unconsumed, which is zero unless a reload was
    /// requested.
    pub fn advance_until_reload(&mut self, dt: Duration) -> (SessionSnapshot, Duration) {
        self.process_commands();

        let start = self.timers.now();
        let target = start + dt;
        let mut cursor = start;
        let mut end = target;
        while let Some((due, task)) = self.timers.pop_due(target) {
            self.step_world(due.saturating_sub(cursor));
            cursor = due;
            self.run_task(task);
            if task == SessionTask::Restart {
                end = due;
                break;
            }
        }
        self.step_world(end.saturating_sub(cursor));
        self.timers.advance_to(end);
        self.time.advance(end.saturating_sub(start));

        let events = std::mem::take(&mut self.events);
        let snapshot = systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.spawn_enemies,
            events,
        );
        (snapshot, target.saturating_sub(end))
    }

    /// Weapon definition for `weapon_type`, or the sentinel if none is registered.
    pub fn weapon_definition(&self, weapon_type: WeaponType) -> WeaponDefinition {
        self.registry.lookup(weapon_type)
    }

    /// An enemy was destroyed. The enemy is despawned; while the session is
    /// running it may leave a power-up at its last position, which is returned.
    pub fn on_enemy_destroyed(&mut self, entity: Entity) -> Result<Option<Entity>, SessionError> {
        let drop_chance = match self.world.get::<&Enemy>(entity) {
            Ok(enemy) => enemy.power_up_drop_chance,
            Err(ComponentError::NoSuchEntity) => return Err(SessionError::NoSuchEntity(entity)),
            Err(ComponentError::MissingComponent(_)) => {
                return Err(SessionError::NotAnEnemy(entity))
            }
        };
        let position = self
            .world
            .get::<&Position>(entity)
            .map(|pos| *pos)
            .unwrap_or_default();
        let _ = self.world.despawn(entity);
        self.events.push(SessionEvent::EnemyDestroyed {
            entity_bits: entity.to_bits().get(),
            position,
        });

        if self.phase != SessionPhase::Running {
            return Ok(None);
        }
        let dropped = systems::power_up_drop::run(
            &mut self.world,
            &mut self.rng,
            &self.registry,
            &self.config.power_up_frequency,
            &self.config.prefab_power_up,
            drop_chance,
            position,
        );
        Ok(dropped.map(|(power_up, weapon_type)| {
            self.events.push(SessionEvent::PowerUpSpawned {
                entity_bits: power_up.to_bits().get(),
                weapon_type,
                position,
            });
            power_up
        }))
    }

    /// The hero died: schedule the scene reload after the restart delay.
    /// Only the first call while running has an effect.
    pub fn on_hero_died(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }
        self.timers.schedule(self.restart_delay, SessionTask::Restart);
        self.phase = SessionPhase::RestartPending;
        self.events.push(SessionEvent::RestartScheduled {
            delay_secs: self.config.game_restart_delay,
        });
        info!(delay_secs = self.config.game_restart_delay, "hero died, restart scheduled");
    }

    /// Flip the master spawn switch. The spawn timer keeps firing either way.
    pub fn set_spawn_enemies(&mut self, enabled: bool) {
        self.spawn_enemies = enabled;
    }

    pub fn spawn_enemies(&self) -> bool {
        self.spawn_enemies
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &WeaponRegistry {
        &self.registry
    }

    /// Read-only access to the world of spawned entities.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// How many times the spawn timer has fired, spawning or not.
    pub fn spawn_firings(&self) -> u64 {
        self.spawn_firings
    }

    /// Simulated time of the next spawn attempt.
    pub fn next_spawn_due(&self) -> Option<Duration> {
        self.spawn_timer.and_then(|id| self.timers.due_of(id))
    }

    /// Number of pending timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::SetSpawnEnemies { enabled } => self.set_spawn_enemies(enabled),
            SessionCommand::DestroyEnemy { entity_bits } => {
                let Some(entity) = Entity::from_bits(entity_bits) else {
                    warn!(entity_bits, "destroy command with invalid entity id");
                    return;
                };
                if let Err(e) = self.on_enemy_destroyed(entity) {
                    warn!(error = %e, "destroy command ignored");
                }
            }
            SessionCommand::HeroDied => self.on_hero_died(),
        }
    }

    /// Move entities and clean up the ones that left play.
    fn step_world(&mut self, dt: Duration) {
        if self.phase == SessionPhase::Uninitialized || dt.is_zero() {
            return;
        }
        let half_extents = self.bounds.half_extents();
        systems::movement::run(&mut self.world, dt);
        systems::cleanup::run(
            &mut self.world,
            half_extents,
            self.config.enemy_inset_default,
            &mut self.despawn_buffer,
            &mut self.events,
        );
    }

    fn run_task(&mut self, task: SessionTask) {
        match task {
            SessionTask::SpawnEnemy => {
                self.spawn_firings += 1;
                if self.spawn_enemies {
                    self.spawn_enemy();
                }
                self.spawn_timer = Some(
                    self.timers
                        .schedule(self.spawn_interval, SessionTask::SpawnEnemy),
                );
            }
            SessionTask::Restart => {
                info!(scene = %self.config.initial_scene, "restart delay elapsed");
                self.events.push(SessionEvent::SceneReloadRequested {
                    scene: self.config.initial_scene.clone(),
                });
            }
        }
    }

    fn spawn_enemy(&mut self) {
        let half_extents = self.bounds.half_extents();
        let spawned = systems::enemy_spawner::spawn_enemy(
            &mut self.world,
            &mut self.rng,
            &self.config.prefab_enemies,
            self.config.enemy_inset_default,
            half_extents,
        );
        if let Some((entity, position)) = spawned {
            let archetype = self
                .world
                .get::<&Enemy>(entity)
                .map(|enemy| enemy.archetype.clone())
                .unwrap_or_default();
            self.events.push(SessionEvent::EnemySpawned {
                entity_bits: entity.to_bits().get(),
                archetype,
                position,
            });
        }
    }
}
