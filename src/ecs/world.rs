//! World - owns the arena, its entities and the per-tick update order

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::combat::attack::AttackTargets;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{EntityId, Hp, Tick, Vec2};
use crate::entity::{AttributeValue, Entity, EntityBase, HurtOutcome, UpdateContext};
use crate::render::{FrameBuffer, Surface};
use crate::simulation::random::RandomSource;
use crate::simulation::tick::{run_simulation_tick, SimulationEvent};
use crate::spatial::rect::Rect;

/// Every entity except the one being updated
///
/// Built by splitting the world's storage around the updating entity, so the
/// updater can read and damage the others while it holds itself mutably.
pub struct Neighbors<'a> {
    before: &'a mut [Entity],
    after: &'a mut [Entity],
}

impl<'a> Neighbors<'a> {
    pub fn new(before: &'a mut [Entity], after: &'a mut [Entity]) -> Self {
        Self { before, after }
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.before.iter().chain(self.after.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.before.iter_mut().chain(self.after.iter_mut())
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.iter_mut().find(|e| e.id() == id)
    }

    /// Bases of every neighbor, for collision checks
    pub fn obstacles(&self) -> Vec<&EntityBase> {
        self.iter().map(|e| &e.base).collect()
    }
}

/// The arena containing all entities
///
/// Entities are never removed: the dead stay in storage with zero hp so
/// registry indices remain stable.
pub struct World<S: Surface = FrameBuffer, R: RandomSource = ChaCha8Rng> {
    pub current_tick: Tick,
    config: SimulationConfig,
    entities: Vec<Entity>,
    entity_registry: AHashMap<EntityId, usize>,
    player: Option<EntityId>,
    surface: S,
    rng: R,
}

impl World {
    /// Arena sized from the config with an entropy-seeded RNG
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let surface = FrameBuffer::blank(config.arena_width, config.arena_height);
        Self::with_parts(config, surface, ChaCha8Rng::from_entropy())
    }

    /// Deterministic arena for replays and tests
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Result<Self> {
        let surface = FrameBuffer::blank(config.arena_width, config.arena_height);
        Self::with_parts(config, surface, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<S: Surface, R: RandomSource> World<S, R> {
    pub fn with_parts(config: SimulationConfig, surface: S, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            current_tick: 0,
            config,
            entities: Vec::new(),
            entity_registry: AHashMap::new(),
            player: None,
            surface,
            rng,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Play area in surface coordinates
    pub fn bounds(&self) -> Rect {
        self.surface.bounds()
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    /// Spawn the player. Enemies without a target start hunting it.
    pub fn spawn_player(&mut self, position: Vec2) -> EntityId {
        let entity = Entity::player(position, &self.config);
        let id = self.spawn(entity);
        self.player = Some(id);
        for enemy in self.entities.iter_mut().filter(|e| !e.is_player()) {
            if enemy.base.target.is_none() {
                enemy.base.target = Some(id);
            }
        }
        id
    }

    /// Spawn an enemy hunting the current player, if any
    pub fn spawn_enemy(&mut self, position: Vec2) -> EntityId {
        let entity = Entity::enemy(position, self.player, &self.config);
        self.spawn(entity)
    }

    /// Add a prepared entity and draw it
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = entity.id();
        entity.base.draw(&mut self.surface);
        tracing::debug!(entity = %id, kind = entity.kind_name(), "spawned");
        self.entity_registry.insert(id, self.entities.len());
        self.entities.push(entity);
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        let idx = *self.entity_registry.get(&id)?;
        self.entities.get(idx)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let idx = *self.entity_registry.get(&id)?;
        self.entities.get_mut(idx)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities
            .iter()
            .filter(|e| !e.is_player() && !e.base.is_dead())
    }

    fn index_of(&self, id: EntityId) -> Result<usize> {
        self.entity_registry
            .get(&id)
            .copied()
            .ok_or(SkirmishError::EntityNotFound(id))
    }

    /// Run `f` on one entity with every other entity as its neighbors
    fn with_split<T>(
        &mut self,
        idx: usize,
        f: impl FnOnce(&mut Entity, &mut Neighbors, &mut S, &mut R) -> T,
    ) -> Option<T> {
        if idx >= self.entities.len() {
            return None;
        }
        let (before, rest) = self.entities.split_at_mut(idx);
        let (current, after) = rest.split_first_mut()?;
        let mut neighbors = Neighbors::new(before, after);
        Some(f(current, &mut neighbors, &mut self.surface, &mut self.rng))
    }

    /// Update the entity stored at `idx` for `tick`, collecting its events
    pub fn update_entity_at(&mut self, idx: usize, tick: Tick, events: &mut Vec<SimulationEvent>) {
        self.with_split(idx, |entity, neighbors, surface, rng| {
            let mut ctx = UpdateContext {
                surface,
                rng,
                events,
                tick,
            };
            entity.update(&mut ctx, neighbors);
        });
    }

    /// Advance the whole arena by one tick
    pub fn tick(&mut self) -> Vec<SimulationEvent> {
        run_simulation_tick(self)
    }

    /// Externally driven move (player input, scripted nudges)
    pub fn move_entity(&mut self, id: EntityId, dx: f32, dy: f32, force: bool) -> Result<bool> {
        let idx = self.index_of(id)?;
        self.with_split(idx, |entity, neighbors, surface, _| {
            entity.move_by(dx, dy, neighbors, force, surface)
        })
        .ok_or(SkirmishError::EntityNotFound(id))
    }

    pub fn move_entity_to(&mut self, id: EntityId, target: Vec2, force: bool) -> Result<()> {
        let idx = self.index_of(id)?;
        self.with_split(idx, |entity, neighbors, surface, _| {
            entity.move_to(target, neighbors, force, surface)
        })
        .ok_or(SkirmishError::EntityNotFound(id))
    }

    /// Arm a swing; `None` when one is already pending or the entity is dead
    pub fn start_attacking(
        &mut self,
        id: EntityId,
        targets: impl Into<AttackTargets>,
    ) -> Result<Option<u32>> {
        let cooldown = self
            .entity_mut(id)
            .ok_or(SkirmishError::EntityNotFound(id))?
            .start_attacking(targets);
        Ok(cooldown)
    }

    /// Swing immediately, skipping the cooldown
    pub fn attack(&mut self, id: EntityId, targets: impl Into<AttackTargets>) -> Result<Vec<SimulationEvent>> {
        let idx = self.index_of(id)?;
        let targets = targets.into();
        let tick = self.current_tick;
        let mut events = Vec::new();
        self.with_split(idx, |entity, neighbors, surface, rng| {
            let mut ctx = UpdateContext {
                surface,
                rng,
                events: &mut events,
                tick,
            };
            entity.attack(&targets, &mut ctx, neighbors);
        })
        .ok_or(SkirmishError::EntityNotFound(id))?;
        Ok(events)
    }

    pub fn hurt(&mut self, id: EntityId, damage: Hp) -> Result<HurtOutcome> {
        let idx = self.index_of(id)?;
        Ok(self.entities[idx].hurt(damage, &mut self.surface))
    }

    pub fn kill(&mut self, id: EntityId) -> Result<()> {
        let idx = self.index_of(id)?;
        self.entities[idx].kill(&mut self.surface);
        Ok(())
    }

    pub fn sleep(&mut self, id: EntityId, duration: Option<u32>) -> Result<()> {
        self.entity_mut(id)
            .ok_or(SkirmishError::EntityNotFound(id))?
            .sleep(duration);
        Ok(())
    }

    pub fn get_attribute(&self, id: EntityId, name: &str) -> Result<AttributeValue> {
        self.entity(id)
            .ok_or(SkirmishError::EntityNotFound(id))?
            .get_attribute(name)
    }

    pub fn set_attribute(&mut self, id: EntityId, name: &str, value: AttributeValue) -> Result<()> {
        self.entity_mut(id)
            .ok_or(SkirmishError::EntityNotFound(id))?
            .set_attribute(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::with_seed(SimulationConfig::default(), 7).unwrap()
    }

    #[test]
    fn test_spawn_registers_and_draws() {
        let mut world = world();
        let id = world.spawn_player(Vec2::new(100.0, 100.0));
        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.player_id(), Some(id));
        assert_eq!(world.surface().pixel(100, 100), Some(crate::render::colors::WHITE));
    }

    #[test]
    fn test_enemies_spawned_before_player_get_a_target() {
        let mut world = world();
        let enemy = world.spawn_enemy(Vec2::new(300.0, 300.0));
        assert_eq!(world.entity(enemy).unwrap().base.target, None);
        let player = world.spawn_player(Vec2::new(100.0, 100.0));
        assert_eq!(world.entity(enemy).unwrap().base.target, Some(player));
        let late = world.spawn_enemy(Vec2::new(500.0, 300.0));
        assert_eq!(world.entity(late).unwrap().base.target, Some(player));
    }

    #[test]
    fn test_unknown_id_is_an_error() {
        let mut world = world();
        let ghost = EntityId::new();
        assert!(matches!(
            world.hurt(ghost, 10),
            Err(SkirmishError::EntityNotFound(id)) if id == ghost
        ));
        assert!(world.move_entity(ghost, 1.0, 0.0, false).is_err());
        assert!(world.get_attribute(ghost, "hp").is_err());
    }

    #[test]
    fn test_neighbors_exclude_self() {
        let mut world = world();
        let a = world.spawn_player(Vec2::new(100.0, 100.0));
        let b = world.spawn_enemy(Vec2::new(200.0, 100.0));
        let c = world.spawn_enemy(Vec2::new(300.0, 100.0));
        world.with_split(1, |entity, neighbors, _, _| {
            assert_eq!(entity.id(), b);
            assert_eq!(neighbors.len(), 2);
            assert!(neighbors.get(a).is_some());
            assert!(neighbors.get(c).is_some());
            assert!(neighbors.get(b).is_none());
        })
        .unwrap();
    }

    #[test]
    fn test_lone_entity_has_no_neighbors() {
        let mut world = world();
        world.spawn_player(Vec2::new(100.0, 100.0));
        world.with_split(0, |_, neighbors, _, _| {
            assert!(neighbors.is_empty());
            assert_eq!(neighbors.iter().count(), 0);
        })
        .unwrap();
    }

    #[test]
    fn test_move_blocked_by_other_entity() {
        let mut world = world();
        let player = world.spawn_player(Vec2::new(100.0, 100.0));
        world.spawn_enemy(Vec2::new(121.0, 100.0));
        // One player step is 5 units; that would overlap the enemy
        assert!(!world.move_entity(player, 1.0, 0.0, false).unwrap());
        assert!(world.move_entity(player, 1.0, 0.0, true).unwrap());
    }

    #[test]
    fn test_tick_advances_counter() {
        let mut world = world();
        world.spawn_player(Vec2::new(100.0, 100.0));
        world.tick();
        world.tick();
        assert_eq!(world.current_tick, 2);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimulationConfig {
            frame_rate: 0.0,
            ..SimulationConfig::default()
        };
        assert!(World::with_seed(config, 1).is_err());
    }
}
