//! Entities taking part in a skirmish
//!
//! Every entity is an [`EntityBase`] plus a kind-specific component. The kind
//! decides how the entity swings, how it reacts to damage and what it does on
//! its own each tick.

pub mod attributes;
pub mod base;
pub mod enemy;
pub mod player;
pub mod timers;

use std::sync::Arc;

pub use attributes::AttributeValue;
pub use base::{EntityBase, EntitySpec, HurtOutcome};
pub use enemy::{Awareness, EnemyState};
pub use player::PlayerState;
pub use timers::{TimerEvent, TimerKind, TimerSet};

use crate::combat::attack::{cooldown_ticks, AttackTargets, Side};
use crate::combat::weapons::Weapon;
use crate::core::config::SimulationConfig;
use crate::core::types::{EntityId, Hp, Size, Tick, Vec2};
use crate::ecs::world::Neighbors;
use crate::render::colors;
use crate::render::Surface;
use crate::simulation::random::RandomSource;
use crate::simulation::tick::SimulationEvent;
use crate::simulation::timer::Timer;

/// Everything an entity may touch during its update besides its neighbors
pub struct UpdateContext<'a> {
    pub surface: &'a mut dyn Surface,
    pub rng: &'a mut dyn RandomSource,
    pub events: &'a mut Vec<SimulationEvent>,
    pub tick: Tick,
}

/// Kind-specific component
#[derive(Debug, Clone)]
pub enum EntityKind {
    Player(PlayerState),
    Enemy(EnemyState),
}

/// A simulated combatant
#[derive(Debug, Clone)]
pub struct Entity {
    pub base: EntityBase,
    pub kind: EntityKind,
}

impl Entity {
    /// Player built from the config defaults
    pub fn player(position: Vec2, config: &SimulationConfig) -> Self {
        let mut base = EntityBase::new(base_spec(
            position,
            config,
            config.player.size,
            config.player.hp,
            config.player.velocity,
        ));
        PlayerState::install_timers(&mut base, config.invulnerability_ticks);
        Self {
            base,
            kind: EntityKind::Player(PlayerState::new()),
        }
    }

    /// Enemy built from the config defaults, hunting `target`
    pub fn enemy(position: Vec2, target: Option<EntityId>, config: &SimulationConfig) -> Self {
        let mut base = EntityBase::new(base_spec(
            position,
            config,
            config.enemy.size,
            config.enemy.hp,
            config.enemy.velocity,
        ));
        base.target = target;
        EnemyState::install_timers(&mut base, config.player_near_ticks);
        Self {
            base,
            kind: EntityKind::Enemy(EnemyState::new(config)),
        }
    }

    /// Swap the weapon, re-deriving the attack cooldown
    pub fn with_weapon(mut self, weapon: Arc<Weapon>) -> Self {
        let cooldown = cooldown_ticks(self.base.attack_speed, &weapon);
        self.base.weapon = weapon;
        self.base
            .timers
            .insert(TimerKind::AttackCooldown, Timer::new(cooldown));
        self
    }

    pub fn id(&self) -> EntityId {
        self.base.id
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            EntityKind::Player(_) => "Player",
            EntityKind::Enemy(_) => "Enemy",
        }
    }

    pub fn hp(&self) -> Hp {
        self.base.hp()
    }

    pub fn position(&self) -> Vec2 {
        self.base.position()
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    pub fn as_player(&self) -> Option<&PlayerState> {
        match &self.kind {
            EntityKind::Player(p) => Some(p),
            EntityKind::Enemy(_) => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&EnemyState> {
        match &self.kind {
            EntityKind::Enemy(e) => Some(e),
            EntityKind::Player(_) => None,
        }
    }

    /// Player inside its post-hit window
    pub fn is_invulnerable(&self) -> bool {
        matches!(&self.kind, EntityKind::Player(p) if p.invul)
    }

    pub fn awareness(&self) -> Option<Awareness> {
        match &self.kind {
            EntityKind::Enemy(e) => Some(e.awareness(&self.base)),
            EntityKind::Player(_) => None,
        }
    }

    /// Externally driven move; players also turn to face horizontal input
    pub fn move_by(
        &mut self,
        dx: f32,
        dy: f32,
        neighbors: &Neighbors,
        force: bool,
        surface: &mut dyn Surface,
    ) -> bool {
        if let EntityKind::Player(p) = &mut self.kind {
            p.face(&mut self.base, dx);
        }
        let obstacles = neighbors.obstacles();
        self.base.move_by(dx, dy, &obstacles, force, surface)
    }

    pub fn move_to(
        &mut self,
        target: Vec2,
        neighbors: &Neighbors,
        force: bool,
        surface: &mut dyn Surface,
    ) {
        let dx = target.x - self.base.x();
        if let EntityKind::Player(p) = &mut self.kind {
            p.face(&mut self.base, dx);
        }
        let obstacles = neighbors.obstacles();
        self.base.move_to(target, &obstacles, force, surface);
    }

    /// Swing now. Players swing the way they face; enemies swing toward
    /// their (first) target.
    pub fn attack(
        &mut self,
        targets: &AttackTargets,
        ctx: &mut UpdateContext,
        neighbors: &mut Neighbors,
    ) -> usize {
        let side = match &self.kind {
            EntityKind::Player(p) => Side::from_angle(p.attack_angle),
            EntityKind::Enemy(_) => targets
                .ids()
                .first()
                .and_then(|id| neighbors.get(*id))
                .map(|t| Side::toward(self.base.x(), t.base.x()))
                .unwrap_or(Side::Right),
        };
        self.base.attack(side, targets, ctx, neighbors)
    }

    /// Arm a swing at `targets` unless one is already pending
    pub fn start_attacking(&mut self, targets: impl Into<AttackTargets>) -> Option<u32> {
        if self.base.is_dead() {
            return None;
        }
        self.base.arm_attack(targets.into())
    }

    pub fn hurt(&mut self, damage: Hp, surface: &mut dyn Surface) -> HurtOutcome {
        match &mut self.kind {
            EntityKind::Player(p) => p.hurt(&mut self.base, damage, surface),
            EntityKind::Enemy(e) => e.hurt(&mut self.base, damage, surface),
        }
    }

    pub fn kill(&mut self, surface: &mut dyn Surface) {
        self.base.kill(surface);
    }

    /// Exclude from collisions for `duration` ticks (config default if None)
    pub fn sleep(&mut self, duration: Option<u32>) {
        self.base.sleep(duration);
    }

    /// One simulation tick: timers first, then behavior, then redraw
    pub fn update(&mut self, ctx: &mut UpdateContext, neighbors: &mut Neighbors) {
        if self.base.is_dead() {
            return;
        }

        for (kind, event) in self.base.timers.advance_armed() {
            tracing::trace!(entity = %self.base.id, ?kind, "timer fired");
            self.dispatch(event, ctx, neighbors);
        }

        match &mut self.kind {
            EntityKind::Player(_) => {}
            EntityKind::Enemy(enemy) => {
                enemy.behave(&mut self.base, ctx, neighbors);
                self.base.refresh(&mut *ctx.surface);
            }
        }
    }

    fn dispatch(&mut self, event: TimerEvent, ctx: &mut UpdateContext, neighbors: &mut Neighbors) {
        match event {
            TimerEvent::Attack(targets) => {
                self.attack(&targets, ctx, neighbors);
            }
            TimerEvent::ClearAttack(area) => {
                self.base.clear_attack_overlay(area, &mut *ctx.surface);
            }
            TimerEvent::EndInvulnerability => {
                if let EntityKind::Player(p) = &mut self.kind {
                    p.end_invulnerability();
                }
            }
            TimerEvent::Aggro => {
                if let EntityKind::Enemy(e) = &mut self.kind {
                    if e.aggro(&mut self.base) {
                        ctx.events.push(SimulationEvent::Aggro {
                            tick: ctx.tick,
                            enemy: self.base.id,
                        });
                    }
                }
            }
        }
    }
}

fn base_spec(
    position: Vec2,
    config: &SimulationConfig,
    size: Size,
    hp: Hp,
    velocity: f32,
) -> EntitySpec {
    EntitySpec {
        position,
        size,
        hp,
        velocity,
        color: colors::WHITE,
        weapon: Arc::new(config.weapon.clone()),
        base_attack_speed: config.base_attack_speed,
        frame_rate: config.frame_rate,
        sleep_ticks: config.sleep_ticks,
        clear_attack_ticks: config.clear_attack_ticks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FrameBuffer;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run(entity: &mut Entity, others: &mut [Entity], fb: &mut FrameBuffer, events: &mut Vec<SimulationEvent>) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut ctx = UpdateContext {
            surface: fb,
            rng: &mut rng,
            events,
            tick: 0,
        };
        let mut neighbors = Neighbors::new(others, Default::default());
        entity.update(&mut ctx, &mut neighbors);
    }

    #[test]
    fn test_invulnerability_expires_through_update() {
        let config = SimulationConfig::default();
        let mut fb = FrameBuffer::blank(400, 400);
        let mut events = Vec::new();
        let mut player = Entity::player(Vec2::new(100.0, 100.0), &config);
        player.hurt(10, &mut fb);
        for _ in 0..config.invulnerability_ticks {
            run(&mut player, &mut [], &mut fb, &mut events);
        }
        assert!(player.is_invulnerable());
        run(&mut player, &mut [], &mut fb, &mut events);
        assert!(!player.is_invulnerable());
    }

    #[test]
    fn test_dead_entities_do_nothing() {
        let config = SimulationConfig::default();
        let mut fb = FrameBuffer::blank(400, 400);
        let mut events = Vec::new();
        let mut enemy = Entity::enemy(Vec2::new(100.0, 100.0), None, &config);
        enemy.kill(&mut fb);
        run(&mut enemy, &mut [], &mut fb, &mut events);
        assert_eq!(enemy.position(), Vec2::new(100.0, 100.0));
        assert_eq!(enemy.hurt(10, &mut fb), HurtOutcome::default());
        assert!(enemy.start_attacking(EntityId::new()).is_none());
    }

    #[test]
    fn test_player_swing_follows_attack_angle() {
        let config = SimulationConfig::default();
        let mut fb = FrameBuffer::blank(400, 400);
        let mut events = Vec::new();
        let mut player = Entity::player(Vec2::new(200.0, 200.0), &config);
        let mut others = vec![
            Entity::enemy(Vec2::new(170.0, 200.0), None, &config),
            Entity::enemy(Vec2::new(230.0, 200.0), None, &config),
        ];
        let ids: Vec<EntityId> = others.iter().map(Entity::id).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ctx = UpdateContext {
            surface: &mut fb,
            rng: &mut rng,
            events: &mut events,
            tick: 4,
        };
        let mut neighbors = Neighbors::new(&mut others, Default::default());
        let hits = player.attack(&AttackTargets::Group(ids), &mut ctx, &mut neighbors);
        assert_eq!(hits, 1);
        assert_eq!(others[0].hp(), 100);
        assert_eq!(others[1].hp(), 70);
    }

    #[test]
    fn test_weapon_swap_rederives_cooldown() {
        let config = SimulationConfig::default();
        let dagger = Arc::new(Weapon::dagger());
        let mut player = Entity::player(Vec2::new(100.0, 100.0), &config).with_weapon(dagger);
        // 10000 / (1 + 120) / 10
        assert_eq!(player.start_attacking(EntityId::new()), Some(8));
        assert_eq!(player.start_attacking(EntityId::new()), None);
    }

    #[test]
    fn test_kind_queries() {
        let config = SimulationConfig::default();
        let player = Entity::player(Vec2::new(0.0, 0.0), &config);
        let enemy = Entity::enemy(Vec2::new(0.0, 0.0), Some(player.id()), &config);
        assert!(player.is_player());
        assert!(player.as_enemy().is_none());
        assert_eq!(enemy.kind_name(), "Enemy");
        assert_eq!(enemy.awareness(), Some(Awareness::Idle));
        assert_eq!(player.awareness(), None);
    }
}
