//! State and mechanics shared by every entity kind
//!
//! Movement, hit-box upkeep, swing resolution and damage live here. Kind
//! specific behavior (facing, invulnerability, AI) is layered on top in
//! `player` and `enemy`.

use std::sync::Arc;

use crate::combat::attack::{attack_box, cooldown_ticks, AttackTargets, Side};
use crate::combat::weapons::Weapon;
use crate::core::types::{wrap_degrees, EntityId, Hp, Size, Vec2};
use crate::ecs::world::Neighbors;
use crate::entity::timers::{TimerEvent, TimerKind, TimerSet};
use crate::entity::UpdateContext;
use crate::render::colors::{self, Color};
use crate::render::Surface;
use crate::simulation::tick::SimulationEvent;
use crate::simulation::timer::Timer;
use crate::spatial::rect::Rect;

/// Result of applying damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HurtOutcome {
    /// Hit points actually removed
    pub dealt: Hp,
    /// This hit brought hp to zero
    pub killed: bool,
    /// The hit pushed an enemy into aggro
    pub provoked: bool,
}

/// Construction parameters for [`EntityBase`]
#[derive(Debug, Clone)]
pub struct EntitySpec {
    pub position: Vec2,
    pub size: Size,
    pub hp: Hp,
    pub velocity: f32,
    pub color: Color,
    pub weapon: Arc<Weapon>,
    pub base_attack_speed: u32,
    pub frame_rate: f32,
    pub sleep_ticks: u32,
    pub clear_attack_ticks: u32,
}

/// Common entity state
#[derive(Debug, Clone)]
pub struct EntityBase {
    pub id: EntityId,
    pos: Vec2,
    size: Size,
    hp: Hp,
    max_hp: Hp,
    pub color: Color,
    hitbox: Rect,
    /// Units per second
    pub velocity: f32,
    /// Innate attack speed, added to the weapon's
    pub attack_speed: u32,
    /// Degrees in [0, 360)
    look_angle: f32,
    pub weapon: Arc<Weapon>,
    pub target: Option<EntityId>,
    pub timers: TimerSet,
    frame_rate: f32,
    /// Swing overlay still on screen
    attack_overlay: Option<Rect>,
    /// Footprint painted by the last draw
    drawn: Option<Rect>,
}

impl EntityBase {
    pub fn new(spec: EntitySpec) -> Self {
        let mut timers = TimerSet::new();
        timers.insert(TimerKind::Sleep, Timer::new(spec.sleep_ticks));
        timers.insert(
            TimerKind::AttackCooldown,
            Timer::new(cooldown_ticks(spec.base_attack_speed, &spec.weapon)),
        );
        timers.insert(TimerKind::ClearAttack, Timer::new(spec.clear_attack_ticks));

        Self {
            id: EntityId::new(),
            pos: spec.position,
            size: spec.size,
            hp: spec.hp,
            max_hp: spec.hp,
            color: spec.color,
            hitbox: Rect::centered(spec.position, spec.size),
            velocity: spec.velocity,
            attack_speed: spec.base_attack_speed,
            look_angle: 0.0,
            weapon: spec.weapon,
            target: None,
            timers,
            frame_rate: spec.frame_rate,
            attack_overlay: None,
            drawn: None,
        }
    }

    // === ACCESSORS ===

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.w
    }

    pub fn height(&self) -> i32 {
        self.size.h
    }

    pub fn hp(&self) -> Hp {
        self.hp
    }

    pub fn max_hp(&self) -> Hp {
        self.max_hp
    }

    pub fn hitbox(&self) -> Rect {
        self.hitbox
    }

    pub fn look_angle(&self) -> f32 {
        self.look_angle
    }

    pub fn attack_overlay(&self) -> Option<Rect> {
        self.attack_overlay
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Excluded from other entities' collision checks while true
    pub fn is_sleeping(&self) -> bool {
        self.timers.is_armed(TimerKind::Sleep)
    }

    /// Distance covered in one tick
    pub fn step(&self) -> f32 {
        self.velocity / self.frame_rate
    }

    pub fn distance(&self, pos: Vec2) -> f32 {
        self.pos.distance(&pos)
    }

    pub fn set_look_angle(&mut self, angle: f32) {
        self.look_angle = wrap_degrees(angle);
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.set_look_angle(self.look_angle + degrees);
    }

    // === COLLISION QUERIES ===

    pub fn collides_point(&self, x: i32, y: i32) -> bool {
        self.hitbox.contains_point(x, y)
    }

    pub fn collides_with(&self, other: &EntityBase) -> bool {
        self.hitbox.collides(&other.hitbox)
    }

    /// Index of the first entity in `others` whose hit-box overlaps ours
    pub fn collide_list(&self, others: &[&EntityBase]) -> Option<usize> {
        self.hitbox.collide_list(others.iter().map(|o| &o.hitbox))
    }

    // === MOVEMENT ===

    pub fn update_hitbox(&mut self) {
        self.hitbox = Rect::centered(self.pos, self.size);
    }

    /// Erase the previous footprint and paint the current one
    pub fn draw(&mut self, surface: &mut dyn Surface) {
        if let Some(previous) = self.drawn.take() {
            surface.erase(previous);
        }
        self.update_hitbox();
        surface.fill_rect(self.color, self.hitbox);
        self.drawn = Some(self.hitbox);
    }

    /// Base per-tick refresh
    pub fn refresh(&mut self, surface: &mut dyn Surface) {
        self.draw(surface);
    }

    /// Put the entity at `candidate` if nothing forbids it
    ///
    /// Without `force` the move is refused when the new hit-box would leave
    /// the play area or overlap an awake obstacle other than ourselves.
    pub fn place(
        &mut self,
        candidate: Vec2,
        obstacles: &[&EntityBase],
        force: bool,
        surface: &mut dyn Surface,
    ) -> bool {
        if !force {
            let hitbox = Rect::centered(candidate, self.size);
            if !surface.bounds().contains_rect(&hitbox) {
                tracing::trace!(entity = %self.id, "move blocked by arena bounds");
                return false;
            }
            let blocker = obstacles.iter().find(|o| {
                o.id != self.id && !o.is_sleeping() && hitbox.collides(&o.hitbox)
            });
            if let Some(blocker) = blocker {
                tracing::trace!(entity = %self.id, blocker = %blocker.id, "move blocked");
                return false;
            }
        }

        self.pos = candidate;
        self.draw(surface);
        true
    }

    /// Move by `(dx, dy)` scaled to one tick of travel
    pub fn move_by(
        &mut self,
        dx: f32,
        dy: f32,
        obstacles: &[&EntityBase],
        force: bool,
        surface: &mut dyn Surface,
    ) -> bool {
        let step = self.step();
        let candidate = Vec2::new(self.pos.x + dx * step, self.pos.y + dy * step);
        self.place(candidate, obstacles, force, surface)
    }

    /// Head toward `target`, one x-axis move then one y-axis move
    ///
    /// When a coordinate is within a tick of the target it is snapped onto it
    /// first. Diagonal approaches therefore trace a staircase, not a line.
    pub fn move_to(
        &mut self,
        target: Vec2,
        obstacles: &[&EntityBase],
        force: bool,
        surface: &mut dyn Surface,
    ) {
        let reach = self.step() + 1.0;
        let (mut dx, mut dy) = (0.0, 0.0);

        if self.pos.y != target.y {
            if (self.pos.y - target.y).abs() < reach {
                self.place(Vec2::new(self.pos.x, target.y), obstacles, force, surface);
                dx = axis_direction(self.pos.x, target.x);
            } else {
                let heading = Vec2::from_angle(self.pos.bearing_to(&target));
                dx = heading.x;
                dy = heading.y;
            }
        } else if self.pos.x != target.x {
            if (self.pos.x - target.x).abs() < reach {
                self.place(Vec2::new(target.x, self.pos.y), obstacles, force, surface);
            } else {
                dx = axis_direction(self.pos.x, target.x);
            }
        }

        self.move_by(dx, 0.0, obstacles, force, surface);
        self.move_by(0.0, dy, obstacles, force, surface);
    }

    // === COMBAT ===

    /// Schedule a swing at `targets` unless one is already pending
    ///
    /// Returns the cooldown in ticks when a new swing was armed.
    pub fn arm_attack(&mut self, targets: AttackTargets) -> Option<u32> {
        let cooldown = cooldown_ticks(self.attack_speed, &self.weapon);
        let timer = self.timers.get_mut(TimerKind::AttackCooldown)?;
        if timer.is_armed() {
            return None;
        }
        timer.set_event(TimerEvent::Attack(targets));
        timer.start(Some(cooldown));
        Some(cooldown)
    }

    /// Arm a swing at our target if it is within reach
    pub fn try_to_attack(&mut self, neighbors: &Neighbors) -> Option<u32> {
        let target_id = self.target?;
        let target = neighbors.get(target_id)?;
        if target.is_invulnerable() || target.base.is_dead() {
            return None;
        }

        let side = Side::toward(self.pos.x, target.base.pos.x);
        let swing = attack_box(self.pos, side, &self.weapon);
        if !swing.collides(&target.base.hitbox) {
            return None;
        }
        self.arm_attack(AttackTargets::Single(target_id))
    }

    /// Swing toward `side` and damage every listed target the swing touches
    ///
    /// Returns the number of targets hit.
    pub fn attack(
        &mut self,
        side: Side,
        targets: &AttackTargets,
        ctx: &mut UpdateContext,
        neighbors: &mut Neighbors,
    ) -> usize {
        let swing = attack_box(self.pos, side, &self.weapon);
        ctx.surface.fill_rect(colors::ATTACK_BOX, swing);
        self.attack_overlay = Some(swing);
        if let Some(timer) = self.timers.get_mut(TimerKind::ClearAttack) {
            timer.set_event(TimerEvent::ClearAttack(swing));
            timer.start(None);
        }
        ctx.events.push(SimulationEvent::Swing {
            tick: ctx.tick,
            attacker: self.id,
            area: swing,
        });

        let mut hits = 0;
        for &target_id in targets.ids() {
            let Some(target) = neighbors.get_mut(target_id) else {
                continue;
            };
            if target.base.is_dead() || !swing.collides(&target.base.hitbox) {
                continue;
            }

            let outcome = target.hurt(self.weapon.damage, &mut *ctx.surface);
            hits += 1;
            tracing::debug!(
                attacker = %self.id,
                target = %target_id,
                damage = outcome.dealt,
                hp = target.base.hp,
                "hit"
            );
            ctx.events.push(SimulationEvent::Hit {
                tick: ctx.tick,
                attacker: self.id,
                target: target_id,
                damage: outcome.dealt,
                hp_left: target.base.hp,
            });
            if outcome.provoked {
                ctx.events.push(SimulationEvent::Aggro {
                    tick: ctx.tick,
                    enemy: target_id,
                });
            }
            if outcome.killed {
                tracing::info!(attacker = %self.id, target = %target_id, "killed");
                ctx.events.push(SimulationEvent::Killed {
                    tick: ctx.tick,
                    attacker: Some(self.id),
                    target: target_id,
                });
            }
        }
        hits
    }

    /// Erase a swing overlay once its display time is over
    pub fn clear_attack_overlay(&mut self, area: Rect, surface: &mut dyn Surface) {
        surface.erase(area);
        if self.attack_overlay == Some(area) {
            self.attack_overlay = None;
        }
    }

    /// Subtract `damage`, flooring at zero. Dead entities ignore damage.
    pub fn hurt(&mut self, damage: Hp, surface: &mut dyn Surface) -> HurtOutcome {
        if self.is_dead() {
            return HurtOutcome::default();
        }

        let before = self.hp;
        self.hp = self.hp.saturating_sub(damage);
        let killed = self.hp == 0;
        if killed {
            self.kill(surface);
        }

        HurtOutcome {
            dealt: before - self.hp,
            killed,
            provoked: false,
        }
    }

    /// Drop to zero hp, cancel anything pending and wipe a swing still on screen
    pub fn kill(&mut self, surface: &mut dyn Surface) {
        self.hp = 0;
        self.timers.stop_all();
        if let Some(overlay) = self.attack_overlay.take() {
            surface.erase(overlay);
        }
    }

    /// Arm the sleep timer for `duration` ticks, or its default length
    pub fn sleep(&mut self, duration: Option<u32>) {
        if let Some(timer) = self.timers.get_mut(TimerKind::Sleep) {
            let ticks = duration.unwrap_or(timer.default_duration());
            timer.start(Some(ticks));
        }
    }

    /// Teleport without collision checks, keeping the hit-box in sync
    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
        self.update_hitbox();
    }
}

/// -1, 0 or 1 along one axis toward `to`
fn axis_direction(from: f32, to: f32) -> f32 {
    if from < to {
        1.0
    } else if from > to {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FrameBuffer;

    fn spec_at(x: f32, y: f32) -> EntitySpec {
        EntitySpec {
            position: Vec2::new(x, y),
            size: Size::new(20, 20),
            hp: 100,
            velocity: 60.0,
            color: colors::WHITE,
            weapon: Arc::new(Weapon::sword()),
            base_attack_speed: 1,
            frame_rate: 60.0,
            sleep_ticks: 100,
            clear_attack_ticks: 10,
        }
    }

    #[test]
    fn test_hitbox_centered_on_construction() {
        let e = EntityBase::new(spec_at(100.0, 50.0));
        assert_eq!(e.hitbox(), Rect::new(90, 40, 20, 20));
    }

    #[test]
    fn test_move_scales_by_velocity() {
        let mut fb = FrameBuffer::blank(200, 200);
        let mut e = EntityBase::new(spec_at(100.0, 100.0));
        assert!(e.move_by(1.0, 0.0, &[], false, &mut fb));
        assert_eq!(e.position(), Vec2::new(101.0, 100.0));
        assert_eq!(e.hitbox(), Rect::new(91, 90, 20, 20));
    }

    #[test]
    fn test_move_out_of_bounds_rejected() {
        let mut fb = FrameBuffer::blank(200, 200);
        let mut e = EntityBase::new(spec_at(10.0, 100.0));
        assert!(!e.move_by(-1.0, 0.0, &[], false, &mut fb));
        assert_eq!(e.position(), Vec2::new(10.0, 100.0));
    }

    #[test]
    fn test_forced_move_ignores_bounds() {
        let mut fb = FrameBuffer::blank(200, 200);
        let mut e = EntityBase::new(spec_at(10.0, 100.0));
        assert!(e.move_by(-1.0, 0.0, &[], true, &mut fb));
        assert_eq!(e.position(), Vec2::new(9.0, 100.0));
        assert_eq!(e.hitbox().x, -1);
    }

    #[test]
    fn test_move_into_neighbor_rejected() {
        let mut fb = FrameBuffer::blank(200, 200);
        let mut e = EntityBase::new(spec_at(100.0, 100.0));
        let wall = EntityBase::new(spec_at(120.0, 100.0));
        assert!(!e.move_by(1.0, 0.0, &[&wall], false, &mut fb));
        assert_eq!(e.position(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_sleeping_neighbor_is_passable() {
        let mut fb = FrameBuffer::blank(200, 200);
        let mut e = EntityBase::new(spec_at(100.0, 100.0));
        let mut ghost = EntityBase::new(spec_at(120.0, 100.0));
        ghost.sleep(None);
        assert!(e.move_by(1.0, 0.0, &[&ghost], false, &mut fb));
    }

    #[test]
    fn test_self_is_not_an_obstacle() {
        let mut fb = FrameBuffer::blank(200, 200);
        let mut e = EntityBase::new(spec_at(100.0, 100.0));
        let twin = e.clone();
        assert!(e.move_by(0.0, 1.0, &[&twin], false, &mut fb));
    }

    #[test]
    fn test_move_to_horizontal_snap() {
        let mut fb = FrameBuffer::blank(200, 200);
        let mut e = EntityBase::new(spec_at(100.0, 100.0));
        e.move_to(Vec2::new(101.5, 100.0), &[], false, &mut fb);
        assert_eq!(e.position(), Vec2::new(101.5, 100.0));
    }

    #[test]
    fn test_move_to_diagonal_steps_each_axis() {
        let mut fb = FrameBuffer::blank(400, 400);
        let mut e = EntityBase::new(spec_at(100.0, 100.0));
        e.move_to(Vec2::new(200.0, 200.0), &[], false, &mut fb);
        let p = e.position();
        let d = std::f32::consts::FRAC_1_SQRT_2;
        assert!((p.x - (100.0 + d)).abs() < 0.001);
        assert!((p.y - (100.0 + d)).abs() < 0.001);
    }

    #[test]
    fn test_move_to_vertical_alignment() {
        let mut fb = FrameBuffer::blank(400, 400);
        let mut e = EntityBase::new(spec_at(100.0, 100.0));
        e.move_to(Vec2::new(100.0, 50.0), &[], false, &mut fb);
        let p = e.position();
        assert!((p.x - 100.0).abs() < 0.001);
        assert!((p.y - 99.0).abs() < 0.001);
    }

    #[test]
    fn test_move_to_reaches_target() {
        let mut fb = FrameBuffer::blank(400, 400);
        let mut e = EntityBase::new(spec_at(100.0, 100.0));
        let goal = Vec2::new(130.0, 90.0);
        for _ in 0..200 {
            e.move_to(goal, &[], false, &mut fb);
        }
        assert_eq!(e.position(), goal);
    }

    #[test]
    fn test_hurt_floors_at_zero() {
        let mut fb = FrameBuffer::blank(200, 200);
        let mut e = EntityBase::new(spec_at(100.0, 100.0));
        let outcome = e.hurt(30, &mut fb);
        assert_eq!(outcome.dealt, 30);
        assert_eq!(e.hp(), 70);

        let outcome = e.hurt(500, &mut fb);
        assert_eq!(outcome.dealt, 70);
        assert!(outcome.killed);
        assert_eq!(e.hp(), 0);

        let outcome = e.hurt(5, &mut fb);
        assert_eq!(outcome, HurtOutcome::default());
        assert_eq!(e.hp(), 0);
    }

    #[test]
    fn test_kill_erases_pending_swing_overlay() {
        let mut fb = FrameBuffer::blank(400, 400);
        let mut e = EntityBase::new(spec_at(100.0, 100.0));
        let swing = attack_box(e.position(), Side::Right, &e.weapon);
        fb.fill_rect(colors::ATTACK_BOX, swing);
        e.attack_overlay = Some(swing);
        e.timers.get_mut(TimerKind::ClearAttack).unwrap().start(None);

        e.kill(&mut fb);
        assert!(e.is_dead());
        assert_eq!(e.attack_overlay(), None);
        assert!(fb.is_clear(swing));
        assert!(!e.timers.is_armed(TimerKind::ClearAttack));
    }

    #[test]
    fn test_arm_attack_only_once() {
        let mut e = EntityBase::new(spec_at(100.0, 100.0));
        let target = EntityId::new();
        assert_eq!(e.arm_attack(AttackTargets::Single(target)), Some(19));
        assert_eq!(e.arm_attack(AttackTargets::Single(target)), None);
    }

    #[test]
    fn test_rotate_wraps() {
        let mut e = EntityBase::new(spec_at(100.0, 100.0));
        e.rotate(-90.0);
        assert_eq!(e.look_angle(), 270.0);
        e.rotate(180.0);
        assert_eq!(e.look_angle(), 90.0);
    }

    #[test]
    fn test_draw_erases_previous_footprint() {
        let mut fb = FrameBuffer::blank(200, 200);
        let mut e = EntityBase::new(spec_at(100.0, 100.0));
        e.draw(&mut fb);
        let first = e.hitbox();
        e.move_by(0.0, 60.0, &[], false, &mut fb);
        assert!(fb.is_clear(first));
        assert_eq!(fb.count(colors::WHITE), 400);
    }
}
