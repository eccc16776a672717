//! Headless skirmish runner
//!
//! Spawns a player in the middle of the arena and enemies at random free
//! spots, then runs the simulation. The player walks toward the nearest
//! living enemy and swings at everything around it whenever an enemy is in
//! reach. Prints a JSON or text summary at the end.

use std::ops::Range;
use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use skirmish::combat::attack::{attack_box, Side};
use skirmish::core::config::SimulationConfig;
use skirmish::core::error::Result;
use skirmish::core::types::{EntityId, Vec2};
use skirmish::ecs::world::World;
use skirmish::entity::AttributeValue;
use skirmish::simulation::tick::SimulationEvent;
use skirmish::spatial::rect::Rect;

/// Headless skirmish runner - player vs wandering enemies
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Run a headless melee skirmish and print a summary")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum ticks before the run is called a timeout
    #[arg(long, default_value_t = 3000)]
    ticks: u64,

    /// Number of enemies to spawn
    #[arg(long, default_value_t = 5)]
    enemies: usize,

    /// Arena width, overriding the config
    #[arg(long)]
    width: Option<u32>,

    /// Arena height, overriding the config
    #[arg(long)]
    height: Option<u32>,

    /// TOML config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every simulation event to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize, Debug, Default)]
struct RunSummary {
    outcome: String,
    ticks: u64,
    seed: u64,
    player_hp: u32,
    enemies_total: usize,
    enemies_killed: usize,
    swings: usize,
    hits_dealt: usize,
    hits_taken: usize,
    damage_dealt: u32,
    damage_taken: u32,
    aggro_events: usize,
}

impl RunSummary {
    fn record(&mut self, event: &SimulationEvent, player: EntityId) {
        match event {
            SimulationEvent::Swing { .. } => self.swings += 1,
            SimulationEvent::Hit {
                attacker, damage, ..
            } => {
                if *attacker == player {
                    self.hits_dealt += 1;
                    self.damage_dealt += *damage;
                } else {
                    self.hits_taken += 1;
                    self.damage_taken += *damage;
                }
            }
            SimulationEvent::Killed { target, .. } if *target != player => self.enemies_killed += 1,
            SimulationEvent::Aggro { .. } => self.aggro_events += 1,
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skirmish=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(width) = args.width {
        config.arena_width = width;
    }
    if let Some(height) = args.height {
        config.arena_height = height;
    }

    let mut world = World::with_seed(config, seed)?;
    let arena = world.bounds();
    let player = world.spawn_player(Vec2::new(arena.w as f32 / 2.0, arena.h as f32 / 2.0));

    let mut placement = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let enemies = spawn_enemies(&mut world, &mut placement, args.enemies);
    tracing::info!(seed, enemies = enemies.len(), "skirmish starting");

    let mut summary = RunSummary {
        seed,
        enemies_total: enemies.len(),
        ..RunSummary::default()
    };

    let outcome = loop {
        let Some(hero) = world.entity(player) else {
            break "defeat";
        };
        if hero.base.is_dead() {
            break "defeat";
        }
        if world.living_enemies().next().is_none() {
            break "victory";
        }
        if world.current_tick >= args.ticks {
            break "timeout";
        }

        drive_player(&mut world, player, &enemies)?;

        for event in world.tick() {
            if args.verbose {
                eprintln!("{}", serde_json::to_string(&event)?);
            }
            summary.record(&event, player);
        }
    };

    summary.outcome = outcome.to_string();
    summary.ticks = world.current_tick;
    summary.player_hp = world.entity(player).map(|p| p.hp()).unwrap_or(0);
    tracing::info!(outcome, ticks = summary.ticks, "skirmish finished");

    match args.format.as_str() {
        "text" => print_text(&summary),
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

/// Scatter enemies at random free spots, keeping clear of the player
fn spawn_enemies(world: &mut World, rng: &mut ChaCha8Rng, count: usize) -> Vec<EntityId> {
    let size = world.config().enemy.size;
    let arena = world.bounds();
    let mut ids = Vec::with_capacity(count);

    let (Some(xs), Some(ys)) = (spawn_span(arena.w, size.w), spawn_span(arena.h, size.h)) else {
        tracing::warn!(
            width = arena.w,
            height = arena.h,
            "arena too small to place enemies, spawning none"
        );
        return ids;
    };

    for _ in 0..count {
        for _attempt in 0..100 {
            let pos = Vec2::new(rng.gen_range(xs.clone()), rng.gen_range(ys.clone()));
            let footprint = Rect::centered(pos, size).inflate(size.w);
            let free = world
                .entities()
                .iter()
                .all(|e| !footprint.collides(&e.base.hitbox()));
            if free {
                ids.push(world.spawn_enemy(pos));
                break;
            }
        }
    }
    ids
}

/// Center coordinates along one axis that keep a margin of `size` from both
/// edges, or None when the axis is too short for that
fn spawn_span(extent: i32, size: i32) -> Option<Range<f32>> {
    let (low, high) = (size, extent - size);
    (low < high).then(|| low as f32..high as f32)
}

/// Swing at every enemy when one is in reach, otherwise walk to the nearest
fn drive_player(world: &mut World, player: EntityId, enemies: &[EntityId]) -> Result<()> {
    let Some(hero) = world.entity(player) else {
        return Ok(());
    };
    let origin = hero.position();
    let weapon = hero.base.weapon.clone();

    let mut in_reach = None;
    let mut nearest: Option<(f32, Vec2)> = None;
    for enemy in world.living_enemies() {
        let side = Side::toward(origin.x, enemy.base.x());
        if attack_box(origin, side, &weapon).collides(&enemy.base.hitbox()) {
            in_reach = Some(side);
            break;
        }
        let distance = origin.distance(&enemy.position());
        if nearest.map_or(true, |(best, _)| distance < best) {
            nearest = Some((distance, enemy.position()));
        }
    }

    if let Some(side) = in_reach {
        let angle = match side {
            Side::Right => 0.0,
            Side::Left => 180.0,
        };
        world.set_attribute(player, "attack_angle", AttributeValue::Float(angle))?;
        if let Some(cooldown) = world.start_attacking(player, enemies.to_vec())? {
            tracing::debug!(cooldown, "player swing armed");
        }
    } else if let Some((_, target)) = nearest {
        world.move_entity_to(player, target, false)?;
    }
    Ok(())
}

fn print_text(summary: &RunSummary) {
    println!("Skirmish Result");
    println!("===============");
    println!("Outcome: {}", summary.outcome);
    println!("Ticks: {}", summary.ticks);
    println!("Player hp: {}", summary.player_hp);
    println!(
        "Enemies killed: {}/{}",
        summary.enemies_killed, summary.enemies_total
    );
    println!(
        "Swings: {} (hits dealt {}, hits taken {})",
        summary.swings, summary.hits_dealt, summary.hits_taken
    );
    println!(
        "Damage dealt/taken: {}/{}",
        summary.damage_dealt, summary.damage_taken
    );
    println!("Aggro events: {}", summary.aggro_events);
    println!();
    println!("Seed: {}", summary.seed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_span_keeps_margin() {
        assert_eq!(spawn_span(800, 20), Some(20.0..780.0));
    }

    #[test]
    fn test_spawn_span_empty_for_narrow_arena() {
        assert_eq!(spawn_span(40, 20), None);
        assert_eq!(spawn_span(30, 20), None);
    }

    #[test]
    fn test_tiny_arena_spawns_no_enemies() {
        let config = SimulationConfig {
            arena_width: 40,
            arena_height: 40,
            ..SimulationConfig::default()
        };
        let mut world = World::with_seed(config, 1).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(spawn_enemies(&mut world, &mut rng, 3).is_empty());
    }
}
