pub mod attack;
pub mod constants;
pub mod weapons;

pub use attack::{attack_box, cooldown_ticks, AttackTargets, Side};
pub use weapons::Weapon;
