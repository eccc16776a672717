//! Skirmish - real-time 2D melee combat simulation core

pub mod combat;
pub mod core;
pub mod ecs;
pub mod entity;
pub mod render;
pub mod simulation;
pub mod spatial;
