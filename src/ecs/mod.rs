pub mod world;

pub use world::{Neighbors, World};
