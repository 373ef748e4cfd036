mod builder;
mod component;
mod config;
mod controller;
mod engine;
mod error;
mod frame_loop;
mod governor;
mod render;
mod state;
#[cfg(test)]
mod testing;
mod types;

pub use component::CircuitBackground;
pub use config::{CircuitConfig, ConfigError, FrameBudget, HostConfig, LayoutConfig, MotionConfig};
pub use engine::CircuitEngine;
pub use error::CircuitError;
