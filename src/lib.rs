//! Cookie clicker: idle production, a squash spring, a particle timeline
//! and save/load, driven one frame at a time by the browser front-end.

pub mod actions;
pub mod config;
pub mod draw;
pub mod economy;
pub mod effects;
pub mod game;
pub mod input;
pub mod logging;
pub mod render;
pub mod save;
pub mod spawn;
pub mod spring;
pub mod time;

pub use config::GameConfig;
pub use game::Game;
pub use save::{Persistence, SaveRecord};
