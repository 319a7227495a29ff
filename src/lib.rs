//! Disk Rhythm - a three-lane timing game on a tilted platform
//!
//! Core modules:
//! - `sim`: Deterministic game loop (spawning, disk travel, scoring, combos)
//! - `scene`: World transforms and lights derived from the simulation
//! - `renderer`: WebGPU rendering pipeline
//! - `assets`: Startup asset fetching and decoding
//! - `tuning` / `settings` / `config`: Data-driven balance and player preferences

pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use config::GameConfig;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game loop constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame on most screens)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (tab switches, debugger stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Unpack a 0xRRGGBB colour into linear-ish [0, 1] components
#[inline]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
