//! Body, field and simulation configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

const CONFIG_PATH: &str = "snake.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub shape: ShapeConfig,
    #[serde(default)]
    pub body: BodyConfig,
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub sim: SimConfig,
}

impl Config {
    /// Load configuration from `snake.toml` or use defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    /// Load configuration from `path`, writing the defaults there if it is missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }
}

/// Shape profile of the body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShapeConfig {
    /// `[length_fraction, radius_fraction]` per zone, tail first.
    #[serde(default = "default_profile")]
    pub profile: Vec<[f64; 2]>,
    /// Zone where radius growth saturates. Must start a flat-radius run.
    #[serde(default = "default_anchor_index")]
    pub anchor_index: usize,
    /// Girth cap.
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,
    /// Use delayed feed-driven growth.
    #[serde(default)]
    pub feedable: bool,
    /// Growth per feed, as a multiple of the anchor radius.
    #[serde(default = "default_feed_by_ratio")]
    pub feed_by_ratio: f64,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            anchor_index: default_anchor_index(),
            max_radius: default_max_radius(),
            feedable: false,
            feed_by_ratio: default_feed_by_ratio(),
        }
    }
}

fn default_profile() -> Vec<[f64; 2]> {
    vec![
        [0.25, 0.035],
        [0.3, 0.04],
        [0.85, 0.04],
        [0.93, 0.03],
        [1.0, 0.035],
    ]
}
fn default_anchor_index() -> usize {
    1
}
fn default_max_radius() -> f64 {
    0.5
}
fn default_feed_by_ratio() -> f64 {
    6.0
}

/// Initial body placement and head geometry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BodyConfig {
    #[serde(default = "default_initial_length")]
    pub initial_length: f64,
    #[serde(default = "default_start_x")]
    pub start_x: f64,
    #[serde(default = "default_start_y")]
    pub start_y: f64,
    #[serde(default)]
    pub start_angle: f64,
    #[serde(default)]
    pub floor_z: f64,
    /// Distance from nose to head center, relative to the nose radius.
    #[serde(default = "default_head_offset_ratio")]
    pub head_offset_ratio: f64,
    /// Head sphere radius, relative to the nose radius.
    #[serde(default = "default_head_radius_ratio")]
    pub head_radius_ratio: f64,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            initial_length: default_initial_length(),
            start_x: default_start_x(),
            start_y: default_start_y(),
            start_angle: 0.0,
            floor_z: 0.0,
            head_offset_ratio: default_head_offset_ratio(),
            head_radius_ratio: default_head_radius_ratio(),
        }
    }
}

fn default_initial_length() -> f64 {
    5.0
}
fn default_start_x() -> f64 {
    5.0
}
fn default_start_y() -> f64 {
    20.0
}
fn default_head_offset_ratio() -> f64 {
    1.0
}
fn default_head_radius_ratio() -> f64 {
    1.4
}

/// Play field configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldConfig {
    #[serde(default = "default_field_size")]
    pub width: f64,
    #[serde(default = "default_field_size")]
    pub height: f64,
    #[serde(default = "default_obstacles")]
    pub obstacles: usize,
    #[serde(default = "default_pickables")]
    pub pickables: usize,
    #[serde(default = "default_object_min_radius")]
    pub object_min_radius: f64,
    #[serde(default = "default_object_max_radius")]
    pub object_max_radius: f64,
    /// Minimum free distance around spawned objects and the spawn point.
    #[serde(default = "default_spawn_margin")]
    pub spawn_margin: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: default_field_size(),
            height: default_field_size(),
            obstacles: default_obstacles(),
            pickables: default_pickables(),
            object_min_radius: default_object_min_radius(),
            object_max_radius: default_object_max_radius(),
            spawn_margin: default_spawn_margin(),
        }
    }
}

fn default_field_size() -> f64 {
    40.0
}
fn default_obstacles() -> usize {
    6
}
fn default_pickables() -> usize {
    4
}
fn default_object_min_radius() -> f64 {
    0.3
}
fn default_object_max_radius() -> f64 {
    1.0
}
fn default_spawn_margin() -> f64 {
    1.5
}

/// Headless simulation driver settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimConfig {
    /// Tick interval in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Distance travelled per tick.
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Largest turn per tick in radians.
    #[serde(default = "default_max_turn")]
    pub max_turn: f64,
    /// Number of ticks to run (0 = forever).
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    /// Food run length granted per pickable.
    #[serde(default = "default_food_per_pickable")]
    pub food_per_pickable: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            speed: default_speed(),
            max_turn: default_max_turn(),
            ticks: default_ticks(),
            food_per_pickable: default_food_per_pickable(),
        }
    }
}

fn default_tick_interval() -> u64 {
    16
}
fn default_speed() -> f64 {
    0.08
}
fn default_max_turn() -> f64 {
    0.05
}
fn default_ticks() -> u64 {
    3000
}
fn default_food_per_pickable() -> f64 {
    1.0
}
