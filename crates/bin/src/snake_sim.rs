//! Snake Sim - headless driver for the body core.
//!
//! Steers a body around a random field at a fixed tick rate, feeding it on
//! pickables and resetting the level on any fatal collision.

use std::f64::consts::{PI, TAU};
use std::time::Duration;

use body::{BodyError, BodyModel, Collision, Config, Field, FieldObjectType};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sections::SectionWriter;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Distance from the walls at which steering turns back toward the center.
const WALL_AVOID_DISTANCE: f64 = 3.0;

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TickOutcome {
    Moved,
    Picked(usize),
    Reset(Collision),
}

#[derive(Debug, Default)]
struct Stats {
    ticks: u64,
    pickups: u64,
    resets: u64,
    max_length: f64,
}

struct Simulation {
    config: Config,
    body: BodyModel,
    field: Field,
    rng: StdRng,
    steer: f64,
    stats: Stats,
}

impl Simulation {
    fn new(config: Config, mut rng: StdRng) -> Result<Self, BodyError> {
        let body = BodyModel::from_config(&config)?;
        let field = Field::populate(&config.field, body.face().head, &mut rng);
        let stats = Stats {
            max_length: body.total_length(),
            ..Stats::default()
        };
        Ok(Self {
            config,
            body,
            field,
            rng,
            steer: 0.0,
            stats,
        })
    }

    fn tick(&mut self) -> Result<TickOutcome, BodyError> {
        self.stats.ticks += 1;
        let turn = self.next_turn();
        self.body.advance(self.config.sim.speed, turn)?;
        self.stats.max_length = self.stats.max_length.max(self.body.total_length());

        let collision = self.body.check_collisions(&self.field);
        match collision {
            Collision::None => Ok(TickOutcome::Moved),
            Collision::GameObject { index, object } if object.kind == FieldObjectType::Pickable => {
                self.body.feed(self.config.sim.food_per_pickable);
                self.body.feed_proportions();
                self.stats.pickups += 1;
                let head = self.body.face().head;
                let margin = self.config.field.spawn_margin;
                if !self.field.relocate(index, margin, head, &mut self.rng) {
                    warn!("Could not relocate pickable {}", index);
                }
                debug!("Picked {} at ({:.2}, {:.2})", index, object.center.x, object.center.y);
                Ok(TickOutcome::Picked(index))
            }
            fatal => {
                self.stats.resets += 1;
                info!(
                    "{:?} after {} ticks at length {:.2}, resetting",
                    fatal.kind(),
                    self.stats.ticks,
                    self.body.total_length()
                );
                let b = &self.config.body;
                self.body
                    .init(b.start_x, b.start_y, b.floor_z, b.start_angle, b.initial_length)?;
                self.steer = 0.0;
                Ok(TickOutcome::Reset(fatal))
            }
        }
    }

    /// Wander randomly, turning back toward the center near the walls.
    fn next_turn(&mut self) -> f64 {
        let max_turn = self.config.sim.max_turn;
        let head = DVec2::new(self.body.head_x(), self.body.head_y());
        let (w, h) = (self.config.field.width, self.config.field.height);
        let near_wall = head.x < WALL_AVOID_DISTANCE
            || head.y < WALL_AVOID_DISTANCE
            || head.x > w - WALL_AVOID_DISTANCE
            || head.y > h - WALL_AVOID_DISTANCE;

        if near_wall {
            let to_center = DVec2::new(w / 2.0, h / 2.0) - head;
            let wanted = to_center.y.atan2(to_center.x);
            let diff = (wanted - self.body.view_direction() + PI).rem_euclid(TAU) - PI;
            self.steer = diff.clamp(-max_turn, max_turn);
        } else if max_turn > 0.0 {
            let jitter = self.rng.random_range(-max_turn / 4.0..=max_turn / 4.0);
            self.steer = (self.steer + jitter).clamp(-max_turn, max_turn);
        }
        self.steer
    }

    /// Pack the current sections the way a renderer would receive them.
    fn pack_sections(&self) -> usize {
        let mut writer = SectionWriter::with_capacity(1024);
        writer.put_sections(self.body.body_and_head_sections());
        writer.len()
    }
}

async fn run(mut sim: Simulation) -> anyhow::Result<()> {
    let tick_interval = Duration::from_millis(sim.config.sim.tick_interval_ms.max(1));
    let mut ticker = interval_at(Instant::now() + tick_interval, tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let max_ticks = sim.config.sim.ticks;

    loop {
        ticker.tick().await;
        let outcome = sim.tick()?;
        if outcome != TickOutcome::Moved || sim.stats.ticks % 100 == 0 {
            debug!(
                "Tick {}: {:?}, {} segments, {} bytes of sections",
                sim.stats.ticks,
                outcome,
                sim.body.segment_count(),
                sim.pack_sections()
            );
        }
        if max_ticks > 0 && sim.stats.ticks >= max_ticks {
            break;
        }
    }

    info!(
        "Done: {} ticks, {} pickups, {} resets, max length {:.2}",
        sim.stats.ticks, sim.stats.pickups, sim.stats.resets, sim.stats.max_length
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Snake Sim v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load()?;
    info!("Loaded configuration");
    info!("  Field: {}x{}", config.field.width, config.field.height);
    info!("  Body length: {}", config.body.initial_length);
    info!("  Feedable: {}", config.shape.feedable);

    let sim = Simulation::new(config, StdRng::from_os_rng())?;
    run(sim).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use body::FieldObject;

    fn sim(seed: u64) -> Simulation {
        Simulation::new(Config::default(), StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_long_run_keeps_body_valid() {
        let mut sim = sim(11);
        for _ in 0..2000 {
            sim.tick().unwrap();
            let sum: f64 = sim.body.segments().map(|s| s.length()).sum();
            assert!((sum - sim.body.total_length()).abs() < 1e-6);
        }
        assert_eq!(sim.stats.ticks, 2000);
    }

    #[test]
    fn test_pickable_feeds_body() {
        let mut sim = sim(5);
        let head = sim.body.face().head;
        let ahead = head + DVec2::new(sim.config.sim.speed, 0.0);
        sim.field = Field::new(
            sim.config.field.width,
            sim.config.field.height,
            vec![FieldObject::new(ahead, 0.2, FieldObjectType::Pickable)],
        );
        sim.config.sim.max_turn = 0.0;

        let length = sim.body.total_length();
        assert_eq!(sim.tick().unwrap(), TickOutcome::Picked(0));
        assert_eq!(sim.stats.pickups, 1);
        assert!(sim.body.food_run_length() > 0.0);

        sim.tick().unwrap();
        assert!(sim.body.total_length() > length);
    }

    #[test]
    fn test_obstacle_resets_level() {
        let mut sim = sim(5);
        let head = sim.body.face().head;
        let obstacle = FieldObject::new(head, 0.3, FieldObjectType::Obstacle);
        sim.field = Field::new(sim.config.field.width, sim.config.field.height, vec![obstacle]);
        sim.config.sim.max_turn = 0.0;

        let outcome = sim.tick().unwrap();
        assert!(matches!(outcome, TickOutcome::Reset(Collision::GameObject { index: 0, .. })));
        assert_eq!(sim.stats.resets, 1);
        assert!((sim.body.total_length() - sim.config.body.initial_length).abs() < 1e-9);
    }

    #[test]
    fn test_packed_sections_cover_head() {
        let sim = sim(2);
        let expected = 4 + sim.body.body_and_head_sections().count() * sections::SECTION_STRIDE;
        assert_eq!(sim.pack_sections(), expected);
    }
}
