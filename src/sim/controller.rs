//! Simulation lifecycle
//!
//! The controller owns the physics adapter, the current geometry and the
//! tally. Starting (or restarting) a run always goes through the same
//! sequence: generate geometry, tear down the previous world, materialize
//! the new one, reset the tally, subscribe.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::histogram::Histogram;
use super::tally::{Attribution, BinTally};
use crate::board::{BoardConfig, GeometryModel, generate};
use crate::consts::*;
use crate::error::{Error, Result};
use crate::physics::{BallId, BodyHandle, BodyTag, CollisionPair, PhysicsAdapter, Shape};
use crate::settings::Settings;

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    /// Nothing built yet
    Uninitialized,
    /// World materialized, collisions feeding the tally
    Running,
    /// Torn down by `shutdown`
    Stopped,
}

pub struct SimulationController<A: PhysicsAdapter> {
    adapter: A,
    phase: SimPhase,
    config: Option<BoardConfig>,
    geometry: Option<GeometryModel>,
    /// Shared with the collision handler of the current run only
    tally: Rc<RefCell<BinTally>>,
    /// Bumped on every teardown; handlers from older runs ignore their events
    generation: Rc<Cell<u64>>,
    /// Counted balls that rolled on into a neighbouring sensor
    crossings: Rc<Cell<u64>>,
    /// Sensor hits the tally could not place (unknown bin)
    rejected: Rc<Cell<u64>>,
    rng: Pcg32,
    spawn_jitter: f32,
    next_ball_id: u64,
    accumulator: f32,
}

impl<A: PhysicsAdapter> SimulationController<A> {
    pub fn new(adapter: A, seed: u64) -> Self {
        Self {
            adapter,
            phase: SimPhase::Uninitialized,
            config: None,
            geometry: None,
            tally: Rc::new(RefCell::new(BinTally::default())),
            generation: Rc::new(Cell::new(0)),
            crossings: Rc::new(Cell::new(0)),
            rejected: Rc::new(Cell::new(0)),
            rng: Pcg32::seed_from_u64(seed),
            spawn_jitter: SPAWN_JITTER,
            next_ball_id: 1,
            accumulator: 0.0,
        }
    }

    /// Controller seeded and tuned from run settings
    pub fn with_settings(adapter: A, settings: &Settings) -> Self {
        let mut controller = Self::new(adapter, settings.seed);
        controller.spawn_jitter = settings.spawn_jitter.max(0.0);
        controller
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn config(&self) -> Option<&BoardConfig> {
        self.config.as_ref()
    }

    pub fn geometry(&self) -> Option<&GeometryModel> {
        self.geometry.as_ref()
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// Build the board and begin counting
    ///
    /// Calling this while already running behaves like `restart`.
    pub fn start(&mut self, config: &BoardConfig) -> Result<()> {
        if self.phase == SimPhase::Running {
            log::info!("start() on a running simulation, restarting");
        }
        self.rebuild(config)
    }

    /// Discard the current world and counts, then build a new board
    ///
    /// An invalid config or an unavailable adapter leaves the current run untouched.
    pub fn restart(&mut self, config: &BoardConfig) -> Result<()> {
        self.rebuild(config)
    }

    /// Stop receiving events and release every body
    pub fn shutdown(&mut self) {
        if self.phase != SimPhase::Running {
            return;
        }
        self.teardown();
        self.phase = SimPhase::Stopped;
        log::info!("Simulation stopped");
    }

    fn rebuild(&mut self, config: &BoardConfig) -> Result<()> {
        let geometry = generate(config)?;

        if !self.adapter.is_ready() {
            return Err(Error::AdapterUnavailable(
                "physics engine is not accepting bodies".to_string(),
            ));
        }

        if let Some(max_step) = self.adapter.max_step_displacement(SIM_DT) {
            let sensor_height = geometry.sensor_height();
            if max_step >= sensor_height {
                return Err(Error::InvalidConfig(format!(
                    "balls can travel {max_step:.2} per step, sensors are only {sensor_height:.2} tall \
                     (max safe speed {:.1})",
                    config.max_safe_ball_speed(SIM_DT)
                )));
            }
        }

        if self.phase == SimPhase::Running {
            self.teardown();
        }

        self.materialize(&geometry);
        self.tally.borrow_mut().reset_to(geometry.bin_count());
        self.crossings.set(0);
        self.rejected.set(0);
        self.subscribe();

        log::info!(
            "Simulation running: {} pegs, {} bins (run {})",
            geometry.pegs.len(),
            geometry.bin_count(),
            self.generation.get()
        );

        self.config = Some(config.clone());
        self.geometry = Some(geometry);
        self.accumulator = 0.0;
        self.phase = SimPhase::Running;
        Ok(())
    }

    /// Unsubscribe first so no event from the old world reaches the tally
    fn teardown(&mut self) {
        self.adapter.unsubscribe_collisions();
        self.generation.set(self.generation.get() + 1);
        self.adapter.remove_all_from_world();
    }

    fn materialize(&mut self, geometry: &GeometryModel) {
        let adapter = &mut self.adapter;
        let mut handles: Vec<BodyHandle> = Vec::with_capacity(
            geometry.pegs.len() + geometry.bin_partitions.len() + geometry.bin_count() + 3,
        );

        for peg in &geometry.pegs {
            handles.push(adapter.create_static_body(
                Shape::Circle { radius: peg.radius },
                peg.pos,
                BodyTag::Peg,
                false,
            ));
        }

        for wall in &geometry.walls {
            handles.push(adapter.create_static_body(
                Shape::Rect {
                    half_extents: wall.half_extents(),
                },
                wall.center(),
                BodyTag::Wall,
                false,
            ));
        }

        handles.push(adapter.create_static_body(
            Shape::Rect {
                half_extents: geometry.floor.half_extents(),
            },
            geometry.floor.center(),
            BodyTag::Floor,
            false,
        ));

        // Cosmetic partitions still exist as bodies so they get drawn
        for partition in &geometry.bin_partitions {
            handles.push(adapter.create_static_body(
                Shape::Rect {
                    half_extents: partition.half_extents(),
                },
                partition.center(),
                BodyTag::Partition,
                !geometry.solid_partitions,
            ));
        }

        for sensor in &geometry.bin_sensors {
            handles.push(adapter.create_static_body(
                Shape::Rect {
                    half_extents: sensor.rect.half_extents(),
                },
                sensor.rect.center(),
                BodyTag::BinSensor(sensor.bin),
                true,
            ));
        }

        adapter.add_to_world(&handles);
    }

    fn subscribe(&mut self) {
        let tally = Rc::clone(&self.tally);
        let current = Rc::clone(&self.generation);
        let crossings = Rc::clone(&self.crossings);
        let rejected = Rc::clone(&self.rejected);
        let run = self.generation.get();

        self.adapter.subscribe_collisions(Box::new(move |pair: CollisionPair| {
            if current.get() != run {
                log::debug!("Ignoring collision from superseded run {run}");
                return;
            }
            let Some((bin, ball)) = pair.sensor_hit() else {
                return;
            };
            match tally.borrow_mut().on_collision(bin, ball) {
                Ok(Attribution::Counted) => log::trace!("Ball {ball} landed in bin {bin}"),
                Ok(Attribution::Repeat) => {}
                // Balls settling on a partition top touch both neighbours
                Err(err @ Error::DuplicateAttribution { .. }) => {
                    crossings.set(crossings.get() + 1);
                    log::debug!("{err}");
                }
                Err(err) => {
                    rejected.set(rejected.get() + 1);
                    log::warn!("{err}");
                }
            }
        }));
    }

    /// Drop `count` balls at `(x, y)` with a little horizontal jitter
    ///
    /// `x` is clamped so balls always start between the walls.
    pub fn spawn_balls(&mut self, x: f32, y: f32, count: u32) -> Result<Vec<BallId>> {
        if self.phase != SimPhase::Running {
            return Err(Error::NotRunning);
        }
        let config = self.config.as_ref().ok_or(Error::NotRunning)?;
        let radius = config.ball_radius;
        let (inner_left, inner_right) = config.interior();
        let (min_x, max_x) = (inner_left + radius, inner_right - radius);

        let mut ids = Vec::with_capacity(count as usize);
        let mut handles = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let jitter = if self.spawn_jitter > 0.0 {
                self.rng.random_range(-self.spawn_jitter..=self.spawn_jitter)
            } else {
                0.0
            };
            let pos = Vec2::new((x + jitter).max(min_x).min(max_x), y);

            let id = BallId(self.next_ball_id);
            self.next_ball_id += 1;
            handles.push(self.adapter.create_dynamic_body(
                Shape::Circle { radius },
                pos,
                Vec2::ZERO,
                BodyTag::Ball(id),
            ));
            ids.push(id);
        }
        self.adapter.add_to_world(&handles);

        log::debug!("Spawned {count} balls at ({x:.1}, {y:.1})");
        Ok(ids)
    }

    /// Advance physics by exactly one fixed step
    pub fn step(&mut self) -> Result<()> {
        if self.phase != SimPhase::Running {
            return Err(Error::NotRunning);
        }
        self.adapter.step(SIM_DT);
        Ok(())
    }

    /// Advance by wall-clock `elapsed` seconds in fixed steps
    ///
    /// Returns the number of steps taken (at most `MAX_SUBSTEPS`).
    pub fn advance(&mut self, elapsed: f32) -> Result<u32> {
        if self.phase != SimPhase::Running {
            return Err(Error::NotRunning);
        }
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_TIME);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.adapter.step(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        Ok(substeps)
    }

    /// Current per-bin counts
    pub fn snapshot(&self) -> Vec<u64> {
        self.tally.borrow().snapshot()
    }

    pub fn histogram(&self) -> Histogram {
        Histogram::new(self.snapshot())
    }

    /// Hits by already counted balls on a different bin this run
    pub fn cross_bin_hits(&self) -> u64 {
        self.crossings.get()
    }

    /// Sensor hits the tally could not place this run
    pub fn rejected_hits(&self) -> u64 {
        self.rejected.get()
    }

    /// Balls spawned since the controller was created
    pub fn balls_spawned(&self) -> u64 {
        self.next_ball_id - 1
    }
}

impl<A: PhysicsAdapter> Drop for SimulationController<A> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
