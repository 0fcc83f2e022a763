//! Waypoint patrol with a player chase.
//!
//! A patrolling entity walks its route until the player comes within sight,
//! then chases the player until they leave it again. Sight reaches farther
//! when the player stands in light. Movement stays on the XZ plane.

use cgmath::{InnerSpace, Vector3};

use crate::gfx::transform::Transform;

/// What a [`PatrolController`] is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolState {
    Patrol,
    Attack,
}

/// Tuning for a [`PatrolController`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolConfig {
    /// Sight range when the player is lit
    pub lit_sight_range: f32,
    /// Sight range when the player is in the dark
    pub dark_sight_range: f32,
    /// Movement speed in units per second
    pub speed: f32,
    /// Squared distance at which a waypoint counts as reached
    pub arrival_distance_squared: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            lit_sight_range: 9.0,
            dark_sight_range: 6.0,
            speed: 3.0,
            arrival_distance_squared: 1.001,
        }
    }
}

impl PatrolConfig {
    pub fn with_sight_ranges(mut self, lit: f32, dark: f32) -> Self {
        self.lit_sight_range = lit;
        self.dark_sight_range = dark;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

/// Moves one transform along a looping route of waypoints.
#[derive(Debug, Clone)]
pub struct PatrolController {
    config: PatrolConfig,
    route: Vec<Vector3<f32>>,
    active_waypoint: usize,
    state: PatrolState,
}

impl PatrolController {
    pub fn new(route: Vec<Vector3<f32>>, config: PatrolConfig) -> Self {
        Self {
            config,
            route,
            active_waypoint: 0,
            state: PatrolState::Patrol,
        }
    }

    pub fn state(&self) -> PatrolState {
        self.state
    }

    pub fn config(&self) -> &PatrolConfig {
        &self.config
    }

    pub fn route(&self) -> &[Vector3<f32>] {
        &self.route
    }

    /// Index of the waypoint currently walked towards.
    pub fn active_waypoint(&self) -> usize {
        self.active_waypoint
    }

    /// Decides between patrolling and chasing, then moves `transform`.
    pub fn update(
        &mut self,
        transform: &mut Transform,
        player_position: Vector3<f32>,
        player_lit: bool,
        dt: f32,
    ) -> PatrolState {
        self.update_state(transform, player_position, player_lit);

        match self.state {
            PatrolState::Patrol => self.patrol(transform, dt),
            PatrolState::Attack => self.move_towards(transform, player_position, dt),
        }
        self.state
    }

    fn update_state(
        &mut self,
        transform: &Transform,
        player_position: Vector3<f32>,
        player_lit: bool,
    ) {
        let range = if player_lit {
            self.config.lit_sight_range
        } else {
            self.config.dark_sight_range
        };
        let spotted = transform.distance_squared_to(player_position) < range * range;

        let next = if spotted {
            PatrolState::Attack
        } else {
            PatrolState::Patrol
        };
        if next != self.state {
            log::debug!("Patrol state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn patrol(&mut self, transform: &mut Transform, dt: f32) {
        let Some(&waypoint) = self.route.get(self.active_waypoint) else {
            return;
        };

        if transform.distance_squared_to(waypoint) > self.config.arrival_distance_squared {
            self.move_towards(transform, waypoint, dt);
        } else {
            self.active_waypoint = (self.active_waypoint + 1) % self.route.len();
        }
    }

    fn move_towards(&self, transform: &mut Transform, target: Vector3<f32>, dt: f32) {
        let direction = target - transform.position();
        if direction.magnitude2() <= f32::EPSILON {
            return;
        }
        let step = direction.normalize() * (dt * self.config.speed);
        transform.move_absolute(Vector3::new(step.x, 0.0, step.z));
    }
}
