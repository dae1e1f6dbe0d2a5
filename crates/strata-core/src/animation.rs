//! Frame-driven animation scheduling.
//!
//! An [`AnimationManager`] owns every running [`Animation`] and advances them
//! once per frame. Three kinds are provided:
//!
//! - [`ValueTween`]: interpolates between two vectors and hands each sample
//!   to a callback.
//! - [`PathTween`]: tweens a scalar domain and feeds it through a parametric
//!   path before the callback.
//! - [`DynamicBinding`]: perpetually pulls a shared source value toward a
//!   shared target value.

use std::cell::Cell;
use std::f64::consts::PI;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::PathFn;
use crate::math::{Range, Vec2, Vector};

/// Identifies a running animation within its manager.
pub type AnimationId = Uuid;

/// Something advanced once per frame.
pub trait Animation {
    /// Advance by `dt` seconds. Returns false once finished; the manager then
    /// drops the animation.
    fn update(&mut self, dt: f64) -> bool;
}

// ── Manager ──────────────────────────────────────────────────────────

/// Owns the running animations, in start order.
#[derive(Default)]
pub struct AnimationManager {
    animations: Vec<(AnimationId, Box<dyn Animation>)>,
}

impl AnimationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, animation: Box<dyn Animation>) -> AnimationId {
        let id = Uuid::new_v4();
        self.animations.push((id, animation));
        id
    }

    /// Stop an animation without letting it finish. Returns false if it was
    /// not running.
    pub fn abort(&mut self, id: AnimationId) -> bool {
        let before = self.animations.len();
        self.animations.retain(|(running, _)| *running != id);
        self.animations.len() != before
    }

    /// Advance every animation by `dt` seconds and drop the finished ones.
    pub fn update(&mut self, dt: f64) {
        self.animations.retain_mut(|(_, animation)| animation.update(dt));
    }

    pub fn clear(&mut self) {
        self.animations.clear();
    }

    pub fn contains(&self, id: AnimationId) -> bool {
        self.animations.iter().any(|(running, _)| *running == id)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

impl fmt::Debug for AnimationManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationManager")
            .field("running", &self.animations.len())
            .finish()
    }
}

// ── Tween parameters ─────────────────────────────────────────────────

/// Shapes linear progress `p ∈ [0, 1]` before interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeFunction {
    Linear,
    EaseInEaseOut,
    EaseIn,
}

impl TimeFunction {
    pub fn apply(self, p: f64) -> f64 {
        match self {
            TimeFunction::Linear => p,
            TimeFunction::EaseInEaseOut => 0.5 * (1.0 - (PI * p).cos()),
            TimeFunction::EaseIn => 1.0 - (PI * p * 0.5).cos(),
        }
    }
}

impl Default for TimeFunction {
    fn default() -> Self {
        TimeFunction::EaseInEaseOut
    }
}

/// How progress behaves past the first iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatMode {
    /// Jump back to the start: progress wraps into `[0, 1)`.
    #[default]
    Loop,
    /// Run backwards on every odd iteration.
    PingPong,
}

impl RepeatMode {
    /// Map raw progress (elapsed / duration) into one iteration.
    pub fn wrap(self, t: f64) -> f64 {
        match self {
            RepeatMode::Loop => t.rem_euclid(1.0),
            RepeatMode::PingPong => {
                let m = t.rem_euclid(2.0);
                if m >= 1.0 {
                    2.0 - m
                } else {
                    m
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Iterations {
    Count(u32),
    Forever,
}

impl Default for Iterations {
    fn default() -> Self {
        Iterations::Count(1)
    }
}

// ── Value tween ──────────────────────────────────────────────────────

/// Interpolates from `start` to `end` over `duration` seconds.
pub struct ValueTween<const N: usize> {
    start: Vector<N>,
    end: Vector<N>,
    current: Vector<N>,
    duration: f64,
    time: f64,
    time_function: TimeFunction,
    iterations: Iterations,
    repeat_mode: RepeatMode,
    callback: Box<dyn FnMut(Vector<N>)>,
}

impl<const N: usize> ValueTween<N> {
    /// A single ease-in-ease-out pass.
    pub fn new(
        start: Vector<N>,
        end: Vector<N>,
        duration: f64,
        callback: impl FnMut(Vector<N>) + 'static,
    ) -> Self {
        Self {
            start,
            end,
            current: start,
            duration,
            time: 0.0,
            time_function: TimeFunction::default(),
            iterations: Iterations::default(),
            repeat_mode: RepeatMode::default(),
            callback: Box::new(callback),
        }
    }

    pub fn with_time_function(mut self, time_function: TimeFunction) -> Self {
        self.time_function = time_function;
        self
    }

    pub fn with_iterations(mut self, iterations: Iterations) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_repeat_mode(mut self, repeat_mode: RepeatMode) -> Self {
        self.repeat_mode = repeat_mode;
        self
    }

    /// The value delivered by the last update.
    pub fn current(&self) -> Vector<N> {
        self.current
    }

    pub fn elapsed(&self) -> f64 {
        self.time
    }

    fn finished(&self) -> bool {
        match self.iterations {
            Iterations::Forever => false,
            Iterations::Count(n) => self.time >= self.duration * f64::from(n),
        }
    }
}

impl<const N: usize> Animation for ValueTween<N> {
    fn update(&mut self, dt: f64) -> bool {
        self.time += dt;
        if self.finished() {
            return false;
        }
        let t = if self.duration > 0.0 {
            self.repeat_mode.wrap(self.time / self.duration)
        } else {
            1.0
        };
        let p = self.time_function.apply(t);
        self.current = Vector::lerp(self.start, self.end, p);
        (self.callback)(self.current);
        true
    }
}

// ── Path tween ───────────────────────────────────────────────────────

/// Tweens a scalar over `domain` and delivers `path(value)`.
pub struct PathTween {
    inner: ValueTween<1>,
}

impl PathTween {
    pub fn new(
        path: PathFn,
        domain: Range,
        duration: f64,
        mut callback: impl FnMut(Vec2) + 'static,
    ) -> Self {
        let inner = ValueTween::new(Vector([domain[0]]), Vector([domain[1]]), duration, move |v| {
            callback(path(v[0]))
        });
        Self { inner }
    }

    pub fn with_time_function(mut self, time_function: TimeFunction) -> Self {
        self.inner = self.inner.with_time_function(time_function);
        self
    }

    pub fn with_iterations(mut self, iterations: Iterations) -> Self {
        self.inner = self.inner.with_iterations(iterations);
        self
    }

    pub fn with_repeat_mode(mut self, repeat_mode: RepeatMode) -> Self {
        self.inner = self.inner.with_repeat_mode(repeat_mode);
        self
    }
}

impl Animation for PathTween {
    fn update(&mut self, dt: f64) -> bool {
        self.inner.update(dt)
    }
}

// ── Dynamic binding ──────────────────────────────────────────────────

/// A value shared between a binding and whoever reads or drives it.
pub type Shared<const N: usize> = Rc<Cell<Vector<N>>>;

/// Computes one step of a dynamic binding.
pub trait DynamicLaw<const N: usize>: fmt::Debug {
    /// Update `velocity` and return the new source value.
    fn step(
        &self,
        source: Vector<N>,
        target: Vector<N>,
        velocity: &mut Vector<N>,
        dt: f64,
    ) -> Vector<N>;
}

/// Inverse-power attraction toward the target with multiplicative friction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttractionFollow {
    pub strength: f64,
    pub r_power: f64,
    /// Below this distance the force is switched off.
    pub min_distance: f64,
    pub friction: f64,
}

impl Default for AttractionFollow {
    fn default() -> Self {
        Self {
            strength: 50.0,
            r_power: 1.0,
            min_distance: 50.0,
            friction: 0.99,
        }
    }
}

impl<const N: usize> DynamicLaw<N> for AttractionFollow {
    fn step(
        &self,
        source: Vector<N>,
        target: Vector<N>,
        velocity: &mut Vector<N>,
        dt: f64,
    ) -> Vector<N> {
        let dist = source.distance(&target);
        let direction = (target - source).normalize();
        let force = if dist < self.min_distance {
            0.0
        } else {
            self.strength / dist.powf(self.r_power)
        };
        if force > 0.0 && direction.is_finite() {
            *velocity += direction * (force * dt);
        }
        *velocity *= self.friction;
        source + *velocity * dt
    }
}

/// Drives `source` toward `target` every frame. Never finishes on its own.
pub struct DynamicBinding<const N: usize> {
    source: Shared<N>,
    target: Shared<N>,
    velocity: Vector<N>,
    law: Box<dyn DynamicLaw<N>>,
}

impl<const N: usize> DynamicBinding<N> {
    pub fn new(source: Shared<N>, target: Shared<N>, law: impl DynamicLaw<N> + 'static) -> Self {
        Self {
            source,
            target,
            velocity: Vector::ZERO,
            law: Box::new(law),
        }
    }

    pub fn velocity(&self) -> Vector<N> {
        self.velocity
    }
}

impl<const N: usize> Animation for DynamicBinding<N> {
    fn update(&mut self, dt: f64) -> bool {
        let next = self
            .law
            .step(self.source.get(), self.target.get(), &mut self.velocity, dt);
        self.source.set(next);
        true
    }
}
