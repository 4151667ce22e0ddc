//! Time-based tweens driven by a single render clock
//!
//! Each key owns at most one tween. Starting a new tween for a key that is still
//! moving begins from its current interpolated value, so a later reconciliation
//! supersedes an earlier one instead of racing it.

use crate::core::models::Point;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

/// Values that can be blended between two states
pub trait Interpolate: Copy {
    /// Blend from `self` to `other`, `t` in `[0, 1]`
    #[must_use]
    fn interpolate(self, other: Self, t: f64) -> Self;
}

impl Interpolate for Point {
    fn interpolate(self, other: Self, t: f64) -> Self {
        self.lerp(other, t)
    }
}

/// A straight connector between a parent and a child position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Segment {
    /// Parent end
    pub source: Point,
    /// Child end
    pub target: Point,
}

impl Segment {
    /// Segment collapsed to a single point
    #[must_use]
    pub const fn point(at: Point) -> Self {
        Self {
            source: at,
            target: at,
        }
    }
}

impl Interpolate for Segment {
    fn interpolate(self, other: Self, t: f64) -> Self {
        Self {
            source: self.source.lerp(other.source, t),
            target: self.target.lerp(other.target, t),
        }
    }
}

/// Cubic in-out easing
#[must_use]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        t.mul_add(t * t, 2.0) / 2.0
    }
}

/// A single value moving from `from` to `to` over `duration`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<V> {
    from: V,
    to: V,
    start: Duration,
    duration: Duration,
}

impl<V: Interpolate> Tween<V> {
    /// Create a tween starting at `start` on the render clock
    #[must_use]
    pub const fn new(from: V, to: V, start: Duration, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// Eased progress in `[0, 1]`
    #[must_use]
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start).as_secs_f64();
        ease_cubic_in_out(elapsed / self.duration.as_secs_f64())
    }

    /// Value at `now`
    #[must_use]
    pub fn value_at(&self, now: Duration) -> V {
        self.from.interpolate(self.to, self.progress(now))
    }

    /// Final value
    #[must_use]
    pub const fn target(&self) -> V {
        self.to
    }

    /// True once the end time has passed
    #[must_use]
    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.start + self.duration
    }
}

/// Active tweens, one per key
#[derive(Debug, Clone)]
pub struct Timeline<K, V> {
    tweens: HashMap<K, Tween<V>>,
}

impl<K, V> Default for Timeline<K, V> {
    fn default() -> Self {
        Self {
            tweens: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Copy, V: Interpolate> Timeline<K, V> {
    /// Create an empty timeline
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the tween for `key`.
    ///
    /// If `key` is still moving, the new tween begins where it currently is and
    /// `from` is ignored.
    pub fn start(&mut self, key: K, from: V, to: V, now: Duration, duration: Duration) {
        let origin = self
            .tweens
            .get(&key)
            .filter(|tween| !tween.is_finished(now))
            .map_or(from, |tween| tween.value_at(now));
        self.tweens.insert(key, Tween::new(origin, to, now, duration));
    }

    /// Current value for `key`, if it has a tween
    #[must_use]
    pub fn value(&self, key: &K, now: Duration) -> Option<V> {
        self.tweens.get(key).map(|tween| tween.value_at(now))
    }

    /// Tween registered for `key`
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&Tween<V>> {
        self.tweens.get(key)
    }

    /// Remove every finished tween, returning the keys that completed
    pub fn retire_finished(&mut self, now: Duration) -> Vec<K> {
        let done: Vec<K> = self
            .tweens
            .iter()
            .filter(|(_, tween)| tween.is_finished(now))
            .map(|(key, _)| *key)
            .collect();
        for key in &done {
            self.tweens.remove(key);
        }
        done
    }

    /// True while any tween is still moving
    #[must_use]
    pub fn is_animating(&self, now: Duration) -> bool {
        self.tweens.values().any(|tween| !tween.is_finished(now))
    }

    /// Number of registered tweens
    #[must_use]
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// True when no tween is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Forget every tween
    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert_eq!(ease_cubic_in_out(3.0), 1.0);
    }

    #[test]
    fn tween_reaches_target_after_duration() {
        let tween = Tween::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0), ms(100), ms(500));
        assert_eq!(tween.value_at(ms(0)), Point::new(0.0, 0.0));
        assert_eq!(tween.value_at(ms(350)), Point::new(5.0, 5.0));
        assert_eq!(tween.value_at(ms(600)), Point::new(10.0, 10.0));
        assert!(!tween.is_finished(ms(599)));
        assert!(tween.is_finished(ms(600)));
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let tween = Tween::new(Point::default(), Point::new(1.0, 1.0), ms(0), Duration::ZERO);
        assert_eq!(tween.value_at(ms(0)), Point::new(1.0, 1.0));
    }

    #[test]
    fn restarting_a_moving_key_starts_from_its_current_value() {
        let mut timeline = Timeline::new();
        timeline.start(1u32, Point::new(0.0, 0.0), Point::new(0.0, 100.0), ms(0), ms(1000));
        let midway = timeline.value(&1, ms(500)).unwrap();
        assert_eq!(midway, Point::new(0.0, 50.0));

        timeline.start(1, Point::new(0.0, 999.0), Point::new(0.0, 0.0), ms(500), ms(1000));
        assert_eq!(timeline.value(&1, ms(500)).unwrap(), midway);
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn finished_tweens_retire() {
        let mut timeline = Timeline::new();
        timeline.start(1u32, Point::default(), Point::new(1.0, 0.0), ms(0), ms(100));
        timeline.start(2u32, Point::default(), Point::new(1.0, 0.0), ms(0), ms(300));
        assert!(timeline.is_animating(ms(200)));
        assert_eq!(timeline.retire_finished(ms(200)), vec![1]);
        assert_eq!(timeline.len(), 1);
        assert!(!timeline.is_animating(ms(300)));
    }

    #[test]
    fn segments_interpolate_both_ends() {
        let from = Segment::point(Point::new(0.0, 0.0));
        let to = Segment {
            source: Point::new(0.0, 0.0),
            target: Point::new(10.0, 20.0),
        };
        let mid = from.interpolate(to, 0.5);
        assert_eq!(mid.target, Point::new(5.0, 10.0));
        assert_eq!(mid.source, Point::new(0.0, 0.0));
    }
}
