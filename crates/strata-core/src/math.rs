//! Fixed-size vectors and the scalar helpers used throughout the scene kernel.
//!
//! Vectors are sized at compile time (`Vec2` for coordinates, `Vec4` for HSLA
//! channels, `Vector<1>` for scalar tweens). Where a variable-length slice has
//! to become a vector, the conversion is explicit and goes through a
//! [`FillPolicy`].

use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use rand::Rng;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A closed interval `[a, b]`. The bounds may be given in either order.
pub type Range = [f64; 2];

/// A vector of `N` `f64` components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<const N: usize>(pub [f64; N]);

/// A 2D coordinate or extent.
pub type Vec2 = Vector<2>;
/// A four-channel value (HSLA colors, modulation factors).
pub type Vec4 = Vector<4>;

/// How a short slice is padded when it is broadcast to a longer vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillPolicy {
    /// Pad with a constant value.
    Constant(f64),
    /// Pad with the last element of the slice.
    RepeatLast,
    /// Pad by cycling through the slice from its start.
    Cycle,
}

impl Default for FillPolicy {
    fn default() -> Self {
        Self::RepeatLast
    }
}

/// Broadcast `values` to exactly `len` elements.
///
/// Longer slices are truncated. An empty slice pads with the constant for
/// [`FillPolicy::Constant`] and with zero otherwise.
pub fn broadcast(values: &[f64], len: usize, fill: FillPolicy) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().take(len).collect();
    let source = out.len();
    let mut j = 0;
    while out.len() < len {
        let next = match fill {
            FillPolicy::Constant(c) => c,
            FillPolicy::RepeatLast => values.last().copied().unwrap_or(0.0),
            FillPolicy::Cycle if source == 0 => 0.0,
            FillPolicy::Cycle => values[j % source],
        };
        out.push(next);
        j += 1;
    }
    out
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self([0.0; N])
    }
}

impl Vector<2> {
    pub const fn new(x: f64, y: f64) -> Self {
        Self([x, y])
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }
}

impl Vector<4> {
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self([a, b, c, d])
    }
}

impl<const N: usize> Vector<N> {
    pub const ZERO: Self = Self([0.0; N]);

    /// A vector with every component set to `value`.
    pub const fn splat(value: f64) -> Self {
        Self([value; N])
    }

    /// Build a vector from a slice of any length, padding or truncating per `fill`.
    pub fn from_slice(values: &[f64], fill: FillPolicy) -> Self {
        let mut out = [0.0; N];
        out.copy_from_slice(&broadcast(values, N, fill));
        Self(out)
    }

    /// Build a vector from a slice that must already have exactly `N` elements.
    pub fn try_from_slice(values: &[f64]) -> Result<Self, CoreError> {
        if values.len() != N {
            return Err(CoreError::Arity {
                expected: N,
                found: values.len(),
            });
        }
        let mut out = [0.0; N];
        out.copy_from_slice(values);
        Ok(Self(out))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.map(f))
    }

    pub fn zip_map(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let mut out = self.0;
        for (a, b) in out.iter_mut().zip(other.0) {
            *a = f(*a, b);
        }
        Self(out)
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance(&self, other: &Self) -> f64 {
        (*other - *self).magnitude()
    }

    /// Unit vector in the same direction.
    ///
    /// A zero-length vector has no direction; the result is then all NaN so
    /// callers can test with [`Vector::is_finite`] instead of handling an error.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            Self::splat(f64::NAN)
        } else {
            *self / mag
        }
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Per-component interpolation: component `i` moves from `start[i]` to
    /// `end[i]` by `factor[i]`.
    pub fn interpolate(start: Self, end: Self, factor: Self) -> Self {
        let mut out = [0.0; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = start.0[i] * (1.0 - factor.0[i]) + end.0[i] * factor.0[i];
        }
        Self(out)
    }

    /// Interpolation with the same factor on every component.
    pub fn lerp(start: Self, end: Self, t: f64) -> Self {
        Self::interpolate(start, end, Self::splat(t))
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl<const N: usize> IndexMut<usize> for Vector<N> {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl<const N: usize> Add for Vector<N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip_map(rhs, |a, b| a + b)
    }
}

impl<const N: usize> AddAssign for Vector<N> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const N: usize> Sub for Vector<N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip_map(rhs, |a, b| a - b)
    }
}

impl<const N: usize> SubAssign for Vector<N> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Component-wise product.
impl<const N: usize> Mul for Vector<N> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.zip_map(rhs, |a, b| a * b)
    }
}

impl<const N: usize> Mul<f64> for Vector<N> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.map(|a| a * rhs)
    }
}

impl<const N: usize> MulAssign<f64> for Vector<N> {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

/// Component-wise quotient.
impl<const N: usize> Div for Vector<N> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self.zip_map(rhs, |a, b| a / b)
    }
}

impl<const N: usize> Div<f64> for Vector<N> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        self.map(|a| a / rhs)
    }
}

impl<const N: usize> Neg for Vector<N> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|a| -a)
    }
}

// Vectors travel as plain JSON arrays: `[x, y]`, `[h, s, l, a]`.
impl<const N: usize> Serialize for Vector<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(N)?;
        for value in &self.0 {
            tuple.serialize_element(value)?;
        }
        tuple.end()
    }
}

impl<'de, const N: usize> Deserialize<'de> for Vector<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VectorVisitor<const M: usize>;

        impl<'de, const M: usize> Visitor<'de> for VectorVisitor<M> {
            type Value = Vector<M>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "an array of {M} numbers")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut out = [0.0; M];
                for (i, slot) in out.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                }
                if seq.next_element::<f64>()?.is_some() {
                    return Err(de::Error::invalid_length(M + 1, &self));
                }
                Ok(Vector(out))
            }
        }

        deserializer.deserialize_tuple(N, VectorVisitor::<N>)
    }
}

// ── Scalar helpers ───────────────────────────────────────────────────

/// Whether `v` lies in the range, whichever way round its bounds are.
pub fn in_range(v: f64, range: Range) -> bool {
    (v >= range[0] && v <= range[1]) || (v >= range[1] && v <= range[0])
}

/// Round `v` to the nearest multiple of `interval`, shifted by `offset`.
pub fn snap_to(v: f64, interval: f64, offset: f64) -> f64 {
    ((v - offset) / interval).round() * interval + offset
}

pub fn clamp(v: f64, range: Range) -> f64 {
    v.max(range[0]).min(range[1])
}

/// `steps` evenly spaced values starting at `range[0]`.
///
/// With `include_end` the last value lands on `range[1]`; without it the
/// spacing is `(b - a) / steps`, which suits closed loops such as circles.
pub fn linear_partition(range: Range, steps: usize, include_end: bool) -> Vec<f64> {
    if steps == 0 {
        return Vec::new();
    }
    if steps == 1 {
        return vec![range[0]];
    }
    let divisions = if include_end { steps - 1 } else { steps };
    let delta = (range[1] - range[0]) / divisions as f64;
    (0..steps).map(|i| range[0] + i as f64 * delta).collect()
}

pub fn ratio_in_interval(range: Range, ratio: f64) -> f64 {
    range[0] + (range[1] - range[0]) * ratio
}

/// A uniformly distributed value in the range. A zero-width range returns its bound.
pub fn uniform_float(range: Range) -> f64 {
    if range[0] == range[1] {
        return range[0];
    }
    rand::thread_rng().gen::<f64>() * (range[1] - range[0]) + range[0]
}

pub fn uniform_int(range: Range) -> i64 {
    uniform_float(range).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to(53.0, 50.0, 0.0), 50.0);
        assert_eq!(snap_to(77.0, 50.0, 0.0), 100.0);
        assert_eq!(snap_to(-26.0, 50.0, 0.0), -50.0);
        assert_eq!(snap_to(14.0, 10.0, 3.0), 13.0);
    }

    #[test]
    fn test_in_range_either_order() {
        assert!(in_range(5.0, [0.0, 10.0]));
        assert!(in_range(5.0, [10.0, 0.0]));
        assert!(!in_range(11.0, [10.0, 0.0]));
    }

    #[test]
    fn test_linear_partition() {
        let closed = linear_partition([0.0, 1.0], 5, true);
        assert_eq!(closed.len(), 5);
        assert!((closed[4] - 1.0).abs() < EPS);
        let open = linear_partition([0.0, 1.0], 4, false);
        assert_eq!(open, vec![0.0, 0.25, 0.5, 0.75]);
        assert!(linear_partition([0.0, 1.0], 0, true).is_empty());
        assert_eq!(linear_partition([2.0, 3.0], 1, true), vec![2.0]);
    }

    #[test]
    fn test_broadcast_policies() {
        assert_eq!(broadcast(&[1.0, 2.0], 4, FillPolicy::Constant(9.0)), vec![1.0, 2.0, 9.0, 9.0]);
        assert_eq!(broadcast(&[1.0, 2.0], 4, FillPolicy::RepeatLast), vec![1.0, 2.0, 2.0, 2.0]);
        assert_eq!(broadcast(&[1.0, 2.0], 5, FillPolicy::Cycle), vec![1.0, 2.0, 1.0, 2.0, 1.0]);
        assert_eq!(broadcast(&[1.0, 2.0, 3.0], 2, FillPolicy::Cycle), vec![1.0, 2.0]);
        assert_eq!(broadcast(&[], 2, FillPolicy::Cycle), vec![0.0, 0.0]);
    }

    #[test]
    fn test_from_slice_scalar_broadcast() {
        let v = Vec4::from_slice(&[0.5], FillPolicy::RepeatLast);
        assert_eq!(v, Vec4::splat(0.5));
        assert!(Vec2::try_from_slice(&[1.0]).is_err());
        assert_eq!(Vec2::try_from_slice(&[1.0, 2.0]).unwrap(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_vector_arithmetic() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, 2.0);
        assert_eq!(a + b, Vec2::new(4.0, 6.0));
        assert_eq!(a - b, Vec2::new(2.0, 2.0));
        assert_eq!(a * b, Vec2::new(3.0, 8.0));
        assert_eq!(a / b, Vec2::new(3.0, 2.0));
        assert_eq!(a * 2.0, Vec2::new(6.0, 8.0));
        assert!((a.magnitude() - 5.0).abs() < EPS);
        assert!((a.distance(&b) - 8.0_f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_normalize_zero_is_nan() {
        let n = Vec2::ZERO.normalize();
        assert!(n.x().is_nan() && n.y().is_nan());
        assert!(!n.is_finite());
        let unit = Vec2::new(0.0, 5.0).normalize();
        assert_eq!(unit, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_interpolate_per_channel() {
        let start = Vec4::new(0.0, 0.0, 0.0, 0.0);
        let end = Vec4::new(10.0, 10.0, 10.0, 10.0);
        let f = Vec4::new(0.0, 0.5, 1.0, 0.25);
        assert_eq!(Vec4::interpolate(start, end, f), Vec4::new(0.0, 5.0, 10.0, 2.5));
    }

    #[test]
    fn test_vector_json_is_plain_array() {
        let json = serde_json::to_string(&Vec2::new(1.5, -2.0)).unwrap();
        assert_eq!(json, "[1.5,-2.0]");
        let back: Vec2 = serde_json::from_str("[3, 4]").unwrap();
        assert_eq!(back, Vec2::new(3.0, 4.0));
        assert!(serde_json::from_str::<Vec2>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<Vec2>("[1]").is_err());
    }

    #[test]
    fn test_uniform_float_stays_in_range() {
        for _ in 0..100 {
            let v = uniform_float([2.0, 3.0]);
            assert!(in_range(v, [2.0, 3.0]));
        }
        assert_eq!(uniform_float([4.0, 4.0]), 4.0);
    }
}
