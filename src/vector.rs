//! 2D vector/point value type used for element positions.
//!
//! Instance methods mutate the receiver and return it so calls chain
//! (`v.add(a).scale(2.0)`). The associated "static" forms (`sum`, `scaled`,
//! `rotated`, ...) take their vector argument by value and work on that copy,
//! so the caller's vector is never touched.
//!
//! Zero-length vectors are not special-cased: `normalize` and `set_mag` on
//! `(0, 0)` leave non-finite components behind. Use
//! [`Vector2d::try_normalize`] / [`Vector2d::try_set_mag`] when an error is
//! preferable.

use std::fmt;
use std::ops::{AddAssign, Mul, MulAssign, Neg, SubAssign};

use serde::{Deserialize, Serialize, Serializer};

use crate::{Error, Result};

/// A 2D vector with `f64` components
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2d {
    #[serde(serialize_with = "serialize_component")]
    pub x: f64,
    #[serde(serialize_with = "serialize_component")]
    pub y: f64,
}

// Integral values inside the i64 range are written as JSON integers (`0`,
// not `0.0`), the same text `JSON.stringify` produces for them. Larger
// integral values keep serde_json's float form.
fn serialize_component<S: Serializer>(v: &f64, s: S) -> std::result::Result<S::Ok, S::Error> {
    // 2^63; every integral f64 strictly below it in magnitude fits an i64.
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < I64_BOUND {
        s.serialize_i64(*v as i64)
    } else {
        s.serialize_f64(*v)
    }
}

impl Vector2d {
    pub const ZERO: Vector2d = Vector2d { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Add `v` to this vector in place
    #[allow(clippy::should_implement_trait)]
    pub fn add(&mut self, v: Vector2d) -> &mut Self {
        self.x += v.x;
        self.y += v.y;
        self
    }

    /// Subtract `v` from this vector in place
    #[allow(clippy::should_implement_trait)]
    pub fn sub(&mut self, v: Vector2d) -> &mut Self {
        self.x -= v.x;
        self.y -= v.y;
        self
    }

    pub fn dot(&self, v: Vector2d) -> f64 {
        self.x * v.x + self.y * v.y
    }

    /// Multiply both components by `n` in place
    pub fn scale(&mut self, n: f64) -> &mut Self {
        self.x *= n;
        self.y *= n;
        self
    }

    /// Euclidean length
    pub fn mag(&self) -> f64 {
        self.mag_sq().sqrt()
    }

    /// Squared length; prefer this for comparisons.
    pub fn mag_sq(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Scale to unit length in place. A zero vector becomes `(NaN, NaN)`.
    pub fn normalize(&mut self) -> &mut Self {
        let m = self.mag();
        self.scale(1.0 / m)
    }

    /// Normalize, then scale to length `n`.
    pub fn set_mag(&mut self, n: f64) -> &mut Self {
        self.normalize().scale(n)
    }

    /// Like [`normalize`](Self::normalize) but refuses zero or non-finite input.
    pub fn try_normalize(&mut self) -> Result<&mut Self> {
        let m = self.mag();
        if m == 0.0 || !m.is_finite() {
            return Err(Error::DegenerateVector(format!("cannot normalize {} (magnitude {})", self, m)));
        }
        Ok(self.scale(1.0 / m))
    }

    /// Like [`set_mag`](Self::set_mag) but refuses zero or non-finite input.
    pub fn try_set_mag(&mut self, n: f64) -> Result<&mut Self> {
        Ok(self.try_normalize()?.scale(n))
    }

    pub fn copy(&self) -> Vector2d {
        *self
    }

    /// Heading in radians, `atan2(y, x)`
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Rotate by `angle` radians in place, keeping the magnitude.
    ///
    /// Goes through polar form, so a zero vector stays `(0, 0)` rather than
    /// turning non-finite like `normalize` does.
    pub fn rotate(&mut self, angle: f64) -> &mut Self {
        let m = self.mag();
        let heading = self.angle() + angle;
        *self = Vector2d::from_angle(heading);
        self.scale(m)
    }

    /// True when both components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Unit vector pointing at `angle` radians
    pub fn from_angle(angle: f64) -> Vector2d {
        Vector2d::new(angle.cos(), angle.sin())
    }

    /// Vector with heading `o` and length `r`
    pub fn from_polar(o: f64, r: f64) -> Vector2d {
        let mut v = Vector2d::from_angle(o);
        v.scale(r);
        v
    }

    /// Unit vector at a uniformly random angle in `[0, 2π)`
    #[cfg(feature = "random")]
    pub fn random() -> Vector2d {
        use rand::Rng;
        Vector2d::from_angle(rand::thread_rng().gen_range(0.0..std::f64::consts::TAU))
    }

    pub fn sum(mut v1: Vector2d, v2: Vector2d) -> Vector2d {
        v1.add(v2);
        v1
    }

    pub fn difference(mut v1: Vector2d, v2: Vector2d) -> Vector2d {
        v1.sub(v2);
        v1
    }

    pub fn scaled(mut v: Vector2d, n: f64) -> Vector2d {
        v.scale(n);
        v
    }

    pub fn normalized(mut v: Vector2d) -> Vector2d {
        v.normalize();
        v
    }

    pub fn with_mag(mut v: Vector2d, n: f64) -> Vector2d {
        v.set_mag(n);
        v
    }

    pub fn rotated(mut v: Vector2d, angle: f64) -> Vector2d {
        v.rotate(angle);
        v
    }
}

impl fmt::Display for Vector2d {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Vector2d {
    fn from((x, y): (f64, f64)) -> Self {
        Vector2d::new(x, y)
    }
}

impl Mul<f64> for Vector2d {
    type Output = Vector2d;
    fn mul(self, rhs: f64) -> Vector2d {
        Vector2d::scaled(self, rhs)
    }
}

impl Neg for Vector2d {
    type Output = Vector2d;
    fn neg(self) -> Vector2d {
        Vector2d::new(-self.x, -self.y)
    }
}

impl AddAssign for Vector2d {
    fn add_assign(&mut self, rhs: Vector2d) {
        Vector2d::add(self, rhs);
    }
}

impl SubAssign for Vector2d {
    fn sub_assign(&mut self, rhs: Vector2d) {
        Vector2d::sub(self, rhs);
    }
}

impl MulAssign<f64> for Vector2d {
    fn mul_assign(&mut self, rhs: f64) {
        self.scale(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-9;

    fn approx(a: Vector2d, b: Vector2d) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn instance_ops_mutate_and_chain() {
        let mut v = Vector2d::new(1.0, 2.0);
        v.add(Vector2d::new(2.0, 3.0)).scale(2.0);
        assert_eq!(v, Vector2d::new(6.0, 10.0));
        v.sub(Vector2d::new(6.0, 0.0));
        assert_eq!(v, Vector2d::new(0.0, 10.0));
    }

    #[test]
    fn static_forms_leave_arguments_alone() {
        let a = Vector2d::new(3.0, 4.0);
        let b = Vector2d::new(1.0, 1.0);
        assert_eq!(Vector2d::sum(a, b), Vector2d::new(4.0, 5.0));
        assert_eq!(Vector2d::difference(a, b), Vector2d::new(2.0, 3.0));
        assert_eq!(Vector2d::scaled(a, 2.0), Vector2d::new(6.0, 8.0));
        assert!(approx(Vector2d::normalized(a), Vector2d::new(0.6, 0.8)));
        assert!(approx(Vector2d::with_mag(a, 10.0), Vector2d::new(6.0, 8.0)));
        assert_eq!(a, Vector2d::new(3.0, 4.0));
        assert_eq!(b, Vector2d::new(1.0, 1.0));
    }

    #[test]
    fn magnitude_and_dot() {
        let v = Vector2d::new(3.0, 4.0);
        assert_eq!(v.mag(), 5.0);
        assert_eq!(v.mag_sq(), 25.0);
        assert_eq!(v.dot(Vector2d::new(2.0, -1.0)), 2.0);
    }

    #[test]
    fn zero_vector_normalize_is_non_finite() {
        let mut v = Vector2d::ZERO;
        v.normalize();
        assert!(!v.is_finite());

        let mut w = Vector2d::ZERO;
        w.set_mag(3.0);
        assert!(w.x.is_nan() && w.y.is_nan());
    }

    #[test]
    fn try_normalize_reports_degenerate_vector() {
        let mut v = Vector2d::ZERO;
        assert!(matches!(v.try_normalize(), Err(Error::DegenerateVector(_))));
        assert_eq!(v, Vector2d::ZERO);

        let mut w = Vector2d::new(0.0, 2.0);
        w.try_set_mag(5.0).unwrap();
        assert!(approx(w, Vector2d::new(0.0, 5.0)));
    }

    #[test]
    fn angle_and_from_angle() {
        assert_eq!(Vector2d::from_angle(0.0), Vector2d::new(1.0, 0.0));
        assert!(approx(Vector2d::from_angle(PI / 2.0), Vector2d::new(0.0, 1.0)));
        assert!((Vector2d::new(-1.0, 0.0).angle() - PI).abs() < EPS);
        assert!((Vector2d::new(0.0, -1.0).angle() + PI / 2.0).abs() < EPS);
    }

    #[test]
    fn rotate_keeps_magnitude() {
        let mut v = Vector2d::new(2.0, 0.0);
        v.rotate(PI / 2.0);
        assert!(approx(v, Vector2d::new(0.0, 2.0)));

        let r = Vector2d::rotated(Vector2d::new(1.0, 1.0), PI);
        assert!(approx(r, Vector2d::new(-1.0, -1.0)));
    }

    #[test]
    fn rotate_zero_vector_stays_zero() {
        let mut v = Vector2d::ZERO;
        v.rotate(1.0);
        assert_eq!(v, Vector2d::ZERO);
        assert_eq!(Vector2d::rotated(Vector2d::ZERO, -2.5), Vector2d::ZERO);
    }

    #[test]
    fn from_polar_scales_unit_vector() {
        let v = Vector2d::from_polar(PI, 3.0);
        assert!(approx(v, Vector2d::new(-3.0, 0.0)));
    }

    #[cfg(feature = "random")]
    #[test]
    fn random_is_unit_length() {
        for _ in 0..32 {
            assert!((Vector2d::random().mag_sq() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn operators_match_static_forms() {
        let a = Vector2d::new(1.0, 2.0);
        let b = Vector2d::new(0.5, -1.0);
        assert_eq!(a * 3.0, Vector2d::scaled(a, 3.0));
        assert_eq!(-a, Vector2d::new(-1.0, -2.0));

        let mut c = a;
        c += b;
        c -= a;
        c *= 2.0;
        assert_eq!(c, Vector2d::new(1.0, -2.0));
    }

    #[test]
    fn serializes_integral_components_as_integers() {
        let json = serde_json::to_string(&Vector2d::new(0.0, -3.0)).unwrap();
        assert_eq!(json, r#"{"x":0,"y":-3}"#);
        let json = serde_json::to_string(&Vector2d::new(0.5, 1e300)).unwrap();
        assert_eq!(json, r#"{"x":0.5,"y":1e300}"#);
    }

    #[test]
    fn integers_past_safe_range_stay_integral() {
        let json = serde_json::to_string(&Vector2d::new(9_007_199_254_740_992.0, -4e18)).unwrap();
        assert_eq!(json, r#"{"x":9007199254740992,"y":-4000000000000000000}"#);
    }

    #[test]
    fn non_finite_components_serialize_as_null() {
        let json = serde_json::to_string(&Vector2d::new(f64::NAN, f64::INFINITY)).unwrap();
        assert_eq!(json, r#"{"x":null,"y":null}"#);
    }

    #[test]
    fn deserializes_integers_and_floats() {
        let v: Vector2d = serde_json::from_str(r#"{"x":1,"y":2.5}"#).unwrap();
        assert_eq!(v, Vector2d::new(1.0, 2.5));
    }
}
