//! Half-angle trigonometry on bond-pair cosines.
//!
//! Every helper takes `cs = cos(a)` for an angle `a` in `[0, π]` between two bonds
//! sharing an atom and returns a trigonometric function of `a / 2`. Working from the
//! cosine avoids an `acos` round trip in the offset computations, where the cosine is
//! already known from a dot product of unit bond directions.

/// Cosines may overshoot `[-1, 1]` by this much through rounding and are clamped.
const COSINE_TOLERANCE: f32 = 1e-4;

#[inline]
fn checked_cosine(cs: f32) -> f32 {
    assert!(
        cs >= -1.0 - COSINE_TOLERANCE && cs <= 1.0 + COSINE_TOLERANCE,
        "cosine {cs} is outside [-1, 1]"
    );
    cs.clamp(-1.0, 1.0)
}

/// `cos(a)` to `cos(a/2)`.
///
/// # Panics
///
/// Panics if `cs` lies outside `[-1, 1]` by more than rounding noise.
#[inline]
pub fn cos2c(cs: f32) -> f32 {
    let cs = checked_cosine(cs);
    ((1.0 + cs) / 2.0).sqrt()
}

/// `cos(a)` to `sin(a/2)`.
///
/// # Panics
///
/// Panics if `cs` lies outside `[-1, 1]` by more than rounding noise.
#[inline]
pub fn sin2c(cs: f32) -> f32 {
    let cs = checked_cosine(cs);
    ((1.0 - cs) / 2.0).sqrt()
}

/// `cos(a)` to `tan(a/2)`.
///
/// Returns `None` for antiparallel bonds (`cs == -1`), where the half angle is a right
/// angle and the tangent is undefined.
///
/// # Panics
///
/// Panics if `cs` lies outside `[-1, 1]` by more than rounding noise.
#[inline]
pub fn tg2c(cs: f32) -> Option<f32> {
    let cs = checked_cosine(cs);
    if 1.0 + cs == 0.0 {
        return None;
    }
    Some(((1.0 - cs) / (1.0 + cs)).sqrt())
}

/// `cos(a)` to `cot(a/2)`.
///
/// Returns `None` for collinear bonds (`cs == 1`), where the half angle is zero.
///
/// # Panics
///
/// Panics if `cs` lies outside `[-1, 1]` by more than rounding noise.
#[inline]
pub fn ctg2c(cs: f32) -> Option<f32> {
    let cs = checked_cosine(cs);
    if 1.0 - cs == 0.0 {
        return None;
    }
    Some(((1.0 + cs) / (1.0 - cs)).sqrt())
}
