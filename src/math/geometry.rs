use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

/// Axes shorter than this have no usable direction.
pub const AXIS_TOLERANCE: f64 = 1e-12;

/// Sine of the smallest angle at which an up vector still pins down a look
/// rotation.
const PARALLEL_TOLERANCE: f64 = 1e-6;

pub fn reject(u: &Vector3<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    // Computes the vector rejection of u from v. v must be non-zero.
    let u_proj_v = u.dot(v) * v / v.norm_squared();
    u - u_proj_v
}

/// Wraps an angle in degrees into `[0, 360)`. Negative angles wrap around
/// instead of being clamped.
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Rotation by `degrees` about `axis`, which does not need to be normalized.
///
/// Angles follow the host engine's sense of rotation: a positive angle about
/// +Y carries +X towards +Z. A zero-length axis gives the identity.
pub fn axis_rotation(axis: &Vector3<f64>, degrees: f64) -> UnitQuaternion<f64> {
    match Unit::try_new(*axis, AXIS_TOLERANCE) {
        Some(axis) => UnitQuaternion::from_axis_angle(&axis, -degrees.to_radians()),
        None => UnitQuaternion::identity(),
    }
}

/// Arithmetic mean of a set of points, or None if there are no points.
pub fn centroid<I>(points: I) -> Option<Point3<f64>>
where
    I: IntoIterator<Item = Point3<f64>>,
{
    let (sum, count) = points
        .into_iter()
        .fold((Vector3::zeros(), 0usize), |(sum, count), pt| {
            (sum + pt.coords, count + 1)
        });

    if count == 0 {
        None
    } else {
        Some(Point3::from(sum / count as f64))
    }
}

/// Returns the orientation that points +Z along `direction`, keeping +Y as
/// close as possible to an up vector.
///
/// The up vector is the first entry of `ups` that is neither too short nor
/// parallel to `direction`. This lets the caller list a preferred up vector
/// followed by fallbacks. Returns None if `direction` is too short to have a
/// heading, or if none of the candidates are usable.
pub fn look_rotation(
    direction: &Vector3<f64>,
    ups: &[Vector3<f64>],
) -> Option<UnitQuaternion<f64>> {
    if direction.norm() < AXIS_TOLERANCE {
        return None;
    }

    let up = ups.iter().find(|up| {
        let length = up.norm();
        length >= AXIS_TOLERANCE && reject(up, direction).norm() >= PARALLEL_TOLERANCE * length
    })?;

    Some(UnitQuaternion::face_towards(direction, up))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_reject() {
        assert_relative_eq!(
            reject(&Vector3::new(4.0, 5.0, 7.0), &Vector3::new(1.0, 2.0, 3.0)),
            Vector3::new(1.5, 0.0, -0.5),
        );

        assert_relative_eq!(
            reject(
                &Vector3::new(5.0, 8.0, -2.0),
                &Vector3::new(1.0, -2.0, -1.0)
            ),
            Vector3::new(6.5, 5.0, -3.5),
        );

        assert_relative_eq!(
            reject(&Vector3::new(0.0, 0.0, 0.0), &Vector3::new(1.0, 2.0, 3.0)),
            Vector3::new(0.0, 0.0, 0.0),
        );
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_relative_eq!(wrap_degrees(370.0), 10.0);
        assert_relative_eq!(wrap_degrees(-10.0), 350.0);
        assert_relative_eq!(wrap_degrees(-730.0), 350.0);
        assert_relative_eq!(wrap_degrees(1.0e6), 1.0e6 % 360.0);

        // Would come out as exactly 360 without the guard
        let tiny = wrap_degrees(-1.0e-20);
        assert!((0.0..360.0).contains(&tiny), "got {}", tiny);
    }

    #[test]
    fn test_axis_rotation_sense() {
        // +X goes towards +Z when turning about +Y
        let r = axis_rotation(&Vector3::y(), 90.0);
        assert_abs_diff_eq!(r * Vector3::x(), Vector3::z(), epsilon = 1e-12);

        // The axis doesn't need to be normalized
        let r = axis_rotation(&Vector3::new(0.0, 5.0, 0.0), 90.0);
        assert_abs_diff_eq!(r * Vector3::x(), Vector3::z(), epsilon = 1e-12);

        // Negative angles go the other way
        let r = axis_rotation(&Vector3::y(), -90.0);
        assert_abs_diff_eq!(r * Vector3::x(), -Vector3::z(), epsilon = 1e-12);

        // No axis, no rotation
        let r = axis_rotation(&Vector3::zeros(), 45.0);
        assert_eq!(r, UnitQuaternion::identity());
    }

    #[test]
    fn test_centroid() {
        assert_eq!(centroid(Vec::new()), None);
        assert_relative_eq!(
            centroid(vec![Point3::new(1.0, 2.0, 3.0)]).unwrap(),
            Point3::new(1.0, 2.0, 3.0)
        );
        assert_relative_eq!(
            centroid(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(2.0, 6.0, -3.0),
            ])
            .unwrap(),
            Point3::new(4.0, 2.0, -1.0)
        );
    }

    #[test]
    fn test_look_rotation() {
        let up = Vector3::y();

        // Normal case: forward is the direction, up stays up
        let dir = Vector3::new(1.0, 0.0, 1.0);
        let r = look_rotation(&dir, &[up]).unwrap();
        assert_relative_eq!(r * Vector3::z(), dir.normalize(), epsilon = 1e-12);
        assert_relative_eq!(r * Vector3::y(), up, epsilon = 1e-12);

        // Looking straight down skips world-up and uses the fallback
        let dir = Vector3::new(0.0, -3.0, 0.0);
        let fallback = Vector3::z();
        let r = look_rotation(&dir, &[up, fallback]).unwrap();
        assert_relative_eq!(r * Vector3::z(), -Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(r * Vector3::y(), fallback, epsilon = 1e-12);

        // Nothing usable
        assert_eq!(look_rotation(&dir, &[up, -up]), None);
        assert_eq!(look_rotation(&Vector3::zeros(), &[up]), None);
    }
}
