use std::collections::HashMap;

use nalgebra::Vector3;

use super::error::MotionError;

/// How a single body moves. Rates are in degrees per second of simulated time.
///
/// Axes don't need to be normalized; they get normalized at the point of use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParameters {
    pub orbit_rate: f64,
    pub orbit_axis: Vector3<f64>,
    pub spin_rate: f64,
    pub spin_axis: Vector3<f64>,
    pub orbit_radius: f64,
    pub display_scale: f64,
}

/// Immutable lookup from body name to motion parameters.
///
/// Names match exactly, case included.
#[derive(Debug, Clone)]
pub struct MotionTable {
    entries: HashMap<String, MotionParameters>,
}

impl MotionTable {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, MotionParameters)>,
        S: Into<String>,
    {
        MotionTable {
            entries: entries
                .into_iter()
                .map(|(name, params)| (name.into(), params))
                .collect(),
        }
    }

    /// The table for the default solar system.
    pub fn builtin() -> Self {
        let y = Vector3::y();
        #[rustfmt::skip]
        let entries = [
            // name, orbit rate, orbit axis, spin rate, spin axis, radius, scale
            ("Sun",          0.0,    y,                          0.8,  y,                           0.0,  0.6),
            ("Mercury",      4.51,   Vector3::new(0.0, 1.0, 0.12), 0.5,  y,                           1.4,  0.016),
            ("Venus",        1.89,   Vector3::new(0.0, 1.0, 0.06), -0.3, y,                           2.5,  0.04),
            ("Earth",        1.14,   y,                          4.17, y,                           3.5,  0.045),
            ("Mars",         0.668,  Vector3::new(0.0, 1.0, 0.03), 4.05, Vector3::new(0.0, 1.0, 0.44),  5.0,  0.024),
            ("AsteroidBelt", 0.0,    y,                          0.35, y,                           0.0,  7.0),
            ("Jupiter",      0.276,  y,                          10.0, Vector3::new(0.0, 1.0, 0.05),  9.0,  0.3),
            ("Saturn",       0.159,  Vector3::new(0.0, 1.0, 0.04), 9.3,  Vector3::new(0.0, 1.0, 0.47),  13.0, 0.25),
            ("Uranus",       0.106,  y,                          -5.8, Vector3::new(0.0, 0.13, 1.0),  17.0, 0.12),
            ("Neptune",      0.0776, y,                          6.2,  Vector3::new(0.0, 1.0, 0.5),   21.0, 0.11),
        ];

        Self::from_entries(entries.iter().map(
            |&(name, orbit_rate, orbit_axis, spin_rate, spin_axis, orbit_radius, display_scale)| {
                let params = MotionParameters {
                    orbit_rate,
                    orbit_axis,
                    spin_rate,
                    spin_axis,
                    orbit_radius,
                    display_scale,
                };
                (name, params)
            },
        ))
    }

    pub fn lookup(&self, name: &str) -> Result<&MotionParameters, MotionError> {
        self.entries
            .get(name)
            .ok_or_else(|| MotionError::UnknownBodyId(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MotionParameters)> + '_ {
        self.entries.iter().map(|(name, params)| (name.as_str(), params))
    }
}
