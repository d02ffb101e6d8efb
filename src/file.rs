use std::collections::HashSet;
use std::fs;
use std::path::Path;

use nalgebra::Vector3;
use thiserror::Error;

use crate::model::{MotionParameters, MotionTable};

const NUM_FIELDS: usize = 11;

#[derive(Debug, Error)]
pub enum TableFileError {
    #[error("could not read motion table: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected {} fields, found {found}", NUM_FIELDS)]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: `{field}` is not a number")]
    BadNumber { line: usize, field: String },
    #[error("line {line}: {message}")]
    Invalid { line: usize, message: String },
}

/// Reads a motion table from a text file.
///
/// The first line is a header and gets skipped. After that, each line is
/// `name orbit_rate ox oy oz spin_rate sx sy sz radius scale`, separated by
/// whitespace. Blank lines and lines starting with `#` are ignored.
pub fn read_table(filename: impl AsRef<Path>) -> Result<MotionTable, TableFileError> {
    let contents = fs::read_to_string(filename)?;
    parse_table(&contents)
}

pub fn parse_table(contents: &str) -> Result<MotionTable, TableFileError> {
    let mut entries = vec![];
    let mut seen = HashSet::new();

    // Read lines, skipping header
    for (idx, line) in contents.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_ascii_whitespace().collect();
        if fields.len() != NUM_FIELDS {
            return Err(TableFileError::FieldCount {
                line: line_no,
                found: fields.len(),
            });
        }

        let name = fields[0];
        let numbers = fields[1..]
            .iter()
            .map(|field| {
                let bad_number = || TableFileError::BadNumber {
                    line: line_no,
                    field: field.to_string(),
                };
                // `parse` accepts NaN and inf; the table wants neither
                match field.parse::<f64>() {
                    Ok(x) if x.is_finite() => Ok(x),
                    _ => Err(bad_number()),
                }
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let params = MotionParameters {
            orbit_rate: numbers[0],
            orbit_axis: Vector3::new(numbers[1], numbers[2], numbers[3]),
            spin_rate: numbers[4],
            spin_axis: Vector3::new(numbers[5], numbers[6], numbers[7]),
            orbit_radius: numbers[8],
            display_scale: numbers[9],
        };

        let invalid = |message: String| TableFileError::Invalid {
            line: line_no,
            message,
        };
        if !seen.insert(name) {
            return Err(invalid(format!("`{}` appears more than once", name)));
        }
        if !(params.orbit_radius >= 0.0) {
            return Err(invalid(format!("`{}` has a negative orbit radius", name)));
        }
        if !(params.display_scale > 0.0) {
            return Err(invalid(format!("`{}` needs a positive scale", name)));
        }

        entries.push((name, params));
    }

    Ok(MotionTable::from_entries(entries))
}
