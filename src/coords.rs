use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

pub type Point3 = (f64, f64, f64);

/// Points recovered from a coordinate file, plus how many lines were
/// rejected on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordParse {
    pub points: Vec<Point3>,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineError {
    FieldCount(usize),
    NotANumber(String),
}

/// Parse one `x y z` line. Exactly three whitespace-separated floats.
pub fn parse_point(line: &str) -> Result<Point3, LineError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(LineError::FieldCount(fields.len()));
    }
    let num = |s: &str| f64::from_str(s).map_err(|_| LineError::NotANumber(s.to_string()));
    Ok((num(fields[0])?, num(fields[1])?, num(fields[2])?))
}

pub fn parse_coords(text: &str) -> CoordParse {
    let mut out = CoordParse::default();
    for (idx, result) in text.lines().map(parse_point).enumerate() {
        match result {
            Ok(p) => out.points.push(p),
            Err(err) => {
                debug!(line = idx + 1, ?err, "skipping malformed coordinate line");
                out.skipped += 1;
            }
        }
    }
    out
}

/// Load a trajectory file. A missing or unreadable file yields no points and
/// a warning; it never fails the caller.
pub fn load_coords(path: &Path) -> Vec<Point3> {
    if !path.exists() {
        warn!("File not found: {}", path.display());
        return Vec::new();
    }
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!("Failed to read {}: {err}", path.display());
            return Vec::new();
        }
    };
    let parsed = parse_coords(&text);
    if parsed.skipped > 0 {
        debug!(
            path = %path.display(),
            skipped = parsed.skipped,
            "ignored malformed coordinate lines"
        );
    }
    parsed.points
}
