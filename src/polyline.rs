//! Polyline representation for route geometries.
//!
//! Routes keep their geometry as decoded coordinates. Encoding to and
//! from the compact polyline string (the "encoded polyline algorithm
//! format": 1e5 fixed point, zig-zag deltas, 5-bit groups) happens at the
//! boundary, when storing a route or handing it to a renderer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coordinate::Coordinate;

/// Fixed-point scale (five decimal places).
const PRECISION: f64 = 1e5;

/// Added to every 5-bit group to land in printable ASCII.
const ASCII_OFFSET: u8 = 63;

const CONTINUATION_BIT: u64 = 0x20;
const GROUP_MASK: u64 = 0x1f;

/// Seven groups cover 35 bits, enough for any zig-zagged 32-bit value.
const MAX_SHIFT: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("malformed polyline at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: &'static str },
}

/// Encodes coordinates into a polyline string.
///
/// Each point is stored as the delta from the previous point, both
/// rounded to five decimal places. An empty slice encodes to `""`.
pub fn encode(points: &[Coordinate]) -> String {
    let mut encoded = String::with_capacity(points.len() * 8);
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;

    for point in points {
        let lat = scale(point.lat);
        let lng = scale(point.lng);

        encode_value(lat.wrapping_sub(prev_lat), &mut encoded);
        encode_value(lng.wrapping_sub(prev_lng), &mut encoded);

        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

/// Decodes a polyline string into coordinates.
///
/// Fails instead of returning partial output when the input ends in the
/// middle of a number, holds a latitude without its longitude, or
/// contains bytes outside the encoding alphabet.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;

    while index < bytes.len() {
        lat += decode_value(bytes, &mut index)?;
        if index >= bytes.len() {
            return Err(PolylineError::Malformed {
                offset: index,
                reason: "latitude without longitude",
            });
        }
        lng += decode_value(bytes, &mut index)?;

        points.push(Coordinate::new(
            lat as f64 / PRECISION,
            lng as f64 / PRECISION,
        ));
    }

    Ok(points)
}

/// Saturates far outside the coordinate range; such input does not
/// round-trip but cannot panic.
fn scale(value: f64) -> i64 {
    (value * PRECISION).round().clamp(i32::MIN as f64, i32::MAX as f64) as i64
}

fn encode_value(delta: i64, out: &mut String) {
    let zigzag = if delta < 0 { !(delta << 1) } else { delta << 1 };
    let mut value = zigzag as u64;

    while value >= CONTINUATION_BIT {
        out.push((((value & GROUP_MASK) | CONTINUATION_BIT) as u8 + ASCII_OFFSET) as char);
        value >>= 5;
    }
    out.push((value as u8 + ASCII_OFFSET) as char);
}

fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result = 0u64;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Malformed {
                offset: *index,
                reason: "input ends mid-number",
            });
        };
        if !(ASCII_OFFSET..=ASCII_OFFSET + 63).contains(&byte) {
            return Err(PolylineError::Malformed {
                offset: *index,
                reason: "byte outside encoding alphabet",
            });
        }
        *index += 1;

        let group = (byte - ASCII_OFFSET) as u64;
        result |= (group & GROUP_MASK) << shift;
        if group & CONTINUATION_BIT == 0 {
            break;
        }

        shift += 5;
        if shift > MAX_SHIFT {
            return Err(PolylineError::Malformed {
                offset: *index,
                reason: "number exceeds 32 bits",
            });
        }
    }

    let value = result as i64;
    Ok(if value & 1 == 1 { !(value >> 1) } else { value >> 1 })
}

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline string.
    pub fn from_encoded(encoded: &str) -> Result<Self, PolylineError> {
        decode(encoded).map(Self::new)
    }

    /// Encodes the points back into the compact string form.
    pub fn encode(&self) -> String {
        encode(&self.points)
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
