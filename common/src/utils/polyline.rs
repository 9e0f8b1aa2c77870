//! Polyline codec.
//!
//! Google's polyline algorithm at precision 5: ordinates are scaled by 1e5,
//! delta-encoded against the previous point, zig-zag folded so the sign lands
//! in the low bit, then packed into 5-bit chunks offset by 63 into printable
//! ASCII.

/// Errors produced while decoding a polyline string.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    /// Input ended in the middle of a varint chunk sequence.
    #[error("unexpected end of polyline input")]
    UnexpectedEnd,

    /// A byte outside the valid `?`..=`~` range.
    #[error("invalid polyline byte {0:#04x} at offset {1}")]
    InvalidByte(u8, usize),
}

const FACTOR: f64 = 1e5;

/// Encodes a sequence of `(lat, lng)` pairs into a polyline string.
///
/// An empty slice encodes to the empty string.
pub fn encode(points: &[(f64, f64)]) -> String {
    let mut out = String::with_capacity(points.len() * 6);
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;
    for &(lat, lng) in points {
        let lat_e5 = (lat * FACTOR).round() as i64;
        let lng_e5 = (lng * FACTOR).round() as i64;
        encode_value(lat_e5 - prev_lat, &mut out);
        encode_value(lng_e5 - prev_lng, &mut out);
        prev_lat = lat_e5;
        prev_lng = lng_e5;
    }
    out
}

/// Decodes a polyline string back into `(lat, lng)` pairs.
pub fn decode(encoded: &str) -> Result<Vec<(f64, f64)>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;
    while index < bytes.len() {
        lat += decode_value(bytes, &mut index)?;
        lng += decode_value(bytes, &mut index)?;
        points.push((lat as f64 / FACTOR, lng as f64 / FACTOR));
    }
    Ok(points)
}

/// Encodes GeoJSON positions (`[lng, lat, ...]`) the way the street endpoints
/// need them: axis order swapped to latitude-first, sequence order reversed,
/// then polyline-encoded. Positions with fewer than two ordinates are skipped.
pub fn encode_lonlat(positions: &[Vec<f64>]) -> String {
    let mut points: Vec<(f64, f64)> = positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| (p[1], p[0]))
        .collect();
    points.reverse();
    encode(&points)
}

fn encode_value(value: i64, out: &mut String) {
    // Zig-zag: left shift, invert when negative so the sign bit is the LSB.
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push((((0x20 | (v & 0x1f)) + 63) as u8) as char);
        v >>= 5;
    }
    out.push(((v + 63) as u8) as char);
}

fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result = 0i64;
    let mut shift = 0u32;
    loop {
        let byte = *bytes.get(*index).ok_or(PolylineError::UnexpectedEnd)?;
        if !(b'?'..=b'~').contains(&byte) {
            return Err(PolylineError::InvalidByte(byte, *index));
        }
        *index += 1;
        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }
    // Undo the zig-zag fold.
    if result & 1 != 0 {
        Ok(!(result >> 1))
    } else {
        Ok(result >> 1)
    }
}
