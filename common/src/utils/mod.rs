//! Utility functions and helpers.

pub mod polyline;

pub use polyline::{decode, encode, encode_lonlat, PolylineError};
