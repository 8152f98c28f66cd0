//! Polygon geometry and parsing of string-encoded vertex lists.
//!
//! Polygon cells arrive as text such as `[[10,10],[50,10],[50,30],[10,30]]`.
//! Tuple notation (`((10, 10), (50, 10))`) and trailing commas are accepted
//! as well, since tables are often produced by Python tooling.

use std::str::FromStr;

use thiserror::Error;

/// Minimum number of vertices for a polygon that encloses an area.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Errors produced when a polygon cell cannot be turned into vertices.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The cell is not a nested list of numbers
    #[error("Malformed polygon '{input}': {reason}")]
    Malformed {
        /// The offending cell, trimmed
        input: String,
        /// Parser message
        reason: String,
    },

    /// A vertex did not have exactly two coordinates
    #[error("Vertex {index} has {len} coordinates, expected 2")]
    InvalidPair {
        /// Position of the vertex in the list
        index: usize,
        /// Number of coordinates found
        len: usize,
    },

    /// A coordinate was NaN or infinite
    #[error("Vertex {index} has a non-finite coordinate")]
    NonFinite {
        /// Position of the vertex in the list
        index: usize,
    },

    /// The list held no vertices at all
    #[error("Polygon has no vertices")]
    Empty,
}

impl ParseError {
    fn malformed(input: &str, reason: impl ToString) -> Self {
        Self::Malformed {
            input: input.trim().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Axis-aligned bounding box in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BoundingBox {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// An ordered, implicitly closed list of vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<(f32, f32)>,
}

impl Polygon {
    /// Create a polygon from vertices. Returns `ParseError::Empty` for an empty list.
    pub fn new(vertices: Vec<(f32, f32)>) -> Result<Self, ParseError> {
        if vertices.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[(f32, f32)] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether the polygon has enough vertices to enclose an area.
    /// Degenerate polygons are still drawn, they just collapse to a line or point.
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < MIN_POLYGON_VERTICES
    }

    /// Bounding box over all vertices.
    pub fn bounding_box(&self) -> BoundingBox {
        let min_x = self.vertices.iter().map(|(x, _)| *x).fold(f32::MAX, f32::min);
        let max_x = self.vertices.iter().map(|(x, _)| *x).fold(f32::MIN, f32::max);
        let min_y = self.vertices.iter().map(|(_, y)| *y).fold(f32::MAX, f32::min);
        let max_y = self.vertices.iter().map(|(_, y)| *y).fold(f32::MIN, f32::max);

        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl FromStr for Polygon {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_literal(s);
        let raw: Vec<Vec<f32>> =
            serde_json::from_str(&normalized).map_err(|e| ParseError::malformed(s, e))?;

        let mut vertices = Vec::with_capacity(raw.len());
        for (index, pair) in raw.iter().enumerate() {
            let &[x, y] = pair.as_slice() else {
                return Err(ParseError::InvalidPair {
                    index,
                    len: pair.len(),
                });
            };
            if !x.is_finite() || !y.is_finite() {
                return Err(ParseError::NonFinite { index });
            }
            vertices.push((x, y));
        }

        Polygon::new(vertices)
    }
}

/// Rewrite tuple brackets to list brackets and drop trailing commas so the
/// literal can be read as JSON.
fn normalize_literal(s: &str) -> String {
    let chars: Vec<char> = s.trim().chars().collect();
    let mut out = String::with_capacity(chars.len());

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '(' => out.push('['),
            ')' => out.push(']'),
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some(']') | Some(')')) {
                    out.push(',');
                }
            }
            _ => out.push(c),
        }
    }

    out
}
