//! Library code for Frege's Habilitationsschrift:
//! plots of a function's iterates f^0(x), f^1(x), ..., f^n(x).

pub mod domain;
pub mod function;
pub mod image;
pub mod iterate;
pub mod trace;

pub use function::Function;

/// Largest iteration depth the controls allow.
pub const MAX_DEPTH: usize = 10;

/// Bounds on the side length of a rendered chart, in pixels.
pub const MIN_RES: usize = 128;
pub const MAX_RES: usize = 4096;

/// A pair of integer (width, height) dimensions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn square(side: usize) -> Self {
        Size {
            width: side,
            height: side,
        }
    }
}

/// The four free parameters every function in the family is closed over.
///
/// No relationship between them is enforced; each is adjusted independently.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Params {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            d: 1.0,
        }
    }
}

/// Everything needed to recompute a chart from scratch.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
    pub function: Function,
    pub params: Params,
    /// Deepest iterate to plot; depths 0..=depth are drawn.
    pub depth: usize,
    pub size: Size,
}

impl RenderRequest {
    /// Check the request against the bounds the interface offers.
    pub fn validate(&self) -> Result<(), String> {
        if self.depth > MAX_DEPTH {
            return Err(format!(
                "iteration depth {} exceeds maximum {}",
                self.depth, MAX_DEPTH
            ));
        }
        for (dim, value) in [("width", self.size.width), ("height", self.size.height)] {
            if !(MIN_RES..=MAX_RES).contains(&value) {
                return Err(format!(
                    "{} {} outside of [{}, {}]",
                    dim, value, MIN_RES, MAX_RES
                ));
            }
        }
        Ok(())
    }
}
