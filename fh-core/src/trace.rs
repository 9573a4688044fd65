//! Trace sets: one sampled curve per iteration depth.
//!
//! This is the one operation the presentation layers need:
//! given the current control values, produce every (x, y) sequence to draw.

use rayon::prelude::*;
use serde::Serialize;

use crate::{domain::SampleDomain, iterate::orbit, Function, Params};

/// An RGB color for a trace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color { r: 255, g: 0, b: 0 };

    /// CSS notation, e.g. `rgb(5, 25, 255)`.
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// The color of the trace at a depth: the identity in red,
/// then a gradient from deep blue towards cyan.
pub fn color(depth: usize) -> Color {
    if depth == 0 {
        return Color::RED;
    }
    let channel = |scale: usize| depth.saturating_mul(scale).min(255) as u8;
    Color {
        r: channel(5),
        g: channel(25),
        b: 255,
    }
}

/// Legend text for the trace at a depth, e.g. `f^3 = fff(x)`.
pub fn label(depth: usize) -> String {
    if depth == 0 {
        "f^0 = x".to_owned()
    } else {
        format!("f^{} = {}(x)", depth, "f".repeat(depth))
    }
}

/// The values of f^depth over the sample domain.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    pub depth: usize,
    pub color: Color,
    pub label: String,
    /// One value per sample point; non-finite where the iteration blew up.
    pub ys: Vec<f64>,
}

impl Trace {
    /// Split the trace into maximal runs of finite points, paired with their x-values.
    ///
    /// Non-finite samples separate runs; renderers draw each run as one polyline.
    pub fn runs(&self, xs: &[f64]) -> Vec<Vec<(f64, f64)>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for (x, y) in xs.iter().zip(&self.ys) {
            if y.is_finite() {
                current.push((*x, *y));
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }
}

/// Every trace for depths `0..=depth` of one function.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceSet {
    pub function: Function,
    pub params: Params,
    pub xs: Vec<f64>,
    pub traces: Vec<Trace>,
}

/// Compute the traces of `function` over the default sample domain.
pub fn compute(function: Function, params: Params, depth: usize) -> TraceSet {
    compute_on(&SampleDomain::default(), function, params, depth)
}

/// Compute the traces of `function` for depths `0..=depth` over `domain`.
///
/// Each sample point's orbit is followed once; the k-th orbit element
/// is exactly `iterate(x, f, k)`.
pub fn compute_on(
    domain: &SampleDomain,
    function: Function,
    params: Params,
    depth: usize,
) -> TraceSet {
    let span = tracing::debug_span!("compute-traces", %function, depth);
    let _guard = span.enter();

    let xs = domain.points();
    let f = function.bind(params);
    // Column per sample point...
    let orbits: Vec<Vec<f64>> = xs
        .par_iter()
        .map(|x| orbit(*x, &f).take(depth + 1).collect())
        .collect();

    // ...transposed into a row per depth.
    let traces = (0..=depth)
        .map(|k| Trace {
            depth: k,
            color: color(k),
            label: label(k),
            ys: orbits.iter().map(|o| o[k]).collect(),
        })
        .collect();

    TraceSet {
        function,
        params,
        xs,
        traces,
    }
}
