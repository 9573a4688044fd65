//! The family of scalar functions whose iterates are plotted.

use crate::Params;

/// One of the fixed menu of functions f(x; a, b, c, d).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Function {
    Plus,
    Times,
    Power,
    Affine,
    Rational,
}

/// Menu order; a function's index is its position here.
const FUNCTIONS: &[(&'static str, Function)] = &[
    ("plus", Function::Plus),
    ("times", Function::Times),
    ("power", Function::Power),
    ("affine", Function::Affine),
    ("rational", Function::Rational),
];

/// List the functions in menu order.
pub fn all() -> impl Iterator<Item = Function> {
    FUNCTIONS.iter().map(|(_, f)| *f)
}

impl Function {
    /// Look up a function by its menu position.
    pub fn from_index(index: usize) -> Result<Self, String> {
        FUNCTIONS
            .get(index)
            .map(|(_, f)| *f)
            .ok_or(format!("unknown function index {}", index))
    }

    /// Position of this function in the menu.
    pub fn index(self) -> usize {
        // Linear scan, we don't have that many options:
        FUNCTIONS
            .iter()
            .position(|(_, f)| *f == self)
            .unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        FUNCTIONS[self.index()].0
    }

    /// Right-hand side of f(x) = ..., as shown in menus, chart titles and legends.
    pub fn formula(self) -> &'static str {
        match self {
            Function::Plus => "x + b",
            Function::Times => "x·b",
            Function::Power => "x^b",
            Function::Affine => "a(1 − b) + b·x",
            Function::Rational => "(a + b·x) / (c + d·x)",
        }
    }

    /// Evaluate f(x; a, b, c, d).
    ///
    /// Nothing is guarded: the rational pole and power overflow come back as
    /// infinities or NaN.
    #[inline]
    pub fn apply(self, x: f64, params: &Params) -> f64 {
        let Params { a, b, c, d } = *params;
        match self {
            Function::Plus => x + b,
            Function::Times => x * b,
            Function::Power => x.powf(b),
            Function::Affine => a * (1.0 - b) + b * x,
            Function::Rational => (a + b * x) / (c + d * x),
        }
    }

    /// Close over the parameters, leaving the unary function to iterate.
    pub fn bind(self, params: Params) -> impl Fn(f64) -> f64 {
        move |x| self.apply(x, &params)
    }
}

impl std::str::FromStr for Function {
    type Err = String;

    /// Accepts either a name ("affine") or a menu index ("3").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((_, f)) = FUNCTIONS.iter().find(|(name, _)| *name == s) {
            return Ok(*f);
        }
        match s.parse::<usize>() {
            Ok(index) => Function::from_index(index),
            Err(_) => Err(format!("unknown function {}", s)),
        }
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
