//! Parameter expressions for parameterized templates.
//!
//! An angle argument to a rotation gate is either a concrete value, a free
//! symbol, or the negation of another expression. Negation is all the
//! algebra template inversion needs: the adjoint of `Rx(θ)` is `Rx(-θ)`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A symbolic or concrete parameter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A constant numeric value.
    Constant(f64),
    /// A free symbolic parameter.
    Symbol(String),
    /// Negation of an inner expression.
    Neg(Box<ParameterExpression>),
}

impl ParameterExpression {
    /// Create a constant parameter.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// Create a free symbolic parameter.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    /// Check whether the expression contains a free symbol.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ParameterExpression::Constant(_) => false,
            ParameterExpression::Symbol(_) => true,
            ParameterExpression::Neg(e) => e.is_symbolic(),
        }
    }

    /// Try to evaluate as a concrete `f64` value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Symbol(_) => None,
            ParameterExpression::Neg(e) => e.as_f64().map(|v| -v),
        }
    }

    /// Append free symbols to `out` in first-appearance order, skipping
    /// names already present.
    pub(crate) fn collect_symbols(&self, out: &mut Vec<String>) {
        match self {
            ParameterExpression::Constant(_) => {}
            ParameterExpression::Symbol(name) => {
                if !out.iter().any(|s| s == name) {
                    out.push(name.clone());
                }
            }
            ParameterExpression::Neg(e) => e.collect_symbols(out),
        }
    }

    /// Bind a symbol to a value, returning a new expression.
    pub fn bind(&self, name: &str, value: f64) -> Self {
        match self {
            ParameterExpression::Symbol(n) if n == name => ParameterExpression::Constant(value),
            ParameterExpression::Constant(_) | ParameterExpression::Symbol(_) => self.clone(),
            ParameterExpression::Neg(e) => ParameterExpression::Neg(Box::new(e.bind(name, value))),
        }
    }

    /// Bind every symbol found in `map`, returning a new expression.
    pub fn bind_all(&self, map: &FxHashMap<String, f64>) -> Self {
        match self {
            ParameterExpression::Constant(_) => self.clone(),
            ParameterExpression::Symbol(n) => match map.get(n) {
                Some(v) => ParameterExpression::Constant(*v),
                None => self.clone(),
            },
            ParameterExpression::Neg(e) => ParameterExpression::Neg(Box::new(e.bind_all(map))),
        }
    }

    /// Rename symbols through `map` in a single simultaneous pass.
    ///
    /// Simultaneity matters: renaming `{a → x0, x0 → x1}` one symbol at a
    /// time would capture the freshly renamed `x0`.
    pub fn renamed(&self, map: &FxHashMap<String, String>) -> Self {
        match self {
            ParameterExpression::Constant(_) => self.clone(),
            ParameterExpression::Symbol(n) => match map.get(n) {
                Some(new) => ParameterExpression::Symbol(new.clone()),
                None => self.clone(),
            },
            ParameterExpression::Neg(e) => ParameterExpression::Neg(Box::new(e.renamed(map))),
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Symbol(name) => write!(f, "{name}"),
            ParameterExpression::Neg(e) => write!(f, "-({e})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            // -(-e) = e; keeps inverted-twice templates structurally equal.
            ParameterExpression::Neg(e) => *e,
            ParameterExpression::Constant(v) => ParameterExpression::Constant(-v),
            other => ParameterExpression::Neg(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_constant() {
        let p = ParameterExpression::constant(1.5);
        assert!(!p.is_symbolic());
        assert_eq!(p.as_f64(), Some(1.5));
    }

    #[test]
    fn test_symbol() {
        let p = ParameterExpression::symbol("theta");
        assert!(p.is_symbolic());
        assert_eq!(p.as_f64(), None);
        let mut names = vec![];
        p.collect_symbols(&mut names);
        assert_eq!(names, vec!["theta"]);
    }

    #[test]
    fn test_bind() {
        let p = ParameterExpression::symbol("theta");
        let bound = p.bind("theta", PI / 2.0);
        assert!(!bound.is_symbolic());
        assert!((bound.as_f64().unwrap() - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_neg_involution() {
        let p = ParameterExpression::symbol("a");
        assert_eq!(-(-p.clone()), p);
        assert_eq!((-ParameterExpression::constant(2.0)).as_f64(), Some(-2.0));
    }

    #[test]
    fn test_neg_bind() {
        let p = -ParameterExpression::symbol("a");
        assert_eq!(p.bind("a", 0.5).as_f64(), Some(-0.5));
    }

    #[test]
    fn test_simultaneous_rename() {
        let mut map = FxHashMap::default();
        map.insert("a".to_string(), "x0".to_string());
        map.insert("x0".to_string(), "x1".to_string());

        let a = ParameterExpression::symbol("a").renamed(&map);
        let x0 = ParameterExpression::symbol("x0").renamed(&map);
        assert_eq!(a, ParameterExpression::symbol("x0"));
        assert_eq!(x0, ParameterExpression::symbol("x1"));
    }
}
