//! Named strategy registries
//!
//! Columns pick their filter, sorting and aggregation behavior through a
//! [`StrategyRef`]: `Auto` infers a built-in from the data, `Named` looks the
//! key up in the table's registry and then in the built-ins, `Custom` carries
//! the function itself.

mod aggregation;
mod filter;
mod sorting;

use std::fmt;

pub use aggregation::*;
pub use filter::*;
pub use sorting::*;

/// Reference to a strategy function.
#[derive(Clone)]
pub enum StrategyRef<F> {
    /// Infer the strategy from observed values.
    Auto,
    /// Look the strategy up by registry key.
    Named(String),
    /// Use this function directly.
    Custom(F),
}

impl<F> StrategyRef<F> {
    /// Creates a named reference.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Returns the registry key for named references.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Returns `true` for [`StrategyRef::Auto`].
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl<F: Clone> StrategyRef<F> {
    /// Resolves the reference: `auto` runs inference, `lookup` resolves keys.
    pub(crate) fn resolve(
        &self,
        auto: impl FnOnce() -> Option<F>,
        lookup: impl FnOnce(&str) -> Option<F>,
    ) -> Option<F> {
        match self {
            Self::Auto => auto(),
            Self::Named(name) => lookup(name),
            Self::Custom(f) => Some(f.clone()),
        }
    }
}

impl<F> Default for StrategyRef<F> {
    fn default() -> Self {
        Self::Auto
    }
}

impl<F> From<&str> for StrategyRef<F> {
    fn from(name: &str) -> Self {
        if name == "auto" {
            Self::Auto
        } else {
            Self::Named(name.to_string())
        }
    }
}

impl<F> fmt::Debug for StrategyRef<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("Auto"),
            Self::Named(name) => write!(f, "Named({:?})", name),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
