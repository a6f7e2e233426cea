//! Configuration values that may depend on the node being validated.

use std::sync::Arc;

use mythic_tree::Node;

use crate::Context;

/// A resolver closure for [`Resolvable::Fn`].
pub type ResolveFn<T> = Arc<dyn Fn(&Context<'_>, &Node) -> T + Send + Sync>;

/// Either a fixed value or a function of the validation context and node.
///
/// Every schema configuration field goes through [`Resolvable::resolve`],
/// so constraints can depend on sibling values (via [`Context::parent`]) or
/// on workspace state without each schema variant special-casing it.
pub enum Resolvable<T> {
    Value(T),
    Fn(ResolveFn<T>),
}

impl<T: Clone> Resolvable<T> {
    pub fn resolve(&self, cx: &Context<'_>, node: &Node) -> T {
        match self {
            Resolvable::Value(value) => value.clone(),
            Resolvable::Fn(f) => f(cx, node),
        }
    }
}

impl<T> Resolvable<T> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Context<'_>, &Node) -> T + Send + Sync + 'static,
    {
        Resolvable::Fn(Arc::new(f))
    }

    /// The fixed value, if this is not a function.
    pub fn value(&self) -> Option<&T> {
        match self {
            Resolvable::Value(value) => Some(value),
            Resolvable::Fn(_) => None,
        }
    }
}

impl<T> From<T> for Resolvable<T> {
    fn from(value: T) -> Self {
        Resolvable::Value(value)
    }
}

impl<T: Clone> Clone for Resolvable<T> {
    fn clone(&self) -> Self {
        match self {
            Resolvable::Value(value) => Resolvable::Value(value.clone()),
            Resolvable::Fn(f) => Resolvable::Fn(Arc::clone(f)),
        }
    }
}

impl<T: Default> Default for Resolvable<T> {
    fn default() -> Self {
        Resolvable::Value(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Resolvable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolvable::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Resolvable::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}
