//! Named accessor strategies over host objects.
//!
//! A `Strategy` is a path of method calls and field reads starting at one
//! host object. An `Attribute` is an ordered list of strategies for the same
//! datum; the first one that yields a value of the right shape wins.

use crate::application::ports::{HostHandle, HostValue};
use std::sync::Arc;
use tracing::trace;

/// One hop of an accessor path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Zero-argument method call
    Method(&'static str),
    /// Field read
    Field(&'static str),
}

impl Step {
    fn read(&self, handle: &dyn HostHandle) -> Option<HostValue> {
        match self {
            Step::Method(name) => handle.call(name),
            Step::Field(name) => handle.field(name),
        }
    }
}

/// An accessor path with a name used in trace output.
#[derive(Debug, Clone, Copy)]
pub struct Strategy {
    /// Name shown when the strategy misses
    pub name: &'static str,
    /// Hops from the root object to the value
    pub path: &'static [Step],
}

impl Strategy {
    /// Follow the path from `root`.
    ///
    /// Every hop except the last must produce a nested handle.
    pub fn walk(&self, root: &dyn HostHandle) -> Option<HostValue> {
        walk_from(root, self.path)
    }
}

fn walk_from(handle: &dyn HostHandle, steps: &[Step]) -> Option<HostValue> {
    let (first, rest) = steps.split_first()?;
    let value = first.read(handle)?;
    if rest.is_empty() {
        return Some(value);
    }
    match value {
        HostValue::Handle(next) => walk_from(next.as_ref(), rest),
        _ => None,
    }
}

/// Conversion from a raw host value into an attribute type.
///
/// A value of the wrong shape converts to `None`, which makes the caller try
/// the next strategy.
pub trait FromHostValue: Sized {
    /// Convert the value, or reject it.
    fn from_host_value(value: HostValue) -> Option<Self>;
}

impl FromHostValue for i32 {
    fn from_host_value(value: HostValue) -> Option<Self> {
        match value {
            HostValue::Int(v) => i32::try_from(v).ok(),
            _ => None,
        }
    }
}

impl FromHostValue for bool {
    fn from_host_value(value: HostValue) -> Option<Self> {
        match value {
            HostValue::Bool(v) => Some(v),
            HostValue::Int(v) => Some(v != 0),
            _ => None,
        }
    }
}

impl FromHostValue for String {
    fn from_host_value(value: HostValue) -> Option<Self> {
        match value {
            HostValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl FromHostValue for Vec<i64> {
    fn from_host_value(value: HostValue) -> Option<Self> {
        match value {
            HostValue::IntList(v) => Some(v),
            _ => None,
        }
    }
}

impl FromHostValue for Arc<dyn HostHandle> {
    fn from_host_value(value: HostValue) -> Option<Self> {
        match value {
            HostValue::Handle(v) => Some(v),
            _ => None,
        }
    }
}

/// Number of elements in a host collection.
///
/// Hosts expose package lists as string lists, id lists or a bare size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Count(pub usize);

impl FromHostValue for Count {
    fn from_host_value(value: HostValue) -> Option<Self> {
        match value {
            HostValue::StrList(v) => Some(Count(v.len())),
            HostValue::IntList(v) => Some(Count(v.len())),
            HostValue::Int(v) => usize::try_from(v).ok().map(Count),
            _ => None,
        }
    }
}

/// A datum with its ordered fallback strategies.
#[derive(Debug, Clone, Copy)]
pub struct Attribute {
    /// Attribute name used in trace output
    pub name: &'static str,
    /// Strategies, tried in order
    pub strategies: &'static [Strategy],
}

impl Attribute {
    /// Resolve against one root object.
    pub fn resolve<T: FromHostValue>(&self, root: &dyn HostHandle) -> Option<T> {
        for strategy in self.strategies {
            match strategy.walk(root).and_then(T::from_host_value) {
                Some(value) => return Some(value),
                None => trace!(
                    attribute = self.name,
                    strategy = strategy.name,
                    "accessor unavailable"
                ),
            }
        }
        None
    }

    /// Resolve against each root in turn, skipping absent ones.
    pub fn resolve_any<T: FromHostValue>(&self, roots: &[Option<&dyn HostHandle>]) -> Option<T> {
        let resolved = roots
            .iter()
            .flatten()
            .find_map(|root| self.resolve::<T>(*root));
        if resolved.is_none() {
            trace!(attribute = self.name, "attribute unresolved, using default");
        }
        resolved
    }
}
