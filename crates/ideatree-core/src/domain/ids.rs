//! Domain identifiers (strongly-typed IDs).
//!
//! Decisions are identified by a ULID wrapped in a phantom-typed `Id<T>`, so a
//! decision id can never be confused with any other id kind at compile time.
//! Branch ids are plain strings because they encode their position in the tree
//! (`branch-{round}-{parent}-{i}`) and the presentation layer reads them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// Marker trait for each id kind.
///
/// Provides the prefix used by `Display` ("decision-").
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Generic ULID-backed id.
///
/// `T` only exists at compile time; `Id<T>` has the same size as `Ulid`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Decision marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Decision {}

impl IdMarker for Decision {
    fn prefix() -> &'static str {
        "decision-"
    }
}

/// Identifier of a decision tree (one topic under resolution).
pub type DecisionId = Id<Decision>;

/// Identifier of a branch.
///
/// The format is positional: first-round branches are `branch-1-{i}`, later
/// branches embed their parent id, so ids stay unique across the whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(String);

impl BranchId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Id of the `index`-th branch of the first round.
    pub fn initial(index: usize) -> Self {
        Self(format!("branch-1-{index}"))
    }

    /// Id of the `index`-th branch generated under `parent` for `round`.
    pub fn child(round: u32, parent: &BranchId, index: usize) -> Self {
        Self(format!("branch-{round}-{parent}-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BranchId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
