//! Correlation IDs
//!
//! Random, type-tagged identifiers attached to log lines so that every event
//! of one scan attempt or one issued session can be grepped together.

use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// UUID v4 tagged with the flow it identifies
///
/// ```
/// use kernel::id::ScanAttemptId;
/// let id = ScanAttemptId::new();
/// assert_eq!(id.to_string().len(), 36);
/// assert!(format!("{id:?}").starts_with("ScanAttempt("));
/// ```
pub struct Id<T> {
    value: Uuid,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    pub fn from_uuid(value: Uuid) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }

    fn tag() -> &'static str {
        let full = std::any::type_name::<T>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

// Manual impls: derives would demand the same traits of the marker type.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", Self::tag(), self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

pub mod markers {
    /// Student side: camera open to verdict
    pub struct ScanAttempt;

    /// Teacher side: token issued and its countdown
    pub struct IssuedSession;
}

pub type ScanAttemptId = Id<markers::ScanAttempt>;
pub type IssuedSessionId = Id<markers::IssuedSession>;
