use std::fmt;
use std::sync::Arc;

/// Identifies one timed operation: the owning type and the operation name.
///
/// Keys order by owner first and operation second, which is the order of the lines in a
/// rendered report.
///
/// # Examples
///
/// ```
/// use call_profiler::OperationKey;
///
/// let key = OperationKey::new("Widget", "spin");
///
/// assert_eq!(key.owner(), "Widget");
/// assert_eq!(key.operation(), "spin");
/// assert_eq!(key.to_string(), "Widget.spin");
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OperationKey {
    owner: Arc<str>,
    operation: Arc<str>,
}

impl OperationKey {
    /// Creates a key for `operation` on the type named `owner`.
    #[must_use]
    pub fn new(owner: impl AsRef<str>, operation: impl AsRef<str>) -> Self {
        Self::from_parts(Arc::from(owner.as_ref()), operation.as_ref())
    }

    /// Creates a key that shares an already allocated owner name.
    pub(crate) fn from_parts(owner: Arc<str>, operation: &str) -> Self {
        Self {
            owner,
            operation: Arc::from(operation),
        }
    }

    /// Name of the owning type.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Name of the operation.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.operation)
    }
}
