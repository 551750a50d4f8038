//! Declared operation sets of profiled targets.

use std::any;
use std::sync::Arc;

use crate::OperationKey;

/// The operations a target type exposes, each marked as profiled or not.
///
/// A capability set is the metadata the interceptor consults on every invocation to decide
/// whether the call is timed. It is read-only once handed to
/// [`Profiler::wrap()`][crate::Profiler::wrap].
///
/// # Examples
///
/// ```
/// use call_profiler::CapabilitySet;
///
/// struct Widget;
///
/// let capabilities = CapabilitySet::of::<Widget>()
///     .profiled("spin")
///     .unprofiled("ping");
///
/// assert_eq!(capabilities.owner(), "Widget");
/// assert_eq!(capabilities.is_profiled("spin"), Some(true));
/// assert_eq!(capabilities.is_profiled("ping"), Some(false));
/// assert_eq!(capabilities.is_profiled("missing"), None);
/// ```
#[derive(Clone, Debug)]
pub struct CapabilitySet {
    owner: Arc<str>,
    operations: Vec<DeclaredOperation>,
}

/// One operation declared in a [`CapabilitySet`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeclaredOperation {
    key: OperationKey,
    profiled: bool,
}

impl CapabilitySet {
    /// Creates an empty capability set for the type `T`.
    ///
    /// The owner name is the type name without its module path, so `my_app::net::Fetcher`
    /// becomes `Fetcher`. Generic arguments are kept as the compiler spells them.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self::named(short_type_name(any::type_name::<T>()))
    }

    /// Creates an empty capability set with an explicit owner name.
    #[must_use]
    pub fn named(owner: impl AsRef<str>) -> Self {
        Self {
            owner: Arc::from(owner.as_ref()),
            operations: Vec::new(),
        }
    }

    /// Declares an operation whose invocations are timed.
    #[must_use]
    pub fn profiled(self, operation: impl AsRef<str>) -> Self {
        self.declare(operation, true)
    }

    /// Declares an operation that is forwarded without timing.
    #[must_use]
    pub fn unprofiled(self, operation: impl AsRef<str>) -> Self {
        self.declare(operation, false)
    }

    /// Declares an operation with an explicit profiled flag.
    ///
    /// Declaring an operation that is already declared replaces the earlier declaration.
    #[must_use]
    pub fn declare(mut self, operation: impl AsRef<str>, profiled: bool) -> Self {
        let operation = operation.as_ref();

        if let Some(existing) = self
            .operations
            .iter_mut()
            .find(|declared| declared.name() == operation)
        {
            existing.profiled = profiled;
        } else {
            self.operations.push(DeclaredOperation {
                key: OperationKey::from_parts(Arc::clone(&self.owner), operation),
                profiled,
            });
        }

        self
    }

    /// Name of the owning type, as it appears in reports.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The declared operations, in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = &DeclaredOperation> {
        self.operations.iter()
    }

    /// Whether `operation` is profiled, or `None` if the set does not declare it.
    #[must_use]
    pub fn is_profiled(&self, operation: &str) -> Option<bool> {
        self.find(operation).map(DeclaredOperation::is_profiled)
    }

    /// Whether at least one declared operation is profiled.
    #[must_use]
    pub fn has_profiled_operation(&self) -> bool {
        self.operations.iter().any(DeclaredOperation::is_profiled)
    }

    pub(crate) fn find(&self, operation: &str) -> Option<&DeclaredOperation> {
        self.operations
            .iter()
            .find(|declared| declared.name() == operation)
    }
}

impl DeclaredOperation {
    /// Name of the operation.
    #[must_use]
    pub fn name(&self) -> &str {
        self.key.operation()
    }

    /// Whether invocations of this operation are timed.
    #[must_use]
    pub fn is_profiled(&self) -> bool {
        self.profiled
    }

    /// The aggregation key under which this operation is recorded.
    #[must_use]
    pub fn key(&self) -> &OperationKey {
        &self.key
    }
}

/// Strips the module path from a type name produced by [`any::type_name()`].
fn short_type_name(full: &str) -> String {
    let (path, generics) = full.split_once('<').unwrap_or((full, ""));
    let name = path.rsplit("::").next().unwrap_or(path);

    if generics.is_empty() {
        name.to_string()
    } else {
        format!("{name}<{generics}")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(CapabilitySet: Send, Sync);

    #[expect(dead_code, reason = "only the type name is used")]
    struct Widget;

    #[expect(dead_code, reason = "only the type name is used")]
    struct Wrapper<T>(T);

    #[test]
    fn owner_is_short_type_name() {
        assert_eq!(CapabilitySet::of::<Widget>().owner(), "Widget");
    }

    #[test]
    fn generic_owner_keeps_arguments() {
        let capabilities = CapabilitySet::of::<Wrapper<u32>>();

        assert_eq!(capabilities.owner(), "Wrapper<u32>");
    }

    #[test]
    fn short_type_name_strips_path() {
        assert_eq!(short_type_name("a::b::Fetcher"), "Fetcher");
        assert_eq!(short_type_name("Fetcher"), "Fetcher");
        assert_eq!(
            short_type_name("a::Pair<a::Left, b::Right>"),
            "Pair<a::Left, b::Right>"
        );
    }

    #[test]
    fn empty_set_has_no_profiled_operation() {
        assert!(!CapabilitySet::named("Empty").has_profiled_operation());
    }

    #[test]
    fn only_unprofiled_operations_is_not_profiled() {
        let capabilities = CapabilitySet::named("Quiet")
            .unprofiled("ping")
            .unprofiled("pong");

        assert!(!capabilities.has_profiled_operation());
    }

    #[test]
    fn one_profiled_operation_is_enough() {
        let capabilities = CapabilitySet::named("Widget")
            .unprofiled("ping")
            .profiled("spin");

        assert!(capabilities.has_profiled_operation());
    }

    #[test]
    fn redeclaring_replaces_flag() {
        let capabilities = CapabilitySet::named("Widget")
            .profiled("spin")
            .unprofiled("spin");

        assert_eq!(capabilities.operations().count(), 1);
        assert_eq!(capabilities.is_profiled("spin"), Some(false));
        assert!(!capabilities.has_profiled_operation());
    }

    #[test]
    fn declaration_order_is_kept() {
        let capabilities = CapabilitySet::named("Widget")
            .profiled("spin")
            .unprofiled("ping")
            .declare("stop", true);

        let names: Vec<_> = capabilities.operations().map(DeclaredOperation::name).collect();

        assert_eq!(names, ["spin", "ping", "stop"]);
    }

    #[test]
    fn declared_key_uses_owner() {
        let capabilities = CapabilitySet::named("Widget").profiled("spin");

        let declared = capabilities.find("spin").unwrap();

        assert_eq!(declared.key(), &OperationKey::new("Widget", "spin"));
    }
}
