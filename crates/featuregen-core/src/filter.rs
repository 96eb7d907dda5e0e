//! Run filters: which groups to process and how to decorate new scenarios

use crate::error::{BatchError, BatchResult};
use featuregen_descriptor::{HttpMethod, OperationDescriptor};
use indexmap::IndexMap;

/// Invocation options that narrow a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilters {
    /// Exactly this document-group
    pub namespace: Option<String>,
    /// Groups whose identifier starts with this prefix
    pub from_namespace: Option<String>,
    /// Only plan scenarios for these verbs; empty means all
    pub methods: Vec<HttpMethod>,
    /// Tag rendered above newly generated scenarios
    pub tag: Option<String>,
    /// Report per-file progress
    pub verbose: bool,
}

impl RunFilters {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_from_namespace(mut self, prefix: impl Into<String>) -> Self {
        self.from_namespace = Some(prefix.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = HttpMethod>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn accepts_method(&self, method: HttpMethod) -> bool {
        self.methods.is_empty() || self.methods.contains(&method)
    }

    /// Keep the groups the namespace filters select
    ///
    /// # Errors
    /// `NamespaceNotFound` for an unknown exact namespace, `NoGroupsMatched`
    /// when nothing is left.
    pub fn select_groups(
        &self,
        mut groups: IndexMap<String, Vec<OperationDescriptor>>,
    ) -> BatchResult<IndexMap<String, Vec<OperationDescriptor>>> {
        if let Some(namespace) = &self.namespace {
            let operations = groups
                .swap_remove(namespace)
                .ok_or_else(|| BatchError::NamespaceNotFound(namespace.clone()))?;
            groups = IndexMap::from([(namespace.clone(), operations)]);
        }

        if let Some(prefix) = &self.from_namespace {
            groups.retain(|group, _| group.starts_with(prefix.as_str()));
        }

        if groups.is_empty() {
            return Err(BatchError::NoGroupsMatched);
        }
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> IndexMap<String, Vec<OperationDescriptor>> {
        ["App\\Controller\\A", "App\\Controller\\Admin\\B", "Other\\C"]
            .into_iter()
            .map(|g| {
                (
                    g.to_string(),
                    vec![OperationDescriptor::new("x", g, HttpMethod::Get, "/x")],
                )
            })
            .collect()
    }

    #[test]
    fn no_filters_keep_everything() {
        assert_eq!(RunFilters::new().select_groups(groups()).unwrap().len(), 3);
    }

    #[test]
    fn exact_namespace() {
        let kept = RunFilters::new()
            .with_namespace("Other\\C")
            .select_groups(groups())
            .unwrap();
        assert_eq!(kept.keys().map(String::as_str).collect::<Vec<_>>(), vec!["Other\\C"]);

        let err = RunFilters::new()
            .with_namespace("Nope")
            .select_groups(groups())
            .unwrap_err();
        assert!(matches!(err, BatchError::NamespaceNotFound(n) if n == "Nope"));
    }

    #[test]
    fn namespace_prefix() {
        let kept = RunFilters::new()
            .with_from_namespace("App\\Controller\\")
            .select_groups(groups())
            .unwrap();
        assert_eq!(kept.len(), 2);

        let err = RunFilters::new()
            .with_from_namespace("Vendor\\")
            .select_groups(groups())
            .unwrap_err();
        assert!(matches!(err, BatchError::NoGroupsMatched));
    }

    #[test]
    fn method_subset() {
        let filters = RunFilters::new().with_methods([HttpMethod::Get, HttpMethod::Post]);
        assert!(filters.accepts_method(HttpMethod::Post));
        assert!(!filters.accepts_method(HttpMethod::Delete));
        assert!(RunFilters::new().accepts_method(HttpMethod::Delete));
    }
}
