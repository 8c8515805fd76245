//! Memoizing decorator over any boundary

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use super::ports::{ApiBoundary, BoundaryKind};
use crate::shared::models::DeclaredType;

/// Remembers the verdict per declared type.
///
/// Two threads may compute the same verdict concurrently; both get the same
/// answer, so no cross-key locking is needed.
pub struct CachedApiBoundary {
    delegate: Arc<dyn ApiBoundary>,
    verdicts: DashMap<DeclaredType, bool>,
}

impl CachedApiBoundary {
    pub fn new(delegate: Arc<dyn ApiBoundary>) -> Self {
        Self {
            delegate,
            verdicts: DashMap::new(),
        }
    }

    pub fn delegate(&self) -> &Arc<dyn ApiBoundary> {
        &self.delegate
    }

    pub fn memoized_verdicts(&self) -> usize {
        self.verdicts.len()
    }
}

impl ApiBoundary for CachedApiBoundary {
    fn is_api(&self, declared_type: &DeclaredType) -> bool {
        if let Some(verdict) = self.verdicts.get(declared_type) {
            return *verdict;
        }
        let verdict = self.delegate.is_api(declared_type);
        self.verdicts.insert(declared_type.clone(), verdict);
        verdict
    }

    fn is_empty(&self) -> bool {
        self.delegate.is_empty()
    }

    fn kind(&self) -> BoundaryKind {
        self.delegate.kind()
    }

    fn archive_name(&self) -> &str {
        self.delegate.archive_name()
    }

    fn module_name(&self) -> Option<&str> {
        self.delegate.module_name()
    }
}

impl fmt::Display for CachedApiBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.delegate, f)
    }
}

impl fmt::Debug for CachedApiBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedApiBoundary")
            .field("delegate", &self.delegate.to_string())
            .field("memoized_verdicts", &self.verdicts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingBoundary {
        calls: AtomicUsize,
    }

    impl ApiBoundary for CountingBoundary {
        fn is_api(&self, declared_type: &DeclaredType) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            declared_type.package_name() == "org.foo"
        }

        fn is_empty(&self) -> bool {
            false
        }

        fn kind(&self) -> BoundaryKind {
            BoundaryKind::Platform
        }

        fn archive_name(&self) -> &str {
            "a.jar"
        }

        fn module_name(&self) -> Option<&str> {
            Some("counting")
        }
    }

    impl fmt::Display for CountingBoundary {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("counting boundary")
        }
    }

    #[test]
    fn test_verdicts_are_memoized() {
        let delegate = Arc::new(CountingBoundary {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedApiBoundary::new(delegate.clone());
        let api = DeclaredType::new("a.jar", "org.foo.A");
        let internal = DeclaredType::new("a.jar", "org.bar.B");

        for _ in 0..5 {
            assert!(cached.is_api(&api));
            assert!(!cached.is_api(&internal));
        }

        assert_eq!(delegate.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.memoized_verdicts(), 2);
    }

    #[test]
    fn test_delegates_description() {
        let cached = CachedApiBoundary::new(Arc::new(CountingBoundary {
            calls: AtomicUsize::new(0),
        }));
        assert_eq!(cached.to_string(), "counting boundary");
        assert_eq!(cached.module_name(), Some("counting"));
        assert_eq!(cached.archive_name(), "a.jar");
        assert!(!cached.is_empty());
    }
}
