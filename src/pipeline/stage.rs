/// Result of one pipeline stage. `Degraded` means the stage produced a
/// usable value through a fallback path; callers can tell the difference
/// without digging through logs.
#[derive(Debug, Clone, PartialEq)]
pub enum StageResult<T> {
    Clean(T),
    Degraded(T, Vec<String>),
}

impl<T> StageResult<T> {
    pub fn degraded(value: T, warning: impl Into<String>) -> Self {
        StageResult::Degraded(value, vec![warning.into()])
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StageResult::Degraded(..))
    }

    pub fn value(&self) -> &T {
        match self {
            StageResult::Clean(v) => v,
            StageResult::Degraded(v, _) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            StageResult::Clean(v) => v,
            StageResult::Degraded(v, _) => v,
        }
    }

    pub fn into_parts(self) -> (T, Vec<String>) {
        match self {
            StageResult::Clean(v) => (v, Vec::new()),
            StageResult::Degraded(v, w) => (v, w),
        }
    }

    /// Attach a further warning, turning a clean result degraded.
    pub fn with_warning(self, warning: impl Into<String>) -> Self {
        let (value, mut warnings) = self.into_parts();
        warnings.push(warning.into());
        StageResult::Degraded(value, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_has_no_warnings() {
        let r = StageResult::Clean(5);
        assert!(!r.is_degraded());
        assert_eq!(r.value(), &5);
        assert_eq!(r.into_parts(), (5, vec![]));
    }

    #[test]
    fn degraded_carries_warnings() {
        let r = StageResult::degraded("x", "fell back");
        assert!(r.is_degraded());
        let (value, warnings) = r.into_parts();
        assert_eq!(value, "x");
        assert_eq!(warnings, vec!["fell back".to_owned()]);
    }

    #[test]
    fn with_warning_accumulates() {
        let r = StageResult::Clean(1).with_warning("a").with_warning("b");
        let (_, warnings) = r.into_parts();
        assert_eq!(warnings.len(), 2);
    }
}
