//! Context value and builder.

use crate::coerce::TemporalKind;

/// Read-only environment and pattern configuration consumed by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoercionContext {
    environments: Vec<String>,
    date_pattern: Option<String>,
    time_pattern: Option<String>,
    date_time_pattern: Option<String>,
    zoned_date_time_pattern: Option<String>,
}

impl CoercionContext {
    pub fn builder() -> CoercionContextBuilder {
        CoercionContextBuilder::default()
    }

    /// Environment names, highest priority first.
    pub fn environments(&self) -> &[String] {
        &self.environments
    }

    pub fn date_pattern(&self) -> Option<&str> {
        self.date_pattern.as_deref()
    }

    pub fn time_pattern(&self) -> Option<&str> {
        self.time_pattern.as_deref()
    }

    pub fn date_time_pattern(&self) -> Option<&str> {
        self.date_time_pattern.as_deref()
    }

    pub fn zoned_date_time_pattern(&self) -> Option<&str> {
        self.zoned_date_time_pattern.as_deref()
    }

    /// The configured pattern for a temporal kind.
    pub fn pattern_for(&self, kind: TemporalKind) -> Option<&str> {
        match kind {
            TemporalKind::Date => self.date_pattern(),
            TemporalKind::Time => self.time_pattern(),
            TemporalKind::DateTime => self.date_time_pattern(),
            TemporalKind::ZonedDateTime => self.zoned_date_time_pattern(),
        }
    }

    /// Move `environment` to the front of the priority list.
    pub(crate) fn prioritize(&mut self, environment: &str) {
        self.environments.retain(|e| e != environment);
        self.environments.insert(0, environment.to_string());
    }
}

/// Builder for [`CoercionContext`].
#[derive(Debug, Clone, Default)]
pub struct CoercionContextBuilder {
    inner: CoercionContext,
}

impl CoercionContextBuilder {
    /// Set the environments, highest priority first.
    pub fn environments<I, S>(mut self, environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.environments = environments.into_iter().map(Into::into).collect();
        self
    }

    /// Append one environment with the lowest priority so far.
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.inner.environments.push(environment.into());
        self
    }

    pub fn date_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.inner.date_pattern = Some(pattern.into());
        self
    }

    pub fn time_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.inner.time_pattern = Some(pattern.into());
        self
    }

    pub fn date_time_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.inner.date_time_pattern = Some(pattern.into());
        self
    }

    pub fn zoned_date_time_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.inner.zoned_date_time_pattern = Some(pattern.into());
        self
    }

    /// Finish the context. Repeated environments keep their first position.
    pub fn build(mut self) -> CoercionContext {
        let mut seen = std::collections::HashSet::new();
        self.inner.environments.retain(|e| seen.insert(e.clone()));
        self.inner
    }
}
