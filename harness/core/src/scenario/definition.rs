use nightly_harness_config::scenario_base_name;

/// A single named test case driven against the network by an external
/// program. Immutable once constructed; sequences define their specs up
/// front rather than parsing invocation text at run time.
#[derive(Clone, Debug)]
pub struct ScenarioSpec {
    name: String,
    args: Vec<String>,
    intrinsic_lifecycle: bool,
}

impl ScenarioSpec {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            intrinsic_lifecycle: false,
        }
    }

    /// Attach opaque `key=value` tokens forwarded verbatim to the program.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the scenario as managing its own environment end to end; the
    /// runner then only forwards control.
    #[must_use]
    pub const fn with_intrinsic_lifecycle(mut self) -> Self {
        self.intrinsic_lifecycle = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub const fn intrinsic_lifecycle(&self) -> bool {
        self.intrinsic_lifecycle
    }

    /// Override-store lookup key: the program name with its extension
    /// stripped.
    #[must_use]
    pub fn base_name(&self) -> &str {
        scenario_base_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_drops_program_extension() {
        let spec = ScenarioSpec::new("itst01.sh").with_args(["node=5"]);
        assert_eq!(spec.base_name(), "itst01");
        assert_eq!(spec.args(), ["node=5"]);
        assert!(!spec.intrinsic_lifecycle());
    }
}
