//! Assembly-loop behavior knobs.
//!
//! These are the loop's own toggles, not an outer surface: no files, no
//! CLI flags. A small `Config` + builder shape, the same pattern used
//! elsewhere in this workspace.

/// Configuration for an [`crate::assembly::AssemblyReader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssemblyConfig {
    peephole_enabled: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            peephole_enabled: true,
        }
    }
}

impl AssemblyConfig {
    /// Returns a builder seeded with the defaults (peephole enabled).
    #[must_use]
    pub fn builder() -> AssemblyConfigBuilder {
        AssemblyConfigBuilder::default()
    }

    /// Whether adjacent `endField(f,i); startField(f,i)` pairs are elided.
    /// Always correct to leave enabled; the toggle exists purely for
    /// differential testing against the un-optimized event stream.
    #[must_use]
    pub const fn peephole_enabled(&self) -> bool {
        self.peephole_enabled
    }
}

/// Builder for [`AssemblyConfig`].
#[derive(Clone, Copy, Debug, Default)]
pub struct AssemblyConfigBuilder {
    peephole_enabled: Option<bool>,
}

impl AssemblyConfigBuilder {
    /// Enables or disables the endField/startField peephole optimization.
    #[must_use]
    pub const fn peephole_enabled(mut self, enabled: bool) -> Self {
        self.peephole_enabled = Some(enabled);
        self
    }

    /// Finalizes the configuration.
    #[must_use]
    pub fn build(self) -> AssemblyConfig {
        AssemblyConfig {
            peephole_enabled: self.peephole_enabled.unwrap_or(true),
        }
    }
}
