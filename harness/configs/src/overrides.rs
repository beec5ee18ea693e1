use std::path::{Path, PathBuf};

use tracing::debug;

const GLOBAL_OVERRIDE_FILE: &str = "global.toml";

/// Override kinds a scenario may supply.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OverrideKind {
    Chainspec,
    Accounts,
    NodeConfig,
}

impl OverrideKind {
    pub const ALL: [Self; 3] = [Self::Chainspec, Self::Accounts, Self::NodeConfig];

    /// Store subdirectory holding files of this kind.
    #[must_use]
    pub const fn subdir(self) -> &'static str {
        match self {
            Self::Chainspec => "chainspecs",
            Self::Accounts => "accounts",
            Self::NodeConfig => "configs",
        }
    }

    /// File suffix appended to the scenario base name.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Chainspec => "chainspec.toml",
            Self::Accounts => "accounts.toml",
            Self::NodeConfig => "config.toml",
        }
    }

    /// Toolkit setup argument key carrying the override path.
    #[must_use]
    pub const fn setup_key(self) -> &'static str {
        match self {
            Self::Chainspec => "chainspec_path",
            Self::Accounts => "accounts_path",
            Self::NodeConfig => "config_path",
        }
    }
}

/// Override paths found for one scenario. Only files that exist on the store
/// are included; an absent file leaves its slot empty.
#[derive(Clone, Debug, Default)]
pub struct OverrideBundle {
    pub chainspec: Option<PathBuf>,
    pub accounts: Option<PathBuf>,
    pub node_config: Option<PathBuf>,
}

impl OverrideBundle {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        OverrideKind::ALL.iter().all(|kind| self.get(*kind).is_none())
    }

    #[must_use]
    pub fn get(&self, kind: OverrideKind) -> Option<&PathBuf> {
        match kind {
            OverrideKind::Chainspec => self.chainspec.as_ref(),
            OverrideKind::Accounts => self.accounts.as_ref(),
            OverrideKind::NodeConfig => self.node_config.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: OverrideKind) -> &mut Option<PathBuf> {
        match kind {
            OverrideKind::Chainspec => &mut self.chainspec,
            OverrideKind::Accounts => &mut self.accounts,
            OverrideKind::NodeConfig => &mut self.node_config,
        }
    }

    /// Render the bundle as `key=path` setup arguments for the toolkit.
    #[must_use]
    pub fn setup_args(&self) -> Vec<String> {
        OverrideKind::ALL
            .iter()
            .filter_map(|kind| {
                self.get(*kind)
                    .map(|path| format!("{}={}", kind.setup_key(), path.display()))
            })
            .collect()
    }
}

/// Read-only view over the on-disk override store.
#[derive(Clone, Debug)]
pub struct OverrideStore {
    root: PathBuf,
}

impl OverrideStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Deterministic location of one override file.
    #[must_use]
    pub fn path_for(&self, kind: OverrideKind, base: &str) -> PathBuf {
        self.root
            .join(kind.subdir())
            .join(format!("{base}.{}", kind.suffix()))
    }

    /// Collect the overrides present for a scenario. A missing file is not an
    /// error; the slot is simply left empty.
    #[must_use]
    pub fn resolve(&self, base: &str) -> OverrideBundle {
        let mut bundle = OverrideBundle::default();
        for kind in OverrideKind::ALL {
            let candidate = self.path_for(kind, base);
            if candidate.is_file() {
                debug!(kind = ?kind, path = %candidate.display(), "scenario override found");
                *bundle.slot_mut(kind) = Some(candidate);
            }
        }
        bundle
    }

    /// Session-wide override applied to every provisioning when present.
    #[must_use]
    pub fn global_override(&self) -> Option<PathBuf> {
        let candidate = self.root.join(GLOBAL_OVERRIDE_FILE);
        candidate.is_file().then_some(candidate)
    }
}

/// Override lookup key for a scenario: the invocation token with any file
/// extension stripped (`"itst01.sh"` resolves as `"itst01"`).
#[must_use]
pub fn scenario_base_name(token: &str) -> &str {
    Path::new(token)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(token)
}
