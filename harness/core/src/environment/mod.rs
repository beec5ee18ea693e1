mod control;
mod handle;
mod provisioner;
mod toolkit;

pub use control::EnvironmentControl;
pub use handle::{EnvironmentHandle, EnvironmentState};
pub use provisioner::{Provisioner, ProvisioningError};
pub use toolkit::{NET_DIR_ENV, ToolkitCommandError, ToolkitControl, resolve_toolkit_bin};
