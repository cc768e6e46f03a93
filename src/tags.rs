//! Instance tag keys understood by the reconciler
//!
//! | Tag Key | Description |
//! |---------|-------------|
//! | `machine__install_chef` | Set to `"false"` to exclude an instance |
//! | `machine__ssh_keyfile` | Keyfile name overriding the instance key pair |
//! | `machine__ssh_user` | SSH user overriding the default identity |

/// Tag key that opts an instance out of enrollment when set to `"false"`.
pub const TAG_INSTALL_CHEF: &str = "machine__install_chef";

/// Tag key naming the SSH keyfile to use instead of the key-pair name.
pub const TAG_SSH_KEYFILE: &str = "machine__ssh_keyfile";

/// Tag key naming the SSH user to connect as.
pub const TAG_SSH_USER: &str = "machine__ssh_user";

/// SSH user assumed when `machine__ssh_user` is absent.
pub const DEFAULT_SSH_USER: &str = "ec2-user";
