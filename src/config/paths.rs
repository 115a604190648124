//! Install-root path convention.
//!
//! Relative install paths start with the install directory name (`qof/...`).
//! They resolve against the outermost ancestor of the working directory that
//! carries that name, so a binary launched anywhere inside a checkout finds
//! the checkout's files. Outside a checkout the working directory itself is
//! the install directory, so `qof/config/qofcfg.toml` becomes
//! `./config/qofcfg.toml`.

use std::env;
use std::path::{Component, Path, PathBuf};

/// Default component configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "qof/config/qofcfg.toml";

/// Default TLS certificate.
pub const DEFAULT_PEM_PATH: &str = "qof/support/TLS/qof.pem";

/// Default TLS private key.
pub const DEFAULT_KEY_PATH: &str = "qof/support/TLS/qof.key";

/// Default SSL key log written by the TLS listener.
pub const DEFAULT_KEY_LOG_PATH: &str = "qof/log/qofsslkey.log";

/// Resolve `relative` against the current working directory.
pub fn install_path(relative: &str) -> PathBuf {
    match env::current_dir() {
        Ok(cwd) => resolve_install_path(&cwd, relative),
        Err(_) => PathBuf::from(relative),
    }
}

/// Resolve `relative` against `cwd` following the install-root convention.
pub fn resolve_install_path(cwd: &Path, relative: &str) -> PathBuf {
    let relative = Path::new(relative);
    let root = match relative.components().next() {
        Some(Component::Normal(root)) => root,
        _ => return cwd.join(relative),
    };

    let ancestors: Vec<&Path> = cwd.ancestors().collect();
    for ancestor in ancestors.into_iter().rev() {
        if ancestor.file_name() == Some(root) {
            let base = ancestor.parent().unwrap_or(ancestor);
            return base.join(relative);
        }
    }

    match relative.strip_prefix(root) {
        Ok(rest) => cwd.join(rest),
        Err(_) => cwd.join(relative),
    }
}
