//! CLI-aware wrappers around `wifiscope-config`.
//!
//! Loads the file + env config, then lets `GlobalOpts` flags win.

use wifiscope_config::{Config, load_config};

use crate::cli::{GlobalOpts, ServeArgs};
use crate::error::CliError;

/// Load the config and apply global flag overrides (flag > env > file).
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut config = load_config(global.config.as_deref())?;
    apply_global(&mut config, global);
    Ok(config)
}

fn apply_global(config: &mut Config, global: &GlobalOpts) {
    if let Some(ref host) = global.host {
        config.router.host.clone_from(host);
    }
    if let Some(ref user) = global.user {
        config.router.username.clone_from(user);
    }
    if global.insecure {
        config.router.insecure = true;
    }
    if let Some(timeout) = global.timeout {
        config.router.timeout_secs = timeout;
    }
}

/// Apply `serve` flag overrides.
pub fn apply_serve(config: &mut Config, args: &ServeArgs) {
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(ref dir) = args.static_dir {
        config.server.static_dir = Some(dir.clone());
    }
    if let Some(secs) = args.snapshot_timeout {
        config.server.snapshot_timeout_secs = Some(secs);
    }
}
