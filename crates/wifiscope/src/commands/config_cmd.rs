//! Config subcommand handlers.

use wifiscope_config::{config_path, store_password, to_redacted_toml};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::resolve(global)?;
            output::print_output(to_redacted_toml(&cfg)?.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let path = global.config.clone().unwrap_or_else(config_path);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::resolve(global)?;
            let host = cfg.router.host.trim();
            if host.is_empty() {
                return Err(CliError::Validation {
                    field: "router.host".into(),
                    reason: "set --host or router.host to choose which router the password is for"
                        .into(),
                });
            }

            let password = rpassword::prompt_password(format!(
                "Password for {}@{host}: ",
                cfg.router.username
            ))?;
            store_password(host, &password)?;
            if !global.quiet {
                eprintln!("Password stored in the system keyring for {host}");
            }
            Ok(())
        }
    }
}
