//! `wifiscope clients`: one-shot poll and print.

use std::time::Duration;

use wifiscope_core::{ClientView, CoreError, Poller};

use crate::cli::{ClientsArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output::{self, ClientRow};

pub async fn handle(args: &ClientsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::resolve(global)?;
    let client = cfg.router.client()?;
    let url = client.base_url().to_string();
    let user = client.username().to_owned();

    let poller = Poller::new(client, cfg.polling.poller_config()?);
    poller.start().await?;
    let result = poller.snapshot_timeout(Duration::from_secs(args.wait)).await;
    let status = poller.current_status();
    poller.stop().await;

    let view = match result {
        Ok(view) => view,
        Err(CoreError::NotReady { waited_secs }) => {
            return Err(CliError::not_ready(waited_secs, &status, &url, &user));
        }
        Err(e) => return Err(e.into()),
    };

    let clients: Vec<&ClientView> = view.values().collect();
    let out = output::render_list(
        args.output,
        &clients,
        |c| ClientRow::from(*c),
        |c| c.mac_address.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
