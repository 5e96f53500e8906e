//! Read-only subcommands: nothing is written and no process is spawned

use anyhow::{Context, Result};
use apim_policy::{PolicyConfig, PolicyPayload, policy_resource_uri, render_policy};

/// Handle `apim-policy render [--json]`
pub fn handle_render(config: &PolicyConfig, json: bool) -> Result<()> {
    let document = render_policy(config);

    if json {
        println!("{}", PolicyPayload::new(document).to_pretty_json()?);
    } else {
        println!("{document}");
    }
    Ok(())
}

/// Handle `apim-policy uri`
pub fn handle_uri(config: &PolicyConfig) {
    println!("{}", policy_resource_uri(config));
}

/// Handle `apim-policy show-config`
pub fn handle_show_config(config: &PolicyConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;
    println!("{json}");
    Ok(())
}
