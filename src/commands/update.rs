use anyhow::Result;
use apim_policy::{
    CommandOutcome, ManagementCli, PolicyConfig, PolicyPayload, policy_resource_uri, render_policy,
    write_payload,
};
use std::process::ExitCode;

/// Handle `apim-policy update` (and the bare invocation)
///
/// Render → write payload → PUT through the management CLI. Local failures
/// are returned as errors before anything is sent; a failing CLI run is
/// reported and mirrored in the exit code.
pub async fn handle_update(config: &PolicyConfig, dry_run: bool) -> Result<ExitCode> {
    println!("Updating APIM policy...");

    let uri = policy_resource_uri(config);
    println!("URI: {uri}");

    // 1. Render and wrap
    let payload = PolicyPayload::new(render_policy(config));

    // 2. Persist the request body for the CLI to read
    write_payload(&config.payload_path, &payload).await?;
    println!("Payload written to {}", config.payload_path.display());

    // 3. Submit
    let cli = ManagementCli::new(&config.tool);
    println!("Running: {}", cli.command_line(&uri, &config.payload_path));

    if dry_run {
        println!("\nDry run: command not executed");
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = cli.put(&uri, &config.payload_path).await?;
    report(&outcome);

    Ok(exit_code_for(&outcome))
}

fn report(outcome: &CommandOutcome) {
    println!("\nSTDOUT:");
    println!("{}", outcome.stdout);

    if !outcome.stderr.is_empty() {
        println!("\nSTDERR:");
        println!("{}", outcome.stderr);
    }

    println!("\nReturn code: {}", outcome.exit_code);

    if outcome.success() {
        println!("\n✅ Policy updated successfully!");
    } else {
        println!("\n❌ Failed to update policy");
    }
}

/// Mirror the CLI's exit code; codes outside 1..=255 collapse to 1
fn exit_code_for(outcome: &CommandOutcome) -> ExitCode {
    if outcome.success() {
        return ExitCode::SUCCESS;
    }

    u8::try_from(outcome.exit_code)
        .ok()
        .filter(|code| *code != 0)
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE)
}
