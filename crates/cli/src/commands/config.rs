//! `ciam config use|get|list`

use anyhow::{bail, Result};
use ciam_domain::{CliConfig, Environment, Region, Target};

use crate::cli::ConfigCommand;
use crate::context::AppContext;
use crate::output;

pub fn handle(ctx: &mut AppContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Use { shorthand, region, env, store_id } => {
            use_target(ctx, shorthand, region, env, store_id)
        }
        ConfigCommand::Get => {
            println!("{}", describe(&ctx.config));
            Ok(())
        }
        ConfigCommand::List => {
            println!("Valid Regions: {}", Region::valid_values());
            println!("Valid Envs:    {}", Environment::valid_values());
            println!();
            println!("{}", describe(&ctx.config));
            Ok(())
        }
    }
}

fn use_target(
    ctx: &mut AppContext,
    shorthand: Option<Target>,
    region: Option<Region>,
    env: Option<Environment>,
    store_id: Option<String>,
) -> Result<()> {
    let region = region.or(shorthand.map(|t| t.region));
    let env = env.or(shorthand.map(|t| t.environment));
    let (Some(region), Some(env)) = (region, env) else {
        bail!(ciam_domain::CiamError::Config(
            "Both region and environment are required (e.g. `ciam config use us-qa`)".into()
        ));
    };

    let mut updated = CliConfig { region: Some(region), env: Some(env), store_id: ctx.config.store_id.clone() };
    if let Some(store_id) = store_id.filter(|s| !s.trim().is_empty()) {
        updated.store_id = Some(store_id.trim().to_string());
    }
    ctx.config_store.save(&updated)?;

    println!("{}", output::start("set config"));
    println!("{}", output::step(&format!("Region: {region}")));
    println!("{}", output::step(&format!("Environment: {env}")));
    if let Some(store_id) = &updated.store_id {
        println!("{}", output::step(&format!("Store ID: {store_id}")));
    }
    println!("{}", output::end("set config", true));

    ctx.config = updated;
    Ok(())
}

pub fn describe(config: &CliConfig) -> String {
    let or_unset = |value: Option<String>| value.unwrap_or_else(|| "(not set)".to_string());
    [
        "Current Configuration:".to_string(),
        format!("  Region:   {}", or_unset(config.region.map(|r| r.to_string()))),
        format!("  Env:      {}", or_unset(config.env.map(|e| e.to_string()))),
        format!("  Store ID: {}", or_unset(config.store_id.clone())),
    ]
    .join("\n")
}
