use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use pathwalk_router::{ParamValue, PreparedRequest, Router, RouterConfig, ServerVar};
use tracing::debug;

pub struct ResolveArgs {
    pub request_uri: String,
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub delimiters: Option<(String, String)>,
    pub ext: Option<String>,
    pub fallback: Option<String>,
    pub int_params: Vec<String>,
    pub json: bool,
}

pub fn execute(args: ResolveArgs) -> Result<()> {
    let request = prepare(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&request)?);
    } else {
        print_request(&args.request_uri, &request);
    }

    Ok(())
}

/// Builds the router from config file and flags, then prepares the request
fn prepare(args: &ResolveArgs) -> Result<PreparedRequest> {
    let config = load_config(args.config.as_deref())?;
    let mut router = Router::new(config);
    apply_overrides(router.config_mut(), args)?;

    for token in &args.int_params {
        router = router.with_filter(token.clone(), |value: &str| {
            Ok(value.parse::<i64>().ok().map(ParamValue::Int))
        });
    }

    let root = args
        .root
        .canonicalize()
        .with_context(|| format!("Document root {:?} does not exist", args.root))?;
    debug!(
        root = %root.display(),
        request_uri = %args.request_uri,
        filters = ?router.filters().tokens(),
        "preparing request"
    );

    router
        .set_server("DOCUMENT_ROOT", root.to_string_lossy())?
        .set_server("REQUEST_URI", args.request_uri.as_str())?;

    router
        .prepare(None)
        .with_context(|| format!("Failed to resolve {}", args.request_uri))
}

fn load_config(path: Option<&Path>) -> Result<RouterConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file {:?} does not exist", path);
            }
            Ok(RouterConfig::load(path)?)
        }
        None => Ok(RouterConfig::load_default()?),
    }
}

fn apply_overrides(config: &mut RouterConfig, args: &ResolveArgs) -> Result<()> {
    if let Some((left, right)) = &args.delimiters {
        config
            .set("parameter_left_delimiter", left.as_str())?
            .set("parameter_right_delimiter", right.as_str())?;
    }
    if let Some(ext) = &args.ext {
        config.set("search_extensions", ext.as_str())?;
    }
    if let Some(fallback) = &args.fallback {
        config.set("fallback_script", fallback.as_str())?;
    }
    Ok(())
}

fn print_request(request_uri: &str, request: &PreparedRequest) {
    println!("{} {}", "✓".green(), request_uri.bold());
    println!();
    println!("  {:<20} {}", "include file".dimmed(), request.include_file.cyan());
    println!("  {:<20} {}", "translate directory".dimmed(), request.translate_directory);
    println!("  {:<20} {}", "virtual uri".dimmed(), request.virtual_uri);

    if let Some(extension) = &request.extension {
        println!("  {:<20} {}", "extension".dimmed(), extension.yellow());
    }

    if !request.parameters.is_empty() {
        let parameters: Vec<String> = request
            .parameters
            .iter()
            .enumerate()
            .map(|(i, value)| format!("[{}] {}", i, value))
            .collect();
        println!("  {:<20} {}", "parameters".dimmed(), parameters.join(", "));
    }

    println!();
    for (var, value) in request.server.iter() {
        let name = var.name();
        let name = if var == ServerVar::ScriptName {
            name.green().bold()
        } else {
            name.normal()
        };
        println!("  {:<20} {}", name, value);
    }
}
