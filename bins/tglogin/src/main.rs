//! tglogin - Telegram login callback tool
//!
//! Checks the query string Telegram appends to a login callback URL, and
//! produces signed callbacks for testing a login endpoint.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tglogin_cli::output::{format_count, format_duration, print_json, redact, Status};
use tglogin_core::config::{Config, LogFormat};
use tglogin_core::error::{exit_codes, Error};
use tglogin_crypto::{canonical_blob, verify_callback, CallbackParams};
use tglogin_telemetry::{TelemetryConfig, Timer};

#[derive(Parser)]
#[command(name = "tglogin")]
#[command(about = "Verify and sign Telegram login callbacks")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file (defaults to .tglogin.toml if present)
    #[arg(short, long, global = true, env = "TGLOGIN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the signature of a callback query string
    Verify {
        /// Query string, full callback URL, or "-" to read stdin
        query: String,
    },

    /// Authenticate a callback and print the logged-in user
    Login {
        /// Query string, full callback URL, or "-" to read stdin
        query: String,

        /// Maximum callback age in seconds (0 disables the check)
        #[arg(long)]
        max_age: Option<u64>,
    },

    /// Add a valid hash to a callback query string
    Sign {
        /// Query string, full callback URL, or "-" to read stdin
        query: String,
    },

    /// Print the message a callback signature is computed over
    Canonical {
        /// Query string, full callback URL, or "-" to read stdin
        query: String,
    },

    /// Show the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => report(&err, json),
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let mut config = Config::load(cli.config.as_deref())?;
    init_logging(&config, cli.verbose)?;

    match cli.command {
        Commands::Verify { query } => cmd_verify(&config, &query, cli.json),
        Commands::Login { query, max_age } => {
            if let Some(secs) = max_age {
                config.schema.login.max_age_secs = secs;
            }
            cmd_login(&config, &query, cli.json)
        }
        Commands::Sign { query } => cmd_sign(&config, &query, cli.json),
        Commands::Canonical { query } => cmd_canonical(&config, &query, cli.json),
        Commands::Config => cmd_config(&config, cli.json),
    }
}

fn init_logging(config: &Config, verbose: bool) -> Result<()> {
    let logging = &config.schema.logging;
    tglogin_telemetry::init_with_config(TelemetryConfig {
        log_level: if verbose { "debug".to_string() } else { logging.level.clone() },
        json: logging.format == LogFormat::Json,
        ..TelemetryConfig::default()
    })
}

fn cmd_verify(config: &Config, query: &str, json: bool) -> Result<i32> {
    let secret = config.shared_secret()?;
    // Limits are enforced while decoding.
    let params = parse_query(query, config)?;

    let timer = Timer::start("verify_callback");
    let authentic = verify_callback(&params, &secret);
    let elapsed = timer.stop();
    tracing::info!(authentic, fields = params.len(), "callback verified");

    if json {
        print_json(&serde_json::json!({
            "authentic": authentic,
            "fields": params.len(),
            "has_signature": params.signature().is_some(),
        }))?;
    } else if authentic {
        Status::success(&format!(
            "Callback is authentic ({}, {})",
            format_count(params.len(), "field", "fields"),
            format_duration(elapsed)
        ));
    } else if params.signature().is_none() {
        Status::error("Callback is not authentic: no hash field");
    } else {
        Status::error("Callback is not authentic: hash does not match");
    }

    Ok(if authentic {
        exit_codes::SUCCESS
    } else {
        exit_codes::SECURITY_ERROR
    })
}

fn cmd_login(config: &Config, query: &str, json: bool) -> Result<i32> {
    let verifier = config.login_verifier()?;
    let params = parse_query(query, config)?;
    let user = verifier.authenticate(&params, Utc::now()).map_err(Error::from)?;

    if json {
        print_json(&user)?;
    } else {
        Status::success(&format!("Logged in as {}", user.display_name()));
        Status::field("id", &user.id.to_string());
        if let Some(username) = &user.username {
            Status::field("username", &format!("@{username}"));
        }
        if let Some(photo_url) = &user.photo_url {
            Status::field("photo", photo_url);
        }
        Status::field("auth date", &user.auth_date.to_rfc3339());
    }
    Ok(exit_codes::SUCCESS)
}

fn cmd_sign(config: &Config, query: &str, json: bool) -> Result<i32> {
    let secret = config.shared_secret()?;
    let signed = parse_query(query, config)?.signed(&secret);

    if json {
        print_json(&serde_json::json!({
            "hash": signed.signature(),
            "query": signed.to_query(),
        }))?;
    } else {
        println!("{}", signed.to_query());
    }
    Ok(exit_codes::SUCCESS)
}

fn cmd_canonical(config: &Config, query: &str, json: bool) -> Result<i32> {
    let blob = canonical_blob(&parse_query(query, config)?);

    if json {
        print_json(&serde_json::json!({ "canonical": blob }))?;
    } else {
        println!("{blob}");
    }
    Ok(exit_codes::SUCCESS)
}

fn cmd_config(config: &Config, json: bool) -> Result<i32> {
    let validation = config.validate();
    let token = config.shared_secret().ok().map(|s| redact(s.expose()));

    if json {
        print_json(&serde_json::json!({
            "path": config.path,
            "token": token,
            "settings": config.schema,
            "validation": validation,
        }))?;
    } else {
        Status::header("tglogin configuration");
        let path = config
            .path
            .as_ref()
            .map_or_else(|| "(defaults)".to_string(), |p| p.display().to_string());
        Status::field("file", &path);
        Status::field("token", token.as_deref().unwrap_or("(not set)"));
        Status::field("bot", config.schema.bot.name.as_deref().unwrap_or("(not set)"));
        Status::field(
            "callback url",
            config.schema.bot.callback_url.as_deref().unwrap_or("(not set)"),
        );
        Status::field("max fields", &config.schema.limits.max_fields.to_string());
        Status::field("max field len", &config.schema.limits.max_field_len.to_string());
        let max_age = match config.schema.login.max_age_secs {
            0 => "unlimited".to_string(),
            secs => format!("{secs}s"),
        };
        Status::field("max age", &max_age);

        for warning in validation.warnings() {
            Status::warning(&warning.to_string());
        }
        for error in validation.errors() {
            Status::error(&error.to_string());
        }
    }

    Ok(if validation.is_valid() {
        exit_codes::SUCCESS
    } else {
        exit_codes::VALIDATION_ERROR
    })
}

/// Decode the query argument within the configured limits.
fn parse_query(arg: &str, config: &Config) -> Result<CallbackParams> {
    let raw = if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read query from stdin")?;
        buf.trim().to_string()
    } else {
        arg.to_string()
    };

    CallbackParams::from_query_bounded(extract_query(&raw), &config.callback_limits())
        .map_err(|e| Error::from(e).into())
}

/// Accept either a bare query string or a full callback URL.
fn extract_query(input: &str) -> &str {
    if input.starts_with("http://") || input.starts_with("https://") {
        let query = input.split_once('?').map_or("", |(_, q)| q);
        query.split_once('#').map_or(query, |(q, _)| q)
    } else {
        input
    }
}

fn report(err: &anyhow::Error, json: bool) -> i32 {
    let Some(err) = err.downcast_ref::<Error>() else {
        Status::error(&format!("{err:#}"));
        return exit_codes::FAILURE;
    };

    if json {
        match serde_json::to_string_pretty(&err.to_report()) {
            Ok(report) => eprintln!("{report}"),
            Err(_) => Status::error(&err.to_string()),
        }
    } else {
        Status::error(&err.to_string());
    }
    err.exit_code()
}
