use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use gateway_guard::config::loader::parse_config;
use gateway_guard::config::validation::{parse_method, validate_config};
use gateway_guard::config::GatewayConfig;
use gateway_guard::security::{check_path, AccessPolicy};

#[derive(Parser)]
#[command(name = "policy-check")]
#[command(about = "Inspect and dry-run the gateway access policy", long_about = None)]
struct Cli {
    /// Gateway config file (defaults to the built-in rule table).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the whole configuration
    Validate,
    /// List the compiled rules in evaluation order
    Rules,
    /// Evaluate one request against the policy
    Evaluate {
        #[arg(short, long, default_value = "GET")]
        method: String,

        #[arg(short, long)]
        path: String,

        /// Caller role (repeatable). Implies an authenticated caller.
        #[arg(short, long = "role")]
        roles: Vec<String>,

        /// Treat the caller as authenticated even without roles.
        #[arg(short, long)]
        authenticated: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => parse_config(&std::fs::read_to_string(path)?)?,
        None => GatewayConfig::default(),
    };

    match cli.command {
        Commands::Validate => match validate_config(&config) {
            Ok(()) => {
                println!("Configuration OK ({} rule clauses)", config.rules.len());
                Ok(ExitCode::SUCCESS)
            }
            Err(errors) => {
                for error in errors {
                    println!("  - {}", error);
                }
                Ok(ExitCode::FAILURE)
            }
        },
        Commands::Rules => {
            let policy = AccessPolicy::from_config(&config.rules)?;
            for (index, rule) in policy.rules().iter().enumerate() {
                println!("{:>3}  {}", index, rule);
            }
            println!("  *  (no match) -> authenticated");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Evaluate {
            method,
            path,
            roles,
            authenticated,
        } => {
            let policy = AccessPolicy::from_config(&config.rules)?;
            let method = parse_method(&method).ok_or_else(|| format!("invalid method `{}`", method))?;
            let is_authenticated = authenticated || !roles.is_empty();
            let roles: HashSet<String> = roles.into_iter().collect();

            if let Err(rejection) = check_path(&path) {
                println!("path refused: {}", rejection);
                println!("decision: bad_request");
                return Ok(ExitCode::SUCCESS);
            }

            match policy.matching_rule(&method, &path) {
                Some((index, rule)) => {
                    let variables: Vec<&str> = rule.pattern.placeholders().collect();
                    println!("matched rule {}: {}", index, rule);
                    if !variables.is_empty() {
                        println!("path variables: {}", variables.join(", "));
                    }
                }
                None => println!("no rule matched, default applies"),
            }

            let decision = policy.evaluate(&method, &path, &roles, is_authenticated);
            println!("decision: {}", decision);
            Ok(ExitCode::SUCCESS)
        }
    }
}
