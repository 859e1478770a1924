use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use squill::cli::{self, OutputFormat};
use squill::config;
use squill::dashboard::Variant;

#[derive(Debug, Parser)]
#[command(name = "squill")]
#[command(about = "Billing analytics dashboard for the Squill platform")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the web dashboard locally
    Serve {
        /// Listen address (overrides [web] addr)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_open: bool,
    },
    /// Log in to the billing API and store the token
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Use the configured demo credentials
        #[arg(long, conflicts_with_all = ["email", "password"])]
        demo: bool,
    },
    /// Forget the stored token
    Logout,
    /// Show session, configuration and event log state
    Status,
    /// Print the assembled dashboard figures
    Dashboard {
        /// Layout: minimal, bento, brutalist (default from config)
        #[arg(long)]
        variant: Option<Variant>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Render an invoice document as PDF
    Invoice {
        /// Invoice id (default: the first invoice of the layout)
        id: Option<String>,
        /// Layout whose invoice rows to use
        #[arg(long)]
        variant: Option<Variant>,
        /// Directory to write the PDF into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Subscription tiers and usage billing
    Pricing {
        #[command(subcommand)]
        action: PricingAction,
    },
    /// Deploy the frontend and backend to AWS
    Deploy {
        #[command(subcommand)]
        action: DeployAction,
    },
    /// Manage squill configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum PricingAction {
    /// List the subscription tiers
    Tiers {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Price monthly usage on a tier
    Bill {
        /// Tier: basic, pro, enterprise
        tier: String,
        /// Usage as metric=value (customers, api_calls, storage_gb)
        #[arg(required = true)]
        usage: Vec<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Price client usage events with the default per-event rates
    Charge {
        /// Events as event_type=quantity (api_call, storage_gb, transaction)
        #[arg(required = true)]
        events: Vec<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Debug, Subcommand)]
enum DeployAction {
    /// Print the deployment steps without running them
    Plan,
    /// Publish the built frontend to a new S3 website bucket
    Frontend {
        /// Print commands instead of running them
        #[arg(long)]
        dry_run: bool,
    },
    /// Deploy the serverless backend
    Backend {
        /// Print commands instead of running them
        #[arg(long)]
        dry_run: bool,
    },
    /// Extract the production API URL from `serverless info` output
    ApiUrl {
        /// Read the output from a file instead of running the command
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Check that deployed URLs answer
    Verify {
        /// URLs to check (default: from the deployment info file)
        urls: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective (merged) configuration
    Show,
    /// Create a default config file at ~/.squill/config.toml
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a configuration value (e.g., `squill config set dashboard.variant bento`)
    Set {
        /// Dotted key path (e.g., api.base_url)
        key: String,
        /// Value to set
        value: String,
    },
    /// Reset configuration to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { addr, no_open } => cli::run_serve(config::load(), addr, no_open),
        Commands::Login {
            email,
            password,
            demo,
        } => cli::run_login(&config::load(), email, password, demo),
        Commands::Logout => cli::run_logout(&config::load()),
        Commands::Status => cli::run_status(&config::load()),
        Commands::Dashboard { variant, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_dashboard(&config::load(), variant, fmt)
        }
        Commands::Invoice {
            id,
            variant,
            out_dir,
        } => cli::run_invoice(&config::load(), id.as_deref(), variant, &out_dir),
        Commands::Pricing { action } => match action {
            PricingAction::Tiers { format } => {
                cli::run_pricing_tiers(OutputFormat::from_str_opt(Some(&format)))
            }
            PricingAction::Bill {
                tier,
                usage,
                format,
            } => cli::run_pricing_bill(&tier, &usage, OutputFormat::from_str_opt(Some(&format))),
            PricingAction::Charge { events, format } => {
                cli::run_pricing_charge(&events, OutputFormat::from_str_opt(Some(&format)))
            }
        },
        Commands::Deploy { action } => {
            let config = config::load();
            match action {
                DeployAction::Plan => cli::run_deploy_plan(&config),
                DeployAction::Frontend { dry_run } => cli::run_deploy_frontend(&config, dry_run),
                DeployAction::Backend { dry_run } => cli::run_deploy_backend(&config, dry_run),
                DeployAction::ApiUrl { file } => cli::run_deploy_api_url(&config, file.as_deref()),
                DeployAction::Verify { urls } => cli::run_deploy_verify(&config, urls),
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
