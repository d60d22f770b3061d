use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::*;

use shadow_nova::api::{CreateProjectRequest, Project, SubmitProjectRequest, User};
use shadow_nova::config::ClientConfig;
use shadow_nova::logging::{init_logging, LoggingConfig};
use shadow_nova::notification::NotificationRenderer;
use shadow_nova::{ApiResult, Client};

#[derive(Parser)]
#[command(name = "nova")]
#[command(version, about = "Command-line client for the Shadow Nova learning platform")]
#[command(after_help = "Examples:
  nova login --token <GOOGLE_ID_TOKEN>   Sign in with a Google ID token
  nova projects list                     Show the project catalogue
  nova admin collector-frequency 6       Run the collector six times a day

Settings are read from --config and NOVA__* environment variables,
e.g. NOVA__API_URL=https://api.example.com")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Backend URL (overrides the configuration)
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Disable colors (also respects NO_COLOR)
    #[arg(long, global = true)]
    no_color: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a Google ID token
    Login {
        /// ID token issued by Google Sign-In
        #[arg(long, value_name = "TOKEN")]
        token: String,
    },
    /// Complete a Google OAuth redirect
    Callback {
        /// Authorization code from the redirect URL
        code: String,
    },
    /// Link a GitHub account to the signed-in user
    LinkGithub {
        /// Authorization code from GitHub
        code: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse, create and submit projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Administrative settings
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List all projects
    List {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a project
    Create {
        /// Identifier (slug)
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "beginner")]
        difficulty: String,
        /// Technology used (repeatable)
        #[arg(long = "tech", value_name = "NAME")]
        technologies: Vec<String>,
    },
    /// Submit work for a project
    Submit {
        /// Project identifier
        #[arg(long = "project", value_name = "ID")]
        project_id: String,
        /// Repository with the solution
        #[arg(long = "repo", value_name = "URL")]
        github_repo_url: String,
        #[arg(long = "pr", value_name = "URL")]
        pr_url: Option<String>,
        #[arg(long = "demo", value_name = "URL")]
        demo_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Set how many times per day the content collector runs
    CollectorFrequency {
        #[arg(value_name = "RUNS_PER_DAY")]
        runs_per_day: u32,
    },
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let config = ClientConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    match &cli.api_url {
        Some(api_url) => config.with_api_url(api_url.as_str()).context("Invalid --api-url"),
        None => Ok(config),
    }
}

fn print_user(user: &User) {
    println!("{} {}", user.name.bold(), format!("<{}>", user.email).dimmed());
    match &user.github_username {
        Some(github) => println!("  GitHub: {}", github.cyan()),
        None => println!("  GitHub: {}", "not linked".dimmed()),
    }
}

fn print_project(project: &Project) {
    println!(
        "{} {} {}",
        project.id.cyan(),
        project.title.bold(),
        format!("[{}]", project.difficulty).dimmed()
    );
    if !project.description.is_empty() {
        println!("    {}", project.description);
    }
    if !project.tech_stack.is_empty() {
        println!("    {}", project.tech_stack.join(", ").dimmed());
    }
}

/// Hooks already report failures through the notifier.
fn exit_code<T>(result: &ApiResult<T>) -> ExitCode {
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    init_logging(LoggingConfig::from_verbosity(config.log_level, cli.verbose));

    let use_color = !cli.no_color && std::env::var_os("NO_COLOR").is_none();
    if !use_color {
        colored::control::set_override(false);
    }
    let notifier = Arc::new(NotificationRenderer::new().with_colors(use_color));
    let client = Client::connect(&config, notifier).context("Failed to start client")?;

    let code = match cli.command {
        Commands::Login { token } => {
            let result = client.auth().login(&token).await;
            if let Ok(auth) = &result {
                print_user(&auth.user);
            }
            exit_code(&result)
        }
        Commands::Callback { code } => {
            let result = client.auth().handle_google_callback(&code).await;
            if let Ok(auth) = &result {
                print_user(&auth.user);
            }
            exit_code(&result)
        }
        Commands::LinkGithub { code } => exit_code(&client.auth().link_github(&code).await),
        Commands::Logout => {
            client.auth().logout();
            ExitCode::SUCCESS
        }
        Commands::Whoami => match client.auth().user() {
            Some(user) => {
                print_user(&user);
                ExitCode::SUCCESS
            }
            None => {
                println!("{}", "Not logged in".yellow());
                ExitCode::FAILURE
            }
        },
        Commands::Projects { command } => match command {
            ProjectCommands::List { json } => {
                let result = client.projects().fetch_projects().await;
                if let Ok(projects) = &result {
                    if json {
                        println!("{}", serde_json::to_string_pretty(projects)?);
                    } else if projects.is_empty() {
                        println!("{}", "No projects yet".dimmed());
                    } else {
                        projects.iter().for_each(print_project);
                    }
                }
                exit_code(&result)
            }
            ProjectCommands::Create {
                id,
                title,
                description,
                difficulty,
                technologies,
            } => {
                let request = CreateProjectRequest {
                    id,
                    title,
                    description,
                    difficulty,
                    technologies,
                };
                let result = client.projects().create_project(&request).await;
                if let Ok(project) = &result {
                    print_project(project);
                }
                exit_code(&result)
            }
            ProjectCommands::Submit {
                project_id,
                github_repo_url,
                pr_url,
                demo_url,
            } => {
                let request = SubmitProjectRequest {
                    project_id,
                    github_repo_url,
                    pr_url,
                    demo_url,
                };
                exit_code(&client.projects().submit_project(&request).await)
            }
        },
        Commands::Admin { command } => match command {
            AdminCommands::CollectorFrequency { runs_per_day } => {
                exit_code(&client.admin().update_collector_frequency(runs_per_day).await)
            }
        },
    };
    Ok(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
