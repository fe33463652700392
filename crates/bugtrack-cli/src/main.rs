// Bugtrack CLI - command-line client for the bug tracker API

mod client;
mod output;

use bugtrack_core::{BugInput, ListParams};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use uuid::Uuid;

use client::{ApiClient, DEFAULT_API_URL};

/// Bugtrack - track bugs from the terminal
#[derive(Parser)]
#[command(name = "bugtrack")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the bug API
    #[arg(long, global = true, env = "BUGTRACK_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List bugs
    List {
        /// Only bugs with this status
        #[arg(long)]
        status: Option<String>,

        /// Only bugs with this priority
        #[arg(long)]
        priority: Option<String>,

        /// Only bugs in this project
        #[arg(long)]
        project: Option<String>,

        /// Sort fields, e.g. "-createdAt" or "priority,title"
        #[arg(long, allow_hyphen_values = true)]
        sort: Option<String>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Show a single bug
    Show {
        id: Uuid,

        #[arg(long)]
        json: bool,
    },
    /// Report a new bug
    Create {
        #[command(flatten)]
        fields: CreateFields,

        #[arg(long)]
        json: bool,
    },
    /// Change fields of an existing bug
    Update {
        id: Uuid,

        #[command(flatten)]
        fields: UpdateFields,

        #[arg(long)]
        json: bool,
    },
    /// Delete a bug
    Delete { id: Uuid },
    /// Show bug counts by status, priority and project
    Stats {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct CreateFields {
    #[arg(long)]
    title: String,

    #[arg(long)]
    description: String,

    #[arg(long)]
    reported_by: String,

    #[arg(long)]
    project: String,

    #[arg(long)]
    status: Option<String>,

    #[arg(long)]
    priority: Option<String>,

    #[arg(long)]
    assigned_to: Option<String>,

    /// Steps to reproduce
    #[arg(long)]
    steps: Option<String>,
}

impl From<CreateFields> for BugInput {
    fn from(fields: CreateFields) -> Self {
        BugInput {
            title: Some(fields.title),
            description: Some(fields.description),
            status: fields.status,
            priority: fields.priority,
            assigned_to: fields.assigned_to,
            reported_by: Some(fields.reported_by),
            steps_to_reproduce: fields.steps,
            project: Some(fields.project),
        }
    }
}

#[derive(Args)]
struct UpdateFields {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    status: Option<String>,

    #[arg(long)]
    priority: Option<String>,

    #[arg(long)]
    assigned_to: Option<String>,

    #[arg(long)]
    reported_by: Option<String>,

    /// Steps to reproduce
    #[arg(long)]
    steps: Option<String>,

    #[arg(long)]
    project: Option<String>,
}

impl From<UpdateFields> for BugInput {
    fn from(fields: UpdateFields) -> Self {
        BugInput {
            title: fields.title,
            description: fields.description,
            status: fields.status,
            priority: fields.priority,
            assigned_to: fields.assigned_to,
            reported_by: fields.reported_by,
            steps_to_reproduce: fields.steps,
            project: fields.project,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api_url);

    if let Err(e) = run(&client, cli.command) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(client: &ApiClient, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List {
            status,
            priority,
            project,
            sort,
            page,
            limit,
            json,
        } => {
            let params = ListParams {
                status,
                priority,
                project,
                sort,
                page: page.map(|p| p.to_string()),
                limit: limit.map(|l| l.to_string()),
            };
            let list = client.list(&params)?;
            if json {
                print_json(&list)
            } else {
                println!("{}", output::format_bug_list(&list));
                Ok(())
            }
        }
        Commands::Show { id, json } => {
            let bug = client.get(id)?;
            if json {
                print_json(&bug)
            } else {
                println!("{}", output::format_bug_detail(&bug));
                Ok(())
            }
        }
        Commands::Create { fields, json } => {
            let bug = client.create(&fields.into())?;
            if json {
                print_json(&bug)
            } else {
                println!("{} Created bug {}", "✓".green().bold(), bug.id);
                println!();
                println!("{}", output::format_bug_detail(&bug));
                Ok(())
            }
        }
        Commands::Update { id, fields, json } => {
            let input: BugInput = fields.into();
            if input == BugInput::default() {
                anyhow::bail!("Nothing to update; pass at least one field option");
            }
            let bug = client.update(id, &input)?;
            if json {
                print_json(&bug)
            } else {
                println!("{} Updated bug {}", "✓".green().bold(), bug.id);
                println!();
                println!("{}", output::format_bug_detail(&bug));
                Ok(())
            }
        }
        Commands::Delete { id } => {
            let message = client.delete(id)?;
            println!("{} {}", "✓".green().bold(), message);
            Ok(())
        }
        Commands::Stats { json } => {
            let stats = client.stats()?;
            if json {
                print_json(&stats)
            } else {
                println!("{}", output::format_stats(&stats));
                Ok(())
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
