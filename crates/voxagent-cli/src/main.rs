//! VoxAgent CLI: command-line client for the agent backend.
//!
//! Set VOXAGENT_API_URL (or API_URL); defaults to http://localhost:3001/api.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use voxagent_api_client::ApiClient;
use voxagent_cli::{init_tracing, test_call_data, upload_paths};
use voxagent_core::constants::{AGENT_SAVE_FAILED_MESSAGE, TEST_CALL_FAILED_MESSAGE};
use voxagent_core::{Agent, AgentData};
use voxagent_services::{
    load_dropdowns, AgentForm, TestCaller, TracingNotifier, UploadOrchestrator,
};

#[derive(Parser)]
#[command(name = "voxagent", about = "VoxAgent configuration CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload attachment files (pdf, doc, docx, txt, csv, xlsx, xls)
    Upload {
        /// Paths of the files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Agent operations
    Agent {
        #[command(subcommand)]
        sub: AgentCommands,
    },
    /// Start a test call with a saved agent
    TestCall {
        /// Agent ID
        agent_id: String,
        /// Phone number to call
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, default_value = "")]
        gender: String,
    },
    /// List languages, voices, prompts and models
    Dropdowns,
}

#[derive(Subcommand)]
enum AgentCommands {
    /// Create an agent from a JSON file
    Create {
        /// JSON file with the agent configuration
        #[arg(long)]
        file: PathBuf,
        /// Attachment files to upload first
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,
    },
    /// Update an existing agent from a JSON file
    Update {
        /// Agent ID
        id: String,
        /// JSON file with the agent configuration
        #[arg(long)]
        file: PathBuf,
        /// Attachment files to upload first
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,
    },
}

#[derive(Serialize)]
struct UploadReport {
    jobs: Vec<voxagent_core::JobView>,
    attachments: Vec<String>,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn read_agent_data(path: &Path) -> anyhow::Result<AgentData> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid agent JSON in {}", path.display()))
}

async fn save_agent(
    client: &Arc<ApiClient>,
    agent_id: Option<String>,
    file: &Path,
    attachments: &[PathBuf],
) -> anyhow::Result<()> {
    let data = read_agent_data(file).await?;
    let notifier = Arc::new(TracingNotifier);
    let mut form = match agent_id {
        Some(id) => AgentForm::edit(
            client.clone(),
            client.clone(),
            notifier,
            Agent { id, data },
        ),
        None => {
            let mut form = AgentForm::new(client.clone(), client.clone(), notifier);
            form.set_draft(data);
            form
        }
    };

    if !attachments.is_empty() {
        upload_paths(form.uploads(), attachments).await?;
        if form.uploads().has_failed_uploads().await {
            tracing::warn!("Some attachments failed to upload and will not be linked");
        }
    }

    let agent = form.save().await.context(AGENT_SAVE_FAILED_MESSAGE)?;
    print_json(&agent)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let client = Arc::new(ApiClient::from_env().context(
        "Failed to create API client. Check VOXAGENT_API_URL and VOXAGENT_API_TIMEOUT_SECS",
    )?);

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { files } => {
            let orchestrator = UploadOrchestrator::new(client.clone());
            let jobs = upload_paths(&orchestrator, &files).await?;
            let attachments = orchestrator.confirmed_remote_ids().await;
            print_json(&UploadReport { jobs, attachments })?;
        }
        Commands::Agent { sub } => match sub {
            AgentCommands::Create { file, attachments } => {
                save_agent(&client, None, &file, &attachments).await?;
            }
            AgentCommands::Update {
                id,
                file,
                attachments,
            } => {
                save_agent(&client, Some(id), &file, &attachments).await?;
            }
        },
        Commands::TestCall {
            agent_id,
            phone,
            first_name,
            last_name,
            gender,
        } => {
            let data = test_call_data(phone, first_name, last_name, gender)?;
            let caller = TestCaller::new(client.clone(), Arc::new(TracingNotifier));
            let response = caller
                .start_test_call(&agent_id, &data)
                .await
                .context(TEST_CALL_FAILED_MESSAGE)?;
            print_json(&response)?;
        }
        Commands::Dropdowns => {
            let options = load_dropdowns(client.as_ref()).await;
            print_json(&options.loaded())?;
        }
    }

    Ok(())
}
