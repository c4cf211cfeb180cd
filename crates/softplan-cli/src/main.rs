mod chat_cmds;
mod config;
mod friend_cmds;
mod mood_cmds;
mod plan_cmds;
mod status_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use softplan_core::Identity;
use softplan_core::chat::InboxTab;
use softplan_core::rsvp::RsvpResponse;
use softplan_db::clock::{Clock, SystemClock};
use softplan_db::models::{Audience, FriendTier, PresenceKind};
use softplan_db::storage::{FileStorage, Storage};

use config::SoftplanConfig;

#[derive(Parser)]
#[command(name = "softplan", about = "Local-first soft plans, plan chats and friend tiers")]
struct Cli {
    /// Data directory (overrides SOFTPLAN_DATA_DIR env var)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a softplan config file and create the data directory
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
        /// Id the local user posts under
        #[arg(long)]
        user_id: Option<String>,
        /// Display name of the local user
        #[arg(long)]
        user_name: Option<String>,
    },
    /// Plan management
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Plan chats and direct messages
    Chat {
        #[command(subcommand)]
        command: ChatCommands,
    },
    /// Friends list
    Friend {
        #[command(subcommand)]
        command: FriendCommands,
    },
    /// Mood tags
    Mood {
        #[command(subcommand)]
        command: MoodCommands,
    },
    /// Your presence and quiet mode
    Status {
        #[command(subcommand)]
        command: StatusCommands,
    },
}

/// Plan fields shared by `plan create` and `plan edit`.
#[derive(clap::Args, Default)]
pub struct PlanFields {
    /// What you want to do
    #[arg(long)]
    activity: Option<String>,
    /// Longer description
    #[arg(long)]
    description: Option<String>,
    /// Date: YYYY-MM-DD, "today" or "tomorrow"
    #[arg(long)]
    date: Option<String>,
    /// morning, afternoon, evening, night, or a time like "7:45 PM"
    #[arg(long)]
    time: Option<String>,
    /// Where
    #[arg(long)]
    location: Option<String>,
    /// Mood tags, comma-separated or repeated (e.g. chill,deep-talk)
    #[arg(long, value_delimiter = ',')]
    mood: Vec<String>,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// List your plans, most recent first
    List,
    /// Show one plan
    Show {
        /// Plan ID
        plan_id: String,
    },
    /// Create a plan and open its chat
    Create {
        #[command(flatten)]
        fields: PlanFields,
        /// Who can see the plan: friends, friends-of-friends, public
        #[arg(long, default_value = "friends")]
        audience: Audience,
        /// Close the chat at this time of day instead of 30 minutes after the start
        #[arg(long)]
        expires_at: Option<String>,
    },
    /// Edit a plan; omitted fields keep their current value
    Edit {
        /// Plan ID
        plan_id: String,
        #[command(flatten)]
        fields: PlanFields,
    },
    /// Delete a plan and its chat
    Delete {
        /// Plan ID
        plan_id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Record a response against a plan's RSVP counters
    Rsvp {
        /// Plan ID
        plan_id: String,
        /// count-me-in, think-i-can or still-thinking
        response: RsvpResponse,
    },
}

#[derive(Subcommand)]
pub enum ChatCommands {
    /// List chats
    List {
        /// Filter by name
        #[arg(long, default_value = "")]
        query: String,
        /// all, plans or direct
        #[arg(long, default_value = "all")]
        tab: InboxTab,
    },
    /// Show a chat with its messages
    Show {
        /// Chat ID
        chat_id: String,
    },
    /// Send a message
    Send {
        /// Chat ID
        chat_id: String,
        /// Message text
        text: String,
        /// Send as a single emoji
        #[arg(long)]
        emoji: bool,
    },
    /// Toggle your reaction on a message
    React {
        /// Chat ID
        chat_id: String,
        /// Message ID
        message_id: String,
        /// Reaction emoji
        emoji: String,
    },
    /// Mark a chat as read
    Read {
        /// Chat ID
        chat_id: String,
    },
    /// Wait until a chat expires, then report it closed
    Watch {
        /// Chat ID
        chat_id: String,
    },
}

#[derive(Subcommand)]
pub enum FriendCommands {
    /// List friends grouped by tier
    List {
        /// Filter by name
        #[arg(long, default_value = "")]
        query: String,
        /// Only friends nearby
        #[arg(long)]
        nearby: bool,
    },
    /// Add a friend
    Add {
        /// Name
        name: String,
        /// close, acquaintance or quiet-follow
        #[arg(long, default_value = "acquaintance")]
        tier: FriendTier,
    },
    /// Move a friend to another tier
    Tier {
        /// Friend ID
        friend_id: String,
        /// close, acquaintance or quiet-follow
        tier: FriendTier,
    },
    /// Rename a friend
    Rename {
        /// Friend ID
        friend_id: String,
        /// New name
        name: String,
    },
    /// Remove a friend
    Remove {
        /// Friend ID
        friend_id: String,
    },
}

#[derive(Subcommand)]
pub enum MoodCommands {
    /// List preset and custom moods
    List,
    /// Add a custom mood
    Add {
        /// Label
        label: String,
    },
    /// Remove a custom mood
    Remove {
        /// Label
        label: String,
    },
}

#[derive(Subcommand)]
pub enum StatusCommands {
    /// Show your presence and quiet mode
    Show,
    /// Set your presence for the next 8 hours: available, open or quiet
    Set {
        kind: PresenceKind,
    },
    /// Go back to "I'm around"
    Reset,
    /// Toggle quiet mode
    Quiet,
}

/// Handles shared by every command once configuration is resolved.
pub struct App {
    pub storage: Arc<dyn Storage>,
    pub clock: Arc<dyn Clock>,
    pub me: Identity,
}

impl App {
    async fn open(cli_data_dir: Option<&std::path::Path>) -> anyhow::Result<Self> {
        let resolved = SoftplanConfig::resolve(cli_data_dir)?;
        debug!(
            data_dir = %resolved.store_config.data_dir.display(),
            user_id = %resolved.identity.id,
            "configuration resolved"
        );
        let storage = FileStorage::open(resolved.store_config).await?;
        Ok(Self {
            storage: Arc::new(storage),
            clock: Arc::new(SystemClock),
            me: resolved.identity,
        })
    }
}

/// Execute the `softplan init` command: write config file and data directory.
async fn cmd_init(
    cli_data_dir: Option<&std::path::Path>,
    force: bool,
    user_id: Option<String>,
    user_name: Option<String>,
) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let defaults = Identity::default();
    let data_dir = cli_data_dir
        .map(std::path::Path::to_path_buf)
        .unwrap_or_else(softplan_db::config::StoreConfig::default_data_dir);
    let cfg = config::ConfigFile {
        storage: config::StorageSection {
            data_dir: Some(data_dir.clone()),
        },
        user: config::UserSection {
            id: Some(user_id.unwrap_or(defaults.id)),
            name: Some(user_name.unwrap_or(defaults.name)),
        },
    };
    config::save_config(&cfg)?;

    let storage =
        FileStorage::open(softplan_db::config::StoreConfig::new(data_dir.clone())).await?;

    println!("Config written to {}", path.display());
    println!("  storage.data_dir = {}", data_dir.display());
    if let (Some(id), Some(name)) = (&cfg.user.id, &cfg.user.name) {
        println!("  user = {name} ({id})");
    }

    let sizes = storage.collection_sizes().await?;
    if sizes.is_empty() {
        println!("Data directory is empty; sample plans and chats will be shown until you save something.");
    } else {
        println!("Saved collections:");
        for (collection, bytes) in &sizes {
            println!("  {collection}: {bytes} bytes");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_deref();

    let result = match cli.command {
        Commands::Init {
            force,
            user_id,
            user_name,
        } => cmd_init(data_dir, force, user_id, user_name).await,
        Commands::Plan { command } => {
            let app = App::open(data_dir).await?;
            plan_cmds::run_plan_command(command, &app).await
        }
        Commands::Chat { command } => {
            let app = App::open(data_dir).await?;
            chat_cmds::run_chat_command(command, &app).await
        }
        Commands::Friend { command } => {
            let app = App::open(data_dir).await?;
            friend_cmds::run_friend_command(command, &app).await
        }
        Commands::Mood { command } => {
            let app = App::open(data_dir).await?;
            mood_cmds::run_mood_command(command, &app).await
        }
        Commands::Status { command } => {
            let app = App::open(data_dir).await?;
            status_cmd::run_status(command, &app).await
        }
    };

    if let Err(e) = result {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
    Ok(())
}
