//! CLI handlers for `softplan friend` subcommands.

use anyhow::Result;

use softplan_core::friends::{FriendFilter, FriendStore};
use softplan_db::models::{Friend, FriendStatus};

use crate::{App, FriendCommands};

/// Dispatch a `FriendCommands` variant to the appropriate handler.
pub async fn run_friend_command(command: FriendCommands, app: &App) -> Result<()> {
    let store = FriendStore::new(app.storage.clone());

    match command {
        FriendCommands::List { query, nearby } => {
            let filter = FriendFilter {
                query,
                nearby_only: nearby,
            };
            cmd_list(&store, &filter).await
        }
        FriendCommands::Add { name, tier } => {
            let friend = store.add(&name, tier).await?;
            println!("Added {} to {} ({}).", friend.name, tier.label(), friend.id);
            Ok(())
        }
        FriendCommands::Tier { friend_id, tier } => {
            let friend = store.set_tier(&friend_id, tier).await?;
            println!("Moved {} to {}.", friend.name, tier.label());
            Ok(())
        }
        FriendCommands::Rename { friend_id, name } => {
            let friend = store.rename(&friend_id, &name).await?;
            println!("Renamed {} to {}.", friend.id, friend.name);
            Ok(())
        }
        FriendCommands::Remove { friend_id } => {
            let friend = store.remove(&friend_id).await?;
            println!("Removed {}.", friend.name);
            Ok(())
        }
    }
}

async fn cmd_list(store: &FriendStore, filter: &FriendFilter) -> Result<()> {
    let groups = store.grouped(filter).await?;

    let total: usize = groups.iter().map(|(_, members)| members.len()).sum();
    if total == 0 {
        println!("No friends match.");
        return Ok(());
    }

    let name_w = groups
        .iter()
        .flat_map(|(_, members)| members.iter())
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(4);

    for (tier, members) in &groups {
        println!("{} ({})", tier.label(), members.len());
        for friend in members {
            println!("  {}", friend_row(friend, name_w));
        }
        println!();
    }
    Ok(())
}

fn friend_row(friend: &Friend, name_w: usize) -> String {
    let dot = match friend.status {
        FriendStatus::Available => "●",
        FriendStatus::Busy => "◐",
        FriendStatus::Quiet => "◌",
        FriendStatus::Offline => "○",
    };
    let nearby = if friend.is_nearby { "  nearby" } else { "" };
    format!(
        "{dot} {:<name_w$}  {:<9}  {}{nearby}  [{}]",
        friend.name,
        friend.status.to_string(),
        friend.last_active,
        friend.id
    )
}
