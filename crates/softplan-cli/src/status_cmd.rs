//! `softplan status`: show or change your presence and quiet mode.

use anyhow::Result;

use softplan_core::expiry::countdown_label;
use softplan_core::presence::{Presence, PresenceService};

use crate::{App, StatusCommands};

pub async fn run_status(command: StatusCommands, app: &App) -> Result<()> {
    let service = PresenceService::new(app.storage.clone(), app.clock.clone());

    match command {
        StatusCommands::Show => {
            let presence = service.current().await?;
            print_presence(&presence, app);
            let quiet = service.quiet_mode().await?;
            println!("Quiet mode: {}", if quiet { "on" } else { "off" });
        }
        StatusCommands::Set { kind } => {
            let presence = service.set(kind).await?;
            print_presence(&presence, app);
        }
        StatusCommands::Reset => {
            service.reset().await?;
            print_presence(&Presence::default(), app);
        }
        StatusCommands::Quiet => {
            let enabled = service.toggle_quiet_mode().await?;
            println!("Quiet mode {}.", if enabled { "on" } else { "off" });
        }
    }
    Ok(())
}

fn print_presence(presence: &Presence, app: &App) {
    let kind = presence.kind;
    match presence.expires_at {
        Some(at) => println!(
            "{} {} (resets in {})",
            kind.emoji(),
            kind.label(),
            countdown_label(at, app.clock.now())
        ),
        None => println!("{} {}", kind.emoji(), kind.label()),
    }
}
