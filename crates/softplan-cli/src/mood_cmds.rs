//! CLI handlers for `softplan mood` subcommands.

use anyhow::Result;

use softplan_core::mood::MoodLibrary;
use softplan_db::models::MoodTag;

use crate::{App, MoodCommands};

pub async fn run_mood_command(command: MoodCommands, app: &App) -> Result<()> {
    let library = MoodLibrary::new(app.storage.clone());

    match command {
        MoodCommands::List => {
            for tag in library.list().await? {
                let kind = match tag {
                    MoodTag::Preset { .. } => "preset",
                    MoodTag::Custom { .. } => "custom",
                };
                println!("{:<16}  {kind}", tag.to_string());
            }
        }
        MoodCommands::Add { label } => {
            let tag = library.add_custom(&label).await?;
            match tag {
                MoodTag::Preset { .. } => println!("{tag} is already a preset mood."),
                MoodTag::Custom { .. } => println!("Added {tag}."),
            }
        }
        MoodCommands::Remove { label } => {
            library.remove_custom(&label).await?;
            println!("Removed {:?}.", label.trim());
        }
    }
    Ok(())
}
