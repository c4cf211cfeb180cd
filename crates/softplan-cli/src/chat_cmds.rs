//! CLI handlers for `softplan chat` subcommands.

use anyhow::{Context, Result};
use chrono::Local;

use softplan_core::chat::{ChatStore, ChatView, InboxTab, ReactionChange, previews};
use softplan_db::models::{ChatThread, Message};

use crate::{App, ChatCommands};

/// Dispatch a `ChatCommands` variant to the appropriate handler.
pub async fn run_chat_command(command: ChatCommands, app: &App) -> Result<()> {
    let store = ChatStore::new(app.storage.clone(), app.clock.clone(), app.me.clone());

    match command {
        ChatCommands::List { query, tab } => cmd_list(&store, &query, tab).await,
        ChatCommands::Show { chat_id } => cmd_show(&store, &chat_id).await,
        ChatCommands::Send {
            chat_id,
            text,
            emoji,
        } => cmd_send(store, &chat_id, &text, emoji).await,
        ChatCommands::React {
            chat_id,
            message_id,
            emoji,
        } => cmd_react(store, &chat_id, &message_id, &emoji).await,
        ChatCommands::Read { chat_id } => {
            store.mark_read(&chat_id).await?;
            println!("Marked {chat_id} as read.");
            Ok(())
        }
        ChatCommands::Watch { chat_id } => cmd_watch(store, &chat_id).await,
    }
}

// -----------------------------------------------------------------------
// softplan chat list
// -----------------------------------------------------------------------

async fn cmd_list(store: &ChatStore, query: &str, tab: InboxTab) -> Result<()> {
    let threads = store.list().await?;
    let now = store.clock().now();
    let rows = previews(&threads, &store.identity().id, now, query, tab);

    if rows.is_empty() {
        if query.trim().is_empty() {
            println!("No {tab} chats.");
        } else {
            println!("No {tab} chats match {query:?}.");
        }
        return Ok(());
    }

    let id_w = rows.iter().map(|r| r.id.len()).max().unwrap_or(2).max(2);
    let name_w = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    let countdown_w = 9;

    println!(
        "{:<id_w$}  {:<name_w$}  {:>6}  {:<countdown_w$}  LAST MESSAGE",
        "ID", "NAME", "UNREAD", "EXPIRES",
    );
    for row in &rows {
        let unread = if row.unread > 0 {
            row.unread.to_string()
        } else {
            String::new()
        };
        println!(
            "{:<id_w$}  {:<name_w$}  {:>6}  {:<countdown_w$}  {}",
            row.id, row.name, unread, row.countdown, row.last_message,
        );
    }

    Ok(())
}

// -----------------------------------------------------------------------
// softplan chat show <chat-id>
// -----------------------------------------------------------------------

async fn cmd_show(store: &ChatStore, chat_id: &str) -> Result<()> {
    let view = ChatView::open(store.clone(), chat_id).await?;
    let header = view.header(store.clock().now());

    println!("{header}");
    println!();
    print_messages(view.thread());
    if !view.composer_enabled() {
        println!();
        println!("This chat has expired and is read-only.");
    }
    Ok(())
}

fn print_messages(thread: &ChatThread) {
    if thread.messages.is_empty() {
        println!("  (no messages yet)");
        return;
    }
    for message in &thread.messages {
        print_message(message);
    }
}

fn print_message(message: &Message) {
    let at = message.timestamp.with_timezone(&Local).format("%a %H:%M");
    let who = if message.sender.is_current_user {
        "You"
    } else {
        message.sender.name.as_str()
    };
    println!("  [{}] {at}  {who}: {}", message.id, message.content);
    if !message.reactions.is_empty() {
        let reactions: Vec<String> = message
            .reactions
            .iter()
            .map(|r| format!("{} {}", r.emoji, r.user_name))
            .collect();
        println!("        {}", reactions.join(", "));
    }
}

// -----------------------------------------------------------------------
// softplan chat send / react
// -----------------------------------------------------------------------

async fn cmd_send(store: ChatStore, chat_id: &str, text: &str, emoji: bool) -> Result<()> {
    let mut view = ChatView::open(store, chat_id).await?;
    let message = view
        .send(text, emoji)
        .await
        .with_context(|| format!("failed to send to chat {chat_id}"))?;
    print_message(&message);
    Ok(())
}

async fn cmd_react(store: ChatStore, chat_id: &str, message_id: &str, emoji: &str) -> Result<()> {
    let mut view = ChatView::open(store, chat_id).await?;
    match view.react(message_id, emoji).await? {
        ReactionChange::Added => println!("Reacted {emoji} to {message_id}."),
        ReactionChange::Removed => println!("Removed {emoji} from {message_id}."),
    }
    Ok(())
}

// -----------------------------------------------------------------------
// softplan chat watch <chat-id>
// -----------------------------------------------------------------------

/// Block until the chat closes or the user interrupts.
async fn cmd_watch(store: ChatStore, chat_id: &str) -> Result<()> {
    let view = ChatView::open(store.clone(), chat_id).await?;
    let header = view.header(store.clock().now());

    if !view.composer_enabled() {
        println!("{} has already expired.", header.activity);
        return Ok(());
    }

    println!("Watching {} ({}). Press Ctrl+C to stop.", header.activity, header.countdown);

    tokio::select! {
        fired = view.wait_expired() => {
            if fired {
                println!("{} has expired. The chat is now read-only.", header.activity);
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl+C")?;
            println!("Stopped watching.");
        }
    }

    Ok(())
}
