//! AGNES chat shell
//!
//! Line-oriented front end for the chat controller. Plain lines are sent
//! as messages; `/new`, `/recent`, `/back`, `/open <n>` and
//! `/like|/dislike|/copy|/retry <id>` drive the rest. Logs go to stderr.

use agnes_chat::actions::ActionOutcome;
use agnes_chat::generator::{LoggingGenerator, PlaceholderGenerator, TimeoutGenerator};
use agnes_chat::recent::{JsonFileRecentChats, RecentChats};
use agnes_chat::runtime::{FixedLatency, MemoryClipboard};
use agnes_chat::command::RejectReason;
use agnes_chat::{
    ChatConfig, ChatEvent, Command, CommandOutcome, Role, Screen, ShellController, Submission,
};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agnes_chat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ChatConfig::from_env();
    tracing::info!(
        latency_ms = u64::try_from(config.latency.as_millis()).unwrap_or(u64::MAX),
        timeout_secs = config.generator_timeout.as_secs(),
        greeting = config.greeting,
        "Starting AGNES shell"
    );

    let recent = match &config.recent_chats_path {
        Some(path) => RecentChats::load(&JsonFileRecentChats::new(path)).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not load recent chats; starting without history");
            RecentChats::default()
        }),
        None => RecentChats::default(),
    };

    let generator = LoggingGenerator::new(TimeoutGenerator::new(
        PlaceholderGenerator,
        config.generator_timeout,
    ));
    let mut controller =
        ShellController::new(generator, MemoryClipboard::new(), FixedLatency(config.latency))
            .with_recent_chats(recent);
    if config.greeting {
        controller = controller.with_greeting();
    }

    let mut out = std::io::stdout().lock();
    render(&mut out, &mut controller)?;

    // Input stays live while a reply is pending; only new messages are refused
    let mut events = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(_) = controller.settle(), if controller.state().is_awaiting() => {}
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                handle_line(&mut out, &mut controller, &line)?;
            }
        }
        if drain_changes(&mut events) {
            render(&mut out, &mut controller)?;
        }
    }

    tracing::info!("Input closed, exiting");
    Ok(())
}

fn handle_line(
    out: &mut impl Write,
    controller: &mut ShellController,
    line: &str,
) -> std::io::Result<()> {
    let command: Command = match line.parse() {
        Ok(command) => command,
        Err(e) => return writeln!(out, "! {e}"),
    };

    match controller.handle(command) {
        Ok(CommandOutcome::Submitted(Submission::Rejected {
            reason: RejectReason::Busy,
        })) => writeln!(out, "! AGNES is still replying")?,
        Ok(CommandOutcome::Selected { chat }) => writeln!(out, "Opened \"{}\"", chat.title)?,
        Ok(CommandOutcome::Acted { outcome }) => match outcome {
            ActionOutcome::Copied => {
                let copied = controller.clipboard().contents().unwrap_or_default();
                writeln!(out, "Copied: {copied}")?;
            }
            ActionOutcome::NotFound => writeln!(out, "! No such message")?,
            ActionOutcome::Unimplemented { action } => {
                writeln!(out, "! {action} is not available yet")?;
            }
        },
        Ok(_) => {}
        Err(e) => writeln!(out, "! {e}")?,
    }
    out.flush()
}

/// Empty the notification queue; true if anything changed since last time
fn drain_changes(events: &mut broadcast::Receiver<ChatEvent>) -> bool {
    let mut changed = false;
    loop {
        match events.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => changed = true,
            Err(TryRecvError::Empty | TryRecvError::Closed) => return changed,
        }
    }
}

fn render(out: &mut impl Write, controller: &mut ShellController) -> std::io::Result<()> {
    match controller.screen() {
        Screen::Chat { messages, awaiting } => {
            writeln!(out, "--- AGNES ---")?;
            for message in messages {
                let speaker = match message.role {
                    Role::User => "you",
                    Role::Bot => "AGNES",
                };
                writeln!(out, "[{}] {speaker}: {}", message.id, message.text)?;
            }
            if awaiting {
                writeln!(out, "AGNES is typing...")?;
            }
        }
        Screen::Recent { chats } => {
            writeln!(out, "--- Recent Chats ---")?;
            if chats.is_empty() {
                writeln!(out, "(no recent chats)")?;
            }
            for (index, chat) in chats.iter().enumerate() {
                writeln!(out, "{index}. {} - {}", chat.title, chat.preview)?;
            }
        }
    }
    out.flush()
}
