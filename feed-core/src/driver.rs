use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::models::{CategoryFilter, Reaction, ReactionFilter, Tab};
use crate::pagination::ScrollOutcome;
use crate::session::{FeedSession, SearchOutcome, SearchTicket};
use crate::summary::SummaryEntry;
use crate::view::FeedView;

/// User intents fed to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadProfile,
    ReloadFeedback,
    Search(String),
    NearBottom,
    ContinueScrolling,
    TrySuggestedTopic(Option<usize>),
    Toggle { link: String, reaction: Reaction },
    SelectTab(Tab),
    SetReactionFilter(ReactionFilter),
    SetCategoryFilter(CategoryFilter),
    Summarize(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Fresh snapshot of the active view after a state change.
    View(FeedView),
    SearchFinished { query: String, outcome: SearchOutcome },
    Scrolled(ScrollOutcome),
    Summary { link: String, entry: SummaryEntry },
    /// A reaction could not be persisted; local state was kept.
    SyncFailed { link: String },
}

pub struct DriverHandle {
    cancel_tx: broadcast::Sender<()>,
    commands: mpsc::Sender<Command>,
    join: JoinHandle<()>,
}

impl DriverHandle {
    pub async fn send(&self, command: Command) -> Result<(), FeedError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| FeedError::CommandChannelClosed)
    }

    pub async fn stop(self) -> Result<(), FeedError> {
        let _ = self.cancel_tx.send(());
        self.join.await.map_err(FeedError::from)
    }
}

/// Runs `session` on the current runtime. Local state changes are applied in command
/// order inside the loop; network work is spawned so the loop keeps accepting
/// commands while requests are outstanding.
pub fn spawn_driver(session: FeedSession, event_tx: mpsc::Sender<Event>) -> DriverHandle {
    let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
    let (commands, mut command_rx) = mpsc::channel::<Command>(64);

    let join = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel_rx.recv() => {
                    info!("driver shutdown requested");
                    break;
                }
                command = command_rx.recv() => {
                    let Some(command) = command else {
                        debug!("command senders dropped");
                        break;
                    };
                    handle_command(&session, &event_tx, command).await;
                }
            }
        }
    });

    DriverHandle {
        cancel_tx,
        commands,
        join,
    }
}

async fn handle_command(session: &FeedSession, events: &mpsc::Sender<Event>, command: Command) {
    match command {
        Command::LoadProfile => {
            let session = session.clone();
            let events = events.clone();
            tokio::spawn(async move {
                session.load_profile().await;
                emit_view(&session, &events).await;
            });
        }
        Command::ReloadFeedback => {
            let session = session.clone();
            let events = events.clone();
            tokio::spawn(async move {
                match session.reload_feedback().await {
                    Ok(()) => emit_view(&session, &events).await,
                    Err(err) => warn!(error = %err, "failed to reload feedback"),
                }
            });
        }
        Command::Search(query) => {
            let ticket = session.begin_search(&query).await;
            emit_view(session, events).await;
            spawn_search(session, events, ticket);
        }
        Command::TrySuggestedTopic(choice) => {
            match session.begin_suggested_search(choice).await {
                Some(ticket) => {
                    emit_view(session, events).await;
                    spawn_search(session, events, ticket);
                }
                None => warn!("no suggested topics configured"),
            }
        }
        Command::NearBottom => {
            let outcome = session.near_bottom().await;
            emit(events, Event::Scrolled(outcome)).await;
            emit_view(session, events).await;
        }
        Command::ContinueScrolling => {
            session.continue_scrolling().await;
            emit_view(session, events).await;
        }
        Command::Toggle { link, reaction } => {
            let transition = session.apply_toggle(&link, reaction).await;
            emit_view(session, events).await;
            let session = session.clone();
            let events = events.clone();
            tokio::spawn(async move {
                if !session.sync_transition(&transition).await {
                    emit(&events, Event::SyncFailed { link: transition.link }).await;
                }
            });
        }
        Command::SelectTab(tab) => {
            let needs_saved = session.switch_tab(tab).await;
            emit_view(session, events).await;
            if needs_saved {
                let session = session.clone();
                let events = events.clone();
                tokio::spawn(async move {
                    session.load_saved().await;
                    emit_view(&session, &events).await;
                });
            }
        }
        Command::SetReactionFilter(filter) => {
            session.set_reaction_filter(filter).await;
            emit_view(session, events).await;
        }
        Command::SetCategoryFilter(filter) => {
            session.set_category_filter(filter).await;
            emit_view(session, events).await;
        }
        Command::Summarize(link) => {
            let session = session.clone();
            let events = events.clone();
            tokio::spawn(async move {
                let entry = session.summary(&link).await;
                match entry {
                    Some(entry) => emit(&events, Event::Summary { link, entry }).await,
                    None => warn!(%link, "summary requested for an unknown article"),
                }
            });
        }
    }
}

fn spawn_search(
    session: &FeedSession,
    events: &mpsc::Sender<Event>,
    ticket: SearchTicket,
) {
    let session = session.clone();
    let events = events.clone();
    tokio::spawn(async move {
        let query = ticket.query.clone();
        let outcome = session.run_search(ticket).await;
        emit(&events, Event::SearchFinished { query, outcome }).await;
        if outcome != SearchOutcome::Superseded {
            emit_view(&session, &events).await;
        }
    });
}

async fn emit_view(session: &FeedSession, events: &mpsc::Sender<Event>) {
    emit(events, Event::View(session.view().await)).await;
}

async fn emit(events: &mpsc::Sender<Event>, event: Event) {
    if events.send(event).await.is_err() {
        warn!("event receiver dropped");
    }
}
