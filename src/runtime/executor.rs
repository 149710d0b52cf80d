//! Chat controller: effect executor for the dispatch state machine

use super::traits::{Clipboard, LatencyPolicy};
use super::{ChatEvent, ControllerError, Screen};

use crate::actions::{self, ActionOutcome, MessageAction};
use crate::classifier::{classify, InputClass};
use crate::command::{Command, CommandOutcome, RejectReason, Submission};
use crate::conversation::{ConversationStore, Message, MessageId};
use crate::generator::ResponseGenerator;
use crate::navigation::{ViewController, ViewMode};
use crate::recent::{RecentChatSummary, RecentChats};
use crate::state_machine::{
    transition, DispatchState, Effect, Event, Reply, TransitionError, TransitionResult,
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Owns the transcript, the dispatch gate and the view state.
///
/// `submit` must be called from within a tokio runtime: accepting a message
/// spawns the background dispatch task. A finished reply is applied on the
/// next call that reads or changes chat state, or by awaiting
/// [`ChatController::settle`].
pub struct ChatController<G, C, L>
where
    G: ResponseGenerator + 'static,
    C: Clipboard,
    L: LatencyPolicy + 'static,
{
    store: ConversationStore,
    state: DispatchState,
    view: ViewController,
    recent: RecentChats,
    generator: Arc<G>,
    clipboard: C,
    latency: Arc<L>,
    next_cycle: u64,
    event_tx: mpsc::Sender<Event>,
    event_rx: mpsc::Receiver<Event>,
    broadcast_tx: broadcast::Sender<ChatEvent>,
}

impl<G, C, L> ChatController<G, C, L>
where
    G: ResponseGenerator + 'static,
    C: Clipboard,
    L: LatencyPolicy + 'static,
{
    pub fn new(generator: G, clipboard: C, latency: L) -> Self {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);
        Self {
            store: ConversationStore::new(),
            state: DispatchState::Idle,
            view: ViewController::new(),
            recent: RecentChats::default(),
            generator: Arc::new(generator),
            clipboard,
            latency: Arc::new(latency),
            next_cycle: 1,
            event_tx,
            event_rx,
            broadcast_tx,
        }
    }

    /// Start with the welcome and prompt messages in the transcript
    #[must_use]
    pub fn with_greeting(mut self) -> Self {
        self.store = ConversationStore::with_greeting();
        self
    }

    #[must_use]
    pub fn with_recent_chats(mut self, recent: RecentChats) -> Self {
        self.recent = recent;
        self
    }

    pub fn state(&mut self) -> DispatchState {
        self.apply_pending();
        self.state
    }

    pub fn conversation(&mut self) -> &ConversationStore {
        self.apply_pending();
        &self.store
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view.mode()
    }

    pub fn recent_chats(&self) -> &RecentChats {
        &self.recent
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.broadcast_tx.subscribe()
    }

    pub fn screen(&mut self) -> Screen<'_> {
        self.apply_pending();
        match self.view.mode() {
            ViewMode::ActiveChat => Screen::Chat {
                messages: self.store.as_slice(),
                awaiting: self.state.is_awaiting(),
            },
            ViewMode::RecentList => Screen::Recent {
                chats: self.recent.as_slice(),
            },
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// # Errors
    ///
    /// Fails when a recent chat cannot be selected or a message cannot be
    /// stored. Ignored submissions are not errors.
    pub fn handle(&mut self, command: Command) -> Result<CommandOutcome, ControllerError> {
        match command {
            Command::Submit { text } => Ok(CommandOutcome::Submitted(self.submit(text)?)),
            Command::NewChat => {
                self.reset();
                Ok(CommandOutcome::Reset)
            }
            Command::ShowRecent => {
                self.switch_to(ViewMode::RecentList);
                Ok(CommandOutcome::ViewChanged)
            }
            Command::ShowChat => {
                self.switch_to(ViewMode::ActiveChat);
                Ok(CommandOutcome::ViewChanged)
            }
            Command::SelectRecent { index } => Ok(CommandOutcome::Selected {
                chat: self.select_recent(index)?,
            }),
            Command::Act { message_id, action } => Ok(CommandOutcome::Acted {
                outcome: self.act(&message_id, action),
            }),
        }
    }

    /// Append the user's message and start a dispatch cycle.
    ///
    /// Blank input, or input while a reply is pending, is ignored and
    /// reported as [`Submission::Rejected`].
    ///
    /// # Errors
    ///
    /// Fails only if the user message cannot be stored; the gate is left
    /// as it was.
    pub fn submit(&mut self, text: impl Into<String>) -> Result<Submission, ControllerError> {
        self.apply_pending();

        let message_id = MessageId::new();
        let cycle = self.next_cycle;
        let event = Event::Submit {
            text: text.into(),
            message_id: message_id.clone(),
            cycle,
        };

        let result = match transition(&self.state, event) {
            Ok(result) => result,
            Err(e) => {
                let reason = match e {
                    TransitionError::EmptyInput => RejectReason::EmptyInput,
                    TransitionError::Busy | TransitionError::StaleSettlement { .. } => {
                        RejectReason::Busy
                    }
                };
                tracing::debug!(reason = ?reason, "Submission ignored");
                return Ok(Submission::Rejected { reason });
            }
        };

        self.apply(result)?;
        self.next_cycle += 1;
        tracing::info!(cycle, message_id = %message_id, "Submission accepted");
        Ok(Submission::Accepted { message_id, cycle })
    }

    /// Start a new chat: empty transcript, gate released.
    ///
    /// A dispatch still in flight runs to completion, but its reply is
    /// discarded.
    pub fn reset(&mut self) {
        if let Some(cycle) = self.state.cycle() {
            tracing::info!(cycle, "Reset while awaiting a reply; it will be discarded");
        }
        match transition(&self.state, Event::Reset)
            .map_err(ControllerError::from)
            .and_then(|result| self.apply(result))
        {
            Ok(()) => tracing::info!("Conversation reset"),
            Err(e) => tracing::error!(error = %e, "Failed to reset conversation"),
        }
    }

    pub fn switch_to(&mut self, mode: ViewMode) {
        self.view.switch_to(mode);
        let _ = self.broadcast_tx.send(ChatEvent::ViewChanged { mode });
    }

    /// Choose a recent chat from the history list. Only the view changes.
    ///
    /// # Errors
    ///
    /// [`crate::navigation::NavigationError`] when the list is not shown or
    /// `index` is out of range.
    pub fn select_recent(&mut self, index: usize) -> Result<RecentChatSummary, ControllerError> {
        let chat = self.view.select_recent(&self.recent, index)?.clone();
        tracing::debug!(index, title = %chat.title, "Recent chat selected");
        let _ = self.broadcast_tx.send(ChatEvent::ViewChanged {
            mode: self.view.mode(),
        });
        Ok(chat)
    }

    pub fn act(&mut self, message_id: &MessageId, action: MessageAction) -> ActionOutcome {
        self.apply_pending();
        actions::perform(&self.store, &self.clipboard, message_id, action)
    }

    // ========================================================================
    // Settlement
    // ========================================================================

    /// Wait for the pending dispatch cycle to finish and apply its reply.
    ///
    /// Returns the appended bot message, or `None` straight away when no
    /// reply is pending. Replies for cycles superseded by a reset are dropped.
    pub async fn settle(&mut self) -> Option<Message> {
        while self.state.is_awaiting() {
            // We hold a sender, so the channel never closes
            let event = self.event_rx.recv().await?;
            if let Some(message) = self.process_settlement(event) {
                return Some(message);
            }
        }
        None
    }

    /// Non-blocking [`ChatController::settle`]
    pub fn try_settle(&mut self) -> Option<Message> {
        while self.state.is_awaiting() {
            let event = self.event_rx.try_recv().ok()?;
            if let Some(message) = self.process_settlement(event) {
                return Some(message);
            }
        }
        None
    }

    fn process_settlement(&mut self, event: Event) -> Option<Message> {
        let result = match transition(&self.state, event) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(error = %e, "Dropping settlement");
                return None;
            }
        };

        if let Err(e) = self.apply(result) {
            // The gate must be released even if the reply could not be stored
            tracing::error!(error = %e, "Failed to store reply");
            self.state = DispatchState::Idle;
            let _ = self.broadcast_tx.send(ChatEvent::StateChanged { state: self.state });
            return None;
        }

        self.store.last().cloned()
    }

    /// Apply every settlement that has already arrived. Ones left over
    /// from cycles a reset superseded are dropped.
    fn apply_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.process_settlement(event);
        }
    }

    // ========================================================================
    // Effects
    // ========================================================================

    /// Commit the new state and run its effects; roll back on failure
    fn apply(&mut self, result: TransitionResult) -> Result<(), ControllerError> {
        let old_state = std::mem::replace(&mut self.state, result.new_state);

        for effect in result.effects {
            if let Err(e) = self.execute_effect(effect) {
                self.state = old_state;
                return Err(e);
            }
        }

        Ok(())
    }

    fn execute_effect(&mut self, effect: Effect) -> Result<(), ControllerError> {
        match effect {
            Effect::AppendMessage { id, role, text } => {
                let message = self.store.append(Message::new(id, role, text))?.clone();
                tracing::debug!(message_id = %message.id, role = %message.role, "Message appended");
                let _ = self.broadcast_tx.send(ChatEvent::MessageAppended { message });
            }

            Effect::ClearConversation => {
                self.store.reset();
                let _ = self.broadcast_tx.send(ChatEvent::ConversationReset);
            }

            Effect::PublishState => {
                let _ = self
                    .broadcast_tx
                    .send(ChatEvent::StateChanged { state: self.state });
            }

            Effect::BeginDispatch { cycle, text } => {
                let generator = Arc::clone(&self.generator);
                let latency = Arc::clone(&self.latency);
                let event_tx = self.event_tx.clone();

                tokio::spawn(async move {
                    // A panicking generator counts as a failed one
                    let reply = match tokio::spawn(async move {
                        dispatch_reply(&*generator, &*latency, &text).await
                    })
                    .await
                    {
                        Ok(reply) => reply,
                        Err(e) => {
                            tracing::error!(cycle, error = %e, "Dispatch task failed");
                            Reply::Apology
                        }
                    };

                    tracing::debug!(cycle, reply = reply.kind(), "Dispatch finished");
                    let _ = event_tx
                        .send(Event::Settled {
                            cycle,
                            reply_id: MessageId::new(),
                            reply,
                        })
                        .await;
                });
            }
        }

        Ok(())
    }
}

/// One dispatch cycle: wait, classify, then clarify or generate.
/// Generator failures become [`Reply::Apology`] here and go no further.
pub(crate) async fn dispatch_reply<G, L>(generator: &G, latency: &L, text: &str) -> Reply
where
    G: ResponseGenerator + ?Sized,
    L: LatencyPolicy + ?Sized,
{
    latency.wait().await;

    match classify(text) {
        InputClass::Suspect => {
            tracing::debug!("Suspect input, asking for clarification");
            Reply::Clarification
        }
        InputClass::Meaningful => match generator.generate(text).await {
            Ok(text) => Reply::Generated { text },
            Err(e) => {
                tracing::warn!(
                    generator = %generator.name(),
                    kind = e.kind.as_str(),
                    error = %e,
                    "Generator failed, replying with apology"
                );
                Reply::Apology
            }
        },
    }
}
