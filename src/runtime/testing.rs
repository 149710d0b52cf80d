//! Mock implementations for testing
//!
//! These mocks enable controller tests without a real backend or clipboard.

use super::traits::*;
use crate::generator::{GeneratorError, ResponseGenerator};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock Generators
// ============================================================================

/// Mock generator that returns queued responses
pub struct MockGenerator {
    responses: Mutex<VecDeque<Result<String, GeneratorError>>>,
    /// Record of every text the generator was asked about
    pub calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockGenerator {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: GeneratorError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded calls
    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseGenerator for MockGenerator {
    async fn generate(&self, text: &str) -> Result<String, GeneratorError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GeneratorError::unavailable("No mock response queued")))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Answers every message with `echo: <text>`
#[derive(Debug, Default)]
pub struct EchoGenerator;

#[async_trait]
impl ResponseGenerator for EchoGenerator {
    async fn generate(&self, text: &str) -> Result<String, GeneratorError> {
        Ok(format!("echo: {text}"))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Generator that panics instead of answering
#[derive(Debug, Default)]
pub struct PanickingGenerator;

#[async_trait]
impl ResponseGenerator for PanickingGenerator {
    async fn generate(&self, _text: &str) -> Result<String, GeneratorError> {
        panic!("backend exploded");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

// ============================================================================
// Recording Clipboard
// ============================================================================

/// Clipboard that keeps every write
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    writes: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn write(&self, text: &str) {
        self.writes.lock().unwrap().push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionOutcome, MessageAction};
    use crate::command::{Command, CommandOutcome, RejectReason, Submission};
    use crate::conversation::{MessageId, Role};
    use crate::generator::GeneratorErrorKind;
    use crate::navigation::ViewMode;
    use crate::recent::{RecentChatSummary, RecentChats};
    use crate::runtime::executor::dispatch_reply;
    use crate::runtime::{ChatController, ChatEvent, ControllerError, Screen};
    use crate::state_machine::{DispatchState, Reply, APOLOGY_TEXT, CLARIFICATION_TEXT};
    use std::sync::Arc;
    use std::time::Duration;

    type TestController<G> = ChatController<Arc<G>, Arc<RecordingClipboard>, NoLatency>;

    fn controller<G: ResponseGenerator + 'static>(
        generator: &Arc<G>,
    ) -> (TestController<G>, Arc<RecordingClipboard>) {
        let clipboard = Arc::new(RecordingClipboard::new());
        let controller = ChatController::new(generator.clone(), clipboard.clone(), NoLatency);
        (controller, clipboard)
    }

    fn transcript<G, C, L>(controller: &mut ChatController<G, C, L>) -> Vec<(Role, String)>
    where
        G: ResponseGenerator + 'static,
        C: Clipboard,
        L: LatencyPolicy + 'static,
    {
        controller
            .conversation()
            .all()
            .map(|m| (m.role, m.text.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_submit_appends_user_message_before_reply() {
        let generator = Arc::new(MockGenerator::new());
        generator.queue_response("Mostly fossil fuel combustion.");
        let (mut controller, _) = controller(&generator);

        let submission = controller.submit("Where does CO2 come from?").unwrap();

        assert!(submission.is_accepted());
        assert!(controller.state().is_awaiting());
        assert_eq!(
            transcript(&mut controller),
            vec![(Role::User, "Where does CO2 come from?".to_string())]
        );

        let reply = controller.settle().await.expect("reply should arrive");

        assert_eq!(reply.role, Role::Bot);
        assert_eq!(controller.state(), DispatchState::Idle);
        assert_eq!(controller.conversation().len(), 2);
    }

    #[tokio::test]
    async fn test_meaningful_input_scenario() {
        let generator = Arc::new(MockGenerator::new());
        generator.queue_response("Melting ice and thermal expansion.");
        let (mut controller, _) = controller(&generator);

        controller.submit("What causes sea level rise?").unwrap();
        controller.settle().await;

        assert_eq!(
            transcript(&mut controller),
            vec![
                (Role::User, "What causes sea level rise?".to_string()),
                (Role::Bot, "Melting ice and thermal expansion.".to_string()),
            ]
        );
        assert_eq!(
            generator.recorded_calls(),
            vec!["What causes sea level rise?".to_string()]
        );
    }

    #[tokio::test]
    async fn test_suspect_input_gets_clarification() {
        let generator = Arc::new(MockGenerator::new());
        let (mut controller, _) = controller(&generator);

        controller.submit("asdf123").unwrap();
        let reply = controller.settle().await.unwrap();

        assert_eq!(reply.text, CLARIFICATION_TEXT);
        assert!(
            generator.recorded_calls().is_empty(),
            "generator must not be called for suspect input"
        );
    }

    #[tokio::test]
    async fn test_generator_failure_yields_apology_and_recovers() {
        let generator = Arc::new(MockGenerator::new());
        generator.queue_error(GeneratorError::backend("503 from upstream"));
        generator.queue_response("Because of greenhouse gases.");
        let (mut controller, _) = controller(&generator);

        controller.submit("Why is it warming?").unwrap();
        let reply = controller.settle().await.unwrap();
        assert_eq!(reply.text, APOLOGY_TEXT);
        assert_eq!(controller.state(), DispatchState::Idle);

        // Usable again immediately
        assert!(controller.submit("Why is it warming?").unwrap().is_accepted());
        let reply = controller.settle().await.unwrap();
        assert_eq!(reply.text, "Because of greenhouse gases.");
        assert_eq!(controller.conversation().len(), 4);
    }

    #[tokio::test]
    async fn test_panicking_generator_yields_apology() {
        let generator = Arc::new(PanickingGenerator);
        let (mut controller, _) = controller(&generator);

        controller.submit("Will this work?").unwrap();
        let reply = controller.settle().await.unwrap();

        assert_eq!(reply.text, APOLOGY_TEXT);
        assert!(controller.state().is_idle());
    }

    #[tokio::test]
    async fn test_blank_submissions_change_nothing() {
        let generator = Arc::new(MockGenerator::new());
        let (mut controller, _) = controller(&generator);

        for text in ["", "   "] {
            assert_eq!(
                controller.submit(text).unwrap(),
                Submission::Rejected {
                    reason: RejectReason::EmptyInput
                }
            );
        }
        assert!(controller.conversation().is_empty());
        assert_eq!(controller.state(), DispatchState::Idle);
        assert!(controller.settle().await.is_none());
    }

    #[tokio::test]
    async fn test_second_submit_while_awaiting_is_ignored() {
        let generator = Arc::new(EchoGenerator);
        let (mut controller, _) = controller(&generator);

        controller.submit("first question?").unwrap();
        let second = controller.submit("second question?").unwrap();

        assert_eq!(
            second,
            Submission::Rejected {
                reason: RejectReason::Busy
            }
        );
        assert_eq!(controller.conversation().len(), 1);

        controller.settle().await;
        assert_eq!(
            transcript(&mut controller),
            vec![
                (Role::User, "first question?".to_string()),
                (Role::Bot, "echo: first question?".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_reset_during_flight_discards_reply() {
        let generator = Arc::new(EchoGenerator);
        let (mut controller, _) = controller(&generator);

        controller.submit("old chat question?").unwrap();
        controller.reset();

        assert!(controller.conversation().is_empty());
        assert_eq!(controller.state(), DispatchState::Idle);
        assert!(controller.settle().await.is_none());

        // Let the superseded task finish and report
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        controller.submit("new chat question?").unwrap();
        controller.settle().await;

        assert_eq!(
            transcript(&mut controller),
            vec![
                (Role::User, "new chat question?".to_string()),
                (Role::Bot, "echo: new chat question?".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_reset_then_immediate_resubmit() {
        let generator = Arc::new(EchoGenerator);
        let (mut controller, _) = controller(&generator);

        controller.submit("old question?").unwrap();
        controller.reset();
        assert!(controller.submit("new question?").unwrap().is_accepted());

        // Both tasks report; the first settlement belongs to a dead cycle
        let reply = controller.settle().await.unwrap();

        assert_eq!(reply.text, "echo: new question?");
        assert_eq!(
            transcript(&mut controller),
            vec![
                (Role::User, "new question?".to_string()),
                (Role::Bot, "echo: new question?".to_string()),
            ]
        );
        assert!(controller.state().is_idle());
    }

    #[tokio::test]
    async fn test_finished_reply_lands_without_settle() {
        let generator = Arc::new(EchoGenerator);
        let (mut controller, _) = controller(&generator);

        controller.submit("first question?").unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(controller.state(), DispatchState::Idle);
        assert_eq!(controller.conversation().len(), 2);
        assert!(controller.submit("second question?").unwrap().is_accepted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_after_latency_frees_gate_for_next_submit() {
        let generator = Arc::new(EchoGenerator);
        let mut controller = ChatController::new(
            generator,
            RecordingClipboard::new(),
            FixedLatency(Duration::from_millis(1000)),
        );

        controller.submit("first question?").unwrap();
        tokio::time::sleep(Duration::from_millis(1001)).await;

        assert!(matches!(
            controller.screen(),
            Screen::Chat { messages, awaiting: false } if messages.len() == 2
        ));
        let second = controller.submit("second question?").unwrap();
        assert!(second.is_accepted());
        assert_eq!(
            second,
            Submission::Accepted {
                message_id: controller.conversation().last().unwrap().id.clone(),
                cycle: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_copy_sees_reply_without_settle() {
        let generator = Arc::new(EchoGenerator);
        let (mut controller, clipboard) = controller(&generator);

        controller.submit("copy the reply?").unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let reply_id = controller.conversation().last().unwrap().id.clone();
        assert_eq!(
            controller.act(&reply_id, MessageAction::Copy),
            ActionOutcome::Copied
        );
        assert_eq!(clipboard.writes(), vec!["echo: copy the reply?".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_stay_live_while_awaiting() {
        let generator = Arc::new(EchoGenerator);
        let mut controller = ChatController::new(
            generator,
            RecordingClipboard::new(),
            FixedLatency(Duration::from_millis(1000)),
        );

        let Submission::Accepted { message_id, .. } =
            controller.submit("Still typing?").unwrap()
        else {
            panic!("submission should be accepted");
        };

        controller.handle(Command::ShowRecent).unwrap();
        assert_eq!(controller.view_mode(), ViewMode::RecentList);
        controller.handle(Command::ShowChat).unwrap();

        let outcome = controller
            .handle(Command::Act {
                message_id,
                action: MessageAction::Copy,
            })
            .unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Acted {
                outcome: ActionOutcome::Copied
            }
        );
        assert_eq!(controller.clipboard().writes(), vec!["Still typing?".to_string()]);
        assert!(controller.state().is_awaiting());

        controller.handle(Command::NewChat).unwrap();
        assert!(controller.state().is_idle());
        assert!(controller.conversation().is_empty());
    }

    #[tokio::test]
    async fn test_reset_when_idle() {
        let generator = Arc::new(EchoGenerator);
        let (controller, _) = controller(&generator);
        let mut controller = controller.with_greeting();
        assert_eq!(controller.conversation().len(), 2);

        controller.reset();

        assert!(controller.conversation().is_empty());
        assert_eq!(controller.state(), DispatchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_latency_delays_reply() {
        let generator = Arc::new(EchoGenerator);
        let mut controller = ChatController::new(
            generator,
            RecordingClipboard::new(),
            FixedLatency(Duration::from_millis(1000)),
        );
        let start = tokio::time::Instant::now();

        controller.submit("Is the delay honored?").unwrap();
        tokio::time::sleep(Duration::from_millis(999)).await;

        assert!(controller.try_settle().is_none());
        assert_eq!(controller.conversation().len(), 1);
        assert!(controller.state().is_awaiting());

        let reply = controller.settle().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(reply.text, "echo: Is the delay honored?");
    }

    #[tokio::test]
    async fn test_copy_action_writes_exact_text_once() {
        let generator = Arc::new(EchoGenerator);
        let (mut controller, clipboard) = controller(&generator);

        let Submission::Accepted { message_id, .. } =
            controller.submit("Copy me, please.").unwrap()
        else {
            panic!("submission should be accepted");
        };

        assert_eq!(
            controller.act(&message_id, MessageAction::Copy),
            ActionOutcome::Copied
        );
        assert_eq!(clipboard.writes(), vec!["Copy me, please.".to_string()]);

        assert_eq!(
            controller.act(&MessageId::from("missing"), MessageAction::Copy),
            ActionOutcome::NotFound
        );
        assert_eq!(clipboard.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_retry_does_not_dispatch() {
        let generator = Arc::new(MockGenerator::new());
        generator.queue_response("A reply.");
        let (mut controller, _) = controller(&generator);

        controller.submit("Tell me about glaciers.").unwrap();
        let reply = controller.settle().await.unwrap();

        assert_eq!(
            controller.act(&reply.id, MessageAction::Retry),
            ActionOutcome::Unimplemented {
                action: MessageAction::Retry
            }
        );
        assert!(controller.state().is_idle());
        assert_eq!(controller.conversation().len(), 2);
        assert_eq!(generator.recorded_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_navigation_commands() {
        let generator = Arc::new(EchoGenerator);
        let (controller, _) = controller(&generator);
        let mut controller = controller
            .with_greeting()
            .with_recent_chats(RecentChats::from(vec![RecentChatSummary::new(
                "Sea level rise",
                "What causes sea level rise?",
            )]));

        assert!(matches!(controller.screen(), Screen::Chat { awaiting: false, .. }));

        controller.handle(Command::ShowRecent).unwrap();
        assert_eq!(controller.view_mode(), ViewMode::RecentList);
        assert!(matches!(controller.screen(), Screen::Recent { chats } if chats.len() == 1));

        let outcome = controller
            .handle(Command::SelectRecent { index: 0 })
            .unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Selected {
                chat: RecentChatSummary::new("Sea level rise", "What causes sea level rise?")
            }
        );
        assert_eq!(controller.view_mode(), ViewMode::ActiveChat);
        // The selected chat is not loaded
        assert_eq!(controller.conversation().len(), 2);

        let err = controller
            .handle(Command::SelectRecent { index: 0 })
            .unwrap_err();
        assert!(matches!(err, ControllerError::Navigation(_)));
    }

    #[tokio::test]
    async fn test_view_is_independent_of_dispatch() {
        let generator = Arc::new(EchoGenerator);
        let (mut controller, _) = controller(&generator);

        controller.handle(Command::Submit { text: "Switching away?".into() }).unwrap();
        controller.handle(Command::ShowRecent).unwrap();
        assert!(controller.state().is_awaiting());

        controller.settle().await.unwrap();
        controller.handle(Command::ShowChat).unwrap();
        assert!(matches!(
            controller.screen(),
            Screen::Chat { messages, awaiting: false } if messages.len() == 2
        ));
    }

    #[tokio::test]
    async fn test_new_chat_command() {
        let generator = Arc::new(EchoGenerator);
        let (controller, _) = controller(&generator);
        let mut controller = controller.with_greeting();

        let outcome = controller.handle(Command::NewChat).unwrap();

        assert_eq!(outcome, CommandOutcome::Reset);
        assert!(controller.conversation().is_empty());
    }

    #[tokio::test]
    async fn test_change_notifications_in_order() {
        let generator = Arc::new(EchoGenerator);
        let (mut controller, _) = controller(&generator);
        let mut events = controller.subscribe();

        controller.submit("Notify me?").unwrap();
        controller.settle().await.unwrap();

        let received: Vec<ChatEvent> = std::iter::from_fn(|| events.try_recv().ok()).collect();
        assert_eq!(received.len(), 4, "{received:?}");
        assert!(
            matches!(&received[0], ChatEvent::MessageAppended { message } if message.role == Role::User)
        );
        assert!(matches!(
            received[1],
            ChatEvent::StateChanged {
                state: DispatchState::AwaitingResponse { .. }
            }
        ));
        assert!(
            matches!(&received[2], ChatEvent::MessageAppended { message } if message.role == Role::Bot)
        );
        assert!(matches!(
            received[3],
            ChatEvent::StateChanged {
                state: DispatchState::Idle
            }
        ));
    }

    #[tokio::test]
    async fn test_dispatch_reply_branches() {
        let generator = MockGenerator::new();
        generator.queue_response("generated");
        generator.queue_error(GeneratorError::new(GeneratorErrorKind::Timeout, "slow"));

        assert_eq!(
            dispatch_reply(&generator, &NoLatency, "hello").await,
            Reply::Clarification
        );
        assert_eq!(
            dispatch_reply(&generator, &NoLatency, "hello there").await,
            Reply::Generated {
                text: "generated".to_string()
            }
        );
        assert_eq!(
            dispatch_reply(&generator, &NoLatency, "hello again").await,
            Reply::Apology
        );
        assert_eq!(generator.recorded_calls().len(), 2);
    }
}
