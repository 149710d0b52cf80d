//! Events that can occur in a dispatch cycle

use crate::conversation::MessageId;
use crate::state_machine::state::Reply;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit {
        text: String,
        /// Id for the user message, generated by the caller
        message_id: MessageId,
        /// Cycle number to assign if the submission is accepted
        cycle: u64,
    },
    Reset,

    // Dispatch task events
    Settled {
        cycle: u64,
        reply_id: MessageId,
        reply: Reply,
    },
}
