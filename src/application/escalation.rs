use uuid::Uuid;

use crate::domain::escalation::{Acknowledgement, EscalationReason, ResponseSla};

/// Hands a conversation over to the human support team.
///
/// Stateless and independent of any order: it always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct EscalationHandler;

impl EscalationHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn escalate(
        &self,
        reason: EscalationReason,
        details: impl Into<String>,
        high_priority: bool,
    ) -> Acknowledgement {
        let ack = Acknowledgement {
            ticket_id: Uuid::new_v4(),
            reason,
            details: details.into(),
            high_priority,
            sla: ResponseSla::for_priority(high_priority),
        };

        if high_priority {
            log::warn!(
                "High-priority escalation {} ({}), respond within {}: {}",
                ack.ticket_id,
                reason.as_str(),
                ack.sla.as_str(),
                ack.details
            );
        } else {
            log::info!(
                "Escalation {} ({}), respond within {}: {}",
                ack.ticket_id,
                reason.as_str(),
                ack.sla.as_str(),
                ack.details
            );
        }
        ack
    }
}
