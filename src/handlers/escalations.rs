use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::escalation::{Acknowledgement, EscalationReason};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct EscalateRequest {
    pub reason: EscalationReason,
    pub details: String,
    /// Urgent matters and clearly dissatisfied customers.
    #[serde(default)]
    pub high_priority: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AcknowledgementResponse {
    pub ticket_id: Uuid,
    pub reason: EscalationReason,
    pub details: String,
    pub high_priority: bool,
    /// Promised response time, e.g. "1 hour".
    pub sla: String,
}

impl From<Acknowledgement> for AcknowledgementResponse {
    fn from(ack: Acknowledgement) -> Self {
        Self {
            ticket_id: ack.ticket_id,
            reason: ack.reason,
            details: ack.details,
            high_priority: ack.high_priority,
            sla: ack.sla.as_str().to_string(),
        }
    }
}

/// POST /escalations
///
/// Hands the conversation to the support team. Always accepted.
#[utoipa::path(
    post,
    path = "/escalations",
    request_body = EscalateRequest,
    responses(
        (status = 202, description = "Escalation accepted", body = AcknowledgementResponse),
    ),
    tag = "escalations"
)]
pub async fn escalate(
    state: web::Data<AppState>,
    body: web::Json<EscalateRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let ack = state
        .escalations
        .escalate(body.reason, body.details, body.high_priority);
    HttpResponse::Accepted().json(AcknowledgementResponse::from(ack))
}
