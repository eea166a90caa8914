use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EscalationReason {
    ComplexRequest,
    CustomerDissatisfied,
    CustomerRequest,
    CannotResolveSituation,
}

impl EscalationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscalationReason::ComplexRequest => "complex_request",
            EscalationReason::CustomerDissatisfied => "customer_dissatisfied",
            EscalationReason::CustomerRequest => "customer_request",
            EscalationReason::CannotResolveSituation => "cannot_resolve_situation",
        }
    }
}

/// Response-time commitment given to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSla {
    OneHour,
    TwentyFourHours,
}

impl ResponseSla {
    pub fn for_priority(high_priority: bool) -> Self {
        if high_priority {
            ResponseSla::OneHour
        } else {
            ResponseSla::TwentyFourHours
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSla::OneHour => "1 hour",
            ResponseSla::TwentyFourHours => "24 hours",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    pub ticket_id: Uuid,
    pub reason: EscalationReason,
    pub details: String,
    pub high_priority: bool,
    pub sla: ResponseSla,
}
