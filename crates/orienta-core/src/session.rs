//! Per-visit session state, modeled as an explicit state machine.
//!
//! The flow is `Unregistered -> Registered -> Scored`. `Unregistered` is the
//! absence of a session; the two stored states carry everything the next step
//! renders. Transitions are guarded by explicit methods rather than ad hoc
//! key lookups, and a scored session may be re-scored (re-submission is
//! allowed and produces an additional persisted result).

use serde::Serialize;

use crate::tags::{ProfileTag, ScoreTally};

/// How the report delivery attempt ended for the current scored session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// The report was handed to the mail transport.
    Sent,
    /// Delivery failed or timed out; the result is still committed. The
    /// detail string is shown to the user as a warning.
    Failed(String),
    /// No mail transport is configured.
    Disabled,
}

#[derive(Debug, Clone)]
pub enum SessionState {
    /// Registration completed; the respondent may take the test.
    Registered {
        respondent_id: i64,
        first_name: String,
        email: String,
    },
    /// Test submitted and scored; the results view renders from here.
    Scored {
        respondent_id: i64,
        first_name: String,
        email: String,
        answers: Vec<String>,
        tally: ScoreTally,
        predominant: Option<ProfileTag>,
        careers: Vec<String>,
        delivery: DeliveryStatus,
    },
}

impl SessionState {
    #[must_use]
    pub fn registered(respondent_id: i64, first_name: String, email: String) -> Self {
        SessionState::Registered {
            respondent_id,
            first_name,
            email,
        }
    }

    #[must_use]
    pub fn respondent_id(&self) -> i64 {
        match self {
            SessionState::Registered { respondent_id, .. }
            | SessionState::Scored { respondent_id, .. } => *respondent_id,
        }
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        match self {
            SessionState::Registered { first_name, .. }
            | SessionState::Scored { first_name, .. } => first_name,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            SessionState::Registered { email, .. } | SessionState::Scored { email, .. } => email,
        }
    }

    /// Transition into `Scored` after a completed submission. Valid from
    /// `Registered` and from `Scored` (re-submission); the respondent
    /// identity carries over unchanged.
    #[must_use]
    pub fn into_scored(
        self,
        answers: Vec<String>,
        tally: ScoreTally,
        predominant: Option<ProfileTag>,
        careers: Vec<String>,
        delivery: DeliveryStatus,
    ) -> Self {
        let (respondent_id, first_name, email) = match self {
            SessionState::Registered {
                respondent_id,
                first_name,
                email,
            }
            | SessionState::Scored {
                respondent_id,
                first_name,
                email,
                ..
            } => (respondent_id, first_name, email),
        };
        SessionState::Scored {
            respondent_id,
            first_name,
            email,
            answers,
            tally,
            predominant,
            careers,
            delivery,
        }
    }
}
