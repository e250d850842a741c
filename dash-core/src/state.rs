use chrono::{DateTime, Utc};
use std::fmt::Display;

/// State of one independently fetched piece of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState<T> {
    Idle,
    Loading,
    Success { value: T, updated_at: DateTime<Utc> },
    Failure { message: &'static str },
}

/// Generation token handed out when a fetch starts.
///
/// Only the newest ticket of a slot may write a result into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct Slot<T> {
    name: &'static str,
    failure_message: &'static str,
    generation: u64,
    state: SlotState<T>,
}

impl<T> Slot<T> {
    pub fn new(name: &'static str, failure_message: &'static str) -> Self {
        Self {
            name,
            failure_message,
            generation: 0,
            state: SlotState::Idle,
        }
    }

    pub fn state(&self) -> &SlotState<T> {
        &self.state
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            SlotState::Success { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SlotState::Loading)
    }

    /// Enter `Loading`, dropping whatever value or error the slot held.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.state = SlotState::Loading;
        Ticket(self.generation)
    }

    /// Apply a finished fetch. Returns `false` if a newer fetch has started since
    /// `ticket` was issued, in which case the outcome is dropped.
    pub fn resolve<E: Display>(&mut self, ticket: Ticket, outcome: Result<T, E>) -> bool {
        if ticket.0 != self.generation {
            log::debug!(
                "{}: dropping stale result for request #{} (current #{})",
                self.name,
                ticket.0,
                self.generation
            );
            return false;
        }

        self.state = match outcome {
            Ok(value) => SlotState::Success {
                value,
                updated_at: Utc::now(),
            },
            Err(err) => {
                log::warn!("{}: request #{} failed: {err}", self.name, ticket.0);
                SlotState::Failure {
                    message: self.failure_message,
                }
            }
        };

        true
    }
}
