use crate::constants::HOVER_EXIT_DELAY;
use std::time::Duration;

/// Handle for a pending hover exit. The host arms a timer for `delay` and
/// hands the ticket back to [`HoverDebounce::fire`] when it expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitTicket {
    generation: u64,
    pub delay: Duration,
}

/// Hover state with a delayed exit.
///
/// Entering takes effect immediately. Exiting arms a ticket; only the most
/// recently armed ticket can clear the hover, so a re-enter (or a teardown
/// via [`cancel`](Self::cancel)) silently invalidates any timer still in
/// flight.
#[derive(Clone, Debug)]
pub struct HoverDebounce {
    active: bool,
    generation: u64,
    pending: Option<u64>,
    delay: Duration,
}

impl Default for HoverDebounce {
    fn default() -> Self {
        Self::new(HOVER_EXIT_DELAY)
    }
}

impl HoverDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            active: false,
            generation: 0,
            pending: None,
            delay,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn enter(&mut self) {
        self.invalidate();
        self.active = true;
    }

    /// Arm a delayed exit. `None` when not hovered.
    pub fn exit(&mut self) -> Option<ExitTicket> {
        if !self.active {
            return None;
        }
        self.invalidate();
        self.pending = Some(self.generation);
        Some(ExitTicket {
            generation: self.generation,
            delay: self.delay,
        })
    }

    /// Returns true if the ticket was current and hover is now cleared.
    pub fn fire(&mut self, ticket: ExitTicket) -> bool {
        if self.pending != Some(ticket.generation) {
            return false;
        }
        self.pending = None;
        self.active = false;
        true
    }

    /// Drop hover and any pending exit.
    pub fn cancel(&mut self) {
        self.invalidate();
        self.active = false;
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
    }
}
