/// Where the capture loop is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    /// A capture has been requested.
    AwaitingFrame,
    /// Frame `seq` is with the worker.
    AwaitingResult { seq: u64 },
}

/// What to do with an incoming result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    Apply,
    /// Stale: from before a stop, or for a frame already timed out.
    Discard,
}

/// Tracking session state machine.
///
/// Busy is not a flag but the `AwaitingFrame` and `AwaitingResult`
/// states, so a second capture while one frame is in flight cannot be
/// expressed. Only the capture loop drives it.
#[derive(Debug, Clone)]
pub struct Session {
    state: LoopState,
    active: bool,
    next_seq: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            active: false,
            next_seq: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_busy(&self) -> bool {
        self.state != LoopState::Idle
    }

    pub fn wants_frame(&self) -> bool {
        self.state == LoopState::AwaitingFrame
    }

    /// Seq of the frame currently with the worker.
    pub fn in_flight(&self) -> Option<u64> {
        match self.state {
            LoopState::AwaitingResult { seq } => Some(seq),
            _ => None,
        }
    }

    /// Returns false if already tracking.
    pub fn start(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.state = LoopState::AwaitingFrame;
        true
    }

    /// Go idle from any state. Whatever is in flight is forgotten, so its
    /// result will be discarded. Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.state = LoopState::Idle;
        was_active
    }

    /// A frame arrived. Returns the seq to send it under, or `None` if no
    /// frame was wanted.
    pub fn frame_captured(&mut self) -> Option<u64> {
        if self.state != LoopState::AwaitingFrame {
            return None;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.state = LoopState::AwaitingResult { seq };
        Some(seq)
    }

    /// The capture failed; try again later if still tracking.
    pub fn capture_failed(&mut self) {
        if self.state == LoopState::AwaitingFrame && !self.active {
            self.state = LoopState::Idle;
        }
    }

    /// The in-flight frame is lost (send rejected, transport error, timeout).
    /// Returns the seq that was abandoned.
    pub fn abandon(&mut self) -> Option<u64> {
        let seq = self.in_flight()?;
        self.state = self.after_result();
        Some(seq)
    }

    pub fn result(&mut self, seq: u64) -> ResultAction {
        if self.in_flight() != Some(seq) {
            return ResultAction::Discard;
        }
        self.state = self.after_result();
        ResultAction::Apply
    }

    fn after_result(&self) -> LoopState {
        if self.active {
            LoopState::AwaitingFrame
        } else {
            LoopState::Idle
        }
    }
}
