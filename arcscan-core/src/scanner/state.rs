//! Scanner state machine

/// Faults that stop a coordinated scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanFault {
    /// Range sensor failed to initialize or start
    Sensor,
    /// Servo PWM output failed
    Servo,
    /// Stepper coil output failed
    Stepper,
}

/// Events that drive the scanner state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanEvent {
    /// Begin a full turn
    Start,
    /// The turntable completed a full turn
    TurnComplete,
    /// A hardware fault occurred
    Fault(ScanFault),
    /// Return to idle, clearing any fault
    Reset,
}

/// Scanner states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
    Error(ScanFault),
}

impl ScanState {
    /// Check if a scan is running
    pub fn is_scanning(&self) -> bool {
        matches!(self, ScanState::Scanning)
    }

    /// Check if this is an error state
    pub fn is_error(&self) -> bool {
        matches!(self, ScanState::Error(_))
    }

    /// Short lowercase name for console output
    pub fn name(&self) -> &'static str {
        match self {
            ScanState::Idle => "idle",
            ScanState::Scanning => "scanning",
            ScanState::Error(_) => "error",
        }
    }

    /// Process an event and return the next state
    ///
    /// Events that make no sense in the current state leave it unchanged.
    /// An error state is only left through [`ScanEvent::Reset`].
    pub fn transition(self, event: ScanEvent) -> Self {
        use ScanEvent::*;
        use ScanState::*;

        match (self, event) {
            (_, Reset) => Idle,
            (Error(fault), _) => Error(fault),
            (_, Fault(fault)) => Error(fault),

            (Idle, Start) => Scanning,
            (Scanning, TurnComplete) => Idle,

            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_lifecycle() {
        let state = ScanState::default();
        assert_eq!(state, ScanState::Idle);

        let state = state.transition(ScanEvent::Start);
        assert!(state.is_scanning());

        let state = state.transition(ScanEvent::TurnComplete);
        assert_eq!(state, ScanState::Idle);
    }

    #[test]
    fn test_start_while_scanning_is_ignored() {
        let state = ScanState::Scanning.transition(ScanEvent::Start);
        assert_eq!(state, ScanState::Scanning);
    }

    #[test]
    fn test_fault_latches_until_reset() {
        let state = ScanState::Scanning.transition(ScanEvent::Fault(ScanFault::Sensor));
        assert_eq!(state, ScanState::Error(ScanFault::Sensor));
        assert!(state.is_error());

        // Cannot start or take another fault while in error
        assert_eq!(state.transition(ScanEvent::Start), state);
        assert_eq!(state.transition(ScanEvent::Fault(ScanFault::Servo)), state);

        assert_eq!(state.transition(ScanEvent::Reset), ScanState::Idle);
    }

    #[test]
    fn test_fault_during_boot() {
        let state = ScanState::Idle.transition(ScanEvent::Fault(ScanFault::Stepper));
        assert_eq!(state, ScanState::Error(ScanFault::Stepper));
    }

    #[test]
    fn test_turn_complete_when_idle_is_ignored() {
        assert_eq!(
            ScanState::Idle.transition(ScanEvent::TurnComplete),
            ScanState::Idle
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(ScanState::Idle.name(), "idle");
        assert_eq!(ScanState::Scanning.name(), "scanning");
        assert_eq!(ScanState::Error(ScanFault::Servo).name(), "error");
    }
}
