/// Work item state definitions for tracking harvest progress
///
/// A work item moves `Pending -> InProgress -> {Succeeded, Abandoned}`; a
/// failed attempt with budget left goes back to `Pending`.
use std::fmt;

/// Represents the current state of a work item in the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkItemState {
    // ===== Active States =====
    /// Waiting in the queue for its next attempt
    Pending,

    /// Pages are being fetched for this item
    InProgress,

    // ===== Terminal States =====
    /// All pages fetched and every record handed to storage
    Succeeded,

    /// Retry budget exhausted; nothing from this day is persisted
    Abandoned,
}

impl WorkItemState {
    /// Returns true if the item must not be revisited
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Abandoned)
    }

    /// Returns true if the item may still be processed
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Checks whether moving to `next` is a legal transition
    pub fn can_transition_to(&self, next: WorkItemState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::InProgress, Self::Pending)
                | (Self::InProgress, Self::Succeeded)
                | (Self::InProgress, Self::Abandoned)
        )
    }

    /// Converts the state to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Succeeded => "succeeded",
            Self::Abandoned => "abandoned",
        }
    }

    /// Parses a state from its string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "succeeded" => Some(Self::Succeeded),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }
}

impl fmt::Display for WorkItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [WorkItemState; 4] = [
        WorkItemState::Pending,
        WorkItemState::InProgress,
        WorkItemState::Succeeded,
        WorkItemState::Abandoned,
    ];

    #[test]
    fn test_is_terminal() {
        assert!(!WorkItemState::Pending.is_terminal());
        assert!(!WorkItemState::InProgress.is_terminal());
        assert!(WorkItemState::Succeeded.is_terminal());
        assert!(WorkItemState::Abandoned.is_terminal());
    }

    #[test]
    fn test_is_success() {
        assert!(WorkItemState::Succeeded.is_success());
        assert!(!WorkItemState::Abandoned.is_success());
        assert!(!WorkItemState::Pending.is_success());
    }

    #[test]
    fn test_transitions() {
        use WorkItemState::*;

        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Pending));
        assert!(InProgress.can_transition_to(Succeeded));
        assert!(InProgress.can_transition_to(Abandoned));

        assert!(!Pending.can_transition_to(Succeeded));
        assert!(!Succeeded.can_transition_to(InProgress));
        assert!(!Abandoned.can_transition_to(Pending));
    }

    #[test]
    fn test_parse_matches_as_str() {
        for state in ALL {
            assert_eq!(WorkItemState::parse(state.as_str()), Some(state));
        }
        assert_eq!(WorkItemState::parse("invalid"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", WorkItemState::InProgress), "in_progress");
        assert_eq!(format!("{}", WorkItemState::Abandoned), "abandoned");
    }
}
