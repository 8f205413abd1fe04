/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// Zero-based index of the item on screen.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }

    /// Progress bar fill, 0-100, counting the item on screen as reached.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let reached = if self.is_complete {
            self.total
        } else {
            (self.position + 1).min(self.total)
        };
        u32::try_from(reached * 100 / self.total).unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_counts_current_item() {
        let progress = SessionProgress {
            position: 0,
            total: 10,
            answered: 0,
            correct: 0,
            is_complete: false,
        };
        assert_eq!(progress.percent(), 10);
        assert_eq!(progress.remaining(), 10);

        let done = SessionProgress {
            position: 9,
            answered: 10,
            is_complete: true,
            ..progress
        };
        assert_eq!(done.percent(), 100);
        assert_eq!(done.remaining(), 0);
    }
}
