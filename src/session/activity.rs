/// Append-only narration of join/leave events, in arrival order. Unbounded:
/// the log lives for the process lifetime and is never truncated.
#[derive(Default)]
pub struct ActivityLog {
    entries: Vec<String>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn append(&mut self, description: String) {
        self.entries.push(description);
    }

    /// Full log in append order, for inclusion in broadcast payloads.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_append_order() {
        let mut log = ActivityLog::new();
        log.append("Alice joined to edit the document".to_string());
        log.append("Bob joined to edit the document".to_string());
        log.append("Alice left the document".to_string());

        assert_eq!(
            log.snapshot(),
            vec![
                "Alice joined to edit the document",
                "Bob joined to edit the document",
                "Alice left the document",
            ]
        );
    }

    #[test]
    fn length_grows_monotonically() {
        let mut log = ActivityLog::new();
        assert!(log.is_empty());
        for n in 1..=5 {
            log.append(format!("entry {n}"));
            assert_eq!(log.len(), n);
        }
    }
}
