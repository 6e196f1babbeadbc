use super::Journal;

/// Keeps recorded lines in memory so tests can assert on them.
#[derive(Debug, Default)]
pub struct MemoryJournal {
    pub lines: Vec<String>,
}

impl MemoryJournal {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl Journal for MemoryJournal {
    fn record(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
