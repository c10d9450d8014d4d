//! Parsed input deck before interpretation.

/// One `label value...` line of the deck.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckEntry {
    /// Label, lowercased
    pub label: String,
    pub values: Vec<f64>,
    /// Source line (1-indexed)
    pub line: usize,
}

/// Deck entries in file order. Labels are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputDeck {
    pub entries: Vec<DeckEntry>,
}

impl InputDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry by label (case-insensitive).
    pub fn get(&self, label: &str) -> Option<&DeckEntry> {
        self.entries
            .iter()
            .find(|e| e.label.eq_ignore_ascii_case(label))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeckEntry> {
        self.entries.iter()
    }
}
