/// The final, fully ordered item sequence produced by a sort.
///
/// Items are opaque text. The ranking never carries anything beyond the text
/// and the position it ended up in, plus how many judgments it took to get there.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ranking {
    items: Vec<String>,
    comparisons: usize,
}

impl Ranking {
    pub(crate) fn new(items: Vec<String>, comparisons: usize) -> Self {
        Ranking { items, comparisons }
    }

    /// Items, most preferred first.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of oracle judgments issued while producing this ranking.
    pub fn comparisons(&self) -> usize {
        self.comparisons
    }

    /// Iterate `(rank, item)` with ranks starting at 1.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (i + 1, item.as_str()))
    }

    pub fn into_items(self) -> Vec<String> {
        self.items
    }
}
