use socli_search::QuestionView;

/// One slot per result the interactive picker can show.
pub const CACHE_SLOTS: usize = 10;

/// Loaded questions keyed by result position. Each slot is written at most
/// once; an empty slot only means "not loaded yet".
#[derive(Debug, Default)]
pub struct QuestionCache {
    slots: [Option<QuestionView>; CACHE_SLOTS],
}

impl QuestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&QuestionView> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Store `view` at `index` unless the slot is taken or out of range.
    /// Returns whether it was stored.
    pub fn insert(&mut self, index: usize, view: QuestionView) -> bool {
        match self.slots.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(view);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
