use super::WindowKey;

/// "To go back from here, hide `hide_target`, then show `restore_targets` in
/// order." The last restore target becomes the active window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackRecord<Id: WindowKey> {
    pub hide_target: Id,
    pub restore_targets: Vec<Id>,
}

impl<Id: WindowKey> BackRecord<Id> {
    pub fn new(hide_target: Id, restore_targets: Vec<Id>) -> Self {
        Self {
            hide_target,
            restore_targets,
        }
    }

    pub fn last_target(&self) -> Option<Id> {
        self.restore_targets.last().copied()
    }
}

#[derive(Debug, Clone)]
pub struct BackStack<Id: WindowKey> {
    records: Vec<BackRecord<Id>>,
}

impl<Id: WindowKey> Default for BackStack<Id> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<Id: WindowKey> BackStack<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: BackRecord<Id>) {
        tracing::debug!(
            hide = ?record.hide_target,
            restore = ?record.restore_targets,
            depth = self.records.len() + 1,
            "pushed back record"
        );
        self.records.push(record);
    }

    pub fn peek(&self) -> Option<&BackRecord<Id>> {
        self.records.last()
    }

    pub fn pop(&mut self) -> Option<BackRecord<Id>> {
        self.records.pop()
    }

    /// Pop the top record only if it still targets `hide_target`.
    pub fn pop_if_target(&mut self, hide_target: Id) -> Option<BackRecord<Id>> {
        if self.peek()?.hide_target == hide_target {
            self.records.pop()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackRecord<Id>> {
        self.records.iter().rev()
    }
}
