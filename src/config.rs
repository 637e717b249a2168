/// Manager-wide behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManagerConfig {
    /// When set, a hidden window leaves the shown set only after its exit
    /// animation reports completion, and the caller's callback runs at that
    /// point. When clear, the callback fires immediately and the window leaves
    /// the shown set while its animation keeps running.
    pub wait_for_hide_completion: bool,
}

impl ManagerConfig {
    pub const fn waiting() -> Self {
        Self {
            wait_for_hide_completion: true,
        }
    }

    pub const fn with_wait_for_hide_completion(mut self, wait: bool) -> Self {
        self.wait_for_hide_completion = wait;
        self
    }
}
