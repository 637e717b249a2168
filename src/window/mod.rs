pub mod back_stack;
pub mod control_mask;
pub mod registry;

mod window_manager;

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;
use std::time::Duration;

pub use back_stack::{BackRecord, BackStack};
pub use control_mask::ControlMask;
pub use registry::{WindowFactory, WindowRegistry};
pub use window_manager::{OnHidden, WindowManager};

/// Identity of a window kind.
///
/// Identities key every mapping inside a manager. `slot` is the position of
/// the identity's bit in a [`ControlMask`]; it must be stable and distinct per
/// identity.
pub trait WindowKey: Copy + Eq + Ord + Hash + Debug + 'static {
    fn slot(self) -> usize;
}

impl WindowKey for usize {
    fn slot(self) -> usize {
        self
    }
}

impl WindowKey for u8 {
    fn slot(self) -> usize {
        self as usize
    }
}

/// Layering class of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowKind {
    /// Exclusive at the active slot and tracked by back navigation.
    #[default]
    Normal,
    /// Persistent overlay such as a top bar.
    Fixed,
    /// Transient overlay (message boxes). Never becomes the active window.
    PopUp,
}

/// How a window treats its siblings when opened through
/// [`WindowManager::open_window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowMode {
    #[default]
    DoNothing,
    HideOther,
    NeedBack,
    NoNeedBack,
}

/// Input-blocking behaviour behind the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColliderMode {
    #[default]
    None,
    Normal,
    WithBg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowData {
    pub kind: WindowKind,
    pub show_mode: ShowMode,
    pub collider_mode: ColliderMode,
}

impl WindowData {
    pub const fn normal() -> Self {
        Self {
            kind: WindowKind::Normal,
            show_mode: ShowMode::DoNothing,
            collider_mode: ColliderMode::None,
        }
    }

    pub const fn fixed() -> Self {
        Self {
            kind: WindowKind::Fixed,
            show_mode: ShowMode::DoNothing,
            collider_mode: ColliderMode::None,
        }
    }

    pub const fn with_show_mode(mut self, show_mode: ShowMode) -> Self {
        self.show_mode = show_mode;
        self
    }

    pub const fn with_collider_mode(mut self, collider_mode: ColliderMode) -> Self {
        self.collider_mode = collider_mode;
        self
    }

    pub fn is_normal(&self) -> bool {
        self.kind == WindowKind::Normal
    }
}

/// Optional arguments for a show request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShowData {
    /// Run `reset_window` before `show`.
    pub force_reset: bool,
    /// Empty the back-navigation stack before showing.
    pub clear_back_sequence: bool,
}

impl ShowData {
    pub const fn reset() -> Self {
        Self {
            force_reset: true,
            clear_back_sequence: false,
        }
    }
}

pub(crate) type CompletionQueue = Rc<RefCell<VecDeque<u64>>>;

/// One-shot signal handed to [`Window::hide`].
///
/// Call [`HideCompletion::complete`] once the exit animation is over. Dropping
/// the handle without completing it also counts as completion, so windows
/// without animations can simply ignore it.
#[derive(Debug)]
pub struct HideCompletion {
    ticket: u64,
    queue: Option<CompletionQueue>,
}

impl HideCompletion {
    pub(crate) fn new(ticket: u64, queue: CompletionQueue) -> Self {
        Self {
            ticket,
            queue: Some(queue),
        }
    }

    /// A handle that reports to nobody. Useful for driving windows outside a
    /// manager.
    pub fn detached() -> Self {
        Self {
            ticket: 0,
            queue: None,
        }
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn complete(mut self) {
        self.signal();
    }

    fn signal(&mut self) {
        if let Some(queue) = self.queue.take() {
            queue.borrow_mut().push_back(self.ticket);
        }
    }
}

impl Drop for HideCompletion {
    fn drop(&mut self) {
        self.signal();
    }
}

/// Lifecycle contract between a window and the manager that owns it.
///
/// `show` and `hide` may start animations; the manager only observes hide
/// completion through the [`HideCompletion`] handle. Callers must not issue a
/// second show or hide for a window while one is still in flight.
pub trait Window<Id: WindowKey>: AsAny {
    fn id(&self) -> Id;

    /// Where to go back to when no back record exists.
    fn previous_id(&self) -> Option<Id> {
        None
    }

    fn window_data(&self) -> WindowData {
        WindowData::normal()
    }

    fn min_depth(&self) -> i32 {
        0
    }

    /// Runs once when the window is registered.
    fn initialize(&mut self) {}

    fn show(&mut self, data: &ShowData);

    fn hide(&mut self, done: HideCompletion);

    /// Hide without animation or completion ordering.
    fn hide_directly(&mut self);

    fn destroy(&mut self) {}

    fn reset_window(&mut self) {}

    /// Advance animations by `elapsed`.
    fn tick(&mut self, _elapsed: Duration) {}

    /// Nested manager owned by this window, if any.
    fn sub_manager(&mut self) -> Option<&mut dyn Navigator> {
        None
    }
}

/// Downcasting support for [`WindowManager::window_script`].
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// What every manager can do when reached through a parent window.
pub trait Navigator {
    /// Attempt a local back navigation. Returns `true` when handled.
    fn return_window(&mut self) -> bool;

    /// Process due timers and reported completions.
    fn pump(&mut self);

    fn reset_all_controlled_windows(&mut self);

    fn hide_all_shown(&mut self, include_fixed: bool);

    fn shown_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_handle_reports_completion() {
        let queue: CompletionQueue = Rc::new(RefCell::new(VecDeque::new()));
        {
            let _done = HideCompletion::new(7, queue.clone());
        }
        assert_eq!(queue.borrow().iter().copied().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn explicit_complete_reports_once() {
        let queue: CompletionQueue = Rc::new(RefCell::new(VecDeque::new()));
        HideCompletion::new(3, queue.clone()).complete();
        assert_eq!(queue.borrow().len(), 1);
    }

    #[test]
    fn detached_handle_is_silent() {
        let done = HideCompletion::detached();
        assert_eq!(done.ticket(), 0);
        done.complete();
    }

    #[test]
    fn window_data_builders() {
        let data = WindowData::normal().with_show_mode(ShowMode::NeedBack);
        assert!(data.is_normal());
        assert_eq!(data.show_mode, ShowMode::NeedBack);
        assert!(!WindowData::fixed().is_normal());
    }
}
