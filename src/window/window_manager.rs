use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::{
    BackRecord, BackStack, CompletionQueue, ControlMask, HideCompletion, Navigator, ShowData,
    ShowMode, Window, WindowFactory, WindowKey, WindowKind, WindowRegistry,
};
use crate::config::ManagerConfig;
use crate::error::{NavResult, NavigationError};
use crate::scheduler::{Clock, DelayQueue, SystemClock};

/// Caller continuation for [`WindowManager::hide_window`].
pub type OnHidden<Id> = Box<dyn FnOnce(&mut WindowManager<Id>)>;

/// Work the manager runs, in order, once a hide has finished.
enum CompletionStep<Id: WindowKey> {
    Notify(OnHidden<Id>),
    ForgetShown(Id),
    ShowPrevious(Id),
    RestoreBack { hide_target: Id, targets: Vec<Id> },
}

#[derive(Debug, Clone, Copy)]
struct DelayedShow<Id> {
    id: Id,
    data: Option<ShowData>,
}

/// Owns a set of windows and decides which of them are visible.
///
/// All operations run on one thread. Asynchronous hides are modelled as
/// tickets: the window receives a [`HideCompletion`], and once it reports in,
/// the manager runs the completion steps recorded for that ticket. Reported
/// tickets are processed immediately after each hide and on every
/// [`WindowManager::pump`].
pub struct WindowManager<Id: WindowKey> {
    name: String,
    registry: WindowRegistry<Id>,
    shown: BTreeSet<Id>,
    control: ControlMask<Id>,
    back_stack: BackStack<Id>,
    current: Option<Id>,
    last: Option<Id>,
    config: ManagerConfig,
    clock: Rc<dyn Clock>,
    delayed: DelayQueue<DelayedShow<Id>>,
    completions: CompletionQueue,
    pending: BTreeMap<u64, Vec<CompletionStep<Id>>>,
    next_ticket: u64,
    last_pump: Option<Instant>,
}

impl<Id: WindowKey> WindowManager<Id> {
    pub fn new(config: ManagerConfig) -> Self {
        Self::with_clock(config, Rc::new(SystemClock))
    }

    pub fn with_clock(config: ManagerConfig, clock: Rc<dyn Clock>) -> Self {
        Self {
            name: "root".to_string(),
            registry: WindowRegistry::new(),
            shown: BTreeSet::new(),
            control: ControlMask::new(),
            back_stack: BackStack::new(),
            current: None,
            last: None,
            config,
            clock,
            delayed: DelayQueue::new(),
            completions: Rc::new(RefCell::new(VecDeque::new())),
            pending: BTreeMap::new(),
            next_ticket: 1,
            last_pump: None,
        }
    }

    /// Label used in log records.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> ManagerConfig {
        self.config
    }

    pub fn set_wait_for_hide_completion(&mut self, wait: bool) {
        self.config.wait_for_hide_completion = wait;
    }

    pub fn clock(&self) -> Rc<dyn Clock> {
        self.clock.clone()
    }

    // -- registration -----------------------------------------------------

    pub fn register_control(&mut self, id: Id) {
        self.control.insert(id);
    }

    pub fn is_in_control(&self, id: Id) -> bool {
        self.control.contains(id)
    }

    pub fn register_window(&mut self, window: Box<dyn Window<Id>>) {
        let id = window.id();
        if self.registry.insert(window).is_some() {
            tracing::warn!(manager = %self.name, window_id = ?id, "replaced registered window");
        }
    }

    pub fn register_factory(&mut self, id: Id, factory: WindowFactory<Id>) {
        self.registry.insert_factory(id, factory);
    }

    /// Forget every window, shown entry, back record and in-flight hide.
    /// The control mask is kept.
    pub fn init_window_manager(&mut self) {
        self.registry.clear();
        self.shown.clear();
        self.back_stack.clear();
        self.pending.clear();
        self.current = None;
        self.last = None;
    }

    // -- queries ----------------------------------------------------------

    /// Look up a window. Returns `None` for identities outside this manager's
    /// control even if they are registered.
    pub fn window(&self, id: Id) -> Option<&dyn Window<Id>> {
        if !self.is_in_control(id) {
            return None;
        }
        self.registry.get(id)
    }

    pub fn window_mut(&mut self, id: Id) -> Option<&mut (dyn Window<Id> + 'static)> {
        if !self.is_in_control(id) {
            return None;
        }
        self.registry.get_mut(id)
    }

    /// Typed access to a window. `None` when absent, out of control, or of a
    /// different concrete type.
    pub fn window_script<T: Window<Id>>(&self, id: Id) -> Option<&T> {
        self.window(id)?.as_any().downcast_ref::<T>()
    }

    pub fn window_script_mut<T: Window<Id>>(&mut self, id: Id) -> Option<&mut T> {
        self.window_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn is_shown(&self, id: Id) -> bool {
        self.shown.contains(&id)
    }

    pub fn shown_ids(&self) -> Vec<Id> {
        self.shown.iter().copied().collect()
    }

    /// Shown windows ordered by `min_depth`, ties broken by identity.
    pub fn shown_ids_by_depth(&self) -> Vec<Id> {
        let mut ordered: Vec<(i32, Id)> = self
            .shown
            .iter()
            .filter_map(|id| self.registry.get(*id).map(|w| (w.min_depth(), *id)))
            .collect();
        ordered.sort();
        ordered.into_iter().map(|(_, id)| id).collect()
    }

    pub fn registered_ids(&self) -> Vec<Id> {
        self.registry.ids().collect()
    }

    pub fn current_window_id(&self) -> Option<Id> {
        self.current
    }

    pub fn last_window_id(&self) -> Option<Id> {
        self.last
    }

    pub fn back_depth(&self) -> usize {
        self.back_stack.len()
    }

    /// Back records, top of the stack first.
    pub fn back_records(&self) -> impl Iterator<Item = &BackRecord<Id>> {
        self.back_stack.iter()
    }

    /// Hides issued in waiting mode whose completion has not been reported.
    pub fn pending_hides(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_delayed_shows(&self) -> usize {
        self.delayed.len()
    }

    pub fn next_delayed_deadline(&self) -> Option<Instant> {
        self.delayed.next_deadline()
    }

    fn ensure_control(&self, id: Id) -> NavResult<(), Id> {
        if self.is_in_control(id) {
            Ok(())
        } else {
            Err(NavigationError::AuthorityViolation(id))
        }
    }

    fn kind_of(&self, id: Id) -> Option<WindowKind> {
        self.registry.get(id).map(|w| w.window_data().kind)
    }

    // -- show -------------------------------------------------------------

    /// Show a window. Failures are logged and leave state unchanged.
    ///
    /// No exclusivity is applied; see [`WindowManager::open_window`] for the
    /// policy-aware variant.
    pub fn show_window(&mut self, id: Id, data: Option<ShowData>) {
        if let Err(err) = self.try_show_window(id, data) {
            tracing::info!(manager = %self.name, window_id = ?id, "show skipped: {err}");
        }
    }

    pub fn try_show_window(&mut self, id: Id, data: Option<ShowData>) -> NavResult<(), Id> {
        self.ensure_control(id)?;
        let data = data.unwrap_or_default();
        let window = self
            .registry
            .resolve(id)
            .ok_or(NavigationError::UnknownIdentity(id))?;
        if data.force_reset {
            window.reset_window();
        }
        window.show(&data);
        let normal = window.window_data().is_normal();
        if data.clear_back_sequence {
            self.back_stack.clear();
        }
        self.shown.insert(id);
        if normal {
            self.last = self.current;
            self.current = Some(id);
        }
        tracing::debug!(manager = %self.name, window_id = ?id, normal, "showed window");
        Ok(())
    }

    /// Show `id` once `delay` has elapsed on this manager's clock. The show
    /// runs from [`WindowManager::pump`] and cannot be cancelled.
    pub fn show_window_delay(&mut self, delay: Duration, id: Id, data: Option<ShowData>) {
        let Some(deadline) = self.clock.now().checked_add(delay) else {
            tracing::warn!(manager = %self.name, window_id = ?id, ?delay, "delayed show dropped, deadline out of range");
            return;
        };
        tracing::debug!(manager = %self.name, window_id = ?id, ?delay, "scheduled delayed show");
        self.delayed.schedule(deadline, DelayedShow { id, data });
    }

    /// Show honouring the window's [`ShowMode`].
    ///
    /// `HideOther` hides every other shown normal window first. `NeedBack`
    /// does the same and records the hidden windows as a back record so
    /// [`WindowManager::return_window`] brings them back.
    pub fn open_window(&mut self, id: Id, data: Option<ShowData>) {
        if let Err(err) = self.try_open_window(id, data) {
            tracing::info!(manager = %self.name, window_id = ?id, "open skipped: {err}");
        }
    }

    pub fn try_open_window(&mut self, id: Id, data: Option<ShowData>) -> NavResult<(), Id> {
        self.ensure_control(id)?;
        let window_data = self
            .registry
            .resolve(id)
            .ok_or(NavigationError::UnknownIdentity(id))?
            .window_data();
        let mut data = data.unwrap_or_default();
        if data.clear_back_sequence {
            self.back_stack.clear();
            data.clear_back_sequence = false;
        }
        if window_data.is_normal() {
            match window_data.show_mode {
                ShowMode::HideOther => {
                    self.hide_other_normal(id);
                }
                ShowMode::NeedBack => {
                    let hidden = self.hide_other_normal(id);
                    if !hidden.is_empty() {
                        self.back_stack.push(BackRecord::new(id, hidden));
                    }
                }
                ShowMode::DoNothing | ShowMode::NoNeedBack => {}
            }
        }
        self.try_show_window(id, Some(data))
    }

    fn hide_other_normal(&mut self, keep: Id) -> Vec<Id> {
        let targets: Vec<Id> = self
            .shown_ids_by_depth()
            .into_iter()
            .filter(|other| *other != keep && self.kind_of(*other) == Some(WindowKind::Normal))
            .collect();
        for other in &targets {
            self.hide_immediately(*other);
        }
        targets
    }

    /// Hide without animation. Any waited hide still in flight for `id` is
    /// abandoned, so its follow-up steps never run.
    fn hide_immediately(&mut self, id: Id) {
        self.discard_pending_hide(id);
        if let Some(window) = self.registry.get_mut(id) {
            window.hide_directly();
        }
        self.forget_shown(id);
    }

    fn discard_pending_hide(&mut self, id: Id) {
        let before = self.pending.len();
        self.pending.retain(|_, steps| {
            !steps
                .iter()
                .any(|step| matches!(step, CompletionStep::ForgetShown(hidden) if *hidden == id))
        });
        if self.pending.len() != before {
            tracing::debug!(manager = %self.name, window_id = ?id, "abandoned in-flight hide");
        }
    }

    fn show_window_for_back(&mut self, id: Id) -> NavResult<(), Id> {
        self.ensure_control(id)?;
        if self.shown.contains(&id) {
            return Ok(());
        }
        let window = self
            .registry
            .resolve(id)
            .ok_or(NavigationError::UnknownIdentity(id))?;
        window.show(&ShowData::default());
        self.shown.insert(id);
        tracing::debug!(manager = %self.name, window_id = ?id, "restored window");
        Ok(())
    }

    // -- hide -------------------------------------------------------------

    /// Hide a shown window.
    ///
    /// When `id` is out of control or not shown this is a no-op and
    /// `on_complete` is dropped without running. Otherwise, with
    /// `wait_for_hide_completion` off, `on_complete` runs first, then the
    /// window starts hiding and leaves the shown set at once. With it on, the
    /// window leaves the shown set right after `on_complete` runs, both once
    /// the window reports its hide finished.
    pub fn hide_window(&mut self, id: Id, on_complete: Option<OnHidden<Id>>) {
        if let Err(err) = self.try_hide_window(id, on_complete) {
            tracing::info!(manager = %self.name, window_id = ?id, "hide skipped: {err}");
        }
    }

    pub fn try_hide_window(&mut self, id: Id, on_complete: Option<OnHidden<Id>>) -> NavResult<(), Id> {
        let steps = on_complete.map(CompletionStep::Notify).into_iter().collect();
        self.hide_with(id, steps)
    }

    fn hide_with(&mut self, id: Id, follow_up: Vec<CompletionStep<Id>>) -> NavResult<(), Id> {
        self.ensure_control(id)?;
        if !self.shown.contains(&id) {
            return Err(NavigationError::NotShown(id));
        }

        if !self.config.wait_for_hide_completion {
            for step in follow_up {
                self.run_step(step);
            }
            if let Some(window) = self.registry.get_mut(id) {
                window.hide(HideCompletion::detached());
            }
            self.forget_shown(id);
            tracing::debug!(manager = %self.name, window_id = ?id, "hid window");
            return Ok(());
        }

        let ticket = self.next_ticket;
        self.next_ticket = ticket.wrapping_add(1).max(1);
        let mut steps = follow_up;
        steps.push(CompletionStep::ForgetShown(id));
        self.pending.insert(ticket, steps);
        let done = HideCompletion::new(ticket, self.completions.clone());
        tracing::debug!(manager = %self.name, window_id = ?id, ticket, "hiding window");
        match self.registry.get_mut(id) {
            Some(window) => window.hide(done),
            None => drop(done),
        }
        self.drain_completions();
        Ok(())
    }

    /// Hide shown windows immediately, skipping animations and completions.
    /// Fixed windows stay visible unless `include_fixed` is set.
    pub fn hide_all_shown(&mut self, include_fixed: bool) {
        let targets: Vec<Id> = self
            .shown
            .iter()
            .copied()
            .filter(|id| include_fixed || self.kind_of(*id) != Some(WindowKind::Fixed))
            .collect();
        for id in targets {
            self.hide_immediately(id);
        }
    }

    fn forget_shown(&mut self, id: Id) {
        self.shown.remove(&id);
        if self.current == Some(id) {
            self.current = None;
        }
    }

    // -- completions ------------------------------------------------------

    fn drain_completions(&mut self) {
        loop {
            let ticket = self.completions.borrow_mut().pop_front();
            let Some(ticket) = ticket else {
                break;
            };
            let Some(steps) = self.pending.remove(&ticket) else {
                tracing::trace!(manager = %self.name, ticket, "stale hide completion");
                continue;
            };
            for step in steps {
                self.run_step(step);
            }
        }
    }

    fn run_step(&mut self, step: CompletionStep<Id>) {
        match step {
            CompletionStep::Notify(callback) => callback(self),
            CompletionStep::ForgetShown(id) => {
                self.forget_shown(id);
                tracing::debug!(manager = %self.name, window_id = ?id, "hid window");
            }
            CompletionStep::ShowPrevious(id) => self.show_window(id, None),
            CompletionStep::RestoreBack {
                hide_target,
                targets,
            } => self.restore_back(hide_target, &targets),
        }
    }

    fn restore_back(&mut self, hide_target: Id, targets: &[Id]) {
        for id in targets {
            if let Err(err) = self.show_window_for_back(*id) {
                tracing::warn!(manager = %self.name, window_id = ?id, "restore skipped: {err}");
            }
        }
        if let Some(&last_target) = targets.last() {
            tracing::debug!(manager = %self.name, window_id = ?last_target, "changed current window");
            self.last = self.current;
            self.current = self.is_shown(last_target).then_some(last_target);
        }
        if self.back_stack.pop_if_target(hide_target).is_none() {
            tracing::warn!(
                manager = %self.name,
                window_id = ?hide_target,
                "back record was replaced before its restore completed"
            );
        }
    }

    // -- back navigation --------------------------------------------------

    pub fn push_back_record(&mut self, record: BackRecord<Id>) {
        self.back_stack.push(record);
    }

    pub fn clear_back_sequence(&mut self) {
        self.back_stack.clear();
    }

    /// Navigate back one step. Returns `true` when a nested manager or this
    /// one handled the request. The fall back to `previous_id` counts as
    /// handled, so a parent never navigates after its nested manager did.
    pub fn return_window(&mut self) -> bool {
        match self.try_return_window() {
            Ok(()) => true,
            Err(err @ NavigationError::NoPredecessor(_)) => {
                tracing::warn!(manager = %self.name, "return failed: {err}");
                false
            }
            Err(err) => {
                tracing::debug!(manager = %self.name, "return failed: {err}");
                false
            }
        }
    }

    pub fn try_return_window(&mut self) -> NavResult<(), Id> {
        if let Some(record) = self.back_stack.peek().cloned() {
            let hide_target = record.hide_target;
            if self.delegate_return(hide_target) {
                return Ok(());
            }
            if !self.shown.contains(&hide_target) {
                return Err(NavigationError::InconsistentBackRecord(hide_target));
            }
            return self.hide_with(
                hide_target,
                vec![CompletionStep::RestoreBack {
                    hide_target,
                    targets: record.restore_targets,
                }],
            );
        }

        let current = self.current.ok_or(NavigationError::NoActiveWindow)?;
        if self.delegate_return(current) {
            return Ok(());
        }
        let previous = self
            .registry
            .get(current)
            .and_then(|window| window.previous_id())
            .ok_or(NavigationError::NoPredecessor(current))?;
        self.hide_with(current, vec![CompletionStep::ShowPrevious(previous)])
    }

    fn delegate_return(&mut self, id: Id) -> bool {
        let Some(sub) = self
            .registry
            .get_mut(id)
            .and_then(|window| window.sub_manager())
        else {
            return false;
        };
        let handled = sub.return_window();
        if handled {
            tracing::debug!(manager = %self.name, window_id = ?id, "return handled by nested manager");
        }
        handled
    }

    // -- teardown ---------------------------------------------------------

    /// Destroy every registered window and drop all navigation state.
    pub fn clear_all_windows(&mut self) {
        self.registry.destroy_all();
        self.shown.clear();
        self.back_stack.clear();
        self.pending.clear();
        self.current = None;
        self.last = None;
        tracing::debug!(manager = %self.name, "cleared all windows");
    }

    pub fn reset_all_controlled_windows(&mut self) {
        let control = &self.control;
        for (id, window) in self.registry.iter_mut() {
            if control.contains(id) {
                window.reset_window();
            }
        }
    }

    // -- driving ----------------------------------------------------------

    /// Run one cooperative turn: fire due delayed shows, process reported
    /// hide completions, tick windows and nested managers, then process the
    /// completions reported during the tick.
    pub fn pump(&mut self) {
        let now = self.clock.now();
        for delayed in self.delayed.take_due(now) {
            tracing::debug!(manager = %self.name, window_id = ?delayed.id, "delayed show fired");
            self.show_window(delayed.id, delayed.data);
        }
        self.drain_completions();

        let elapsed = self
            .last_pump
            .map(|prev| now.saturating_duration_since(prev))
            .unwrap_or_default();
        self.last_pump = Some(now);
        for (_, window) in self.registry.iter_mut() {
            window.tick(elapsed);
            if let Some(sub) = window.sub_manager() {
                sub.pump();
            }
        }

        self.drain_completions();
    }
}

impl<Id: WindowKey> Navigator for WindowManager<Id> {
    fn return_window(&mut self) -> bool {
        WindowManager::return_window(self)
    }

    fn pump(&mut self) {
        WindowManager::pump(self);
    }

    fn reset_all_controlled_windows(&mut self) {
        WindowManager::reset_all_controlled_windows(self);
    }

    fn hide_all_shown(&mut self, include_fixed: bool) {
        WindowManager::hide_all_shown(self, include_fixed);
    }

    fn shown_count(&self) -> usize {
        self.shown.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualClock;
    use crate::window::{HideCompletion, WindowData};
    use std::cell::{Cell, RefCell};

    type Log = Rc<RefCell<Vec<String>>>;

    struct TestWindow {
        id: usize,
        previous: Option<usize>,
        data: WindowData,
        depth: i32,
        log: Log,
        hold_hide: bool,
        held: Option<HideCompletion>,
        resets: usize,
    }

    impl TestWindow {
        fn new(id: usize, log: &Log) -> Self {
            Self {
                id,
                previous: None,
                data: WindowData::normal(),
                depth: 0,
                log: log.clone(),
                hold_hide: false,
                held: None,
                resets: 0,
            }
        }

        fn prev(mut self, previous: usize) -> Self {
            self.previous = Some(previous);
            self
        }

        fn data(mut self, data: WindowData) -> Self {
            self.data = data;
            self
        }

        fn depth(mut self, depth: i32) -> Self {
            self.depth = depth;
            self
        }

        fn held(mut self) -> Self {
            self.hold_hide = true;
            self
        }

        fn finish_hide(&mut self) {
            if let Some(done) = self.held.take() {
                done.complete();
            }
        }
    }

    impl Window<usize> for TestWindow {
        fn id(&self) -> usize {
            self.id
        }
        fn previous_id(&self) -> Option<usize> {
            self.previous
        }
        fn window_data(&self) -> WindowData {
            self.data
        }
        fn min_depth(&self) -> i32 {
            self.depth
        }
        fn show(&mut self, _data: &ShowData) {
            self.log.borrow_mut().push(format!("show {}", self.id));
        }
        fn hide(&mut self, done: HideCompletion) {
            self.log.borrow_mut().push(format!("hide {}", self.id));
            if self.hold_hide {
                self.held = Some(done);
            }
        }
        fn hide_directly(&mut self) {
            self.log.borrow_mut().push(format!("hide_directly {}", self.id));
        }
        fn reset_window(&mut self) {
            self.resets += 1;
        }
    }

    fn manager(ids: &[usize], config: ManagerConfig) -> WindowManager<usize> {
        let mut wm = WindowManager::new(config);
        for id in ids {
            wm.register_control(*id);
        }
        wm
    }

    #[test]
    fn window_lookup_fails_closed_outside_control() {
        let log = Log::default();
        let mut wm = manager(&[], ManagerConfig::default());
        wm.register_window(Box::new(TestWindow::new(1, &log)));
        assert!(wm.window(1).is_none());
        wm.register_control(1);
        assert_eq!(wm.window(1).map(|w| w.id()), Some(1));
    }

    #[test]
    fn window_script_downcasts() {
        let log = Log::default();
        let mut wm = manager(&[1], ManagerConfig::default());
        wm.register_window(Box::new(TestWindow::new(1, &log).depth(4)));
        assert_eq!(wm.window_script::<TestWindow>(1).map(|w| w.depth), Some(4));
        assert!(wm.window_script::<TestWindow>(2).is_none());
        if let Some(window) = wm.window_script_mut::<TestWindow>(1) {
            window.depth = 9;
        }
        assert_eq!(wm.window(1).map(|w| w.min_depth()), Some(9));
    }

    #[test]
    fn fixed_windows_do_not_touch_current() {
        let log = Log::default();
        let mut wm = manager(&[1, 2], ManagerConfig::default());
        wm.register_window(Box::new(TestWindow::new(1, &log)));
        wm.register_window(Box::new(TestWindow::new(2, &log).data(WindowData::fixed())));
        wm.show_window(1, None);
        wm.show_window(2, None);
        assert_eq!(wm.current_window_id(), Some(1));
        assert_eq!(wm.last_window_id(), None);
        assert!(wm.is_shown(2));
    }

    #[test]
    fn force_reset_runs_before_show() {
        let log = Log::default();
        let mut wm = manager(&[1], ManagerConfig::default());
        wm.register_window(Box::new(TestWindow::new(1, &log)));
        wm.show_window(1, Some(ShowData::reset()));
        assert_eq!(wm.window_script::<TestWindow>(1).map(|w| w.resets), Some(1));
    }

    #[test]
    fn immediate_mode_fires_callback_before_window_hides() {
        let log = Log::default();
        let mut wm = manager(&[1], ManagerConfig::default());
        wm.register_window(Box::new(TestWindow::new(1, &log).held()));
        wm.show_window(1, None);

        let seen_shown = Rc::new(Cell::new(false));
        let probe = seen_shown.clone();
        let cb_log = log.clone();
        wm.hide_window(
            1,
            Some(Box::new(move |wm: &mut WindowManager<usize>| {
                probe.set(wm.is_shown(1));
                cb_log.borrow_mut().push("callback".into());
            })),
        );

        assert!(seen_shown.get());
        assert!(!wm.is_shown(1));
        assert_eq!(*log.borrow(), vec!["show 1", "callback", "hide 1"]);
    }

    #[test]
    fn waiting_mode_defers_removal_until_completion() {
        let log = Log::default();
        let mut wm = manager(&[1], ManagerConfig::waiting());
        wm.register_window(Box::new(TestWindow::new(1, &log).held()));
        wm.show_window(1, None);

        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        wm.hide_window(
            1,
            Some(Box::new(move |_: &mut WindowManager<usize>| {
                counter.set(counter.get() + 1)
            })),
        );
        assert!(wm.is_shown(1));
        assert_eq!(fired.get(), 0);
        assert_eq!(wm.pending_hides(), 1);

        if let Some(window) = wm.window_script_mut::<TestWindow>(1) {
            window.finish_hide();
        }
        wm.pump();
        assert!(!wm.is_shown(1));
        assert_eq!(fired.get(), 1);
        assert_eq!(wm.pending_hides(), 0);
        assert_eq!(wm.current_window_id(), None);
    }

    #[test]
    fn waiting_mode_without_animation_completes_synchronously() {
        let log = Log::default();
        let mut wm = manager(&[1], ManagerConfig::waiting());
        wm.register_window(Box::new(TestWindow::new(1, &log)));
        wm.show_window(1, None);
        wm.hide_window(1, None);
        assert!(!wm.is_shown(1));
        assert_eq!(wm.pending_hides(), 0);
    }

    #[test]
    fn hide_all_shown_can_keep_fixed() {
        let log = Log::default();
        let mut wm = manager(&[1, 2], ManagerConfig::default());
        wm.register_window(Box::new(TestWindow::new(1, &log)));
        wm.register_window(Box::new(TestWindow::new(2, &log).data(WindowData::fixed())));
        wm.show_window(1, None);
        wm.show_window(2, None);

        wm.hide_all_shown(false);
        assert!(!wm.is_shown(1));
        assert!(wm.is_shown(2));
        assert_eq!(wm.current_window_id(), None);

        wm.hide_all_shown(true);
        assert_eq!(wm.shown_count(), 0);
    }

    #[test]
    fn hide_all_abandons_waited_return() {
        let log = Log::default();
        let mut wm = manager(&[1, 2], ManagerConfig::waiting());
        wm.register_window(Box::new(TestWindow::new(1, &log)));
        wm.register_window(Box::new(TestWindow::new(2, &log).prev(1).held()));
        wm.show_window(2, None);

        assert!(wm.return_window());
        assert_eq!(wm.pending_hides(), 1);

        wm.hide_all_shown(false);
        assert_eq!(wm.pending_hides(), 0);
        if let Some(window) = wm.window_script_mut::<TestWindow>(2) {
            window.finish_hide();
        }
        wm.pump();
        assert_eq!(wm.shown_count(), 0);
        assert_eq!(wm.current_window_id(), None);
    }

    #[test]
    fn open_window_abandons_waited_hide_of_sibling() {
        let log = Log::default();
        let mut wm = manager(&[1, 2, 3], ManagerConfig::waiting());
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        wm.register_window(Box::new(TestWindow::new(1, &log).held()));
        wm.register_window(Box::new(TestWindow::new(2, &log)));
        wm.register_window(Box::new(
            TestWindow::new(3, &log).data(WindowData::normal().with_show_mode(ShowMode::HideOther)),
        ));
        wm.show_window(1, None);
        wm.hide_window(1, Some(Box::new(move |_: &mut WindowManager<usize>| flag.set(true))));

        wm.open_window(3, None);
        if let Some(window) = wm.window_script_mut::<TestWindow>(1) {
            window.finish_hide();
        }
        wm.pump();
        assert!(!fired.get());
        assert_eq!(wm.shown_ids(), vec![3]);
        assert_eq!(wm.current_window_id(), Some(3));
    }

    #[test]
    fn out_of_range_delay_is_dropped() {
        let log = Log::default();
        let mut wm = manager(&[1], ManagerConfig::default());
        wm.register_window(Box::new(TestWindow::new(1, &log)));
        wm.show_window_delay(Duration::MAX, 1, None);
        assert_eq!(wm.pending_delayed_shows(), 0);
        wm.pump();
        assert!(!wm.is_shown(1));
    }

    #[test]
    fn pump_processes_completions_reported_between_turns() {
        let log = Log::default();
        let mut wm = manager(&[1], ManagerConfig::waiting());
        wm.register_window(Box::new(TestWindow::new(1, &log).held()));
        wm.show_window(1, None);
        wm.hide_window(1, None);
        if let Some(window) = wm.window_script_mut::<TestWindow>(1) {
            window.finish_hide();
        }
        assert!(wm.is_shown(1));
        wm.pump();
        assert!(!wm.is_shown(1));
    }

    #[test]
    fn delayed_show_fires_on_pump_after_deadline() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut wm = WindowManager::with_clock(ManagerConfig::default(), Rc::new(clock.clone()));
        wm.register_control(1);
        wm.register_window(Box::new(TestWindow::new(1, &log)));

        wm.show_window_delay(Duration::from_millis(500), 1, None);
        wm.pump();
        assert!(!wm.is_shown(1));
        assert_eq!(wm.pending_delayed_shows(), 1);

        clock.advance(Duration::from_millis(500));
        wm.pump();
        assert!(wm.is_shown(1));
        assert_eq!(wm.pending_delayed_shows(), 0);
    }

    #[test]
    fn delayed_show_after_teardown_is_a_no_op() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut wm = WindowManager::with_clock(ManagerConfig::default(), Rc::new(clock.clone()));
        wm.register_control(1);
        wm.register_window(Box::new(TestWindow::new(1, &log)));
        wm.show_window_delay(Duration::from_secs(1), 1, None);
        wm.clear_all_windows();
        clock.advance(Duration::from_secs(2));
        wm.pump();
        assert!(!wm.is_shown(1));
        assert_eq!(wm.pending_delayed_shows(), 0);
    }

    #[test]
    fn open_window_need_back_records_hidden_siblings() {
        let log = Log::default();
        let mut wm = manager(&[1, 2, 3, 4], ManagerConfig::default());
        wm.register_window(Box::new(TestWindow::new(1, &log).depth(10)));
        wm.register_window(Box::new(TestWindow::new(2, &log).depth(5)));
        wm.register_window(Box::new(TestWindow::new(3, &log).data(WindowData::fixed())));
        wm.register_window(Box::new(
            TestWindow::new(4, &log).data(WindowData::normal().with_show_mode(ShowMode::NeedBack)),
        ));
        wm.show_window(1, None);
        wm.show_window(2, None);
        wm.show_window(3, None);

        wm.open_window(4, None);
        assert_eq!(wm.shown_ids(), vec![3, 4]);
        assert_eq!(wm.current_window_id(), Some(4));
        let record = wm.back_records().next().cloned();
        assert_eq!(record, Some(BackRecord::new(4, vec![2, 1])));

        assert!(wm.return_window());
        assert_eq!(wm.shown_ids(), vec![1, 2, 3]);
        assert_eq!(wm.current_window_id(), Some(1));
        assert_eq!(wm.back_depth(), 0);
    }

    #[test]
    fn open_window_hide_other_pushes_nothing() {
        let log = Log::default();
        let mut wm = manager(&[1, 2], ManagerConfig::default());
        wm.register_window(Box::new(TestWindow::new(1, &log)));
        wm.register_window(Box::new(
            TestWindow::new(2, &log)
                .prev(1)
                .data(WindowData::normal().with_show_mode(ShowMode::HideOther)),
        ));
        wm.show_window(1, None);
        wm.open_window(2, None);
        assert_eq!(wm.shown_ids(), vec![2]);
        assert_eq!(wm.back_depth(), 0);

        assert!(wm.return_window());
        assert_eq!(wm.shown_ids(), vec![1]);
        assert_eq!(wm.current_window_id(), Some(1));
    }

    #[test]
    fn inconsistent_back_record_is_left_in_place() {
        let log = Log::default();
        let mut wm = manager(&[1, 2], ManagerConfig::default());
        wm.register_window(Box::new(TestWindow::new(1, &log)));
        wm.register_window(Box::new(TestWindow::new(2, &log)));
        wm.show_window(1, None);
        wm.push_back_record(BackRecord::new(2, vec![1]));
        assert_eq!(
            wm.try_return_window(),
            Err(NavigationError::InconsistentBackRecord(2))
        );
        assert_eq!(wm.back_depth(), 1);
        wm.clear_back_sequence();
        assert_eq!(wm.back_depth(), 0);
    }

    #[test]
    fn factories_are_resolved_on_first_show() {
        let log = Log::default();
        let mut wm = manager(&[7], ManagerConfig::default());
        let factory_log = log.clone();
        wm.register_factory(
            7,
            Box::new(move || Box::new(TestWindow::new(7, &factory_log)) as Box<dyn Window<usize>>),
        );
        assert!(wm.registered_ids().is_empty());
        wm.show_window(7, None);
        assert_eq!(wm.registered_ids(), vec![7]);
        assert!(wm.is_shown(7));
    }

    #[test]
    fn reset_only_touches_controlled_windows() {
        let log = Log::default();
        let mut wm = manager(&[1], ManagerConfig::default());
        wm.register_window(Box::new(TestWindow::new(1, &log)));
        wm.register_window(Box::new(TestWindow::new(2, &log)));
        wm.reset_all_controlled_windows();
        assert_eq!(wm.window_script::<TestWindow>(1).map(|w| w.resets), Some(1));
        wm.register_control(2);
        assert_eq!(wm.window_script::<TestWindow>(2).map(|w| w.resets), Some(0));
    }

    #[test]
    fn init_window_manager_keeps_control() {
        let log = Log::default();
        let mut wm = manager(&[1], ManagerConfig::default());
        wm.register_window(Box::new(TestWindow::new(1, &log)));
        wm.show_window(1, None);
        wm.init_window_manager();
        assert!(wm.registered_ids().is_empty());
        assert!(!wm.is_shown(1));
        assert!(wm.is_in_control(1));
        assert_eq!(wm.current_window_id(), None);
    }
}
