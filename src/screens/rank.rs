use std::rc::Rc;
use std::time::Duration;

use super::{Screen, ScreenId};
use crate::config::ManagerConfig;
use crate::scheduler::Clock;
use crate::window::{HideCompletion, Navigator, ShowData, Window, WindowData, WindowManager};

/// Rank panel. Owns a nested manager for its list and own-detail children,
/// so "back" closes the detail before leaving the panel.
pub struct RankScreen {
    base: Screen,
    children: WindowManager<ScreenId>,
    animation: Duration,
}

impl RankScreen {
    pub fn new(animation: Duration, config: ManagerConfig, clock: Rc<dyn Clock>) -> Self {
        let mut children = WindowManager::with_clock(config, clock).named("rank");
        children.register_control(ScreenId::RankList);
        children.register_control(ScreenId::RankOwnDetail);
        Self {
            base: Screen::from_id(ScreenId::Rank, animation),
            children,
            animation,
        }
    }

    pub fn base(&self) -> &Screen {
        &self.base
    }

    pub fn children(&self) -> &WindowManager<ScreenId> {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut WindowManager<ScreenId> {
        &mut self.children
    }

    pub fn open_own_detail(&mut self) {
        self.children.open_window(ScreenId::RankOwnDetail, None);
    }
}

impl Window<ScreenId> for RankScreen {
    fn id(&self) -> ScreenId {
        self.base.id()
    }

    fn previous_id(&self) -> Option<ScreenId> {
        self.base.previous_id()
    }

    fn window_data(&self) -> WindowData {
        self.base.window_data()
    }

    fn min_depth(&self) -> i32 {
        self.base.min_depth()
    }

    fn initialize(&mut self) {
        self.children.init_window_manager();
        for id in [ScreenId::RankList, ScreenId::RankOwnDetail] {
            self.children
                .register_window(Box::new(Screen::from_id(id, self.animation)));
        }
    }

    fn show(&mut self, _data: &ShowData) {
        self.base.begin_show();
        self.children.show_window(ScreenId::RankList, None);
    }

    fn hide(&mut self, done: HideCompletion) {
        self.children.hide_all_shown(true);
        self.children.clear_back_sequence();
        self.base.begin_hide(done);
    }

    fn hide_directly(&mut self) {
        self.children.hide_all_shown(true);
        self.children.clear_back_sequence();
        self.base.finish_now();
    }

    fn destroy(&mut self) {
        self.children.clear_all_windows();
        Window::destroy(&mut self.base);
    }

    fn reset_window(&mut self) {
        self.base.reset_state();
        self.children.reset_all_controlled_windows();
    }

    fn tick(&mut self, elapsed: Duration) {
        self.base.advance(elapsed);
    }

    fn sub_manager(&mut self) -> Option<&mut dyn Navigator> {
        Some(&mut self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::SystemClock;

    fn rank() -> RankScreen {
        let mut rank = RankScreen::new(Duration::ZERO, ManagerConfig::default(), Rc::new(SystemClock));
        rank.initialize();
        rank
    }

    #[test]
    fn nested_manager_consumes_back_while_detail_is_open() {
        let mut rank = rank();
        rank.show(&ShowData::default());
        assert!(rank.children().is_shown(ScreenId::RankList));

        rank.open_own_detail();
        assert!(rank.children().is_shown(ScreenId::RankOwnDetail));
        assert!(!rank.children().is_shown(ScreenId::RankList));

        let nav = rank.sub_manager().map(|nav| nav.return_window());
        assert_eq!(nav, Some(true));
        assert!(rank.children().is_shown(ScreenId::RankList));
        assert!(!rank.children().is_shown(ScreenId::RankOwnDetail));

        let nav = rank.sub_manager().map(|nav| nav.return_window());
        assert_eq!(nav, Some(false));
    }

    #[test]
    fn hiding_rank_hides_children() {
        let mut rank = rank();
        rank.show(&ShowData::default());
        rank.open_own_detail();
        rank.hide(HideCompletion::detached());
        assert_eq!(rank.children().shown_ids(), Vec::new());
        assert_eq!(rank.children().back_depth(), 0);
    }
}
