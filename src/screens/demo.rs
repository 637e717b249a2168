use std::rc::Rc;
use std::time::Duration;

use super::{RankScreen, Screen, ScreenId};
use crate::config::ManagerConfig;
use crate::keybindings::Action;
use crate::scheduler::Clock;
use crate::window::{ShowData, Window, WindowManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoOptions {
    pub config: ManagerConfig,
    pub animation: Duration,
    pub message_delay: Duration,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            config: ManagerConfig::default(),
            animation: Duration::from_millis(240),
            message_delay: Duration::from_secs(1),
        }
    }
}

/// The demo application root. Builds the center manager once and owns it;
/// everything else reaches the manager through this value.
pub struct DemoApp {
    center: WindowManager<ScreenId>,
    options: DemoOptions,
}

/// Screens the center manager is allowed to drive. The rank children belong
/// to the rank panel's own manager.
const CENTER_SCREENS: [ScreenId; 7] = [
    ScreenId::MainMenu,
    ScreenId::Level,
    ScreenId::LevelDetail,
    ScreenId::Rank,
    ScreenId::Matching,
    ScreenId::TopBar,
    ScreenId::MessageBox,
];

impl DemoApp {
    pub fn new(options: DemoOptions, clock: Rc<dyn Clock>) -> Self {
        let mut center = WindowManager::with_clock(options.config, clock.clone()).named("center");
        for id in CENTER_SCREENS {
            center.register_control(id);
        }

        let animation = options.animation;
        center.register_window(Box::new(Screen::from_id(ScreenId::MainMenu, animation)));
        center.register_window(Box::new(Screen::from_id(ScreenId::TopBar, Duration::ZERO)));
        for id in [ScreenId::Level, ScreenId::LevelDetail, ScreenId::Matching] {
            center.register_factory(
                id,
                Box::new(move || Box::new(Screen::from_id(id, animation)) as Box<dyn Window<_>>),
            );
        }
        center.register_factory(
            ScreenId::MessageBox,
            Box::new(|| {
                let screen = Screen::from_id(ScreenId::MessageBox, Duration::ZERO)
                    .with_message("You are yourself, please don't lose confidence.");
                Box::new(screen) as Box<dyn Window<_>>
            }),
        );
        let config = options.config;
        center.register_factory(
            ScreenId::Rank,
            Box::new(move || {
                Box::new(RankScreen::new(animation, config, clock.clone())) as Box<dyn Window<_>>
            }),
        );

        Self { center, options }
    }

    /// Show the boot screens.
    pub fn boot(&mut self) {
        self.center.show_window(ScreenId::TopBar, None);
        self.center.show_window(ScreenId::MainMenu, None);
    }

    pub fn center(&self) -> &WindowManager<ScreenId> {
        &self.center
    }

    pub fn center_mut(&mut self) -> &mut WindowManager<ScreenId> {
        &mut self.center
    }

    pub fn options(&self) -> DemoOptions {
        self.options
    }

    pub fn rank(&self) -> Option<&RankScreen> {
        self.center.window_script::<RankScreen>(ScreenId::Rank)
    }

    /// The base screen behind `id`, whichever concrete type it is.
    pub fn screen(&self, id: ScreenId) -> Option<&Screen> {
        self.center
            .window_script::<Screen>(id)
            .or_else(|| self.center.window_script::<RankScreen>(id).map(RankScreen::base))
    }

    pub fn tick(&mut self) {
        self.center.pump();
    }

    /// Apply a navigation action. Returns `false` when the action asks to quit.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::Back => {
                if !self.center.return_window() {
                    tracing::info!("nothing to return to");
                }
            }
            Action::OpenLevel => self.center.open_window(ScreenId::Level, None),
            Action::OpenLevelDetail => self.center.open_window(ScreenId::LevelDetail, None),
            Action::OpenRank => self.center.open_window(ScreenId::Rank, None),
            Action::OpenRankDetail => {
                match self.center.window_script_mut::<RankScreen>(ScreenId::Rank) {
                    Some(rank) if rank.base().visible() => rank.open_own_detail(),
                    _ => tracing::info!("rank panel is not open"),
                }
            }
            Action::OpenMatching => self.center.open_window(
                ScreenId::Matching,
                Some(ShowData {
                    force_reset: true,
                    clear_back_sequence: false,
                }),
            ),
            Action::ShowMessage => {
                let delay = self.options.message_delay;
                self.center
                    .show_window_delay(delay, ScreenId::MessageBox, Some(ShowData::reset()));
            }
            Action::CloseMessage => self.center.hide_window(ScreenId::MessageBox, None),
            Action::ToggleWaitForHide => {
                let wait = !self.center.config().wait_for_hide_completion;
                self.center.set_wait_for_hide_completion(wait);
                tracing::info!(wait, "wait for hide completion toggled");
            }
            Action::ResetWindows => self.center.reset_all_controlled_windows(),
            Action::ClearBackSequence => self.center.clear_back_sequence(),
            Action::HideAll => self.center.hide_all_shown(false),
        }
        true
    }

    /// Destroy every window. The app cannot be used afterwards.
    pub fn shutdown(&mut self) {
        self.center.clear_all_windows();
    }

    /// Shown screens, lowest depth first, with their display titles.
    pub fn visible_titles(&self) -> Vec<String> {
        let mut titles = Vec::new();
        for id in self.center.shown_ids_by_depth() {
            titles.push(id.to_string());
            if let Some(rank) = self.rank().filter(|_| id == ScreenId::Rank) {
                for child in rank.children().shown_ids_by_depth() {
                    titles.push(format!("{id} / {child}"));
                }
            }
        }
        titles
    }
}

impl Drop for DemoApp {
    fn drop(&mut self) {
        self.center.clear_all_windows();
    }
}
