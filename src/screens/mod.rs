//! Demo screen set used by the `winstack` binary and its tests.
//!
//! Screens stand in for real panels: they track visibility, play a timed
//! enter/exit animation, and count lifecycle calls.

pub mod demo;
pub mod rank;
pub mod tween;

use std::fmt;
use std::time::Duration;

use crate::window::{
    ColliderMode, HideCompletion, ShowData, ShowMode, Window, WindowData, WindowKey, WindowKind,
};

pub use demo::{DemoApp, DemoOptions};
pub use rank::RankScreen;
pub use tween::Tween;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScreenId {
    MainMenu,
    Level,
    LevelDetail,
    Rank,
    RankList,
    RankOwnDetail,
    Matching,
    TopBar,
    MessageBox,
}

impl WindowKey for ScreenId {
    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScreenId::MainMenu => "Main Menu",
            ScreenId::Level => "Level",
            ScreenId::LevelDetail => "Level Detail",
            ScreenId::Rank => "Rank",
            ScreenId::RankList => "Rank List",
            ScreenId::RankOwnDetail => "Rank Own Detail",
            ScreenId::Matching => "Matching",
            ScreenId::TopBar => "Top Bar",
            ScreenId::MessageBox => "Message Box",
        };
        write!(f, "{}", s)
    }
}

/// Static description of a screen.
#[derive(Debug, Clone, Copy)]
pub struct ScreenProfile {
    pub id: ScreenId,
    pub previous: Option<ScreenId>,
    pub data: WindowData,
    pub depth: i32,
}

impl ScreenProfile {
    pub const fn new(id: ScreenId) -> Self {
        Self {
            id,
            previous: None,
            data: WindowData::normal(),
            depth: 0,
        }
    }

    pub const fn prev(mut self, previous: ScreenId) -> Self {
        self.previous = Some(previous);
        self
    }

    pub const fn data(mut self, data: WindowData) -> Self {
        self.data = data;
        self
    }

    pub const fn depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }
}

pub fn profile_for(id: ScreenId) -> ScreenProfile {
    use ScreenId::*;
    let profile = ScreenProfile::new(id);
    match id {
        MainMenu => profile.depth(10),
        Level => profile
            .prev(MainMenu)
            .depth(20)
            .data(WindowData::normal().with_show_mode(ShowMode::HideOther)),
        LevelDetail => profile.depth(30).data(
            WindowData::normal()
                .with_show_mode(ShowMode::NeedBack)
                .with_collider_mode(ColliderMode::WithBg),
        ),
        Rank => profile
            .prev(MainMenu)
            .depth(20)
            .data(WindowData::normal().with_show_mode(ShowMode::HideOther)),
        RankList => profile.depth(21),
        RankOwnDetail => profile.depth(22).data(
            WindowData::normal()
                .with_show_mode(ShowMode::NeedBack)
                .with_collider_mode(ColliderMode::Normal),
        ),
        Matching => profile
            .depth(40)
            .data(WindowData::normal().with_show_mode(ShowMode::NeedBack)),
        TopBar => profile.depth(100).data(WindowData::fixed()),
        MessageBox => profile.depth(200).data(WindowData {
            kind: WindowKind::PopUp,
            show_mode: ShowMode::DoNothing,
            collider_mode: ColliderMode::WithBg,
        }),
    }
}

/// A demo panel with a timed enter and exit animation.
#[derive(Debug)]
pub struct Screen {
    profile: ScreenProfile,
    visible: bool,
    tween: Tween,
    pending_hide: Option<HideCompletion>,
    shows: usize,
    resets: usize,
    destroyed: bool,
    message: Option<String>,
}

impl Screen {
    pub fn new(profile: ScreenProfile, animation: Duration) -> Self {
        Self {
            profile,
            visible: false,
            tween: Tween::new(animation),
            pending_hide: None,
            shows: 0,
            resets: 0,
            destroyed: false,
            message: None,
        }
    }

    pub fn from_id(id: ScreenId, animation: Duration) -> Self {
        Self::new(profile_for(id), animation)
    }

    pub fn profile(&self) -> &ScreenProfile {
        &self.profile
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn is_hiding(&self) -> bool {
        self.pending_hide.is_some()
    }

    pub fn progress(&self) -> f32 {
        self.tween.progress()
    }

    pub fn shows(&self) -> usize {
        self.shows
    }

    pub fn resets(&self) -> usize {
        self.resets
    }

    pub fn destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub(crate) fn begin_show(&mut self) {
        self.visible = true;
        self.shows += 1;
        self.tween.play_forward();
    }

    pub(crate) fn begin_hide(&mut self, done: HideCompletion) {
        self.tween.play_reverse();
        if self.tween.is_playing() {
            self.pending_hide = Some(done);
        } else {
            self.visible = false;
        }
    }

    pub(crate) fn finish_now(&mut self) {
        self.tween.reset();
        self.visible = false;
        self.pending_hide = None;
    }

    pub(crate) fn advance(&mut self, elapsed: Duration) {
        if self.tween.advance(elapsed) {
            self.visible = false;
            if let Some(done) = self.pending_hide.take() {
                done.complete();
            }
        }
    }

    pub(crate) fn reset_state(&mut self) {
        self.resets += 1;
        if self.visible && !self.tween.is_playing() {
            self.tween.snap_to_end();
        }
    }
}

impl Window<ScreenId> for Screen {
    fn id(&self) -> ScreenId {
        self.profile.id
    }

    fn previous_id(&self) -> Option<ScreenId> {
        self.profile.previous
    }

    fn window_data(&self) -> WindowData {
        self.profile.data
    }

    fn min_depth(&self) -> i32 {
        self.profile.depth
    }

    fn show(&mut self, _data: &ShowData) {
        self.begin_show();
    }

    fn hide(&mut self, done: HideCompletion) {
        self.begin_hide(done);
    }

    fn hide_directly(&mut self) {
        self.finish_now();
    }

    fn destroy(&mut self) {
        self.finish_now();
        self.destroyed = true;
    }

    fn reset_window(&mut self) {
        self.reset_state();
    }

    fn tick(&mut self, elapsed: Duration) {
        self.advance(elapsed);
    }
}
