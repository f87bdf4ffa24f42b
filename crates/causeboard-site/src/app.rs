#![forbid(unsafe_code)]

//! The page model.
//!
//! [`SiteModel`] ties the listing, detail viewer, form feedback, scroll
//! animator, flourishes and preloader together behind the runtime's
//! [`Model`] trait. Every timer the page needs is declared from state in
//! [`Model::subscriptions`]; nothing is scheduled imperatively.

use std::time::Duration;

use causeboard_core::catalog::Catalog;
use causeboard_core::input::{ElementKey, FormKind, InputEvent, PageMount, ScrollSnapshot};
use causeboard_render::{Document, HostEffect, RegionId};
use causeboard_runtime::program::{Cmd, Model};
use causeboard_runtime::subscription::{After, Every, Subscription, keyed_id};

use crate::animator::ScrollAnimator;
use crate::config::SiteConfig;
use crate::detail::{DetailViewer, Selection};
use crate::flourish::Flourishes;
use crate::forms::FormFeedback;
use crate::listing::{self, FilterController};
use crate::view;

/// Element key of the loading overlay.
pub const PRELOADER_KEY: &str = "preloader";
/// Class added to revealed elements.
pub const REVEALED_CLASS: &str = "visible";

/// Page messages: host input plus the page's own timer firings.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Search(String),
    Category(String),
    CardClick(Option<String>),
    Submit(FormKind),
    Mount(PageMount),
    Scroll(ScrollSnapshot),
    Unmount(ElementKey),
    /// One counter step is due.
    CounterTick(ElementKey),
    FlourishFrame,
    ToastExpired(u64),
    HidePreloader,
}

impl From<InputEvent> for Msg {
    fn from(event: InputEvent) -> Self {
        match event {
            InputEvent::Search(text) => Self::Search(text),
            InputEvent::Category(value) => Self::Category(value),
            InputEvent::CardClick(raw) => Self::CardClick(raw),
            InputEvent::Submit(form) => Self::Submit(form),
            InputEvent::Mount(mount) => Self::Mount(mount),
            InputEvent::Scroll(snapshot) => Self::Scroll(snapshot),
            InputEvent::Unmount(key) => Self::Unmount(key),
        }
    }
}

/// Page state.
#[derive(Debug, Clone)]
pub struct SiteModel {
    catalog: Catalog,
    config: SiteConfig,
    filter: FilterController,
    detail: DetailViewer,
    forms: FormFeedback,
    flourishes: Flourishes,
    animator: ScrollAnimator,
    preloader_hidden: bool,
}

impl SiteModel {
    #[must_use]
    pub fn new(catalog: Catalog, config: SiteConfig) -> Self {
        Self {
            filter: FilterController::new(),
            detail: DetailViewer::new(),
            forms: FormFeedback::new(),
            flourishes: Flourishes::new(config.flourish),
            animator: ScrollAnimator::new(config.threshold(), config.counter),
            preloader_hidden: false,
            catalog,
            config,
        }
    }

    /// The shipped page: built-in catalog, default config.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Catalog::builtin(), SiteConfig::default())
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub fn filter(&self) -> &FilterController {
        &self.filter
    }

    #[must_use]
    pub fn detail(&self) -> &DetailViewer {
        &self.detail
    }

    #[must_use]
    pub fn forms(&self) -> &FormFeedback {
        &self.forms
    }

    #[must_use]
    pub fn flourishes(&self) -> &Flourishes {
        &self.flourishes
    }

    #[must_use]
    pub fn animator(&self) -> &ScrollAnimator {
        &self.animator
    }

    #[must_use]
    pub fn is_preloader_hidden(&self) -> bool {
        self.preloader_hidden
    }

    fn on_card_click(&mut self, raw: Option<String>) -> Cmd<Msg> {
        match self.detail.select(&self.catalog, raw.as_deref()) {
            Selection::Opened(id) => {
                tracing::debug!(cause_id = %id, "cause opened");
                Cmd::effect(HostEffect::ShowModal)
            }
            Selection::NoId => Cmd::none(),
            Selection::Missing { raw } => {
                tracing::warn!(data_id = %raw, "no cause matches clicked card");
                Cmd::log(format!("cause lookup missed: data-id={raw:?}"))
            }
        }
    }

    fn on_submit(&mut self, form: FormKind) -> Cmd<Msg> {
        let submission = self.forms.submit(form, &self.config.messages);
        if submission.spawn_heart {
            self.flourishes.spawn();
        }
        Cmd::effect(HostEffect::ResetForm { form })
    }
}

impl Model for SiteModel {
    type Message = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        tracing::info!(
            causes = self.catalog.causes().len(),
            events = self.catalog.events().len(),
            "site initialized"
        );
        Cmd::none()
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Search(text) => {
                self.filter.on_search(&text);
                Cmd::none()
            }
            Msg::Category(value) => {
                self.filter.on_category(&value);
                Cmd::none()
            }
            Msg::CardClick(raw) => self.on_card_click(raw),
            Msg::Submit(form) => self.on_submit(form),
            Msg::Mount(mount) => {
                self.animator.mount(&mount);
                Cmd::none()
            }
            Msg::Scroll(snapshot) => {
                let observed = self.animator.observe(&snapshot);
                if !observed.is_empty() {
                    tracing::debug!(
                        started = observed.started.len(),
                        revealed = observed.revealed.len(),
                        "scroll latched elements"
                    );
                }
                Cmd::none()
            }
            Msg::Unmount(key) => {
                self.animator.unmount(&key);
                Cmd::none()
            }
            Msg::CounterTick(key) => {
                self.animator.tick(&key);
                Cmd::none()
            }
            Msg::FlourishFrame => {
                self.flourishes.frame();
                Cmd::none()
            }
            Msg::ToastExpired(id) => {
                if self.forms.expire(id) {
                    tracing::trace!(toast_id = id, "toast expired");
                }
                Cmd::none()
            }
            Msg::HidePreloader => {
                self.preloader_hidden = true;
                Cmd::none()
            }
        }
    }

    fn view(&self, doc: &mut Document) {
        doc.set_region(
            RegionId::CauseList,
            listing::render(
                self.catalog.causes(),
                self.filter.state(),
                self.config.card_stagger(),
            ),
        );
        doc.set_region_epoch(RegionId::CauseList, self.filter.revision());
        doc.set_region(RegionId::EventList, listing::render_events(self.catalog.events()));

        if let Some(cause) = self.detail.selected(&self.catalog) {
            doc.set_region(RegionId::ModalTitle, view::modal_title(cause));
            doc.set_region(RegionId::ModalBody, view::modal_body(cause));
        }

        doc.set_region(RegionId::Toasts, self.forms.toasts().iter().map(view::toast));
        doc.set_region(
            RegionId::Effects,
            self.flourishes.styled().map(|(_, style)| view::heart(style)),
        );

        for (key, text) in self.animator.displays() {
            doc.set_text(key.clone(), text);
        }
        for key in self.animator.revealed() {
            doc.add_class(key.clone(), REVEALED_CLASS);
        }
        if self.preloader_hidden {
            doc.set_style(ElementKey::from(PRELOADER_KEY), "display:none");
        }
    }

    fn subscriptions(&self) -> Vec<Box<dyn Subscription<Msg>>> {
        let mut subs: Vec<Box<dyn Subscription<Msg>>> = Vec::new();

        for (key, interval) in self.animator.running() {
            let key = key.clone();
            subs.push(Box::new(Every::with_id(
                keyed_id("counter", key.as_str()),
                interval,
                move || Msg::CounterTick(key.clone()),
            )));
        }

        if self.flourishes.is_active() {
            subs.push(Box::new(Every::with_id(
                keyed_id("flourish", "frame"),
                self.flourishes.frame_interval(),
                || Msg::FlourishFrame,
            )));
        }

        for toast in self.forms.toasts() {
            let id = toast.id();
            subs.push(Box::new(After::with_id(
                keyed_id("toast", &id.to_string()),
                self.config.toast_duration(),
                move || Msg::ToastExpired(id),
            )));
        }

        if let Some(ms) = self.config.preloader_hide_ms.filter(|_| !self.preloader_hidden) {
            subs.push(Box::new(After::with_id(
                keyed_id("preloader", "hide"),
                Duration::from_millis(ms),
                || Msg::HidePreloader,
            )));
        }

        subs
    }
}
