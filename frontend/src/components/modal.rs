use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use log::{info, warn};
use web_sys::{KeyboardEvent, MouseEvent};
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::components::icons;
use crate::config::use_portal_config;

/// Modal name -> id of its panel element. Fixed once the page is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalRegistry {
    panels: BTreeMap<String, String>,
}

impl ModalRegistry {
    pub fn new<'a>(panels: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            panels: panels
                .into_iter()
                .map(|(name, id)| (name.to_string(), id.to_string()))
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.panels.contains_key(name)
    }

    pub fn element_id(&self, name: &str) -> Option<&str> {
        self.panels.get(name).map(String::as_str)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseSource {
    Button,
    EscapeKey,
}

pub enum ModalAction {
    Open(String),
    /// Closes every open panel, whichever control asked.
    Close(CloseSource),
}

/// Which panels are showing. Several may be open at once; closing is global.
#[derive(Clone, Debug, PartialEq)]
pub struct ModalState {
    registry: ModalRegistry,
    open: BTreeSet<String>,
}

impl ModalState {
    pub fn new(registry: ModalRegistry) -> Self {
        Self {
            registry,
            open: BTreeSet::new(),
        }
    }

    pub fn registry(&self) -> &ModalRegistry {
        &self.registry
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.open.contains(name)
    }

    /// Background scrolling is locked while anything is open.
    pub fn scroll_locked(&self) -> bool {
        !self.open.is_empty()
    }
}

impl Reducible for ModalState {
    type Action = ModalAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            ModalAction::Open(name) => {
                if !self.registry.contains(&name) || self.open.contains(&name) {
                    return self;
                }
                info!("Opening {} modal", name);
                let mut next = (*self).clone();
                next.open.insert(name);
                Rc::new(next)
            }
            ModalAction::Close(source) => {
                if self.open.is_empty() {
                    return self;
                }
                info!("Closing modals ({:?})", source);
                let mut next = (*self).clone();
                next.open.clear();
                Rc::new(next)
            }
        }
    }
}

pub type ModalContext = UseReducerHandle<ModalState>;

pub fn is_close_key(key: &str) -> bool {
    key == "Escape"
}

fn set_scroll_lock(locked: bool) {
    if let Some(body) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
    {
        let overflow = if locked { "hidden" } else { "" };
        if body.style().set_property("overflow", overflow).is_err() {
            warn!("Could not update body overflow");
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ModalHostProps {
    #[prop_or_default]
    pub children: Children,
}

/// Owns modal state for everything below it and listens for Escape.
#[function_component(ModalHost)]
pub fn modal_host(props: &ModalHostProps) -> Html {
    let config = use_portal_config();
    let modals = use_reducer(move || ModalState::new(config.modals.clone()));

    {
        let modals = modals.clone();
        use_event_with_window("keydown", move |e: KeyboardEvent| {
            if is_close_key(&e.key()) {
                modals.dispatch(ModalAction::Close(CloseSource::EscapeKey));
            }
        });
    }

    {
        let locked = modals.scroll_locked();
        use_effect_with_deps(
            move |locked| {
                set_scroll_lock(*locked);
                || ()
            },
            locked,
        );
    }

    html! {
        <ContextProvider<ModalContext> context={modals}>
            { for props.children.iter() }
        </ContextProvider<ModalContext>>
    }
}

#[derive(Properties, PartialEq)]
pub struct ModalTriggerProps {
    pub name: AttrValue,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(ModalTrigger)]
pub fn modal_trigger(props: &ModalTriggerProps) -> Html {
    let modals = use_context::<ModalContext>();
    let config = use_portal_config();

    let onclick = {
        let name = props.name.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            match modals.as_ref() {
                Some(modals) if modals.registry().contains(&name) => {
                    modals.dispatch(ModalAction::Open(name.to_string()));
                    icons::refresh_after(config.icon_refresh_delay_ms);
                }
                Some(_) => {}
                None => warn!("Modal trigger for {} rendered outside ModalHost", name),
            }
        })
    };

    html! {
        <a href="#" class={props.class.clone()} data-modal={props.name.clone()} {onclick}>
            { for props.children.iter() }
        </a>
    }
}

#[derive(Properties, PartialEq)]
pub struct ModalPanelProps {
    pub name: AttrValue,
    pub title: AttrValue,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(ModalPanel)]
pub fn modal_panel(props: &ModalPanelProps) -> Html {
    let modals = match use_context::<ModalContext>() {
        Some(modals) => modals,
        None => return html! {},
    };
    let id = match modals.registry().element_id(&props.name) {
        Some(id) => id.to_string(),
        None => return html! {},
    };
    let is_open = modals.is_open(&props.name);

    let close = {
        let modals = modals.clone();
        Callback::from(move |_: MouseEvent| {
            modals.dispatch(ModalAction::Close(CloseSource::Button));
        })
    };

    html! {
        <div id={id} class={classes!("modal", is_open.then(|| "active"))}>
            <div class="modal-content">
                <button class="modal-close" data-close-modal="true" aria-label="Close" onclick={close}>
                    <span data-feather="x"></span>
                </button>
                <h2 class="modal-title">{ props.title.clone() }</h2>
                { for props.children.iter() }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Rc<ModalState> {
        Rc::new(ModalState::new(ModalRegistry::new([
            ("dashboard", "dashboardModal"),
            ("signin", "signinModal"),
        ])))
    }

    #[test]
    fn escape_after_open_clears_everything() {
        let opened = state().reduce(ModalAction::Open("signin".to_string()));
        assert!(opened.is_open("signin"));
        assert!(opened.scroll_locked());

        let closed = opened.reduce(ModalAction::Close(CloseSource::EscapeKey));
        assert!(!closed.is_open("signin"));
        assert!(!closed.scroll_locked());
    }

    #[test]
    fn unknown_name_is_ignored() {
        let before = state();
        let after = before.clone().reduce(ModalAction::Open("settings".to_string()));
        assert!(Rc::ptr_eq(&before, &after));
        assert!(!after.scroll_locked());
    }

    #[test]
    fn second_open_keeps_the_first_and_close_hits_both() {
        let both = state()
            .reduce(ModalAction::Open("dashboard".to_string()))
            .reduce(ModalAction::Open("signin".to_string()));
        assert!(both.is_open("dashboard"));
        assert!(both.is_open("signin"));

        let closed = both.reduce(ModalAction::Close(CloseSource::Button));
        assert!(!closed.is_open("dashboard"));
        assert!(!closed.is_open("signin"));
    }

    #[test]
    fn closing_with_nothing_open_is_a_no_op() {
        let before = state();
        let after = before.clone().reduce(ModalAction::Close(CloseSource::Button));
        assert!(Rc::ptr_eq(&before, &after));
    }

    #[test]
    fn only_escape_requests_close() {
        assert!(is_close_key("Escape"));
        assert!(!is_close_key("Esc"));
        assert!(!is_close_key("Enter"));
    }
}
