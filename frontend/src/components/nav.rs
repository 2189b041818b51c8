use std::rc::Rc;

use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, MouseEvent, ScrollBehavior, ScrollToOptions, Window};
use yew::prelude::*;

use crate::config::use_portal_config;

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollSettings {
    /// Page offset past which the bar gets its "scrolled" look.
    pub scrolled_after: f64,
    /// How far above a section its nav link already counts as current.
    pub section_offset: f64,
    /// Fixed header height subtracted when scrolling to a section.
    pub header_offset: f64,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            scrolled_after: 50.0,
            section_offset: 100.0,
            header_offset: 70.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl ScrollSettings {
    pub fn is_scrolled(&self, scroll_y: f64) -> bool {
        scroll_y > self.scrolled_after
    }

    /// Section whose shifted window `(top - offset, top - offset + height]`
    /// holds `scroll_y`. Sections are in document order and the last hit wins.
    pub fn active_section<'a>(&self, scroll_y: f64, sections: &'a [SectionBounds]) -> Option<&'a str> {
        sections
            .iter()
            .filter(|section| {
                let top = section.top - self.section_offset;
                scroll_y > top && scroll_y <= top + section.height
            })
            .last()
            .map(|section| section.id.as_str())
    }

    pub fn scroll_target(&self, section_top: f64) -> f64 {
        section_top - self.header_offset
    }
}

/// `#about` -> `about`.
pub fn section_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

#[derive(Clone, Debug, PartialEq)]
pub struct NavState {
    settings: ScrollSettings,
    scrolled: bool,
    active: Option<String>,
    menu_open: bool,
}

impl NavState {
    pub fn new(settings: ScrollSettings) -> Self {
        Self {
            settings,
            scrolled: false,
            active: None,
            menu_open: false,
        }
    }

    pub fn is_link_active(&self, href: &str) -> bool {
        self.active.is_some() && section_id(href) == self.active.as_deref()
    }
}

pub enum NavAction {
    Scrolled { y: f64, sections: Vec<SectionBounds> },
    ToggleMenu,
    CloseMenu,
}

impl Reducible for NavState {
    type Action = NavAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            NavAction::Scrolled { y, sections } => {
                next.scrolled = self.settings.is_scrolled(y);
                // No match leaves the current highlight alone.
                if let Some(id) = self.settings.active_section(y, &sections) {
                    next.active = Some(id.to_string());
                }
            }
            NavAction::ToggleMenu => next.menu_open = !self.menu_open,
            NavAction::CloseMenu => next.menu_open = false,
        }
        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

fn measure_sections(document: &Document) -> Vec<SectionBounds> {
    let nodes = match document.query_selector_all("section[id]") {
        Ok(nodes) => nodes,
        Err(_) => return Vec::new(),
    };
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .map(|section| SectionBounds {
            id: section.id(),
            top: section.offset_top() as f64,
            height: section.offset_height() as f64,
        })
        .collect()
}

fn section_top(window: &Window, id: &str) -> Option<f64> {
    window
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .ok()
        .map(|section| section.offset_top() as f64)
}

fn smooth_scroll(window: &Window, top: f64) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

#[derive(Clone, Debug, PartialEq)]
pub struct NavLink {
    pub href: AttrValue,
    pub label: AttrValue,
}

#[derive(Properties, PartialEq)]
pub struct NavProps {
    pub brand: AttrValue,
    pub links: Vec<NavLink>,
    /// Extra entries after the links (sign-in buttons).
    #[prop_or_default]
    pub children: Children,
}

#[function_component(Nav)]
pub fn nav(props: &NavProps) -> Html {
    let config = use_portal_config();
    let nav = {
        let settings = config.scroll.clone();
        use_reducer(move || NavState::new(settings))
    };

    {
        let nav = nav.clone();
        use_effect_with_deps(
            move |_| {
                let window = web_sys::window();
                let scroll_callback = {
                    let window = window.clone();
                    Closure::wrap(Box::new(move || {
                        if let Some(window) = window.as_ref() {
                            let y = window.scroll_y().unwrap_or(0.0);
                            let sections = window
                                .document()
                                .map(|document| measure_sections(&document))
                                .unwrap_or_default();
                            nav.dispatch(NavAction::Scrolled { y, sections });
                        }
                    }) as Box<dyn FnMut()>)
                };

                if let Some(window) = window.as_ref() {
                    if window
                        .add_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref())
                        .is_err()
                    {
                        warn!("Could not attach scroll listener");
                    }
                }

                move || {
                    if let Some(window) = window {
                        let _ = window.remove_event_listener_with_callback(
                            "scroll",
                            scroll_callback.as_ref().unchecked_ref(),
                        );
                    }
                }
            },
            (),
        );
    }

    let toggle_menu = {
        let nav = nav.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            nav.dispatch(NavAction::ToggleMenu);
        })
    };

    let links = props.links.iter().map(|link| {
        let onclick = {
            let nav = nav.clone();
            let settings = config.scroll.clone();
            let href = link.href.clone();
            Callback::from(move |e: MouseEvent| {
                e.prevent_default();
                let window = match web_sys::window() {
                    Some(window) => window,
                    None => return,
                };
                if let Some(top) = section_id(&href).and_then(|id| section_top(&window, id)) {
                    smooth_scroll(&window, settings.scroll_target(top));
                    nav.dispatch(NavAction::CloseMenu);
                }
            })
        };
        html! {
            <li>
                <a
                    href={link.href.clone()}
                    class={classes!("nav-link", nav.is_link_active(&link.href).then(|| "active"))}
                    {onclick}
                >
                    { link.label.clone() }
                </a>
            </li>
        }
    });

    html! {
        <nav id="topNav" class={classes!("top-nav", nav.scrolled.then(|| "scrolled"))}>
            <div class="nav-content">
                <a href="#home" class="nav-logo">
                    <span data-feather="book-open"></span>
                    { props.brand.clone() }
                </a>
                <button id="mobileMenuBtn" class="mobile-menu-btn" aria-label="Menu" onclick={toggle_menu}>
                    <span data-feather="menu"></span>
                </button>
                <ul id="navMenu" class={classes!("nav-menu", nav.menu_open.then(|| "active"))}>
                    { for links }
                    { for props.children.iter() }
                </ul>
            </div>
        </nav>
    }
}
