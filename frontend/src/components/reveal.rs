use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use yew::prelude::*;

use crate::config::use_portal_config;

#[derive(Clone, Debug, PartialEq)]
pub struct RevealSettings {
    /// Fraction of the element that must be on screen.
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

/// One-way: once revealed, an element stays revealed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Hidden,
    Revealed,
}

impl Visibility {
    pub fn observe(self, intersecting: bool) -> Self {
        if intersecting {
            Visibility::Revealed
        } else {
            self
        }
    }

    pub fn style(self) -> &'static str {
        match self {
            Visibility::Hidden => "opacity: 0; transform: translateY(30px); transition: all 0.6s ease;",
            Visibility::Revealed => "opacity: 1; transform: translateY(0); transition: all 0.6s ease;",
        }
    }
}

impl Reducible for Visibility {
    type Action = bool;

    fn reduce(self: Rc<Self>, intersecting: bool) -> Rc<Self> {
        let next = self.observe(intersecting);
        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct RevealProps {
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub children: Children,
}

/// Wraps content that fades up the first time it scrolls into view.
#[function_component(Reveal)]
pub fn reveal(props: &RevealProps) -> Html {
    let config = use_portal_config();
    let node = use_node_ref();
    let visibility = use_reducer_eq(Visibility::default);

    {
        let node = node.clone();
        let visibility = visibility.clone();
        use_effect_with_deps(
            move |settings: &RevealSettings| {
                let callback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
                    let intersecting = entries
                        .iter()
                        .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                        .any(|entry| entry.is_intersecting());
                    visibility.dispatch(intersecting);
                }) as Box<dyn FnMut(Array, IntersectionObserver)>);

                let options = IntersectionObserverInit::new();
                options.set_threshold(&JsValue::from_f64(settings.threshold));
                options.set_root_margin(&settings.root_margin);
                let observer =
                    IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options).ok();
                if let (Some(observer), Some(element)) = (observer.as_ref(), node.cast::<Element>()) {
                    observer.observe(&element);
                }

                move || {
                    if let Some(observer) = observer {
                        observer.disconnect();
                    }
                    drop(callback);
                }
            },
            config.reveal.clone(),
        );
    }

    html! {
        <div ref={node} class={props.class.clone()} style={visibility.style()}>
            { for props.children.iter() }
        </div>
    }
}
