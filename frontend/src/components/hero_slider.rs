use std::rc::Rc;

use gloo_timers::callback::Interval;
use log::info;
use yew::prelude::*;

use crate::config::use_portal_config;

#[derive(Clone, Debug, PartialEq)]
pub struct Slide {
    pub image: AttrValue,
    pub title: AttrValue,
    pub subtitle: AttrValue,
}

/// Circular single-active rotation over a fixed number of slides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlideRotation {
    count: usize,
    current: usize,
}

impl SlideRotation {
    pub fn new(count: usize) -> Self {
        Self { count, current: 0 }
    }

    /// `None` when there is nothing to show.
    pub fn current(&self) -> Option<usize> {
        (self.count > 0).then(|| self.current)
    }

    pub fn advance(self) -> Self {
        if self.count == 0 {
            return self;
        }
        Self {
            current: (self.current + 1) % self.count,
            ..self
        }
    }
}

pub struct Advance;

impl Reducible for SlideRotation {
    type Action = Advance;

    fn reduce(self: Rc<Self>, _: Advance) -> Rc<Self> {
        Rc::new(self.advance())
    }
}

#[derive(Properties, PartialEq)]
pub struct HeroSliderProps {
    pub slides: Vec<Slide>,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(HeroSlider)]
pub fn hero_slider(props: &HeroSliderProps) -> Html {
    let config = use_portal_config();
    let count = props.slides.len();
    let rotation = use_reducer(move || SlideRotation::new(count));

    {
        let rotation = rotation.clone();
        use_effect_with_deps(
            move |&(count, interval_ms)| {
                let interval = (count > 0).then(|| {
                    info!("Hero slider initialized with {} slides", count);
                    Interval::new(interval_ms, move || rotation.dispatch(Advance))
                });
                move || drop(interval)
            },
            (count, config.slide_interval_ms),
        );
    }

    let active = rotation.current();

    html! {
        <div class="hero-slider">
            { for props.slides.iter().enumerate().map(|(index, slide)| html! {
                <div
                    class={classes!("hero-slide", (active == Some(index)).then(|| "active"))}
                    style={format!("background-image: url('{}');", slide.image)}
                >
                    <div class="hero-overlay"></div>
                    <div class="hero-content">
                        <h1 class="hero-title">{ slide.title.clone() }</h1>
                        <p class="hero-subtitle">{ slide.subtitle.clone() }</p>
                    </div>
                </div>
            }) }
            { for props.children.iter() }
        </div>
    }
}
