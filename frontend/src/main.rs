use std::rc::Rc;

use log::{info, Level};
use yew::prelude::*;

mod config;
mod auth {
    pub mod credentials;
    pub mod flow;
    pub mod gateway;
    pub mod role;
    pub mod session;
    pub mod signin;
}
mod components {
    pub mod forms;
    pub mod hero_slider;
    pub mod icons;
    pub mod modal;
    pub mod nav;
    pub mod reveal;
}
mod pages {
    pub mod landing;
}

use components::modal::ModalHost;
use config::PortalConfig;
use pages::landing::Landing;

#[function_component]
fn App() -> Html {
    let config = use_memo(|_| PortalConfig::default(), ());

    html! {
        <ContextProvider<Rc<PortalConfig>> context={config}>
            <ModalHost>
                <Landing />
            </ModalHost>
        </ContextProvider<Rc<PortalConfig>>>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(Level::Info).expect("error initializing log");

    info!("Starting SchoolPortal landing page");
    yew::Renderer::<App>::new().render();
}
