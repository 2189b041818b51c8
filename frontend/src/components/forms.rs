use log::{info, warn};
use web_sys::{HtmlFormElement, HtmlInputElement, SubmitEvent};
use yew::prelude::*;

pub const CONTACT_THANKS: &str = "Thank you for your message! We will get back to you soon.";

pub fn newsletter_thanks(email: &str) -> String {
    format!("Thank you for subscribing with {}!", email)
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.alert_with_message(message) {
            warn!("Could not show acknowledgement: {:?}", err);
        }
    }
}

fn reset(e: &SubmitEvent) {
    if let Some(form) = e.target_dyn_into::<HtmlFormElement>() {
        form.reset();
    }
}

#[function_component(ContactForm)]
pub fn contact_form() -> Html {
    let onsubmit = Callback::from(|e: SubmitEvent| {
        e.prevent_default();
        info!("Contact form submitted");
        alert(CONTACT_THANKS);
        reset(&e);
    });

    html! {
        <form class="contact-form" {onsubmit}>
            <div class="form-row">
                <input type="text" name="name" placeholder="Your Name" required=true />
                <input type="email" name="email" placeholder="Your Email" required=true />
            </div>
            <input type="text" name="subject" placeholder="Subject" />
            <textarea name="message" rows="5" placeholder="Your Message" required=true></textarea>
            <button type="submit" class="btn btn-primary">
                <span data-feather="send"></span>
                {" Send Message"}
            </button>
        </form>
    }
}

#[function_component(NewsletterForm)]
pub fn newsletter_form() -> Html {
    let email_ref = use_node_ref();

    let onsubmit = {
        let email_ref = email_ref.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let email = email_ref
                .cast::<HtmlInputElement>()
                .map(|input| input.value())
                .unwrap_or_default();
            info!("Newsletter signup submitted");
            alert(&newsletter_thanks(&email));
            reset(&e);
        })
    };

    html! {
        <form class="newsletter-form" {onsubmit}>
            <input ref={email_ref} type="email" placeholder="Your email address" required=true />
            <button type="submit" aria-label="Subscribe">
                <span data-feather="arrow-right"></span>
            </button>
        </form>
    }
}
