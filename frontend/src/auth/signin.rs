use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{info, warn};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, MouseEvent, SubmitEvent};
use yew::prelude::*;

use crate::auth::credentials::DEMO;
use crate::auth::flow::{AuthError, Authenticator, SignInInput, SignInSuccess};
use crate::auth::gateway::HttpLoginGateway;
use crate::auth::role::Role;
use crate::auth::session::BrowserStorage;
use crate::components::icons;
use crate::config::use_portal_config;

#[derive(Clone, Debug, PartialEq)]
pub enum FormMessage {
    Error(String),
    Success(String),
}

impl FormMessage {
    pub fn class(&self) -> &'static str {
        match self {
            FormMessage::Error(_) => "form-message show error",
            FormMessage::Success(_) => "form-message show success",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            FormMessage::Error(text) | FormMessage::Success(text) => text,
        }
    }
}

/// Submit button state and the line of text under the form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignInStatus {
    pub busy: bool,
    pub message: Option<FormMessage>,
}

pub enum StatusAction {
    Begin,
    /// Any end of an attempt, including one rejected before it began.
    Finish(Result<SignInSuccess, AuthError>),
    DemoLoaded,
}

impl Reducible for SignInStatus {
    type Action = StatusAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = match action {
            StatusAction::Begin => SignInStatus {
                busy: true,
                message: self.message.clone(),
            },
            StatusAction::Finish(Ok(success)) => SignInStatus {
                busy: false,
                message: Some(FormMessage::Success(success.message().to_string())),
            },
            StatusAction::Finish(Err(err)) => SignInStatus {
                busy: false,
                message: Some(FormMessage::Error(err.to_string())),
            },
            StatusAction::DemoLoaded => SignInStatus {
                busy: self.busy,
                message: Some(FormMessage::Success(
                    "Demo credentials loaded. Click Sign In to continue.".to_string(),
                )),
            },
        };
        Rc::new(next)
    }
}

/// Holds the pending dashboard redirect. Once closed (the form unmounted)
/// nothing can be scheduled into it again, so a login that finishes late
/// does not navigate.
#[derive(Debug)]
pub struct RedirectSlot<T> {
    closed: bool,
    pending: Option<T>,
}

impl<T> Default for RedirectSlot<T> {
    fn default() -> Self {
        Self {
            closed: false,
            pending: None,
        }
    }
}

impl<T> RedirectSlot<T> {
    /// Builds and stores the task unless the slot is closed. Returns whether it was stored.
    pub fn schedule(&mut self, make: impl FnOnce() -> T) -> bool {
        if self.closed {
            return false;
        }
        self.pending = Some(make());
        true
    }

    /// Drops any pending task and refuses new ones.
    pub fn close(&mut self) {
        self.closed = true;
        self.pending = None;
    }
}

fn navigate(url: &str) {
    if let Some(window) = web_sys::window() {
        if window.location().set_href(url).is_err() {
            warn!("Navigation to {} failed", url);
        }
    }
}

#[function_component(SignInForm)]
pub fn signin_form() -> Html {
    let config = use_portal_config();
    let role = use_state(Role::default);
    let username = use_state(String::new);
    let password = use_state(String::new);
    let status = use_reducer(SignInStatus::default);
    // Dropping the Timeout cancels the redirect.
    let redirect = use_mut_ref(RedirectSlot::<Timeout>::default);

    {
        let redirect = redirect.clone();
        use_effect_with_deps(
            move |_| {
                move || {
                    redirect.borrow_mut().close();
                }
            },
            (),
        );
    }

    use_effect_with_deps(
        |_| {
            icons::refresh();
            || ()
        },
        status.busy,
    );

    let on_role = {
        let role = role.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            match select.value().parse::<Role>() {
                Ok(selected) => role.set(selected),
                Err(err) => warn!("{}", err),
            }
        })
    };

    let on_username = {
        let username = username.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            username.set(input.value());
        })
    };

    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_submit = {
        let config = config.clone();
        let role = role.clone();
        let username = username.clone();
        let password = password.clone();
        let status = status.clone();
        let redirect = redirect.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if status.busy {
                return;
            }

            let input = SignInInput {
                role: *role,
                username: (*username).clone(),
                password: (*password).clone(),
            };
            let request = match input.validate() {
                Ok(request) => request,
                Err(err) => {
                    status.dispatch(StatusAction::Finish(Err(err)));
                    return;
                }
            };
            let store = match BrowserStorage::local() {
                Ok(store) => store,
                Err(err) => {
                    status.dispatch(StatusAction::Finish(Err(err.into())));
                    return;
                }
            };

            status.dispatch(StatusAction::Begin);
            let authenticator = Authenticator::new(
                HttpLoginGateway::new(config.api_base.clone()),
                store,
                config.credentials.clone(),
            );
            let config = config.clone();
            let status = status.clone();
            let redirect = redirect.clone();
            spawn_local(async move {
                let result = authenticator.authenticate(request).await;
                if let Ok(success) = &result {
                    let url = config.dashboard_url(success.role());
                    let delay = config.redirect_delay_ms;
                    if !redirect
                        .borrow_mut()
                        .schedule(|| Timeout::new(delay, move || navigate(&url)))
                    {
                        info!("Sign-in form closed before login finished, not redirecting");
                    }
                }
                status.dispatch(StatusAction::Finish(result));
            });
        })
    };

    let on_demo = {
        let role = role.clone();
        let username = username.clone();
        let password = password.clone();
        let status = status.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            role.set(DEMO.role);
            username.set(DEMO.username.to_string());
            password.set(DEMO.password.to_string());
            status.dispatch(StatusAction::DemoLoaded);
        })
    };

    let (message_class, message_text) = match status.message.as_ref() {
        Some(message) => (message.class(), message.text().to_string()),
        None => ("form-message", String::new()),
    };

    html! {
        <form class="signin-form" onsubmit={on_submit}>
            <div class="form-group">
                <label for="signin-role">{"Sign in as"}</label>
                <select id="signin-role" onchange={on_role}>
                    { for Role::ALL.iter().map(|option| html! {
                        <option value={option.as_str()} selected={*role == *option}>
                            { option.label() }
                        </option>
                    }) }
                </select>
            </div>
            <div class="form-group">
                <label for="signin-username">{"Username"}</label>
                <input
                    id="signin-username"
                    type="text"
                    placeholder="Enter your username or ID"
                    autocomplete="username"
                    value={(*username).clone()}
                    oninput={on_username}
                />
            </div>
            <div class="form-group">
                <label for="signin-password">{"Password"}</label>
                <input
                    id="signin-password"
                    type="password"
                    placeholder="Enter your password"
                    autocomplete="current-password"
                    value={(*password).clone()}
                    oninput={on_password}
                />
            </div>
            <div id="signin-msg" class={message_class}>{ message_text }</div>
            <button id="signin-btn" type="submit" class="btn btn-primary btn-block" disabled={status.busy}>
                if status.busy {
                    <span key="loader" data-feather="loader"></span>
                    {" Signing in..."}
                } else {
                    <span key="log-in" data-feather="log-in"></span>
                    {" Sign In"}
                }
            </button>
            <button id="demo-btn" type="button" class="btn btn-outline btn-block" onclick={on_demo}>
                {"Use demo credentials"}
            </button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::SessionRecord;

    fn begin() -> Rc<SignInStatus> {
        Rc::new(SignInStatus::default()).reduce(StatusAction::Begin)
    }

    #[test]
    fn busy_is_cleared_on_every_exit() {
        let outcomes = vec![
            Ok(SignInSuccess::Remote(SessionRecord::new("bob", Role::Teacher))),
            Ok(SignInSuccess::Fallback(SessionRecord::new("admin", Role::Admin))),
            Ok(SignInSuccess::Unconfirmed { role: Role::Parent }),
            Err(AuthError::RemoteRejected("Account locked".to_string())),
            Err(AuthError::InvalidCredentials),
        ];
        for outcome in outcomes {
            let started = begin();
            assert!(started.busy);
            let finished = started.reduce(StatusAction::Finish(outcome));
            assert!(!finished.busy);
            assert!(finished.message.is_some());
        }
    }

    #[test]
    fn errors_render_as_error_messages() {
        let status = begin().reduce(StatusAction::Finish(Err(AuthError::RemoteRejected(
            "Account locked".to_string(),
        ))));
        let message = status.message.clone().unwrap();
        assert_eq!(message.text(), "Account locked");
        assert_eq!(message.class(), "form-message show error");
    }

    #[test]
    fn missing_input_is_reported_without_going_busy() {
        let status = Rc::new(SignInStatus::default())
            .reduce(StatusAction::Finish(Err(AuthError::MissingInput)));
        assert!(!status.busy);
        assert_eq!(
            status.message,
            Some(FormMessage::Error(
                "Please enter both username and password".to_string()
            ))
        );
    }

    #[test]
    fn success_message_depends_on_confirmation() {
        let confirmed = begin().reduce(StatusAction::Finish(Ok(SignInSuccess::Fallback(
            SessionRecord::new("0002", Role::Student),
        ))));
        assert_eq!(
            confirmed.message,
            Some(FormMessage::Success("✓ Login successful! Redirecting...".to_string()))
        );

        let unconfirmed = begin().reduce(StatusAction::Finish(Ok(SignInSuccess::Unconfirmed {
            role: Role::Student,
        })));
        assert_eq!(unconfirmed.message.as_ref().map(FormMessage::class), Some("form-message show success"));
        assert_eq!(unconfirmed.message.as_ref().map(FormMessage::text), Some("Login successful!"));
    }

    #[test]
    fn closed_redirect_slot_refuses_late_logins() {
        let mut slot = RedirectSlot::default();
        assert!(slot.schedule(|| "/dashboard.html?role=admin"));
        assert_eq!(slot.pending, Some("/dashboard.html?role=admin"));

        slot.close();
        assert_eq!(slot.pending, None);

        let mut built = false;
        assert!(!slot.schedule(|| {
            built = true;
            "/dashboard.html?role=parent"
        }));
        assert!(!built);
        assert_eq!(slot.pending, None);
    }

    #[test]
    fn demo_fill_only_changes_the_message() {
        let status = Rc::new(SignInStatus::default()).reduce(StatusAction::DemoLoaded);
        assert!(!status.busy);
        assert_eq!(
            status.message.as_ref().map(FormMessage::text),
            Some("Demo credentials loaded. Click Sign In to continue.")
        );
    }
}
