use std::rc::Rc;

use yew::prelude::*;

use crate::auth::credentials::CredentialTable;
use crate::auth::role::Role;
use crate::components::modal::ModalRegistry;
use crate::components::nav::ScrollSettings;
use crate::components::reveal::RevealSettings;

#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3001/api"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    "https://school-portal-backend-ar5x.onrender.com/api"
}

pub const DASHBOARD_MODAL: &str = "dashboard";
pub const SIGNIN_MODAL: &str = "signin";

/// Everything the landing page components need, built once in `App` and
/// handed down through context.
#[derive(Clone, Debug, PartialEq)]
pub struct PortalConfig {
    pub api_base: String,
    pub dashboard_path: String,
    pub modals: ModalRegistry,
    pub credentials: CredentialTable,
    pub slide_interval_ms: u32,
    pub redirect_delay_ms: u32,
    pub icon_refresh_delay_ms: u32,
    pub scroll: ScrollSettings,
    pub reveal: RevealSettings,
}

impl PortalConfig {
    pub fn dashboard_url(&self, role: Role) -> String {
        format!(
            "{}?role={}",
            self.dashboard_path,
            urlencoding::encode(role.as_str())
        )
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base: get_backend_url().to_string(),
            dashboard_path: "/dashboard.html".to_string(),
            modals: ModalRegistry::new([
                (DASHBOARD_MODAL, "dashboardModal"),
                (SIGNIN_MODAL, "signinModal"),
            ]),
            credentials: CredentialTable::default(),
            slide_interval_ms: 8_000,
            redirect_delay_ms: 1_500,
            icon_refresh_delay_ms: 100,
            scroll: ScrollSettings::default(),
            reveal: RevealSettings::default(),
        }
    }
}

/// The provided config, or the built-in one when rendered without a provider.
#[hook]
pub fn use_portal_config() -> Rc<PortalConfig> {
    use_context::<Rc<PortalConfig>>().unwrap_or_default()
}
