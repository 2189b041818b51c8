use log::{info, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::credentials::CredentialTable;
use super::role::Role;
use super::session::{self, KeyValueStore, SessionRecord, StorageError};

/// Every way a sign-in attempt can end without a session. `Display` is the
/// text shown under the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Please enter both username and password")]
    MissingInput,
    /// The login service answered with an `error`; shown verbatim.
    #[error("{0}")]
    RemoteRejected(String),
    /// Network or decode failure. Never shown: it sends the attempt to the
    /// offline credential check instead.
    #[error("login request failed: {0}")]
    TransportFailure(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Could not save your session: {0}")]
    Storage(#[from] StorageError),
}

/// Raw form values at the moment of submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignInInput {
    pub role: Role,
    pub username: String,
    pub password: String,
}

impl SignInInput {
    pub fn validate(&self) -> Result<LoginRequest, AuthError> {
        let username = self.username.trim();
        let password = self.password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingInput);
        }
        Ok(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
            role: self.role,
        })
    }
}

/// Body of `POST <base>/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Remote login service. Implementations return the decoded JSON body, or
/// `AuthError::TransportFailure` when no usable body arrived.
#[allow(async_fn_in_trait)]
pub trait LoginGateway {
    async fn login(&self, request: &LoginRequest) -> Result<Value, AuthError>;
}

/// How a decoded login response is read.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteOutcome {
    Rejected(String),
    Accepted(Map<String, Value>),
    /// Neither an error nor a success marker.
    Ambiguous,
    /// A `null` body carries no answer at all; handled like an unreachable service.
    Unreadable,
}

impl RemoteOutcome {
    pub fn classify(body: Value) -> Self {
        let fields = match body {
            Value::Object(fields) => fields,
            Value::Null => return RemoteOutcome::Unreadable,
            _ => return RemoteOutcome::Ambiguous,
        };
        if let Some(error) = fields.get("error").filter(|v| truthy(v)) {
            let message = match error {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            return RemoteOutcome::Rejected(message);
        }
        let accepted = ["success", "username", "user"]
            .iter()
            .any(|key| fields.get(*key).map_or(false, truthy));
        if accepted {
            RemoteOutcome::Accepted(fields)
        } else {
            RemoteOutcome::Ambiguous
        }
    }
}

// Field presence follows JSON-ish truthiness: null, false, 0 and "" are absent.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A finished, successful attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum SignInSuccess {
    Remote(SessionRecord),
    Fallback(SessionRecord),
    /// The service answered without error or success markers. Treated as a
    /// login but nothing is persisted.
    Unconfirmed { role: Role },
}

impl SignInSuccess {
    pub fn role(&self) -> Role {
        match self {
            SignInSuccess::Remote(record) | SignInSuccess::Fallback(record) => record.role,
            SignInSuccess::Unconfirmed { role } => *role,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SignInSuccess::Remote(_) | SignInSuccess::Fallback(_) => "✓ Login successful! Redirecting...",
            SignInSuccess::Unconfirmed { .. } => "Login successful!",
        }
    }
}

/// Runs one validated attempt: remote first, offline table only when the
/// service could not be reached.
pub struct Authenticator<G, S> {
    gateway: G,
    store: S,
    credentials: CredentialTable,
}

impl<G: LoginGateway, S: KeyValueStore> Authenticator<G, S> {
    pub fn new(gateway: G, store: S, credentials: CredentialTable) -> Self {
        Self {
            gateway,
            store,
            credentials,
        }
    }

    pub async fn authenticate(&self, request: LoginRequest) -> Result<SignInSuccess, AuthError> {
        match self.gateway.login(&request).await {
            Ok(body) => self.accept_response(request, body),
            Err(err) => {
                warn!("Login service unreachable ({}), using offline credentials", err);
                self.fallback(request)
            }
        }
    }

    fn accept_response(&self, request: LoginRequest, body: Value) -> Result<SignInSuccess, AuthError> {
        match RemoteOutcome::classify(body) {
            RemoteOutcome::Rejected(message) => Err(AuthError::RemoteRejected(message)),
            RemoteOutcome::Accepted(fields) => {
                let record = SessionRecord::from_remote(request.role, &request.username, fields);
                session::persist(&self.store, &record)?;
                info!("Signed in as {} via login service", record.role);
                Ok(SignInSuccess::Remote(record))
            }
            RemoteOutcome::Ambiguous => {
                warn!("Login response had no success marker; continuing as {}", request.role);
                Ok(SignInSuccess::Unconfirmed { role: request.role })
            }
            RemoteOutcome::Unreadable => {
                warn!("Login service returned an empty body, using offline credentials");
                self.fallback(request)
            }
        }
    }

    fn fallback(&self, request: LoginRequest) -> Result<SignInSuccess, AuthError> {
        if !self
            .credentials
            .accepts(request.role, &request.username, &request.password)
        {
            return Err(AuthError::InvalidCredentials);
        }
        let record = SessionRecord::new(request.username, request.role);
        session::persist(&self.store, &record)?;
        info!("Signed in as {} via offline credentials", record.role);
        Ok(SignInSuccess::Fallback(record))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::auth::session::memory::MemoryStore;
    use crate::auth::session::{ROLE_KEY, USERNAME_KEY, USER_KEY};

    /// Replays one canned reply and records what it was asked.
    struct ScriptedGateway {
        reply: Result<Value, AuthError>,
        calls: Cell<usize>,
        last: RefCell<Option<LoginRequest>>,
    }

    impl ScriptedGateway {
        fn answering(body: Value) -> Self {
            Self::new(Ok(body))
        }

        fn unreachable() -> Self {
            Self::new(Err(AuthError::TransportFailure("Failed to fetch".to_string())))
        }

        fn new(reply: Result<Value, AuthError>) -> Self {
            Self {
                reply,
                calls: Cell::new(0),
                last: RefCell::new(None),
            }
        }
    }

    impl LoginGateway for &ScriptedGateway {
        async fn login(&self, request: &LoginRequest) -> Result<Value, AuthError> {
            self.calls.set(self.calls.get() + 1);
            *self.last.borrow_mut() = Some(request.clone());
            self.reply.clone()
        }
    }

    fn input(role: Role, username: &str, password: &str) -> SignInInput {
        SignInInput {
            role,
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    // Same order as the form: validate, then go remote.
    fn submit(
        gateway: &ScriptedGateway,
        store: &MemoryStore,
        input: SignInInput,
    ) -> Result<SignInSuccess, AuthError> {
        let request = input.validate()?;
        let auth = Authenticator::new(gateway, store.clone(), CredentialTable::default());
        block_on(auth.authenticate(request))
    }

    #[test]
    fn blank_fields_never_reach_the_network() {
        for role in Role::ALL {
            for (username, password) in [("", "pw"), ("user", ""), ("   ", "pw"), ("user", " \t")] {
                let gateway = ScriptedGateway::answering(json!({"success": true}));
                let store = MemoryStore::default();
                let result = submit(&gateway, &store, input(role, username, password));
                assert_eq!(result, Err(AuthError::MissingInput));
                assert_eq!(gateway.calls.get(), 0);
                assert!(store.is_empty());
            }
        }
    }

    #[test]
    fn request_carries_trimmed_fields_and_role() {
        let gateway = ScriptedGateway::answering(json!({"success": true}));
        let store = MemoryStore::default();
        submit(&gateway, &store, input(Role::Parent, "  mum ", " pw  ")).unwrap();
        let sent = gateway.last.borrow().clone().unwrap();
        assert_eq!(
            serde_json::to_value(&sent).unwrap(),
            json!({"username": "mum", "password": "pw", "role": "parent"})
        );
    }

    #[test]
    fn remote_error_is_shown_verbatim_without_fallback() {
        let gateway = ScriptedGateway::answering(json!({"error": "Account locked"}));
        let store = MemoryStore::default();
        // Would pass the offline table, so a fallback would be visible.
        let result = submit(&gateway, &store, input(Role::Admin, "admin", "admin"));
        let err = result.unwrap_err();
        assert_eq!(err, AuthError::RemoteRejected("Account locked".to_string()));
        assert_eq!(err.to_string(), "Account locked");
        assert!(store.is_empty());
    }

    #[test]
    fn remote_success_persists_session_for_selected_role() {
        let gateway = ScriptedGateway::answering(json!({"success": true, "username": "bob"}));
        let store = MemoryStore::default();
        let result = submit(&gateway, &store, input(Role::Teacher, "typed", "pw")).unwrap();

        assert_eq!(result.role(), Role::Teacher);
        assert_eq!(result.message(), "✓ Login successful! Redirecting...");
        let stored: SessionRecord = serde_json::from_str(&store.get(USER_KEY).unwrap()).unwrap();
        assert_eq!(stored.username, "bob");
        assert_eq!(stored.role, Role::Teacher);
        assert_eq!(store.get(ROLE_KEY).as_deref(), Some("teacher"));
        assert_eq!(store.get(USERNAME_KEY).as_deref(), Some("bob"));
    }

    #[test]
    fn nested_user_object_counts_as_success() {
        let gateway = ScriptedGateway::answering(json!({"user": {"username": "carol", "id": 3}}));
        let store = MemoryStore::default();
        let result = submit(&gateway, &store, input(Role::Student, "typed", "pw")).unwrap();
        match result {
            SignInSuccess::Remote(record) => {
                assert_eq!(record.username, "carol");
                assert_eq!(record.extra.get("user"), Some(&json!({"username": "carol", "id": 3})));
            }
            other => panic!("expected remote success, got {:?}", other),
        }
    }

    #[test]
    fn ambiguous_response_is_let_through_without_a_session() {
        for body in [json!({}), json!({"success": false, "message": "ok"}), json!([1, 2]), json!("ok")] {
            let gateway = ScriptedGateway::answering(body);
            let store = MemoryStore::default();
            let result = submit(&gateway, &store, input(Role::Parent, "p", "nope")).unwrap();
            assert_eq!(result, SignInSuccess::Unconfirmed { role: Role::Parent });
            assert_eq!(result.message(), "Login successful!");
            assert!(store.is_empty());
        }
    }

    #[test]
    fn null_body_goes_through_the_offline_check() {
        let gateway = ScriptedGateway::answering(Value::Null);
        let store = MemoryStore::default();
        let result = submit(&gateway, &store, input(Role::Parent, "x", "wrong"));
        assert_eq!(result, Err(AuthError::InvalidCredentials));
        assert!(store.is_empty());

        let gateway = ScriptedGateway::answering(Value::Null);
        let store = MemoryStore::default();
        let result = submit(&gateway, &store, input(Role::Admin, "admin", "admin")).unwrap();
        assert_eq!(result, SignInSuccess::Fallback(SessionRecord::new("admin", Role::Admin)));
        assert_eq!(store.get(ROLE_KEY).as_deref(), Some("admin"));
    }

    #[test]
    fn unreachable_service_falls_back_for_admin() {
        let gateway = ScriptedGateway::unreachable();
        let store = MemoryStore::default();
        let result = submit(&gateway, &store, input(Role::Admin, "admin", "admin")).unwrap();

        assert_eq!(result, SignInSuccess::Fallback(SessionRecord::new("admin", Role::Admin)));
        assert_eq!(
            serde_json::from_str::<Value>(&store.get(USER_KEY).unwrap()).unwrap(),
            json!({"username": "admin", "role": "admin"})
        );
        assert_eq!(store.get(ROLE_KEY).as_deref(), Some("admin"));
        assert_eq!(store.get(USERNAME_KEY).as_deref(), Some("admin"));
    }

    #[test]
    fn unreachable_service_with_wrong_password_writes_nothing() {
        let gateway = ScriptedGateway::unreachable();
        let store = MemoryStore::default();
        let result = submit(&gateway, &store, input(Role::Parent, "mum", "wrong"));
        assert_eq!(result, Err(AuthError::InvalidCredentials));
        assert_eq!(result.unwrap_err().to_string(), "Invalid username or password");
        assert!(store.is_empty());
    }

    #[test]
    fn fallback_ignores_username_for_non_admin_roles() {
        let gateway = ScriptedGateway::unreachable();
        let store = MemoryStore::default();
        let result = submit(&gateway, &store, input(Role::Student, "0002", "student")).unwrap();
        assert_eq!(result, SignInSuccess::Fallback(SessionRecord::new("0002", Role::Student)));
    }

    #[test]
    fn storage_failure_surfaces_and_leaves_no_session() {
        let gateway = ScriptedGateway::answering(json!({"success": true}));
        let store = MemoryStore::rejecting(ROLE_KEY);
        let result = submit(&gateway, &store, input(Role::Teacher, "t", "pw"));
        assert!(matches!(result, Err(AuthError::Storage(StorageError::Write { .. }))));
        assert!(store.is_empty());
    }

    #[test]
    fn classify_ignores_falsy_error_fields() {
        assert_eq!(
            RemoteOutcome::classify(json!({"error": "", "username": "x"})),
            RemoteOutcome::Accepted(match json!({"error": "", "username": "x"}) {
                Value::Object(map) => map,
                _ => unreachable!(),
            })
        );
        assert_eq!(RemoteOutcome::classify(json!({"error": null})), RemoteOutcome::Ambiguous);
        assert_eq!(RemoteOutcome::classify(Value::Null), RemoteOutcome::Unreadable);
        assert_eq!(
            RemoteOutcome::classify(json!({"error": {"code": 401}})),
            RemoteOutcome::Rejected("{\"code\":401}".to_string())
        );
    }
}
