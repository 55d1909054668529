//! Classification of failed mutations (create/rename/delete class,
//! add/remove student). Read paths never go through here.

use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::{
    AUTH_FAILURE_MESSAGES, OWNERSHIP_FORBIDDEN_FRAGMENT, PERMISSION_DENIED_MESSAGE,
    SESSION_EXPIRED_NOTICE,
};
use crate::errors::ApiError;
use crate::session::SessionStore;
use crate::warn_log;

/// Emitted once per detected auth expiry. The host shows `message` and
/// navigates to `login_url`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionExpired {
    pub message: String,
    pub login_url: String,
}

/// Type for the session-expired callback
type OnSessionExpiredCallback = Rc<RefCell<dyn FnMut(&SessionExpired)>>;

pub struct MutationErrorClassifier {
    session: SessionStore,
    login_url: String,
    on_session_expired: RefCell<Option<OnSessionExpiredCallback>>,
}

impl MutationErrorClassifier {
    pub fn new(session: SessionStore, login_url: &str) -> Self {
        Self {
            session,
            login_url: login_url.to_string(),
            on_session_expired: RefCell::new(None),
        }
    }

    /// Set a handler to be called when a mutation reveals an expired session.
    pub fn set_on_session_expired<F>(&self, callback: F)
    where
        F: FnMut(&SessionExpired) + 'static,
    {
        *self.on_session_expired.borrow_mut() = Some(Rc::new(RefCell::new(callback)));
    }

    /// Map a failed mutation onto the error the UI should see.
    pub fn classify(&self, err: ApiError) -> ApiError {
        let failure = match err {
            ApiError::Http(failure) => failure,
            other => return other,
        };

        if failure.status == 401 && is_auth_failure_message(&failure.message) {
            warn_log!(
                "{} rejected the session ({}) – logging out",
                failure.endpoint,
                failure.message
            );
            self.session.clear();
            let redirecting = self.emit_session_expired();
            return ApiError::AuthExpired {
                failure,
                redirecting,
            };
        }

        if failure.status == 403
            && failure
                .message
                .to_lowercase()
                .contains(OWNERSHIP_FORBIDDEN_FRAGMENT)
        {
            return ApiError::Permission {
                message: PERMISSION_DENIED_MESSAGE.to_string(),
                status: 403,
                body: failure.body,
            };
        }

        ApiError::Http(failure)
    }

    /// Returns whether a handler was told to redirect.
    fn emit_session_expired(&self) -> bool {
        // Clone the handle so the callback may re-register itself.
        let callback = self.on_session_expired.borrow().clone();
        let event = SessionExpired {
            message: SESSION_EXPIRED_NOTICE.to_string(),
            login_url: self.login_url.clone(),
        };
        let Some(cb) = callback else {
            warn_log!("Session expired but no handler is registered");
            return false;
        };
        // A failed borrow means the handler is already running (re-entrant
        // expiry); its redirect is still in flight.
        if let Ok(mut f) = cb.try_borrow_mut() {
            (*f)(&event);
        }
        true
    }
}

fn is_auth_failure_message(message: &str) -> bool {
    let trimmed = message.trim();
    AUTH_FAILURE_MESSAGES.iter().any(|m| *m == trimmed)
}
