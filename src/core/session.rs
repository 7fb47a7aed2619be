//! Session store seam.
//!
//! The API layer reads tokens from, and reports auth transitions to, a
//! [`SessionStore`]. The browser app implements it over a reactive signal
//! with persistence; tests use a plain `RefCell<Session>`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{Session, SessionAction};

/// Owner of the session snapshot. All writes go through [`dispatch`](Self::dispatch).
pub trait SessionStore {
    fn snapshot(&self) -> Session;

    fn dispatch(&self, action: SessionAction);

    fn access_token(&self) -> Option<String> {
        self.snapshot().access_token.filter(|t| !t.is_empty())
    }

    fn refresh_token(&self) -> Option<String> {
        self.snapshot().refresh_token.filter(|t| !t.is_empty())
    }
}

impl SessionStore for RefCell<Session> {
    fn snapshot(&self) -> Session {
        self.borrow().clone()
    }

    fn dispatch(&self, action: SessionAction) {
        let current = self.take();
        self.replace(current.reduce(action));
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Rc<S> {
    fn snapshot(&self) -> Session {
        (**self).snapshot()
    }

    fn dispatch(&self, action: SessionAction) {
        (**self).dispatch(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthTokens, Role, sample_user};

    #[test]
    fn test_refcell_store_applies_actions() {
        let store = RefCell::new(Session::default());
        assert_eq!(store.access_token(), None);

        store.dispatch(SessionAction::LoginSucceeded {
            tokens: AuthTokens {
                access_token: "a".into(),
                refresh_token: "r".into(),
            },
            user: sample_user(Role::User),
        });
        assert_eq!(store.access_token().as_deref(), Some("a"));
        assert_eq!(store.refresh_token().as_deref(), Some("r"));

        store.dispatch(SessionAction::ClearAuth);
        assert!(!store.snapshot().is_authenticated());
    }
}
