//! Explicit owner of per-user sessions.
//!
//! The host creates sessions lazily through [`SessionRegistry::get_or_load`]
//! and drops them with [`SessionRegistry::close`]; nothing is global.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::info;

use crate::error::{EngineError, Result};
use crate::session::Session;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the user's session, running `loader` only if none is open yet.
    ///
    /// A failed load leaves the registry unchanged.
    pub fn get_or_load<F, E>(&mut self, user_id: &str, loader: F) -> std::result::Result<&mut Session, E>
    where
        F: FnOnce(&str) -> std::result::Result<Session, E>,
    {
        match self.sessions.entry(user_id.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(v) => {
                let session = loader(user_id)?;
                info!(
                    user = user_id,
                    expenses = session.store().expenses().len(),
                    income = session.store().income().len(),
                    "session opened"
                );
                Ok(v.insert(session))
            }
        }
    }

    pub fn get(&self, user_id: &str) -> Result<&Session> {
        self.sessions.get(user_id).ok_or_else(|| EngineError::UnknownUser {
            user_id: user_id.to_string(),
        })
    }

    pub fn get_mut(&mut self, user_id: &str) -> Result<&mut Session> {
        self.sessions
            .get_mut(user_id)
            .ok_or_else(|| EngineError::UnknownUser {
                user_id: user_id.to_string(),
            })
    }

    pub fn close(&mut self, user_id: &str) -> Option<Session> {
        let closed = self.sessions.remove(user_id);
        if closed.is_some() {
            info!(user = user_id, "session closed");
        }
        closed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::Transaction;
    use crate::session::SessionSettings;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    }

    fn loader(user: &str) -> Result<Session> {
        Session::load(
            user,
            today(),
            SessionSettings::default(),
            [Transaction::expense(user, today(), 12.0, "Food", "Lunch")],
        )
    }

    #[test]
    fn test_loader_runs_once_per_user() {
        let mut registry = SessionRegistry::new();
        let mut calls = 0;
        for _ in 0..3 {
            registry
                .get_or_load("alice", |u| {
                    calls += 1;
                    loader(u)
                })
                .unwrap();
        }
        assert_eq!(calls, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut registry = SessionRegistry::new();
        registry.get_or_load("alice", loader).unwrap();
        registry.get_or_load("bob", loader).unwrap();
        registry
            .get_mut("alice")
            .unwrap()
            .add(Transaction::expense("alice", today(), 5.0, "Food", "Snack"))
            .unwrap();

        assert_eq!(registry.get("alice").unwrap().store().len(), 2);
        assert_eq!(registry.get("bob").unwrap().store().len(), 1);
    }

    #[test]
    fn test_close_and_unknown_user() {
        let mut registry = SessionRegistry::new();
        registry.get_or_load("alice", loader).unwrap();
        assert!(registry.close("alice").is_some());
        assert!(registry.close("alice").is_none());
        assert_eq!(
            registry.get("alice").unwrap_err(),
            EngineError::UnknownUser {
                user_id: "alice".into()
            }
        );
    }

    #[test]
    fn test_failed_load_leaves_registry_empty() {
        let mut registry = SessionRegistry::new();
        let result = registry.get_or_load("carol", |u| {
            Session::load(
                u,
                today(),
                SessionSettings::default(),
                [Transaction::expense(u, today(), -3.0, "Food", "Refund?")],
            )
        });
        assert!(result.is_err());
        assert!(registry.is_empty());
    }
}
