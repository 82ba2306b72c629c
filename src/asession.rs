//! Session values kept in memory, keyed by the id of rouille's
//! session cookie.

use std::{collections::HashMap, sync::Mutex, time::{Duration, Instant}};

use anyhow::{Result, anyhow};
use kstring::KString;
use spass_html::{FieldSource, MapFields, SessionStorage};

struct Entry {
    fields: MapFields,
    last_access: Instant,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<KString, Entry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A working copy of the session `id` (empty if new). Changes
    /// only become visible to other requests via `commit`.
    pub fn open(&self, id: &str) -> Result<ASession<'_>> {
        let mut sessions = self.sessions.lock().map_err(
            |_| anyhow!("session store lock poisoned"))?;
        let fields = match sessions.get_mut(id) {
            Some(entry) => {
                entry.last_access = Instant::now();
                entry.fields.clone()
            }
            None => MapFields::new(),
        };
        Ok(ASession { store: self, id: KString::from_ref(id), fields })
    }

    /// Drop sessions that were not accessed within `max_age`; returns
    /// how many were dropped.
    pub fn purge_older_than(&self, max_age: Duration) -> Result<usize> {
        let mut sessions = self.sessions.lock().map_err(
            |_| anyhow!("session store lock poisoned"))?;
        let n = sessions.len();
        sessions.retain(|_, entry| entry.last_access.elapsed() < max_age);
        let purged = n - sessions.len();
        if purged > 0 {
            tracing::debug!("purged {purged} sessions");
        }
        Ok(purged)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.sessions.lock().map_err(
            |_| anyhow!("session store lock poisoned"))?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

pub struct ASession<'s> {
    store: &'s SessionStore,
    id: KString,
    fields: MapFields,
}

impl<'s> ASession<'s> {
    pub fn id(&self) -> &str { &self.id }

    /// Store the working copy back.
    pub fn commit(self) -> Result<()> {
        let mut sessions = self.store.sessions.lock().map_err(
            |_| anyhow!("session store lock poisoned"))?;
        sessions.insert(self.id, Entry {
            fields: self.fields,
            last_access: Instant::now(),
        });
        Ok(())
    }
}

impl<'s> FieldSource for ASession<'s> {
    fn field(&self, name: &str) -> Option<KString> {
        self.fields.field(name)
    }

    fn field_list(&self, name: &str) -> Vec<KString> {
        self.fields.field_list(name)
    }
}

impl<'s> SessionStorage for ASession<'s> {
    fn set(&mut self, key: &str, value: KString) {
        self.fields.set(key, value)
    }

    fn remove(&mut self, key: &str) {
        self.fields.remove(key)
    }
}
