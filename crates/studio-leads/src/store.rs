//! Lead Storage
//!
//! Submissions are recorded behind a trait so operations can swap in a
//! real database without touching the handlers.

use std::sync::RwLock;

use crate::error::Result;
use crate::form::Lead;

/// Lead storage
pub trait LeadStore: Send + Sync {
    /// Record a validated submission
    fn save(&self, lead: Lead) -> Result<()>;

    /// All submissions, newest first
    fn all(&self) -> Result<Vec<Lead>>;
}

/// In-memory lead store
pub struct MemoryLeadStore {
    leads: RwLock<Vec<Lead>>,
}

impl Default for MemoryLeadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self {
            leads: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.leads.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LeadStore for MemoryLeadStore {
    fn save(&self, lead: Lead) -> Result<()> {
        tracing::info!(kind = ?lead.kind, name = %lead.name, "Saved lead");
        self.leads.write().unwrap().push(lead);
        Ok(())
    }

    fn all(&self) -> Result<Vec<Lead>> {
        let mut leads = self.leads.read().unwrap().clone();
        leads.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(leads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{LeadIntake, LeadKind};
    use chrono::Utc;

    #[test]
    fn saves_and_orders_newest_first() {
        let store = MemoryLeadStore::new();
        let now = Utc::now();
        for (i, name) in ["first", "second"].iter().enumerate() {
            let lead = Lead::from_intake(
                LeadIntake {
                    kind: LeadKind::Contact,
                    name: (*name).into(),
                    phone: "+380501234567".into(),
                    email: None,
                    details: None,
                    course_type: None,
                    experience: None,
                    topic: None,
                    message: None,
                },
                now + chrono::Duration::seconds(i as i64),
            )
            .unwrap();
            store.save(lead).unwrap();
        }

        let all = store.all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "second");
    }
}
