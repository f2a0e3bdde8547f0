//! In-memory reference implementation of the storage contracts.
//!
//! Backs the test suite and demos. Clones share state through an inner
//! `Arc`, so the same store can serve as member store, payment ledger,
//! audit trail, and contact inbox at once.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};

use crate::{
    error::{CoreError, Result},
    lifecycle::SubscriptionTerm,
    member::{ActivityEntry, ContactSubmission, Member, MemberId, MemberStatus, PaymentRecord},
    store::traits::{AuditTrail, ContactInbox, MemberStore, PaymentLedger},
};

#[derive(Debug, Default)]
struct Inner {
    members: Mutex<HashMap<MemberId, Member>>,
    payments: Mutex<Vec<PaymentRecord>>,
    activity: Mutex<Vec<ActivityEntry>>,
    contacts: Mutex<Vec<ContactSubmission>>,
}

/// Thread-safe in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex.lock().map_err(|_| CoreError::Storage("store lock poisoned".to_owned()))
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every payment row, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the store lock is poisoned.
    pub fn payments(&self) -> Result<Vec<PaymentRecord>> {
        Ok(lock(&self.inner.payments)?.clone())
    }

    /// Returns a copy of every activity entry, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the store lock is poisoned.
    pub fn activity(&self) -> Result<Vec<ActivityEntry>> {
        Ok(lock(&self.inner.activity)?.clone())
    }

    /// Returns a copy of every member row, unordered.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the store lock is poisoned.
    pub fn members(&self) -> Result<Vec<Member>> {
        Ok(lock(&self.inner.members)?.values().cloned().collect())
    }
}

impl MemberStore for MemoryStore {
    fn fetch(&self, id: &MemberId) -> Result<Option<Member>> {
        Ok(lock(&self.inner.members)?.get(id).cloned())
    }

    fn insert(&self, member: Member) -> Result<()> {
        let mut members = lock(&self.inner.members)?;
        if members.contains_key(&member.id) {
            return Err(CoreError::Storage(format!("member already exists: {}", member.id)));
        }
        members.insert(member.id.clone(), member);
        Ok(())
    }

    fn update_subscription(
        &self,
        id: &MemberId,
        expected_end: Option<DateTime<Utc>>,
        package: &str,
        status: MemberStatus,
        term: SubscriptionTerm,
    ) -> Result<()> {
        let mut members = lock(&self.inner.members)?;
        let member = members
            .get_mut(id)
            .ok_or_else(|| CoreError::MemberNotFound(id.to_string()))?;
        if member.subscription_end_date != expected_end {
            return Err(CoreError::ConcurrentUpdate(id.to_string()));
        }
        member.package = package.to_owned();
        member.status = status;
        member.subscription_start_date = Some(term.start);
        member.subscription_end_date = Some(term.end);
        Ok(())
    }

    fn set_status(&self, id: &MemberId, status: MemberStatus) -> Result<()> {
        let mut members = lock(&self.inner.members)?;
        let member = members
            .get_mut(id)
            .ok_or_else(|| CoreError::MemberNotFound(id.to_string()))?;
        member.status = status;
        Ok(())
    }

    fn update_contact(
        &self,
        id: &MemberId,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<()> {
        let mut members = lock(&self.inner.members)?;
        let member = members
            .get_mut(id)
            .ok_or_else(|| CoreError::MemberNotFound(id.to_string()))?;
        member.name = name.to_owned();
        member.email = email.to_owned();
        member.phone = phone.map(str::to_owned);
        Ok(())
    }

    fn remove(&self, id: &MemberId) -> Result<()> {
        let mut members = lock(&self.inner.members)?;
        members
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CoreError::MemberNotFound(id.to_string()))
    }

    fn list_active_ending_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Member>> {
        let members = lock(&self.inner.members)?;
        let mut due: Vec<Member> = members
            .values()
            .filter(|m| {
                m.status == MemberStatus::Active
                    && m.subscription_end_date.is_some_and(|end| end < cutoff)
            })
            .cloned()
            .collect();
        due.sort_by_key(|m| m.subscription_end_date);
        Ok(due)
    }
}

impl PaymentLedger for MemoryStore {
    fn append(&self, record: PaymentRecord) -> Result<()> {
        lock(&self.inner.payments)?.push(record);
        Ok(())
    }
}

impl AuditTrail for MemoryStore {
    fn append(&self, entry: ActivityEntry) -> Result<()> {
        lock(&self.inner.activity)?.push(entry);
        Ok(())
    }
}

impl ContactInbox for MemoryStore {
    fn submit(&self, submission: ContactSubmission) -> Result<()> {
        lock(&self.inner.contacts)?.push(submission);
        Ok(())
    }

    fn mark_contacted(&self, index: usize) -> Result<()> {
        let mut contacts = lock(&self.inner.contacts)?;
        let submission = contacts
            .get_mut(index)
            .ok_or_else(|| CoreError::Storage(format!("no contact submission at index {index}")))?;
        submission.contacted = true;
        Ok(())
    }

    fn list(&self) -> Result<Vec<ContactSubmission>> {
        let mut contacts = lock(&self.inner.contacts)?.clone();
        contacts.reverse();
        Ok(contacts)
    }
}
