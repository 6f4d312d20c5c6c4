//! In-process cache of seat status.
//!
//! The lock store and the ledger are authoritative; the registry is a
//! read-through view of them, written only after an authoritative result
//! has been observed. The mutex is held for map access only.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use seatbook_core::types::id::BookingId;
use seatbook_core::types::resource::{HolderId, ResourceId, ResourceStatus};
use seatbook_entity::resource::{ResourceView, StatusSummary};

/// Cached state of one seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Last observed status.
    pub status: ResourceStatus,
    /// Holder of the current hold.
    pub holder: Option<HolderId>,
    /// When the current hold lapses, if known.
    pub expires_at: Option<DateTime<Utc>>,
    /// Booking behind an allocated seat.
    pub booking_id: Option<BookingId>,
    /// A confirmation of this hold is in flight on this instance.
    pub confirming: bool,
}

impl RegistryEntry {
    fn available() -> Self {
        Self {
            status: ResourceStatus::Available,
            holder: None,
            expires_at: None,
            booking_id: None,
            confirming: false,
        }
    }

    fn held(holder: HolderId, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            status: ResourceStatus::Held,
            holder: Some(holder),
            expires_at,
            booking_id: None,
            confirming: false,
        }
    }

    fn allocated(booking_id: BookingId) -> Self {
        Self {
            status: ResourceStatus::Allocated,
            holder: None,
            expires_at: None,
            booking_id: Some(booking_id),
            confirming: false,
        }
    }

    fn view(&self, resource_id: ResourceId) -> ResourceView {
        ResourceView {
            resource_id,
            status: self.status,
            held_until: self.expires_at,
        }
    }
}

/// Status cache for the fixed inventory.
#[derive(Debug)]
pub struct ResourceRegistry {
    /// Sorted, immutable inventory.
    ids: Vec<ResourceId>,
    entries: Mutex<BTreeMap<ResourceId, RegistryEntry>>,
}

impl ResourceRegistry {
    /// Create a registry with every seat available.
    pub fn new(ids: impl IntoIterator<Item = ResourceId>) -> Self {
        let entries: BTreeMap<ResourceId, RegistryEntry> = ids
            .into_iter()
            .map(|id| (id, RegistryEntry::available()))
            .collect();
        Self {
            ids: entries.keys().copied().collect(),
            entries: Mutex::new(entries),
        }
    }

    /// Whether the seat is part of the inventory.
    pub fn contains(&self, resource_id: &ResourceId) -> bool {
        self.ids.binary_search(resource_id).is_ok()
    }

    /// All seat ids, in order.
    pub fn ids(&self) -> &[ResourceId] {
        &self.ids
    }

    /// Number of seats.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the inventory is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Cached status of a seat.
    pub async fn status(&self, resource_id: &ResourceId) -> Option<ResourceStatus> {
        self.entries.lock().await.get(resource_id).map(|e| e.status)
    }

    /// Cached entry of a seat.
    pub async fn get(&self, resource_id: &ResourceId) -> Option<RegistryEntry> {
        self.entries.lock().await.get(resource_id).cloned()
    }

    /// Record a hold. Returns `false` if the seat is allocated or unknown.
    pub async fn mark_held(
        &self,
        resource_id: &ResourceId,
        holder: HolderId,
        expires_at: DateTime<Utc>,
    ) -> bool {
        self.update(resource_id, RegistryEntry::held(holder, Some(expires_at)))
            .await
    }

    /// Clear a hold. Returns `false` if the seat is allocated or unknown.
    pub async fn mark_available(&self, resource_id: &ResourceId) -> bool {
        self.update(resource_id, RegistryEntry::available()).await
    }

    /// Record an allocation. Returns `false` if the seat was already
    /// allocated or is unknown.
    pub async fn mark_allocated(&self, resource_id: &ResourceId, booking_id: BookingId) -> bool {
        self.update(resource_id, RegistryEntry::allocated(booking_id))
            .await
    }

    /// Flag a held seat as being confirmed. Reconciliation leaves flagged
    /// entries alone until the confirmation settles them.
    pub async fn begin_confirm(&self, resource_id: &ResourceId) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(resource_id) {
            if entry.status == ResourceStatus::Held {
                entry.confirming = true;
            }
        }
    }

    /// Clear the confirmation flag after a confirmation that changed nothing.
    pub async fn end_confirm(&self, resource_id: &ResourceId) {
        if let Some(entry) = self.entries.lock().await.get_mut(resource_id) {
            entry.confirming = false;
        }
    }

    /// Replace an entry only if it still equals `expected`.
    ///
    /// Used by reconciliation, which decides from an earlier copy and must
    /// not overwrite a transition made in the meantime. Allocated entries
    /// are never replaced.
    pub async fn replace_if(
        &self,
        resource_id: &ResourceId,
        expected: &RegistryEntry,
        status: ResourceStatus,
        holder: Option<HolderId>,
    ) -> bool {
        let next = match (status, holder) {
            (ResourceStatus::Available, _) => RegistryEntry::available(),
            (ResourceStatus::Held, Some(holder)) => RegistryEntry::held(holder, None),
            _ => return false,
        };

        let mut entries = self.entries.lock().await;
        match entries.get_mut(resource_id) {
            Some(entry) if entry == expected && !entry.status.is_terminal() => {
                *entry = next;
                true
            }
            _ => false,
        }
    }

    /// Copy of every entry, in seat order.
    pub async fn entries(&self) -> Vec<(ResourceId, RegistryEntry)> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|(id, entry)| (*id, entry.clone()))
            .collect()
    }

    /// Public view of every seat, in seat order.
    pub async fn snapshot(&self) -> Vec<ResourceView> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|(id, entry)| entry.view(*id))
            .collect()
    }

    /// Hands the public view to `f` while the registry is locked.
    ///
    /// No transition can land between taking the view and whatever `f` does
    /// with it, so a view queued from `f` is never newer than a later update
    /// queued after the transition.
    pub async fn snapshot_with<R>(&self, f: impl FnOnce(Vec<ResourceView>) -> R) -> R {
        let entries = self.entries.lock().await;
        let views = entries.iter().map(|(id, entry)| entry.view(*id)).collect();
        f(views)
    }

    /// Counts per status.
    pub async fn counts(&self) -> StatusSummary {
        self.entries
            .lock()
            .await
            .values()
            .map(|entry| entry.status)
            .collect()
    }

    async fn update(&self, resource_id: &ResourceId, next: RegistryEntry) -> bool {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(resource_id) {
            Some(entry) if !entry.status.is_terminal() => {
                *entry = next;
                true
            }
            _ => false,
        }
    }
}
