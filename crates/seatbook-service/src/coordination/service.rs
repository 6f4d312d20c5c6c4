//! Acquire, release, and confirm.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use seatbook_core::config::BookingConfig;
use seatbook_core::error::AppError;
use seatbook_core::events::ResourceEvent;
use seatbook_core::result::AppResult;
use seatbook_core::traits::{EventPublisher, LockStore};
use seatbook_core::types::id::BookingId;
use seatbook_core::types::resource::{ClientId, ResourceId, ResourceStatus};
use seatbook_database::ledger::BookingLedger;
use seatbook_entity::booking::{Booking, NewBooking};
use seatbook_entity::resource::{ResourceView, StatusSummary};

use super::outcome::{ContentionReason, Outcome};
use crate::context::RequestContext;
use crate::reconciler::RegistryReconciler;
use crate::registry::ResourceRegistry;

/// Coordinates holds and confirmations over the shared lock store.
///
/// The lock store decides every race. Registry updates and event
/// publication follow only from an observed lock store or ledger result,
/// once per successful transition.
#[derive(Clone)]
pub struct CoordinationService {
    locks: Arc<dyn LockStore>,
    ledger: Arc<dyn BookingLedger>,
    registry: Arc<ResourceRegistry>,
    publisher: Arc<dyn EventPublisher>,
    booking: BookingConfig,
}

impl std::fmt::Debug for CoordinationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinationService")
            .field("seats", &self.registry.len())
            .field("hold_ttl_seconds", &self.booking.hold_ttl_seconds)
            .finish()
    }
}

impl CoordinationService {
    /// Creates a new coordination service.
    pub fn new(
        locks: Arc<dyn LockStore>,
        ledger: Arc<dyn BookingLedger>,
        registry: Arc<ResourceRegistry>,
        publisher: Arc<dyn EventPublisher>,
        booking: BookingConfig,
    ) -> Self {
        Self {
            locks,
            ledger,
            registry,
            publisher,
            booking,
        }
    }

    /// A reconciler over the same stores, registry, and publisher.
    pub fn reconciler(&self) -> RegistryReconciler {
        RegistryReconciler::new(
            Arc::clone(&self.locks),
            Arc::clone(&self.ledger),
            Arc::clone(&self.registry),
            Arc::clone(&self.publisher),
        )
    }

    /// Place a hold on a seat for one of the caller's clients.
    pub async fn acquire(
        &self,
        ctx: &RequestContext,
        resource_id: &ResourceId,
        client_id: &ClientId,
    ) -> AppResult<Outcome> {
        let Some(holder) = ctx.holder_for(client_id) else {
            return Ok(Outcome::Unauthenticated);
        };
        self.ensure_known(resource_id)?;

        if self.is_allocated(resource_id).await {
            return Ok(Outcome::Contention {
                reason: ContentionReason::Allocated,
            });
        }

        let ttl = self.booking.hold_ttl();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::configuration(format!("Hold TTL of {}s is out of range", ttl.as_secs()))
            })?;

        if !self.locks.try_acquire(resource_id, &holder, ttl).await? {
            debug!(resource_id = %resource_id, holder_id = %holder, "Hold lost to existing lock");
            return Ok(Outcome::Contention {
                reason: ContentionReason::HeldByOther,
            });
        }

        // Another instance may have booked the seat since our last sweep.
        match self.ledger.find_by_resource(resource_id).await {
            Ok(Some(booking)) => {
                self.locks.release(resource_id).await?;
                info!(resource_id = %resource_id, booking_id = %booking.id, "Seat found already booked");
                self.record_allocation(resource_id, booking.id).await;
                return Ok(Outcome::Contention {
                    reason: ContentionReason::Allocated,
                });
            }
            Ok(None) => {}
            Err(e) => {
                warn!(resource_id = %resource_id, error = %e, "Ledger lookup failed; keeping hold");
            }
        }

        if !self.registry.mark_held(resource_id, holder.clone(), expires_at).await {
            self.locks.release(resource_id).await?;
            return Ok(Outcome::Contention {
                reason: ContentionReason::Allocated,
            });
        }

        info!(resource_id = %resource_id, holder_id = %holder, %expires_at, "Seat held");
        self.publisher.publish(ResourceEvent::held(*resource_id)).await;
        Ok(Outcome::Acquired { expires_at })
    }

    /// Clear the hold on a seat, whoever owns it.
    ///
    /// `client_id` identifies the caller's client for the log only.
    pub async fn release(
        &self,
        ctx: &RequestContext,
        resource_id: &ResourceId,
        client_id: Option<&ClientId>,
    ) -> AppResult<Outcome> {
        if ctx.identity.is_none() {
            return Ok(Outcome::Unauthenticated);
        }
        self.ensure_known(resource_id)?;

        if self.is_allocated(resource_id).await {
            return Ok(Outcome::Contention {
                reason: ContentionReason::Allocated,
            });
        }

        self.locks.release(resource_id).await?;
        if !self.registry.mark_available(resource_id).await {
            return Ok(Outcome::Contention {
                reason: ContentionReason::Allocated,
            });
        }

        let holder = client_id.and_then(|c| ctx.holder_for(c));
        info!(
            resource_id = %resource_id,
            holder_id = holder.as_ref().map(|h| h.as_str()).unwrap_or("-"),
            "Seat released"
        );
        self.publisher
            .publish(ResourceEvent::available(*resource_id))
            .await;
        Ok(Outcome::Released)
    }

    /// Turn the caller's live hold into a booking.
    pub async fn confirm(
        &self,
        ctx: &RequestContext,
        resource_id: &ResourceId,
        client_id: &ClientId,
    ) -> AppResult<Outcome> {
        let (Some(holder), Some(user_id)) = (ctx.holder_for(client_id), ctx.user_id()) else {
            return Ok(Outcome::Unauthenticated);
        };
        self.ensure_known(resource_id)?;

        if self.is_allocated(resource_id).await {
            return Ok(Outcome::Contention {
                reason: ContentionReason::Allocated,
            });
        }

        self.registry.begin_confirm(resource_id).await;
        let owned = match self.locks.release_if_owner(resource_id, &holder).await {
            Ok(owned) => owned,
            Err(e) => {
                self.registry.end_confirm(resource_id).await;
                return Err(e);
            }
        };
        if !owned {
            self.registry.end_confirm(resource_id).await;
            info!(resource_id = %resource_id, holder_id = %holder, "Confirm without live hold");
            return Ok(Outcome::OwnershipMismatch);
        }

        let new_booking = NewBooking::from_config(*resource_id, holder.clone(), user_id, &self.booking);
        match self.ledger.append(new_booking).await {
            Ok(booking) => {
                info!(
                    resource_id = %resource_id,
                    holder_id = %holder,
                    booking_id = %booking.id,
                    "Seat allocated"
                );
                self.record_allocation(resource_id, booking.id).await;
                Ok(Outcome::Confirmed {
                    booking_id: booking.id,
                })
            }
            Err(e) if e.is_conflict() => {
                warn!(resource_id = %resource_id, "Seat booked concurrently elsewhere");
                match self.ledger.find_by_resource(resource_id).await {
                    Ok(Some(existing)) => self.record_allocation(resource_id, existing.id).await,
                    _ => self.registry.end_confirm(resource_id).await,
                }
                Ok(Outcome::Contention {
                    reason: ContentionReason::Allocated,
                })
            }
            Err(e) => {
                error!(resource_id = %resource_id, error = %e, "Booking write failed after hold release");
                if self.registry.mark_available(resource_id).await {
                    self.publisher
                        .publish(ResourceEvent::available(*resource_id))
                        .await;
                }
                Ok(Outcome::PersistenceFailure { message: e.message })
            }
        }
    }

    /// Public view of every seat.
    pub async fn snapshot(&self) -> Vec<ResourceView> {
        self.registry.snapshot().await
    }

    /// Hands the public view of every seat to `f` with the registry locked.
    pub async fn snapshot_with<R>(&self, f: impl FnOnce(Vec<ResourceView>) -> R) -> R {
        self.registry.snapshot_with(f).await
    }

    /// Seat counts per status.
    pub async fn summary(&self) -> StatusSummary {
        self.registry.counts().await
    }

    /// A booking receipt, visible only to the user who made it.
    pub async fn receipt(&self, ctx: &RequestContext, booking_id: BookingId) -> AppResult<Booking> {
        let user_id = ctx
            .user_id()
            .ok_or_else(|| AppError::authentication("Authentication required"))?;

        self.ledger
            .find_for_user(booking_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))
    }

    /// Whether the seat is part of the inventory.
    pub fn contains(&self, resource_id: &ResourceId) -> bool {
        self.registry.contains(resource_id)
    }

    fn ensure_known(&self, resource_id: &ResourceId) -> AppResult<()> {
        if self.registry.contains(resource_id) {
            Ok(())
        } else {
            Err(AppError::not_found(format!("Unknown seat {resource_id}")))
        }
    }

    async fn is_allocated(&self, resource_id: &ResourceId) -> bool {
        self.registry.status(resource_id).await == Some(ResourceStatus::Allocated)
    }

    async fn record_allocation(&self, resource_id: &ResourceId, booking_id: BookingId) {
        if self.registry.mark_allocated(resource_id, booking_id).await {
            self.publisher
                .publish(ResourceEvent::allocated(*resource_id, booking_id))
                .await;
        }
    }
}
