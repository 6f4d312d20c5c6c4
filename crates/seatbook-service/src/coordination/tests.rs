use std::sync::Arc;
use std::time::Duration;

use seatbook_core::config::BookingConfig;
use seatbook_core::error::ErrorKind;
use seatbook_core::traits::LockStore;
use seatbook_core::types::resource::ResourceStatus;
use seatbook_entity::booking::NewBooking;

use super::{ContentionReason, Outcome};
use crate::context::RequestContext;
use crate::testing::{Caller, FailingLedger, Harness, PausingLedger, seat};

const HELD_BY_OTHER: Outcome = Outcome::Contention {
    reason: ContentionReason::HeldByOther,
};
const ALLOCATED: Outcome = Outcome::Contention {
    reason: ContentionReason::Allocated,
};

fn past_ttl(h: &Harness) -> Duration {
    h.config.hold_ttl() + Duration::from_secs(1)
}

#[tokio::test]
async fn test_simultaneous_acquire_has_one_winner() {
    let h = Harness::new();
    let (alice, bob) = (Caller::new("alice"), Caller::new("bob"));
    let id = seat("C1-S1");

    let (a, b) = tokio::join!(
        h.service.acquire(&alice.ctx, &id, &alice.client),
        h.service.acquire(&bob.ctx, &id, &bob.client),
    );
    let outcomes = [a.expect("acquire"), b.expect("acquire")];

    let winners = outcomes.iter().filter(|o| o.is_success()).count();
    assert_eq!(winners, 1);
    assert!(outcomes.contains(&HELD_BY_OTHER));
    assert_eq!(
        h.publisher.statuses().await,
        vec![("C1-S1".to_string(), ResourceStatus::Held)]
    );
}

#[tokio::test]
async fn test_many_concurrent_acquirers_exclusive() {
    let h = Harness::new();
    let id = seat("C2-S2");

    let mut tasks = Vec::new();
    for i in 0..16 {
        let service = h.service.clone();
        tasks.push(tokio::spawn(async move {
            let caller = Caller::new(&format!("user{i}"));
            service
                .acquire(&caller.ctx, &id, &caller.client)
                .await
                .expect("acquire")
        }));
    }

    let mut acquired = 0;
    for task in tasks {
        if task.await.expect("join").is_success() {
            acquired += 1;
        }
    }
    assert_eq!(acquired, 1);
    assert_eq!(h.publisher.statuses().await.len(), 1);
    assert_eq!(h.registry.status(&id).await, Some(ResourceStatus::Held));
}

#[tokio::test(start_paused = true)]
async fn test_acquire_after_expiry_replaces_holder() {
    let h = Harness::new();
    let (alice, bob) = (Caller::new("alice"), Caller::new("bob"));
    let id = seat("C2-S4");

    let first = h.service.acquire(&alice.ctx, &id, &alice.client).await.expect("acquire");
    assert!(matches!(first, Outcome::Acquired { .. }));
    assert_eq!(
        h.service.acquire(&bob.ctx, &id, &bob.client).await.expect("acquire"),
        HELD_BY_OTHER
    );

    tokio::time::advance(past_ttl(&h)).await;

    let second = h.service.acquire(&bob.ctx, &id, &bob.client).await.expect("acquire");
    assert!(matches!(second, Outcome::Acquired { .. }));
    assert_eq!(h.locks.get_owner(&id).await.expect("owner"), Some(bob.holder()));
    assert_eq!(
        h.registry.get(&id).await.and_then(|e| e.holder),
        Some(bob.holder())
    );
    assert_eq!(h.publisher.statuses().await.len(), 2);
}

#[tokio::test]
async fn test_confirm_allocates_and_records_booking() {
    let h = Harness::new();
    let alice = Caller::new("alice");
    let id = seat("C3-S4");

    h.service.acquire(&alice.ctx, &id, &alice.client).await.expect("acquire");
    let outcome = h.service.confirm(&alice.ctx, &id, &alice.client).await.expect("confirm");

    let Outcome::Confirmed { booking_id } = outcome else {
        panic!("expected confirmation, got {outcome:?}");
    };

    let booking = h
        .ledger
        .find_by_resource(&id)
        .await
        .expect("lookup")
        .expect("booking exists");
    assert_eq!(booking.id, booking_id);
    assert_eq!(booking.holder_id, alice.holder().as_str());
    assert_eq!(booking.amount_cents, h.config.amount_cents);

    assert_eq!(h.locks.get_owner(&id).await.expect("owner"), None);
    assert_eq!(h.registry.status(&id).await, Some(ResourceStatus::Allocated));

    let events = h.publisher.events().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].status, ResourceStatus::Allocated);
    assert_eq!(events[1].booking_id, Some(booking_id));
}

#[tokio::test(start_paused = true)]
async fn test_stale_holder_cannot_confirm() {
    let h = Harness::new();
    let (alice, bob) = (Caller::new("alice"), Caller::new("bob"));
    let id = seat("C1-S3");

    h.service.acquire(&alice.ctx, &id, &alice.client).await.expect("acquire");
    tokio::time::advance(past_ttl(&h)).await;
    h.service.acquire(&bob.ctx, &id, &bob.client).await.expect("acquire");

    let outcome = h.service.confirm(&alice.ctx, &id, &alice.client).await.expect("confirm");
    assert_eq!(outcome, Outcome::OwnershipMismatch);

    assert_eq!(h.locks.get_owner(&id).await.expect("owner"), Some(bob.holder()));
    assert_eq!(h.registry.status(&id).await, Some(ResourceStatus::Held));
    assert!(h.ledger.find_by_resource(&id).await.expect("lookup").is_none());
    assert_eq!(
        h.publisher.statuses().await,
        vec![
            ("C1-S3".to_string(), ResourceStatus::Held),
            ("C1-S3".to_string(), ResourceStatus::Held),
        ]
    );
}

#[tokio::test]
async fn test_confirm_requires_own_client() {
    let h = Harness::new();
    let alice = Caller::new("alice");
    let other_tab = Caller {
        ctx: alice.ctx.clone(),
        client: "tab-2".parse().expect("client id"),
    };
    let id = seat("C1-S1");

    h.service.acquire(&alice.ctx, &id, &alice.client).await.expect("acquire");
    assert_eq!(
        h.service
            .confirm(&other_tab.ctx, &id, &other_tab.client)
            .await
            .expect("confirm"),
        Outcome::OwnershipMismatch
    );
}

#[tokio::test]
async fn test_allocation_is_terminal() {
    let h = Harness::new();
    let (alice, bob) = (Caller::new("alice"), Caller::new("bob"));
    let id = seat("C2-S1");

    h.service.acquire(&alice.ctx, &id, &alice.client).await.expect("acquire");
    h.service.confirm(&alice.ctx, &id, &alice.client).await.expect("confirm");
    let before = h.publisher.statuses().await.len();

    assert_eq!(h.service.acquire(&bob.ctx, &id, &bob.client).await.expect("acquire"), ALLOCATED);
    assert_eq!(
        h.service.release(&bob.ctx, &id, Some(&bob.client)).await.expect("release"),
        ALLOCATED
    );
    assert_eq!(h.service.confirm(&alice.ctx, &id, &alice.client).await.expect("confirm"), ALLOCATED);

    assert_eq!(h.registry.status(&id).await, Some(ResourceStatus::Allocated));
    assert_eq!(h.locks.get_owner(&id).await.expect("owner"), None);
    assert_eq!(h.publisher.statuses().await.len(), before);
}

#[tokio::test]
async fn test_release_clears_any_hold() {
    let h = Harness::new();
    let (alice, bob) = (Caller::new("alice"), Caller::new("bob"));
    let id = seat("C3-S1");

    h.service.acquire(&alice.ctx, &id, &alice.client).await.expect("acquire");
    let outcome = h.service.release(&bob.ctx, &id, None).await.expect("release");
    assert_eq!(outcome, Outcome::Released);

    assert_eq!(h.registry.status(&id).await, Some(ResourceStatus::Available));
    assert_eq!(
        h.service.confirm(&alice.ctx, &id, &alice.client).await.expect("confirm"),
        Outcome::OwnershipMismatch
    );
    assert_eq!(
        h.publisher.statuses().await,
        vec![
            ("C3-S1".to_string(), ResourceStatus::Held),
            ("C3-S1".to_string(), ResourceStatus::Available),
        ]
    );
}

#[tokio::test]
async fn test_release_of_free_seat_is_harmless() {
    let h = Harness::new();
    let alice = Caller::new("alice");
    let id = seat("C1-S2");

    let outcome = h.service.release(&alice.ctx, &id, Some(&alice.client)).await.expect("release");
    assert_eq!(outcome, Outcome::Released);
    assert_eq!(h.registry.status(&id).await, Some(ResourceStatus::Available));
}

#[tokio::test]
async fn test_anonymous_caller_touches_nothing() {
    let h = Harness::new();
    let anonymous = RequestContext::anonymous();
    let client = "tab-1".parse().expect("client id");
    let id = seat("C1-S1");

    assert_eq!(
        h.service.acquire(&anonymous, &id, &client).await.expect("acquire"),
        Outcome::Unauthenticated
    );
    assert_eq!(
        h.service.release(&anonymous, &id, None).await.expect("release"),
        Outcome::Unauthenticated
    );
    assert_eq!(
        h.service.confirm(&anonymous, &id, &client).await.expect("confirm"),
        Outcome::Unauthenticated
    );

    assert_eq!(h.locks.get_owner(&id).await.expect("owner"), None);
    assert!(h.publisher.statuses().await.is_empty());
}

#[tokio::test]
async fn test_unknown_seat_is_an_error() {
    let h = Harness::new();
    let alice = Caller::new("alice");

    let err = h
        .service
        .acquire(&alice.ctx, &seat("C9-S1"), &alice.client)
        .await
        .expect_err("outside inventory");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_ledger_failure_frees_seat() {
    let h = Harness::with_ledger(Arc::new(FailingLedger));
    let alice = Caller::new("alice");
    let id = seat("C2-S3");

    h.service.acquire(&alice.ctx, &id, &alice.client).await.expect("acquire");
    let outcome = h.service.confirm(&alice.ctx, &id, &alice.client).await.expect("confirm");

    assert!(matches!(outcome, Outcome::PersistenceFailure { .. }));
    assert_eq!(h.registry.status(&id).await, Some(ResourceStatus::Available));
    assert_eq!(h.locks.get_owner(&id).await.expect("owner"), None);
    assert_eq!(
        h.publisher.statuses().await,
        vec![
            ("C2-S3".to_string(), ResourceStatus::Held),
            ("C2-S3".to_string(), ResourceStatus::Available),
        ]
    );
}

#[tokio::test]
async fn test_acquire_detects_booking_from_other_instance() {
    let h = Harness::new();
    let (alice, bob) = (Caller::new("alice"), Caller::new("bob"));
    let id = seat("C1-S4");

    let user = alice.ctx.user_id().expect("user");
    h.ledger
        .append(NewBooking::from_config(id, alice.holder(), user, &h.config))
        .await
        .expect("append");

    assert_eq!(h.service.acquire(&bob.ctx, &id, &bob.client).await.expect("acquire"), ALLOCATED);
    assert_eq!(h.locks.get_owner(&id).await.expect("owner"), None);
    assert_eq!(h.registry.status(&id).await, Some(ResourceStatus::Allocated));
    assert_eq!(
        h.publisher.statuses().await,
        vec![("C1-S4".to_string(), ResourceStatus::Allocated)]
    );
}

#[tokio::test]
async fn test_receipt_scoped_to_owner() {
    let h = Harness::new();
    let (alice, bob) = (Caller::new("alice"), Caller::new("bob"));
    let id = seat("C3-S3");

    h.service.acquire(&alice.ctx, &id, &alice.client).await.expect("acquire");
    let Outcome::Confirmed { booking_id } =
        h.service.confirm(&alice.ctx, &id, &alice.client).await.expect("confirm")
    else {
        panic!("expected confirmation");
    };

    let receipt = h.service.receipt(&alice.ctx, booking_id).await.expect("receipt");
    assert_eq!(receipt.resource_id, "C3-S3");

    let err = h.service.receipt(&bob.ctx, booking_id).await.expect_err("foreign");
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = h
        .service
        .receipt(&RequestContext::anonymous(), booking_id)
        .await
        .expect_err("anonymous");
    assert_eq!(err.kind, ErrorKind::Authentication);
}

#[tokio::test]
async fn test_summary_tracks_transitions() {
    let h = Harness::new();
    let alice = Caller::new("alice");

    h.service.acquire(&alice.ctx, &seat("C1-S1"), &alice.client).await.expect("acquire");
    h.service.acquire(&alice.ctx, &seat("C1-S2"), &alice.client).await.expect("acquire");
    h.service.confirm(&alice.ctx, &seat("C1-S2"), &alice.client).await.expect("confirm");

    let summary = h.service.summary().await;
    assert_eq!(summary.total, 12);
    assert_eq!(summary.held, 1);
    assert_eq!(summary.allocated, 1);
    assert_eq!(summary.available, 10);
}

#[tokio::test]
async fn test_sweep_during_confirm_write_publishes_once() {
    let ledger = Arc::new(PausingLedger::after_write());
    let h = Harness::with_ledger(ledger.clone());
    let alice = Caller::new("alice");
    let id = seat("C3-S4");

    h.service.acquire(&alice.ctx, &id, &alice.client).await.expect("acquire");

    let reconciler = h.service.reconciler();
    let (outcome, report) = tokio::join!(h.service.confirm(&alice.ctx, &id, &alice.client), async {
        ledger.paused.notified().await;
        let report = reconciler.reconcile().await.expect("sweep");
        ledger.resume.notify_one();
        report
    });

    assert!(matches!(outcome.expect("confirm"), Outcome::Confirmed { .. }));
    assert_eq!(report.allocated, 1);
    assert_eq!(
        h.publisher.statuses().await,
        vec![
            ("C3-S4".to_string(), ResourceStatus::Held),
            ("C3-S4".to_string(), ResourceStatus::Allocated),
        ]
    );
}

#[tokio::test]
async fn test_sweep_before_confirm_write_keeps_hold() {
    let ledger = Arc::new(PausingLedger::before_write());
    let h = Harness::with_ledger(ledger.clone());
    let alice = Caller::new("alice");
    let id = seat("C2-S3");

    h.service.acquire(&alice.ctx, &id, &alice.client).await.expect("acquire");

    let reconciler = h.service.reconciler();
    let (outcome, report) = tokio::join!(h.service.confirm(&alice.ctx, &id, &alice.client), async {
        ledger.paused.notified().await;
        let report = reconciler.reconcile().await.expect("sweep");
        ledger.resume.notify_one();
        report
    });

    assert!(matches!(outcome.expect("confirm"), Outcome::Confirmed { .. }));
    assert!(!report.has_drift());
    assert_eq!(h.registry.status(&id).await, Some(ResourceStatus::Allocated));
    assert_eq!(
        h.publisher.statuses().await,
        vec![
            ("C2-S3".to_string(), ResourceStatus::Held),
            ("C2-S3".to_string(), ResourceStatus::Allocated),
        ]
    );
}

#[tokio::test]
async fn test_failed_confirm_leaves_hold_reconcilable() {
    let h = Harness::new();
    let (alice, bob) = (Caller::new("alice"), Caller::new("bob"));
    let id = seat("C1-S3");

    h.service.acquire(&alice.ctx, &id, &alice.client).await.expect("acquire");
    let outcome = h.service.confirm(&bob.ctx, &id, &bob.client).await.expect("confirm");
    assert_eq!(outcome, Outcome::OwnershipMismatch);

    let entry = h.registry.get(&id).await.expect("entry");
    assert_eq!(entry.status, ResourceStatus::Held);
    assert!(!entry.confirming);
}

#[tokio::test]
async fn test_oversized_ttl_rejected_before_locking() {
    let config = BookingConfig {
        hold_ttl_seconds: u64::MAX,
        ..BookingConfig::default()
    };
    let h = Harness::with_config(config);
    let alice = Caller::new("alice");
    let id = seat("C1-S2");

    let err = h
        .service
        .acquire(&alice.ctx, &id, &alice.client)
        .await
        .expect_err("ttl out of range");
    assert_eq!(err.kind, ErrorKind::Configuration);
    assert_eq!(h.locks.get_owner(&id).await.expect("owner"), None);
    assert_eq!(h.registry.status(&id).await, Some(ResourceStatus::Available));
    assert!(h.publisher.events().await.is_empty());
}
