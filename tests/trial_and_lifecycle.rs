//! Trial conversion, subscription cancellation cascade, and failed-payment
//! flows through the dispatcher.

mod common;

use common::harness;

use ledgerline::domain::billing::{
    AddOnSubscriptionStatus, BillingEvent, DomainEvent, InvoiceStatus, SubscriptionStatus,
};
use ledgerline::domain::foundation::{Money, Timestamp, UserId};
use ledgerline::ports::{
    AddOnSubscriptionRepository, InvoiceRepository, SubscriptionRepository,
};

#[tokio::test]
async fn trial_checkout_is_invoice_free() {
    let h = harness();
    let user = UserId::new();

    let result = h
        .dispatcher
        .emit(&DomainEvent::new(BillingEvent::CheckoutRequested {
            user_id: user,
            plan_id: Some(h.trial_plan.id),
            token_bundle_ids: vec![],
            add_on_ids: vec![],
            currency: "EUR".to_string(),
            payment_method_code: "card".to_string(),
        }))
        .await;
    assert!(result.is_success());

    let subscription = h
        .subscriptions
        .find_by_user(&user)
        .await
        .unwrap()
        .pop()
        .unwrap();
    assert_eq!(subscription.status, SubscriptionStatus::Trialing);
    assert_eq!(subscription.trial_end_at, subscription.expires_at);
    let trial_window = subscription
        .trial_end_at
        .unwrap()
        .duration_since(&subscription.started_at.unwrap());
    assert_eq!(trial_window.num_days(), 14);

    // Trial periods produce no line item: the invoice exists but is empty.
    let invoice = h.invoices.find_by_user(&user).await.unwrap().pop().unwrap();
    assert!(invoice.line_items.is_empty());
    assert_eq!(invoice.total_amount, Money::ZERO);
}

#[tokio::test]
async fn trial_sweep_then_capture_converts_the_trial() {
    let h = harness();
    let user = UserId::new();

    // Trial checkout, then force the trial into the past.
    h.dispatcher
        .emit(&DomainEvent::new(BillingEvent::CheckoutRequested {
            user_id: user,
            plan_id: Some(h.trial_plan.id),
            token_bundle_ids: vec![],
            add_on_ids: vec![],
            currency: "EUR".to_string(),
            payment_method_code: "card".to_string(),
        }))
        .await;
    let mut trial = h
        .subscriptions
        .find_by_user(&user)
        .await
        .unwrap()
        .pop()
        .unwrap();
    trial.trial_end_at = Some(Timestamp::now().add_days(-1));
    trial.expires_at = trial.trial_end_at;
    h.subscriptions.save(&trial).await.unwrap();

    // Sweep lapses the trial and opens the paid path.
    let conversions = h.subscription_service.expire_trials().await.unwrap();
    assert_eq!(conversions.len(), 1);
    let conversion = &conversions[0];

    let lapsed = h
        .subscriptions
        .find_by_id(&conversion.expired_subscription_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lapsed.status, SubscriptionStatus::Expired);

    let renewal_invoice = h
        .invoices
        .find_by_id(&conversion.renewal_invoice_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renewal_invoice.status, InvoiceStatus::Pending);
    assert_eq!(renewal_invoice.total_amount, h.trial_plan.price);

    // Capturing the renewal invoice runs the ordinary activation saga.
    let result = h.capture(conversion.renewal_invoice_id, "pay_renewal").await;
    assert!(result.is_success(), "capture failed: {:?}", result.error);

    let active = h
        .subscriptions
        .find_active_by_user(&user)
        .await
        .unwrap()
        .expect("renewal activated");
    assert_eq!(active.id, conversion.renewal_subscription_id);
    assert_eq!(active.plan_id, h.trial_plan.id);
}

#[tokio::test]
async fn subscription_cancelled_event_cascades_to_addons() {
    let h = harness();
    let user = UserId::new();
    let invoice_id = common::checkout_invoice_id(&h.checkout(user).await);
    h.capture(invoice_id, "pay_001").await;

    let subscription = h
        .subscriptions
        .find_active_by_user(&user)
        .await
        .unwrap()
        .unwrap();

    let result = h
        .dispatcher
        .emit(&DomainEvent::new(BillingEvent::SubscriptionCancelled {
            subscription_id: subscription.id,
            user_id: user,
            reason: "user_requested".to_string(),
            provider: "card".to_string(),
        }))
        .await;
    assert!(result.is_success());
    assert_eq!(result.data["subscription_cancelled"]["cancelled"], true);

    let cancelled = h
        .subscriptions
        .find_by_id(&subscription.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);

    let addon = h
        .addon_subscriptions
        .find_by_subscription(&subscription.id)
        .await
        .unwrap()
        .pop()
        .unwrap();
    assert_eq!(addon.status, AddOnSubscriptionStatus::Cancelled);

    // A replayed cancellation converges as a no-op success.
    let replay = h
        .dispatcher
        .emit(&DomainEvent::new(BillingEvent::SubscriptionCancelled {
            subscription_id: subscription.id,
            user_id: user,
            reason: "user_requested".to_string(),
            provider: "card".to_string(),
        }))
        .await;
    assert!(replay.is_success());
    assert_eq!(replay.data["subscription_cancelled"]["cancelled"], false);
}

#[tokio::test]
async fn payment_failed_marks_open_invoices_then_late_capture_still_pays() {
    let h = harness();
    let user = UserId::new();
    let invoice_id = common::checkout_invoice_id(&h.checkout(user).await);

    let subscription = h
        .subscriptions
        .find_by_user(&user)
        .await
        .unwrap()
        .pop()
        .unwrap();

    let result = h
        .dispatcher
        .emit(&DomainEvent::new(BillingEvent::PaymentFailed {
            subscription_id: subscription.id,
            user_id: user,
            error_code: "card_declined".to_string(),
            error_message: "Insufficient funds".to_string(),
            provider: "card".to_string(),
        }))
        .await;
    assert!(result.is_success());

    let invoice = h.invoices.find_by_id(&invoice_id).await.unwrap().unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Failed);
    // Entitlements stay pending, nothing was activated.
    assert_eq!(
        h.subscriptions
            .find_by_id(&subscription.id)
            .await
            .unwrap()
            .unwrap()
            .status,
        SubscriptionStatus::Pending
    );

    // The provider retries and eventually succeeds: FAILED → PAID.
    let capture = h.capture(invoice_id, "pay_retry").await;
    assert!(capture.is_success());
    let invoice = h.invoices.find_by_id(&invoice_id).await.unwrap().unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert!(h
        .subscriptions
        .find_active_by_user(&user)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn unregistered_event_is_acknowledged() {
    let h = harness();
    // A dispatcher without the refund handler would simply acknowledge;
    // here we emit an event name nothing was registered under by building
    // a fresh dispatcher.
    let dispatcher = ledgerline::application::EventDispatcher::new();
    let result = dispatcher
        .emit(&DomainEvent::new(BillingEvent::PaymentFailed {
            subscription_id: ledgerline::domain::foundation::SubscriptionId::new(),
            user_id: UserId::new(),
            error_code: "x".to_string(),
            error_message: "y".to_string(),
            provider: "card".to_string(),
        }))
        .await;
    assert!(result.is_success());
    assert!(result.data.is_empty());
    drop(h);
}
