//! Shared test harness: in-memory adapters wired into the full saga stack.

use std::sync::Arc;

use ledgerline::adapters::memory::{
    InMemoryAddOnRepository, InMemoryAddOnSubscriptionRepository, InMemoryInvoiceRepository,
    InMemoryPlanRepository, InMemorySubscriptionRepository, InMemoryTokenBalanceRepository,
    InMemoryTokenBundlePurchaseRepository, InMemoryTokenBundleRepository,
    InMemoryTokenTransactionRepository,
};
use ledgerline::application::handlers::{
    CheckoutHandler, PaymentCapturedHandler, PaymentFailedHandler, PaymentRefundedHandler,
    RefundReversedHandler, SubscriptionCancelledHandler,
};
use ledgerline::application::services::{
    RefundService, RestoreService, SubscriptionService, TokenService,
};
use ledgerline::application::EventDispatcher;
use ledgerline::config::BillingConfig;
use ledgerline::domain::billing::{BillingEvent, DomainEvent, EventResult};
use ledgerline::domain::catalog::{AddOn, BillingPeriod, Plan, TokenBundle};
use ledgerline::domain::foundation::{AddOnId, InvoiceId, Money, PlanId, TokenBundleId, UserId};
use ledgerline::ports::{
    AddOnRepository, AddOnSubscriptionRepository, InvoiceRepository, PlanRepository,
    SubscriptionRepository, TokenBalanceRepository, TokenBundlePurchaseRepository,
    TokenBundleRepository, TokenTransactionRepository,
};

/// Everything a saga test needs: repositories, services, and a dispatcher
/// with all handlers registered the way the composition root does it.
pub struct Harness {
    pub dispatcher: EventDispatcher,

    pub invoices: Arc<InMemoryInvoiceRepository>,
    pub subscriptions: Arc<InMemorySubscriptionRepository>,
    pub purchases: Arc<InMemoryTokenBundlePurchaseRepository>,
    pub addon_subscriptions: Arc<InMemoryAddOnSubscriptionRepository>,
    pub transactions: Arc<InMemoryTokenTransactionRepository>,

    pub token_service: Arc<TokenService>,
    pub subscription_service: SubscriptionService,

    pub monthly_plan: Plan,
    pub trial_plan: Plan,
    pub bundle: TokenBundle,
    pub addon: AddOn,
}

pub fn harness() -> Harness {
    let monthly_plan = Plan::new(
        PlanId::new(),
        "Starter",
        Money::from_cents(2900),
        BillingPeriod::Monthly,
    );
    let trial_plan = Plan::new(
        PlanId::new(),
        "Pro",
        Money::from_cents(4900),
        BillingPeriod::Monthly,
    )
    .with_trial_days(14);
    let bundle = TokenBundle::new(
        TokenBundleId::new(),
        "500 pack",
        Money::from_cents(1000),
        500,
    );
    let addon = AddOn::new(AddOnId::new(), "Priority support", Money::from_cents(1500));

    let plans = Arc::new(InMemoryPlanRepository::with_plans(vec![
        monthly_plan.clone(),
        trial_plan.clone(),
    ]));
    let bundles = Arc::new(InMemoryTokenBundleRepository::with_bundles(vec![
        bundle.clone()
    ]));
    let addons = Arc::new(InMemoryAddOnRepository::with_addons(vec![addon.clone()]));

    let invoices = Arc::new(InMemoryInvoiceRepository::new());
    let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
    let purchases = Arc::new(InMemoryTokenBundlePurchaseRepository::new());
    let addon_subscriptions = Arc::new(InMemoryAddOnSubscriptionRepository::new());
    let balances = Arc::new(InMemoryTokenBalanceRepository::new());
    let transactions = Arc::new(InMemoryTokenTransactionRepository::new());

    let token_service = Arc::new(TokenService::new(
        Arc::clone(&balances) as Arc<dyn TokenBalanceRepository>,
        Arc::clone(&transactions) as Arc<dyn TokenTransactionRepository>,
    ));
    let refund_service = Arc::new(RefundService::new(
        Arc::clone(&invoices) as Arc<dyn InvoiceRepository>,
        Arc::clone(&subscriptions) as Arc<dyn SubscriptionRepository>,
        Arc::clone(&purchases) as Arc<dyn TokenBundlePurchaseRepository>,
        Arc::clone(&addon_subscriptions) as Arc<dyn AddOnSubscriptionRepository>,
        Arc::clone(&token_service),
    ));
    let restore_service = Arc::new(RestoreService::new(
        Arc::clone(&invoices) as Arc<dyn InvoiceRepository>,
        Arc::clone(&subscriptions) as Arc<dyn SubscriptionRepository>,
        Arc::clone(&plans) as Arc<dyn PlanRepository>,
        Arc::clone(&purchases) as Arc<dyn TokenBundlePurchaseRepository>,
        Arc::clone(&addon_subscriptions) as Arc<dyn AddOnSubscriptionRepository>,
        Arc::clone(&token_service),
    ));
    let subscription_service = SubscriptionService::new(
        Arc::clone(&subscriptions) as Arc<dyn SubscriptionRepository>,
        Arc::clone(&plans) as Arc<dyn PlanRepository>,
        Arc::clone(&invoices) as Arc<dyn InvoiceRepository>,
        BillingConfig::default(),
    );

    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(
        "checkout.requested",
        Arc::new(CheckoutHandler::new(
            Arc::clone(&plans) as Arc<dyn PlanRepository>,
            Arc::clone(&bundles) as Arc<dyn TokenBundleRepository>,
            Arc::clone(&addons) as Arc<dyn AddOnRepository>,
            Arc::clone(&subscriptions) as Arc<dyn SubscriptionRepository>,
            Arc::clone(&purchases) as Arc<dyn TokenBundlePurchaseRepository>,
            Arc::clone(&addon_subscriptions) as Arc<dyn AddOnSubscriptionRepository>,
            Arc::clone(&invoices) as Arc<dyn InvoiceRepository>,
        )),
    );
    dispatcher.register(
        "payment.captured",
        Arc::new(PaymentCapturedHandler::new(
            Arc::clone(&invoices) as Arc<dyn InvoiceRepository>,
            Arc::clone(&subscriptions) as Arc<dyn SubscriptionRepository>,
            Arc::clone(&plans) as Arc<dyn PlanRepository>,
            Arc::clone(&purchases) as Arc<dyn TokenBundlePurchaseRepository>,
            Arc::clone(&addon_subscriptions) as Arc<dyn AddOnSubscriptionRepository>,
            Arc::clone(&token_service),
        )),
    );
    dispatcher.register(
        "payment.refunded",
        Arc::new(PaymentRefundedHandler::new(Arc::clone(&refund_service))),
    );
    dispatcher.register(
        "refund.reversed",
        Arc::new(RefundReversedHandler::new(Arc::clone(&restore_service))),
    );
    dispatcher.register(
        "subscription.cancelled",
        Arc::new(SubscriptionCancelledHandler::new(
            Arc::clone(&subscriptions) as Arc<dyn SubscriptionRepository>,
            Arc::clone(&addon_subscriptions) as Arc<dyn AddOnSubscriptionRepository>,
        )),
    );
    dispatcher.register(
        "payment.failed",
        Arc::new(PaymentFailedHandler::new(
            Arc::clone(&invoices) as Arc<dyn InvoiceRepository>
        )),
    );

    Harness {
        dispatcher,
        invoices,
        subscriptions,
        purchases,
        addon_subscriptions,
        transactions,
        token_service,
        subscription_service,
        monthly_plan,
        trial_plan,
        bundle,
        addon,
    }
}

impl Harness {
    /// Full checkout for plan + bundle + add-on; returns the dispatch result.
    pub async fn checkout(&self, user: UserId) -> EventResult {
        self.dispatcher
            .emit(&DomainEvent::new(BillingEvent::CheckoutRequested {
                user_id: user,
                plan_id: Some(self.monthly_plan.id),
                token_bundle_ids: vec![self.bundle.id],
                add_on_ids: vec![self.addon.id],
                currency: "EUR".to_string(),
                payment_method_code: "card".to_string(),
            }))
            .await
    }

    /// Capture event for an invoice with a fixed reference.
    pub async fn capture(&self, invoice_id: InvoiceId, reference: &str) -> EventResult {
        self.dispatcher
            .emit(&DomainEvent::new(BillingEvent::PaymentCaptured {
                invoice_id,
                payment_reference: reference.to_string(),
                amount: Money::from_cents(5400),
                currency: "EUR".to_string(),
                provider: "card".to_string(),
                transaction_id: Some("txn_1".to_string()),
            }))
            .await
    }

    pub async fn refund(&self, invoice_id: InvoiceId, reference: &str) -> EventResult {
        self.dispatcher
            .emit(&DomainEvent::new(BillingEvent::PaymentRefunded {
                invoice_id,
                refund_reference: reference.to_string(),
            }))
            .await
    }

    pub async fn restore(&self, invoice_id: InvoiceId, reason: &str) -> EventResult {
        self.dispatcher
            .emit(&DomainEvent::new(BillingEvent::RefundReversed {
                invoice_id,
                reason: reason.to_string(),
            }))
            .await
    }
}

/// Pulls the invoice id out of a successful checkout result.
pub fn checkout_invoice_id(result: &EventResult) -> InvoiceId {
    result.data["checkout"]["invoice"]["id"]
        .as_str()
        .expect("checkout result carries invoice id")
        .parse()
        .expect("invoice id parses")
}
