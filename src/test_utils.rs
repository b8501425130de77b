//! Shared fixtures for service and handler tests.

use std::sync::Arc;

use chrono::Utc;

use crate::{
    clients::{
        Identity,
        mock::{CallLog, MockAuth, MockBilling, MockTransferNetwork},
    },
    codec::SharableIdCodec,
    models::{bank::Bank, user::User},
    state::AppState,
    store::memory::MemoryStore,
};

pub const CODEC_SECRET: &str = "test-codec-secret";

/// App state wired to mock collaborators, with handles kept for assertions.
pub struct TestHarness {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub auth: Arc<MockAuth>,
    pub billing: Arc<MockBilling>,
    pub transfers: Arc<MockTransferNetwork>,
    /// Undo calls across the store and every mock, in call order
    pub log: CallLog,
}

impl TestHarness {
    pub fn new() -> Self {
        let log = CallLog::default();
        let store = Arc::new(MemoryStore {
            log: log.clone(),
            ..Default::default()
        });
        let auth = Arc::new(MockAuth {
            log: log.clone(),
            ..Default::default()
        });
        let billing = Arc::new(MockBilling {
            log: log.clone(),
            ..Default::default()
        });
        let transfers = Arc::new(MockTransferNetwork::default());

        let state = AppState {
            store: store.clone(),
            auth: auth.clone(),
            billing: billing.clone(),
            transfers: transfers.clone(),
            codec: SharableIdCodec::new(CODEC_SECRET),
        };

        Self {
            state,
            store,
            auth,
            billing,
            transfers,
            log,
        }
    }

    /// Two users, each with one linked bank:
    /// `user_1` owns `bank_123`, `user_2` owns `bank_456` (account `acc_456`).
    pub fn with_two_banks() -> Self {
        let harness = Self::new();
        harness.store.insert_user(user("user_1", "identity_1"));
        harness.store.insert_user(user("user_2", "identity_2"));
        harness.store.insert_bank(bank("bank_123", "user_1", "acc_123"));
        harness.store.insert_bank(bank("bank_456", "user_2", "acc_456"));
        harness
    }

    /// Make every session secret resolve to `identity_id`.
    pub fn log_in_as(&self, identity_id: &str) {
        self.auth.set_current(Some(Identity {
            id: identity_id.to_string(),
            email: format!("{identity_id}@example.com"),
            name: "Test User".to_string(),
        }));
    }

    pub fn logged_calls(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }

    pub fn sharable_id(&self, account_id: &str) -> String {
        self.state.codec.encode(account_id)
    }
}

pub fn user(id: &str, identity_id: &str) -> User {
    User {
        id: id.to_string(),
        identity_id: identity_id.to_string(),
        name: "Test User".to_string(),
        email: format!("{id}@example.com"),
        billing_account_id: format!("acct_{id}"),
        transfer_customer_url: None,
        image_url: String::new(),
        created_at: Utc::now(),
    }
}

pub fn bank(id: &str, user_id: &str, account_id: &str) -> Bank {
    Bank {
        id: id.to_string(),
        user_id: user_id.to_string(),
        account_id: account_id.to_string(),
        funding_source_url: format!("https://transfers.test/funding-sources/{id}"),
        name: format!("Bank {id}"),
        current_balance_cents: 10_000,
        currency: "USD".to_string(),
        created_at: Utc::now(),
    }
}
