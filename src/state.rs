//! Shared handles injected into every handler and service.

use std::sync::Arc;

use crate::{
    clients::{AuthProvider, BillingProvider, TransferNetwork},
    codec::SharableIdCodec,
    store::Store,
};

/// Long-lived collaborator handles.
///
/// Everything here is read-only after startup; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth: Arc<dyn AuthProvider>,
    pub billing: Arc<dyn BillingProvider>,
    pub transfers: Arc<dyn TransferNetwork>,
    pub codec: SharableIdCodec,
}
