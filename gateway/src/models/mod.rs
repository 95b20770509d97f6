// gateway/src/models/mod.rs

//! Data structures shared by the services, the checkout pipeline and the HTTP layer.

pub mod checkout;
pub mod event;
pub mod gateway_settings;
pub mod payable;
pub mod pending_order;
pub mod task;

pub use checkout::{CheckoutConfig, CheckoutRequest};
pub use event::{PaymentEvent, PaymentEventKind};
pub use gateway_settings::{Environment, GatewaySettings, RawGatewaySettings};
pub use payable::{ItemRef, Payable};
pub use pending_order::{normalize_price, NewPendingOrder, OrderStatus, PendingOrder};
pub use task::{AdhocTask, StatusCheckPayload, TaskIdentity, STATUS_CHECK_TASK};
