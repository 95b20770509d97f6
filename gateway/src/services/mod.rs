// gateway/src/services/mod.rs

pub mod event_bus;
pub mod order_reconciler;
pub mod order_store;
pub mod payment_helper;
pub mod pg_order_store;
pub mod processor;
pub mod task_scheduler;
pub mod transaction_id;

pub use event_bus::EventBus;
pub use order_reconciler::{OrderReconciler, Reconciled};
pub use order_store::{InMemoryOrderStore, PendingOrderStore, ReconcileOutcome};
pub use payment_helper::{InMemoryPaymentHelper, PaymentHelper};
pub use pg_order_store::PgOrderStore;
pub use processor::{Mpay24Connector, ProcessorConnector, ProcessorSession, TokenizerHandle};
pub use task_scheduler::{InMemoryTaskQueue, PgTaskQueue, ScheduleOutcome, TaskScheduler};
