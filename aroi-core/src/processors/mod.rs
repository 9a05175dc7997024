pub mod refund_notifier;

pub use refund_notifier::RefundNotifier;
