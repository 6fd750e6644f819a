//! Payment context and the gateway collaborator.

mod context;
mod gateway;

pub use context::{OrderRef, PaymentContext, PaymentContextBuilder};
pub use gateway::{ManualGateway, PaymentGateway, PaymentResult, PaymentStatus};
