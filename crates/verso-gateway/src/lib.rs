//! Webhook gateway: article lifecycle events in, search index writes out.

mod controls;
mod error;
mod handlers;
mod payload;
mod router;
mod server;
mod service;

pub use controls::{ControlSource, Controls, FileControls, StaticControls, parse_slug_list};
pub use error::{ApiError, GatewayError};
pub use payload::WebhookPayload;
pub use server::GatewayServer;
pub use service::{IndexingService, PublishOutcome};
