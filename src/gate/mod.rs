//! Transmission gate: validation, rate limiting, and classification of
//! team messages.
//!
//! ## Checks
//!
//! Applied in order, first failure wins:
//!
//! 1. `Empty`: blank after trimming
//! 2. `TooLong`: more characters than the cap
//! 3. `QuotaExceeded`: the team has used its transmissions
//! 4. `Cooldown`: too soon after the team's last accepted message
//!
//! Accepted messages are classified by [`Classifier`], appended to the
//! team and global logs, and their tokens added to the team vocabulary.
//! [`directive::parse`] separately extracts resource requests and releases
//! for the controller.

mod classify;
pub mod directive;
#[allow(clippy::module_inception)]
mod gate;

pub use classify::{Classifier, ClassifierRule, MessageType, DEFAULT_RULES};
pub use directive::{Directive, ResourceHint};
pub use gate::{tokens, Channel, Message, Rejection, TransmissionGate, Verdict};
