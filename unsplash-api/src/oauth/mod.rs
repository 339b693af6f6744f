//! Authorization-code flow and the consent UI capability.

mod consent;
mod flow;

pub use consent::{ChannelConsent, ConsentEvent, ConsentHandle, ConsentUi};
pub use flow::{AuthorizationFlow, AuthorizationRequest, FlowState, Navigation};
