//! Ticket token handling
//!
//! The codec produces and parses the opaque token embedded in QR tickets;
//! the renderer turns a token into a scannable image URL.

pub mod codec;
pub mod visual;

pub use codec::{TicketClaims, issue, is_well_formed, parse};
pub use visual::TicketRenderer;
