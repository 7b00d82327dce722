//! Ticket visual rendering
//!
//! Builds the URL of a scannable QR image for a ticket token. The image
//! itself is produced by an external renderer; this side only ever needs the
//! token string.

use crate::config::TicketConfig;

#[derive(Debug, Clone)]
pub struct TicketRenderer {
    config: TicketConfig,
}

impl TicketRenderer {
    pub fn new(config: TicketConfig) -> Self {
        Self { config }
    }

    /// QR image URL embedding the urlencoded token
    pub fn qr_image_url(&self, token: &str) -> String {
        format!(
            "{}?size={}&text={}",
            self.config.qr_render_url,
            self.config.qr_image_size,
            urlencoding::encode(token)
        )
    }
}
