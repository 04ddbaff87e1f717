//! Order status state machine.
//!
//! The resource store persists statuses as display strings, historically
//! in a mix of English and Turkish. Deserialization accepts every
//! spelling observed in stored data; serialization always writes the
//! canonical Turkish form.
//!
//! Legal transitions:
//!
//! ```text
//! Pending ──▶ Shipped ──▶ Delivered (terminal)
//!    │
//!    └──▶ Cancelled (terminal, user-triggered)
//! ```

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// Only `Pending` orders may be cancelled; `Delivered` and `Cancelled`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, not yet handed to the carrier.
    #[default]
    #[serde(rename = "Hazırlanıyor", alias = "pending")]
    Pending,
    /// In transit. Stored data also spells this "processing".
    #[serde(rename = "Kargoda", alias = "processing", alias = "shipped")]
    Shipped,
    /// Delivered to the customer. Terminal.
    #[serde(rename = "Teslim Edildi", alias = "delivered")]
    Delivered,
    /// Cancelled by the customer. Terminal.
    #[serde(rename = "İptal Edildi", alias = "cancelled", alias = "Iptal Edildi")]
    Cancelled,
}

impl OrderStatus {
    /// Whether a cancellation request is legal from this state.
    ///
    /// Cancellation is only allowed while the order is still being
    /// prepared; anything already with the carrier (or terminal) must
    /// reject the request with a domain error, never a silent no-op.
    #[must_use]
    pub const fn can_cancel(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether this state admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Canonical wire spelling, as written back to the resource store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Hazırlanıyor",
            Self::Shipped => "Kargoda",
            Self::Delivered => "Teslim Edildi",
            Self::Cancelled => "İptal Edildi",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
