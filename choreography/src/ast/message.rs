//! Message type definitions for choreographic protocols

use std::fmt;

/// Message type tag
///
/// Identifies the kind of message exchanged between two roles. Projection
/// only ever compares tags, so no payload schema is attached.
///
/// # Examples
///
/// ```
/// use rumpsteak_epp_choreography::MessageType;
///
/// let ping = MessageType::new("ping");
/// assert_eq!(ping.name(), "ping");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(transparent))]
pub struct MessageType {
    name: String,
}

impl MessageType {
    /// Create a message type with the given tag
    pub fn new(name: impl Into<String>) -> Self {
        MessageType { name: name.into() }
    }

    /// The message tag
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for MessageType {
    fn from(name: &str) -> Self {
        MessageType::new(name)
    }
}

impl From<String> for MessageType {
    fn from(name: String) -> Self {
        MessageType::new(name)
    }
}

impl From<&MessageType> for MessageType {
    fn from(message: &MessageType) -> Self {
        message.clone()
    }
}
