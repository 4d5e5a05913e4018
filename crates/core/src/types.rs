//! Gemeinsame Identifikationstypen fuer Raumfunk
//!
//! Socket-IDs und Raumnamen verwenden das Newtype-Pattern um Verwechslungen
//! zwischen den beiden String-Arten zur Compilezeit auszuschliessen. Die
//! rohen Strings wandern unveraendert in die Store-Schluessel, deshalb
//! geben `Display` und `as_str` den Inhalt ohne Praefix aus.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opakes Paket – wird vom Adapter weitergereicht, nie inspiziert
pub type Paket = Bytes;

/// Eindeutige Socket-ID
///
/// Wird von der Verbindungsschicht vergeben und ist clusterweit eindeutig.
/// Der Adapter referenziert Sockets ausschliesslich ueber diese ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketId(pub String);

impl SocketId {
    /// Erstellt eine neue zufaellige SocketId (UUIDv4)
    pub fn neu() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Gibt die ID als String-Slice zurueck
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SocketId {
    fn default() -> Self {
        Self::neu()
    }
}

impl From<&str> for SocketId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SocketId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for SocketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name eines Raums
///
/// Raeume existieren nur implizit als Zustand im geteilten Store; der Name
/// ist der einzige Identifikator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaumName(pub String);

impl RaumName {
    /// Erstellt einen RaumName aus einem beliebigen String-artigen Wert
    pub fn neu(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Gibt den Namen als String-Slice zurueck
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RaumName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RaumName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for RaumName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
