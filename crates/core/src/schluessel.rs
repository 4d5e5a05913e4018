//! Schluessel- und Kanal-Schema des geteilten Stores
//!
//! Das Schema ist Teil der Wire-Kompatibilitaet zwischen Prozessen und
//! darf nicht veraendert werden:
//! - Mitglieder-Set eines Raums:  `rooms:<raum>:sockets`
//! - Raumliste eines Sockets:     `sockets:<id>:rooms`
//! - Pub/Sub-Kanal eines Raums:   `rooms:<raum>`

use crate::types::{RaumName, SocketId};

/// Suchmuster fuer alle Socket-Raumlisten (degradierter Broadcast-Fallback)
pub const SOCKET_WILDCARD: &str = "sockets:*:rooms";

/// Schluessel des Mitglieder-Sets eines Raums
pub fn raum_schluessel(raum: &RaumName) -> String {
    format!("rooms:{}:sockets", raum)
}

/// Schluessel der Raumliste eines Sockets (Umkehrindex)
pub fn socket_schluessel(id: &SocketId) -> String {
    format!("sockets:{}:rooms", id)
}

/// Name des Pub/Sub-Kanals eines Raums
pub fn raum_kanal(raum: &RaumName) -> String {
    format!("rooms:{}", raum)
}

/// Extrahiert die Socket-ID aus einem Raumlisten-Schluessel
///
/// Gibt `None` zurueck wenn der Schluessel nicht dem Schema
/// `sockets:<id>:rooms` entspricht.
pub fn socket_id_aus_schluessel(schluessel: &str) -> Option<SocketId> {
    let rest = schluessel.strip_prefix("sockets:")?;
    let id = rest.strip_suffix(":rooms")?;
    if id.is_empty() {
        return None;
    }
    Some(SocketId::from(id))
}
