//! Dispatcher – Zustellung eines Pakets an einen lokal verbundenen Socket
//!
//! Der Dispatcher kennt nur das lokale Socket-Verzeichnis. Ausgeschlossene
//! IDs werden uebersprungen; IDs, die lokal nicht verbunden sind (anderer
//! Prozess oder getrennt), werden stillschweigend uebergangen.

use raumfunk_core::{Paket, SocketId};
use std::sync::Arc;

use crate::verzeichnis::SocketVerzeichnis;

/// Stellt Pakete an lokal verbundene Sockets zu
pub struct Dispatcher<V> {
    verzeichnis: Arc<V>,
}

impl<V> Clone for Dispatcher<V> {
    fn clone(&self) -> Self {
        Self {
            verzeichnis: self.verzeichnis.clone(),
        }
    }
}

impl<V: SocketVerzeichnis> Dispatcher<V> {
    /// Erstellt einen neuen Dispatcher ueber dem angegebenen Verzeichnis
    pub fn neu(verzeichnis: Arc<V>) -> Self {
        Self { verzeichnis }
    }

    /// Stellt ein Paket an einen Socket zu, sofern er lokal verbunden und
    /// nicht ausgeschlossen ist
    ///
    /// Gibt `true` zurueck wenn das Paket eingereiht wurde.
    pub fn senden(&self, id: &SocketId, paket: &Paket, ausser: &[SocketId]) -> bool {
        if ausser.contains(id) {
            return false;
        }
        match self.verzeichnis.lookup(id) {
            Some(sender) => sender.senden(paket.clone()),
            // Anderer Prozess oder getrennt – erwarteter Ausgang
            None => false,
        }
    }

    /// Stellt ein Paket an eine Liste von Sockets zu
    ///
    /// Gibt die Anzahl der erfolgreichen Zustellungen zurueck.
    pub fn fanout(&self, ids: &[SocketId], paket: &Paket, ausser: &[SocketId]) -> usize {
        ids.iter()
            .filter(|id| self.senden(id, paket, ausser))
            .count()
    }
}
