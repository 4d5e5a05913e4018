//! Socket-Verzeichnis – lokal verbundene Sockets und ihre Send-Queues
//!
//! Das Verzeichnis gehoert logisch der Verbindungsschicht: sie registriert
//! einen Socket beim Verbindungsaufbau und entfernt ihn beim Trennen. Der
//! Adapter schlaegt hier nur nach. Ein Socket, der nicht gefunden wird,
//! haengt an einem anderen Prozess oder ist getrennt – beides ist ein
//! erwarteter, kein aussergewoehnlicher Ausgang.

use dashmap::DashMap;
use raumfunk_core::{Paket, SocketId};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::AdapterConfig;

// ---------------------------------------------------------------------------
// SocketSender
// ---------------------------------------------------------------------------

/// Handle auf die Send-Queue eines lokal verbundenen Sockets
#[derive(Clone, Debug)]
pub struct SocketSender {
    pub id: SocketId,
    pub tx: mpsc::Sender<Paket>,
}

impl SocketSender {
    /// Reiht ein Paket nicht-blockierend in die Send-Queue ein
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    pub fn senden(&self, paket: Paket) -> bool {
        match self.tx.try_send(paket) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(socket_id = %self.id, "Send-Queue voll – Paket verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(socket_id = %self.id, "Send-Queue geschlossen (Socket getrennt)");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SocketVerzeichnis
// ---------------------------------------------------------------------------

/// Nachschlagen lokal verbundener Sockets
///
/// `None` bedeutet: dieser Prozess haelt den Socket nicht.
pub trait SocketVerzeichnis: Send + Sync {
    /// Sucht den Sender eines lokal verbundenen Sockets
    fn lookup(&self, id: &SocketId) -> Option<SocketSender>;
}

// ---------------------------------------------------------------------------
// VerbundeneSockets
// ---------------------------------------------------------------------------

/// Verzeichnis der lokal verbundenen Sockets
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct VerbundeneSockets {
    inner: Arc<VerbundeneSocketsInner>,
}

struct VerbundeneSocketsInner {
    /// Socket-Sender, indiziert nach SocketId
    sockets: DashMap<SocketId, SocketSender>,
    /// Groesse der Send-Queue pro Socket
    send_queue_groesse: usize,
}

impl VerbundeneSockets {
    /// Erstellt ein leeres Verzeichnis mit Standard-Konfiguration
    pub fn neu() -> Self {
        Self::mit_config(&AdapterConfig::default())
    }

    /// Erstellt ein leeres Verzeichnis mit der angegebenen Konfiguration
    pub fn mit_config(config: &AdapterConfig) -> Self {
        Self {
            inner: Arc::new(VerbundeneSocketsInner {
                sockets: DashMap::new(),
                send_queue_groesse: config.send_queue_groesse,
            }),
        }
    }

    /// Registriert einen Socket und gibt seine Empfangs-Queue zurueck
    ///
    /// Die Verbindungsschicht liest aus dieser Queue und schreibt auf den
    /// echten Transport.
    pub fn registrieren(&self, id: SocketId) -> mpsc::Receiver<Paket> {
        let (tx, rx) = mpsc::channel(self.inner.send_queue_groesse);
        let sender = SocketSender { id: id.clone(), tx };
        self.inner.sockets.insert(id.clone(), sender);
        tracing::debug!(socket_id = %id, "Socket im Verzeichnis registriert");
        rx
    }

    /// Entfernt einen Socket aus dem Verzeichnis (Verbindung getrennt)
    pub fn entfernen(&self, id: &SocketId) {
        self.inner.sockets.remove(id);
        tracing::debug!(socket_id = %id, "Socket aus Verzeichnis entfernt");
    }

    /// Prueft ob ein Socket lokal verbunden ist
    pub fn ist_verbunden(&self, id: &SocketId) -> bool {
        self.inner.sockets.contains_key(id)
    }

    /// Gibt die Anzahl lokal verbundener Sockets zurueck
    pub fn anzahl(&self) -> usize {
        self.inner.sockets.len()
    }
}

impl Default for VerbundeneSockets {
    fn default() -> Self {
        Self::neu()
    }
}

impl SocketVerzeichnis for VerbundeneSockets {
    fn lookup(&self, id: &SocketId) -> Option<SocketSender> {
        self.inner.sockets.get(id).map(|eintrag| eintrag.value().clone())
    }
}
