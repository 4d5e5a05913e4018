//! PubSub-Trait – Publish/Subscribe auf benannten Kanaelen
//!
//! Zustellung ist fire-and-forget: kein Acknowledgement, keine Garantie,
//! dass ein Kanal zum Zeitpunkt der Zustellung noch Abonnenten (oder der
//! Raum noch Mitglieder) hat.

use async_trait::async_trait;
use raumfunk_core::{Paket, Result, SocketId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Nachricht auf einem Raum-Kanal
///
/// Die Feldnamen auf dem Draht (`except`, `packet`) sind Teil der
/// Wire-Kompatibilitaet zwischen Prozessen und bleiben stabil.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KanalNachricht {
    /// Socket-IDs, die von der Zustellung ausgenommen sind
    #[serde(rename = "except")]
    pub ausser: Vec<SocketId>,
    /// Opakes Paket, unveraendert weitergereicht
    #[serde(rename = "packet")]
    pub paket: Paket,
}

/// Abstraktion ueber den Publish/Subscribe-Kollaborateur
#[async_trait]
pub trait PubSub: Send + Sync {
    /// Veroeffentlicht eine Nachricht auf einem Kanal
    ///
    /// Ein Kanal ohne Abonnenten ist kein Fehler.
    async fn publish(&self, kanal: &str, nachricht: KanalNachricht) -> Result<()>;

    /// Abonniert einen Kanal und gibt den Empfaenger zurueck
    ///
    /// Mehrfaches Abonnieren desselben Kanals ist erlaubt und liefert
    /// unabhaengige Empfaenger.
    async fn subscribe(&self, kanal: &str) -> Result<broadcast::Receiver<KanalNachricht>>;

    /// Beendet das Abonnement dieses Prozesses auf einem Kanal
    ///
    /// Der zugehoerige Empfaenger muss vom Aufrufer selbst fallengelassen
    /// werden; `unsubscribe` raeumt nur store-seitige Buchhaltung auf.
    async fn unsubscribe(&self, kanal: &str) -> Result<()>;
}
