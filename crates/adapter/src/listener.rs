//! Kanal-Listener – verwandelt Pub/Sub-Nachrichten in lokalen Fan-out
//!
//! Pro abonniertem Raum laeuft genau ein Listener-Task. Er liest die
//! Kanal-Nachrichten und stellt das Paket an alle lokal verbundenen
//! Mitglieder zu. Die Mitgliederliste wird zum Zustellzeitpunkt neu aus
//! dem Store gelesen – nie aus einem frueher gelesenen Wert. Ein leeres
//! oder fehlendes Set ist ein No-op: der Raum kann parallel abgebaut
//! worden sein.

use raumfunk_core::{schluessel, RaumName, SocketId};
use raumfunk_store::{KanalNachricht, SharedStore};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::dispatcher::Dispatcher;
use crate::metrics::AdapterMetrics;
use crate::verzeichnis::SocketVerzeichnis;

/// Startet den Listener-Task fuer einen Raum-Kanal
///
/// Der Task endet wenn der Kanal geschlossen wird oder er via
/// `AboRegister::austragen` abgebrochen wird.
pub(crate) fn kanal_listener_starten<S, V>(
    raum: RaumName,
    store: Arc<S>,
    dispatcher: Dispatcher<V>,
    metrics: AdapterMetrics,
    mut empfaenger: broadcast::Receiver<KanalNachricht>,
) -> JoinHandle<()>
where
    S: SharedStore + 'static,
    V: SocketVerzeichnis + 'static,
{
    tokio::spawn(async move {
        let raum_schluessel = schluessel::raum_schluessel(&raum);

        loop {
            let nachricht = match empfaenger.recv().await {
                Ok(nachricht) => nachricht,
                Err(broadcast::error::RecvError::Lagged(verpasst)) => {
                    tracing::warn!(
                        raum = %raum,
                        verpasst,
                        "Kanal-Listener hinkt hinterher – Nachrichten verworfen"
                    );
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            // Mitglieder am Entscheidungspunkt neu lesen
            let mitglieder = match store.set_mitglieder(&raum_schluessel).await {
                Ok(mitglieder) => mitglieder,
                Err(fehler) => {
                    tracing::warn!(
                        raum = %raum,
                        fehler = %fehler,
                        "Mitglieder nicht lesbar – Nachricht verworfen"
                    );
                    continue;
                }
            };

            // Raum evtl. parallel abgebaut – kein Fehler
            if mitglieder.is_empty() {
                continue;
            }

            let ids: Vec<SocketId> = mitglieder.into_iter().map(SocketId::from).collect();
            let zugestellt = dispatcher.fanout(&ids, &nachricht.paket, &nachricht.ausser);
            metrics.zustellungen_total.inc_by(zugestellt as u64);

            tracing::trace!(raum = %raum, zugestellt, "Fan-out abgeschlossen");
        }

        tracing::debug!(raum = %raum, "Kanal-Listener beendet");
    })
}
