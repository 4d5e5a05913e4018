//! Adapter – Mitgliedschaft, Abonnement-Lebenszyklus und Broadcast
//!
//! Jeder Prozess haelt genau eine Adapter-Instanz. Mitgliedschaft lebt im
//! geteilten Store (Mitglieder-Set pro Raum plus Umkehrindex pro Socket),
//! Broadcasts laufen ueber die Raum-Kanaele des Pub/Sub-Kollaborateurs.
//!
//! ## Konsistenzmodell
//! Die beiden Seiten der Mitgliedschaft werden als getrennte Operationen
//! geschrieben und sind nicht atomar konsistent; kurze Divergenz wird
//! toleriert, dauerhafte nie. Kein verteiltes Lock serialisiert das
//! Aufraeumen leerer Raeume – es muss redundant ausfuehrbar sein.

use futures_util::future;
use raumfunk_core::{schluessel, Paket, RaumName, RaumfunkError, Result, SocketId};
use raumfunk_store::{KanalNachricht, PubSub, SharedStore};
use serde_json::Value;
use std::sync::Arc;

use crate::dispatcher::Dispatcher;
use crate::listener::kanal_listener_starten;
use crate::metrics::AdapterMetrics;
use crate::registry::{AboRegister, AboZustand};
use crate::verzeichnis::SocketVerzeichnis;

// ---------------------------------------------------------------------------
// BroadcastOptionen
// ---------------------------------------------------------------------------

/// Zieloptionen eines Broadcasts
#[derive(Debug, Clone, Default)]
pub struct BroadcastOptionen {
    /// Zielraeume; leer bedeutet den degradierten lokalen Fallback
    pub raeume: Vec<RaumName>,
    /// Socket-IDs, die von der Zustellung ausgenommen sind
    pub ausser: Vec<SocketId>,
    /// Opakes Flag-Objekt – wird mitgefuehrt, nie interpretiert
    pub flags: Option<Value>,
}

impl BroadcastOptionen {
    /// Optionen fuer einen Broadcast an die angegebenen Raeume
    pub fn fuer_raeume(raeume: impl IntoIterator<Item = RaumName>) -> Self {
        Self {
            raeume: raeume.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Schliesst die angegebenen Sockets von der Zustellung aus
    pub fn ausser(mut self, ids: impl IntoIterator<Item = SocketId>) -> Self {
        self.ausser.extend(ids);
        self
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Prozessuebergreifender Raum-Broadcast-Adapter
///
/// Generisch ueber den geteilten Store `S`, den Pub/Sub-Kollaborateur `P`
/// und das Socket-Verzeichnis `V` der Verbindungsschicht.
pub struct Adapter<S, P, V> {
    store: Arc<S>,
    pubsub: Arc<P>,
    dispatcher: Dispatcher<V>,
    /// Prozess-lokales Abo-Register; lebt und stirbt mit dieser Instanz
    abos: AboRegister,
    metrics: AdapterMetrics,
}

impl<S, P, V> Adapter<S, P, V>
where
    S: SharedStore + 'static,
    P: PubSub + 'static,
    V: SocketVerzeichnis + 'static,
{
    /// Erstellt einen neuen Adapter ueber den angegebenen Kollaborateuren
    pub fn neu(store: Arc<S>, pubsub: Arc<P>, verzeichnis: Arc<V>) -> Result<Self> {
        let metrics = AdapterMetrics::neu()?;
        Ok(Self {
            store,
            pubsub,
            dispatcher: Dispatcher::neu(verzeichnis),
            abos: AboRegister::neu(),
            metrics,
        })
    }

    /// Fuegt einen Socket einem Raum hinzu
    ///
    /// Traegt den Socket ins Mitglieder-Set des Raums und den Raum in die
    /// Raumliste des Sockets ein (zwei unabhaengige, idempotente
    /// Operationen). Beim ersten lokalen Beitritt zu einem Raum wird der
    /// Raum-Kanal abonniert – exactly-once pro Prozess und Raum.
    pub async fn beitreten(&self, id: &SocketId, raum: &RaumName) -> Result<()> {
        eingabe_pruefen(id, raum)?;

        if self.abos.vormerken(raum) {
            let kanal = schluessel::raum_kanal(raum);
            match self.pubsub.subscribe(&kanal).await {
                Ok(empfaenger) => {
                    let handle = kanal_listener_starten(
                        raum.clone(),
                        self.store.clone(),
                        self.dispatcher.clone(),
                        self.metrics.clone(),
                        empfaenger,
                    );
                    if let Some(verwaist) = self.abos.aktivieren(raum, handle) {
                        // Ein paralleler Austritt hat den leeren Raum
                        // waehrend des Subscribe abgebaut: den gerade
                        // gestarteten Listener wieder einsammeln. Der
                        // naechste lokale Beitritt abonniert neu.
                        verwaist.abort();
                        let _ = verwaist.await;
                        self.pubsub.unsubscribe(&kanal).await?;
                        tracing::debug!(raum = %raum, "Abo waehrend Aufbau abgebaut");
                    } else {
                        self.metrics.abos_aktiv.inc();
                        tracing::debug!(raum = %raum, "Raum-Kanal abonniert");
                    }
                }
                Err(fehler) => {
                    // Vormerkung zuruecknehmen, sonst bleibt der Raum
                    // dauerhaft ohne Listener als abonniert markiert
                    self.abos.austragen(raum);
                    return Err(fehler);
                }
            }
        }

        self.store
            .set_hinzufuegen(&schluessel::raum_schluessel(raum), id.as_str())
            .await?;
        self.store
            .set_hinzufuegen(&schluessel::socket_schluessel(id), raum.as_str())
            .await?;

        tracing::debug!(socket_id = %id, raum = %raum, "Raum beigetreten");
        Ok(())
    }

    /// Entfernt einen Socket aus einem Raum
    ///
    /// Liest danach das Mitglieder-Set neu; ist es leer, wird das Abo
    /// ausgetragen, der Kanal dekabonniert und der Set-Schluessel
    /// geloescht. Das Pruefen-dann-Aufraeumen ist nicht atomar mit dem
    /// Entfernen: ein paralleler Beitritt aus einem anderen Prozess kann
    /// dazwischen landen und einen unnoetigen Abbau-und-Wiederaufbau des
    /// Abonnements ausloesen. Das ist eine dokumentierte Luecke; das
    /// Aufraeumen ist redundant sicher und der naechste lokale Beitritt
    /// abonniert neu.
    pub async fn verlassen(&self, id: &SocketId, raum: &RaumName) -> Result<()> {
        eingabe_pruefen(id, raum)?;

        let raum_schluessel = schluessel::raum_schluessel(raum);
        self.store.set_entfernen(&raum_schluessel, id.as_str()).await?;
        self.store
            .set_entfernen(&schluessel::socket_schluessel(id), raum.as_str())
            .await?;

        // Leerung am Entscheidungspunkt neu lesen
        let mitglieder = self.store.set_mitglieder(&raum_schluessel).await?;
        if mitglieder.is_empty() {
            if let Some(AboZustand::Aktiv(handle)) = self.abos.austragen(raum) {
                self.metrics.abos_aktiv.dec();
                handle.abort();
                // Erst mit dem Task-Ende ist sein Empfaenger wirklich
                // fallen gelassen; sonst bleibt store-seitig ein
                // verwaister Kanal-Eintrag zurueck
                let _ = handle.await;
            }
            self.pubsub.unsubscribe(&schluessel::raum_kanal(raum)).await?;
            self.store.set_loeschen(&raum_schluessel).await?;
            tracing::debug!(raum = %raum, "Leeren Raum abgebaut");
        }

        tracing::debug!(socket_id = %id, raum = %raum, "Raum verlassen");
        Ok(())
    }

    /// Entfernt einen Socket aus allen Raeumen, denen er beigetreten ist
    ///
    /// Schlaegt als Ganzes fehl wenn die Raumliste nicht lesbar ist; sonst
    /// laufen alle Einzel-Austritte nebenlaeufig zu Ende und der erste
    /// Fehler wird gemeldet.
    pub async fn alle_verlassen(&self, id: &SocketId) -> Result<()> {
        let socket_schluessel = schluessel::socket_schluessel(id);
        let raeume = self
            .store
            .set_mitglieder(&socket_schluessel)
            .await
            .map_err(|fehler| RaumfunkError::MitgliederLesen(fehler.to_string()))?;

        let raeume: Vec<RaumName> = raeume.into_iter().map(RaumName::from).collect();
        let austritte = raeume.iter().map(|raum| self.verlassen(id, raum));
        let ergebnisse = future::join_all(austritte).await;

        tracing::debug!(socket_id = %id, raeume = raeume.len(), "Alle Raeume verlassen");
        ergebnisse.into_iter().collect::<Result<Vec<()>>>().map(|_| ())
    }

    /// Setzt einen Broadcast ab
    ///
    /// Mit Zielraeumen wird pro Raum eine `{except, packet}`-Nachricht auf
    /// dem Raum-Kanal veroeffentlicht – fire-and-forget, ohne Garantie,
    /// dass der Raum bei Ankunft noch Mitglieder hat. Publish-Fehler
    /// erreichen den Aufrufer nicht; sie sind nur ueber Log und Metriken
    /// beobachtbar.
    ///
    /// Ohne Zielraeume greift der degradierte Fallback: eine Suche ueber
    /// die Socket-Raumlisten-Schluessel mit lokaler Zustellung. Der
    /// erreicht nur Sockets dieses Prozesses und skaliert nicht – eine
    /// dokumentierte, dauerhafte Grenze des Ansatzes, kein Versehen.
    pub async fn broadcast(&self, paket: Paket, optionen: BroadcastOptionen) -> Result<()> {
        self.metrics.broadcasts_total.inc();

        if !optionen.raeume.is_empty() {
            let nachricht = KanalNachricht {
                ausser: optionen.ausser.clone(),
                paket,
            };
            for raum in &optionen.raeume {
                let kanal = schluessel::raum_kanal(raum);
                if let Err(fehler) = self.pubsub.publish(&kanal, nachricht.clone()).await {
                    self.metrics.publish_fehler_total.inc();
                    tracing::warn!(raum = %raum, fehler = %fehler, "Publish fehlgeschlagen");
                }
            }
            return Ok(());
        }

        tracing::debug!("Broadcast ohne Zielraeume – degradierter lokaler Fallback");
        let treffer = self
            .store
            .schluessel_suchen(schluessel::SOCKET_WILDCARD)
            .await?;

        let ids: Vec<SocketId> = treffer
            .iter()
            .filter_map(|eintrag| schluessel::socket_id_aus_schluessel(eintrag))
            .collect();
        let zugestellt = self.dispatcher.fanout(&ids, &paket, &optionen.ausser);
        self.metrics.zustellungen_total.inc_by(zugestellt as u64);

        Ok(())
    }

    /// Liest die Raumliste eines Sockets aus dem geteilten Store
    pub async fn raeume_von(&self, id: &SocketId) -> Result<Vec<RaumName>> {
        let mitglieder = self
            .store
            .set_mitglieder(&schluessel::socket_schluessel(id))
            .await?;
        Ok(mitglieder.into_iter().map(RaumName::from).collect())
    }

    /// Liest das Mitglieder-Set eines Raums aus dem geteilten Store
    pub async fn mitglieder_von(&self, raum: &RaumName) -> Result<Vec<SocketId>> {
        let mitglieder = self
            .store
            .set_mitglieder(&schluessel::raum_schluessel(raum))
            .await?;
        Ok(mitglieder.into_iter().map(SocketId::from).collect())
    }

    /// Prueft ob dieser Prozess den Raum-Kanal abonniert hat
    pub fn ist_abonniert(&self, raum: &RaumName) -> bool {
        self.abos.ist_abonniert(raum)
    }

    /// Gibt die Metriken dieser Adapter-Instanz zurueck
    pub fn metrics(&self) -> &AdapterMetrics {
        &self.metrics
    }
}

/// Prueft die Vorbedingung nicht-leerer Identifikatoren
fn eingabe_pruefen(id: &SocketId, raum: &RaumName) -> Result<()> {
    if id.as_str().is_empty() {
        return Err(RaumfunkError::UngueltigeEingabe(
            "Socket-ID darf nicht leer sein".into(),
        ));
    }
    if raum.as_str().is_empty() {
        return Err(RaumfunkError::UngueltigeEingabe(
            "Raumname darf nicht leer sein".into(),
        ));
    }
    Ok(())
}
