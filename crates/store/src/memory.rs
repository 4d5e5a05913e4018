//! In-Memory-Implementierung von SharedStore und PubSub
//!
//! Haelt Sets und Kanaele prozess-lokal in DashMaps. Mehrere Adapter,
//! die denselben `MemoryStore` klonen, teilen sich den inneren Zustand
//! und verhalten sich damit wie mehrere Prozesse auf einem gemeinsamen
//! Store. Die Set-Semantik folgt Redis: das Entfernen des letzten
//! Mitglieds loescht den Schluessel, fehlende Sets lesen sich leer.

use async_trait::async_trait;
use dashmap::DashMap;
use raumfunk_core::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::pubsub::{KanalNachricht, PubSub};
use crate::store::SharedStore;

// ---------------------------------------------------------------------------
// Konfiguration
// ---------------------------------------------------------------------------

/// Kapazitaet eines Raum-Kanals (Nachrichten)
const KANAL_KAPAZITAET: usize = 256;

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Prozess-lokaler Store mit Set- und Pub/Sub-Funktionalitaet
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Sets, indiziert nach Schluessel
    sets: DashMap<String, HashSet<String>>,
    /// Pub/Sub-Kanaele, indiziert nach Kanalname
    kanaele: DashMap<String, broadcast::Sender<KanalNachricht>>,
}

impl MemoryStore {
    /// Erstellt einen neuen, leeren MemoryStore
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(MemoryStoreInner {
                sets: DashMap::new(),
                kanaele: DashMap::new(),
            }),
        }
    }

    /// Gibt die Anzahl vorhandener Sets zurueck
    pub fn set_anzahl(&self) -> usize {
        self.inner.sets.len()
    }

    /// Prueft ob ein Set-Schluessel existiert
    pub fn schluessel_existiert(&self, schluessel: &str) -> bool {
        self.inner.sets.contains_key(schluessel)
    }

    /// Gibt die Anzahl vorhandener Kanal-Eintraege zurueck
    pub fn kanal_anzahl(&self) -> usize {
        self.inner.kanaele.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::neu()
    }
}

#[async_trait]
impl SharedStore for MemoryStore {
    async fn set_hinzufuegen(&self, schluessel: &str, mitglied: &str) -> Result<bool> {
        let neu = self
            .inner
            .sets
            .entry(schluessel.to_string())
            .or_default()
            .insert(mitglied.to_string());
        Ok(neu)
    }

    async fn set_entfernen(&self, schluessel: &str, mitglied: &str) -> Result<bool> {
        let mut entfernt = false;
        if let Some(mut eintrag) = self.inner.sets.get_mut(schluessel) {
            entfernt = eintrag.remove(mitglied);
        }
        // Redis-Semantik: leere Sets existieren nicht
        self.inner
            .sets
            .remove_if(schluessel, |_, set| set.is_empty());
        Ok(entfernt)
    }

    async fn set_mitglieder(&self, schluessel: &str) -> Result<Vec<String>> {
        let mitglieder = self
            .inner
            .sets
            .get(schluessel)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        Ok(mitglieder)
    }

    async fn set_loeschen(&self, schluessel: &str) -> Result<bool> {
        Ok(self.inner.sets.remove(schluessel).is_some())
    }

    async fn schluessel_suchen(&self, muster: &str) -> Result<Vec<String>> {
        let treffer = self
            .inner
            .sets
            .iter()
            .map(|eintrag| eintrag.key().clone())
            .filter(|schluessel| muster_passt(muster, schluessel))
            .collect();
        Ok(treffer)
    }
}

#[async_trait]
impl PubSub for MemoryStore {
    async fn publish(&self, kanal: &str, nachricht: KanalNachricht) -> Result<()> {
        if let Some(sender) = self.inner.kanaele.get(kanal) {
            // Kein Abonnent ist kein Fehler – fire-and-forget
            if sender.send(nachricht).is_err() {
                tracing::debug!(kanal = %kanal, "Publish ohne aktive Abonnenten");
            }
        } else {
            tracing::debug!(kanal = %kanal, "Publish auf unbekanntem Kanal verworfen");
        }
        Ok(())
    }

    async fn subscribe(&self, kanal: &str) -> Result<broadcast::Receiver<KanalNachricht>> {
        let empfaenger = self
            .inner
            .kanaele
            .entry(kanal.to_string())
            .or_insert_with(|| broadcast::channel(KANAL_KAPAZITAET).0)
            .subscribe();
        tracing::debug!(kanal = %kanal, "Kanal abonniert");
        Ok(empfaenger)
    }

    async fn unsubscribe(&self, kanal: &str) -> Result<()> {
        // Kanal-Eintrag nur aufraeumen wenn kein Prozess mehr lauscht
        self.inner
            .kanaele
            .remove_if(kanal, |_, sender| sender.receiver_count() == 0);
        tracing::debug!(kanal = %kanal, "Abonnement beendet");
        Ok(())
    }
}

/// Prueft ob ein Schluessel auf ein Muster mit hoechstens einem `*` passt
fn muster_passt(muster: &str, schluessel: &str) -> bool {
    match muster.split_once('*') {
        Some((praefix, suffix)) => {
            schluessel.len() >= praefix.len() + suffix.len()
                && schluessel.starts_with(praefix)
                && schluessel.ends_with(suffix)
        }
        None => muster == schluessel,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
