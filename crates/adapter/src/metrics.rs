//! Prometheus-Metriken des Adapters
//!
//! Registrierte Metriken:
//! - `raumfunk_broadcasts_total` – Counter: abgesetzte Broadcasts
//! - `raumfunk_publish_fehler_total` – Counter: fehlgeschlagene Publishes
//! - `raumfunk_zustellungen_total` – Counter: lokal zugestellte Pakete
//! - `raumfunk_abos_aktiv` – Gauge: aktuell abonnierte Raeume
//!
//! Broadcast bleibt fire-and-forget; Publish-Fehler sind fuer den Aufrufer
//! unsichtbar und nur ueber diese Metriken (und das Log) beobachtbar.

use anyhow::Result;
use prometheus::{IntCounter, IntGauge, Opts, Registry};
use std::sync::Arc;

/// Alle Raumfunk-Prometheus-Metriken
#[derive(Clone)]
pub struct AdapterMetrics {
    pub registry: Arc<Registry>,

    pub broadcasts_total: IntCounter,
    pub publish_fehler_total: IntCounter,
    pub zustellungen_total: IntCounter,
    pub abos_aktiv: IntGauge,
}

impl AdapterMetrics {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        let broadcasts_total = IntCounter::with_opts(Opts::new(
            "raumfunk_broadcasts_total",
            "Anzahl abgesetzter Broadcasts",
        ))?;
        registry.register(Box::new(broadcasts_total.clone()))?;

        let publish_fehler_total = IntCounter::with_opts(Opts::new(
            "raumfunk_publish_fehler_total",
            "Anzahl fehlgeschlagener Kanal-Publishes",
        ))?;
        registry.register(Box::new(publish_fehler_total.clone()))?;

        let zustellungen_total = IntCounter::with_opts(Opts::new(
            "raumfunk_zustellungen_total",
            "Anzahl lokal zugestellter Pakete",
        ))?;
        registry.register(Box::new(zustellungen_total.clone()))?;

        let abos_aktiv = IntGauge::with_opts(Opts::new(
            "raumfunk_abos_aktiv",
            "Anzahl aktuell abonnierter Raum-Kanaele",
        ))?;
        registry.register(Box::new(abos_aktiv.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            broadcasts_total,
            publish_fehler_total,
            zustellungen_total,
            abos_aktiv,
        })
    }
}
