//! Adapter-Konfiguration
//!
//! Alle Felder haben sinnvolle Standardwerte; der Adapter ist ohne
//! explizite Konfiguration lauffaehig.

use serde::{Deserialize, Serialize};

/// Konfiguration des Adapters und des Socket-Verzeichnisses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Groesse der Send-Queue pro lokal verbundenem Socket (Pakete)
    pub send_queue_groesse: usize,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            send_queue_groesse: 64,
        }
    }
}
