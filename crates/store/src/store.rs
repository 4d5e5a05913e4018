//! SharedStore-Trait – Set-Operationen im geteilten Store
//!
//! Der geteilte Store ist das einzige prozessuebergreifend geteilte
//! Speichermedium. Garantiert wird nur Atomaritaet pro Einzeloperation;
//! Transaktionen ueber mehrere Operationen gibt es nicht. Jede
//! Entscheidung, die vom "aktuellen" Zustand abhaengt, muss den Zustand
//! am Entscheidungspunkt neu lesen.

use async_trait::async_trait;
use raumfunk_core::Result;

/// Abstraktion ueber den geteilten Set-Store
///
/// Implementierungen muessen Redis-Semantik einhalten: ein Set, dessen
/// letztes Mitglied entfernt wird, existiert danach nicht mehr; das Lesen
/// eines fehlenden Sets liefert eine leere Liste, keinen Fehler.
#[async_trait]
pub trait SharedStore: Send + Sync {
    /// Fuegt ein Mitglied in ein Set ein
    ///
    /// Gibt `true` zurueck wenn das Mitglied neu war (idempotent).
    async fn set_hinzufuegen(&self, schluessel: &str, mitglied: &str) -> Result<bool>;

    /// Entfernt ein Mitglied aus einem Set
    ///
    /// Gibt `true` zurueck wenn das Mitglied vorhanden war.
    async fn set_entfernen(&self, schluessel: &str, mitglied: &str) -> Result<bool>;

    /// Liest alle Mitglieder eines Sets
    ///
    /// Ein fehlendes Set ergibt eine leere Liste.
    async fn set_mitglieder(&self, schluessel: &str) -> Result<Vec<String>>;

    /// Loescht ein Set samt Schluessel
    async fn set_loeschen(&self, schluessel: &str) -> Result<bool>;

    /// Sucht Schluessel nach einem Muster mit `*`-Platzhalter
    ///
    /// Dokumentiert nicht-skalierend: lineare Suche ueber den gesamten
    /// Schluesselraum. Wird nur vom degradierten Broadcast-Fallback genutzt.
    async fn schluessel_suchen(&self, muster: &str) -> Result<Vec<String>>;
}
