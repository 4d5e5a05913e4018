//! Fehlertypen fuer Raumfunk
//!
//! Zentraler Fehler-Enum der alle moeglichen Fehlerzustaende abdeckt.
//! Alle Fehler stammen letztlich von den externen Kollaborateuren
//! (geteilter Store, Pub/Sub); der Adapter selbst erzeugt keine eigenen
//! Fehlerquellen ausser der Eingabepruefung.

use thiserror::Error;

/// Globaler Result-Alias fuer Raumfunk
pub type Result<T> = std::result::Result<T, RaumfunkError>;

/// Alle moeglichen Fehler im Raumfunk-System
#[derive(Debug, Error)]
pub enum RaumfunkError {
    // --- Geteilter Store ---
    #[error("Store-Fehler: {0}")]
    Store(String),

    /// Das initiale Lesen der Raumliste eines Sockets ist fehlgeschlagen;
    /// `alle_verlassen` schlaegt dann als Ganzes fehl.
    #[error("Mitgliedschaft nicht lesbar: {0}")]
    MitgliederLesen(String),

    // --- Pub/Sub ---
    #[error("Pub/Sub-Fehler: {0}")]
    PubSub(String),

    // --- Eingaben ---
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    // --- Serialisierung der Kanal-Nachrichten ---
    #[error("Serialisierungsfehler: {0}")]
    Serialisierung(#[from] serde_json::Error),

    #[error("Unerwarteter Fehler: {0}")]
    Anyhow(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fehler_meldungen_lesbar() {
        let e = RaumfunkError::Store("Verbindung verloren".into());
        assert_eq!(e.to_string(), "Store-Fehler: Verbindung verloren");

        let e = RaumfunkError::MitgliederLesen("sockets:s1:rooms".into());
        assert!(e.to_string().contains("sockets:s1:rooms"));
    }
}
