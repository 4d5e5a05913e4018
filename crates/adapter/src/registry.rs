//! Abo-Register – prozess-lokale Buchhaltung der Kanal-Abonnements
//!
//! Pro Raum und Prozess existiert hoechstens ein Abonnement. Das Register
//! ist ein explizites Feld einer Adapter-Instanz und wird mit ihr auf- und
//! abgebaut; beim Drop werden alle Listener-Tasks abgebrochen.
//!
//! Zustandsautomat pro Raum und Prozess:
//! `NICHT_ABONNIERT -> ABONNIERT` beim ersten lokalen Beitritt,
//! `ABONNIERT -> NICHT_ABONNIERT` wenn beim Verlassen das geteilte
//! Mitglieder-Set leer beobachtet wird. Andere Uebergaenge gibt es nicht.

use dashmap::DashMap;
use raumfunk_core::RaumName;
use tokio::task::JoinHandle;

/// Zustand eines Abo-Eintrags
///
/// `Vorgemerkt` deckt das Fenster zwischen dem Reservieren des Raums und
/// dem Abschluss des asynchronen Subscribe ab; so bleibt das Abonnieren
/// exactly-once pro Raum, ohne dass waehrenddessen ein Lock gehalten wird.
pub enum AboZustand {
    /// Abonnement wird gerade aufgebaut
    Vorgemerkt,
    /// Listener-Task laeuft
    Aktiv(JoinHandle<()>),
}

/// Prozess-lokales Register der abonnierten Raeume
pub struct AboRegister {
    eintraege: DashMap<RaumName, AboZustand>,
}

impl AboRegister {
    /// Erstellt ein leeres Register
    pub fn neu() -> Self {
        Self {
            eintraege: DashMap::new(),
        }
    }

    /// Merkt einen Raum zum Abonnieren vor
    ///
    /// Gibt `true` zurueck wenn der Raum weder abonniert noch vorgemerkt
    /// war – nur dann darf der Aufrufer das Abonnement aufbauen.
    pub fn vormerken(&self, raum: &RaumName) -> bool {
        use dashmap::mapref::entry::Entry;
        match self.eintraege.entry(raum.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(platz) => {
                platz.insert(AboZustand::Vorgemerkt);
                true
            }
        }
    }

    /// Hinterlegt den Listener-Task eines vorgemerkten Raums
    ///
    /// Gibt den Handle zurueck wenn der Eintrag inzwischen ausgetragen
    /// wurde (ein paralleler Austritt hat den leeren Raum abgebaut): der
    /// Aufrufer muss den verwaisten Listener dann selbst einsammeln,
    /// sonst laeuft er fuer immer ausserhalb des Registers weiter.
    #[must_use]
    pub fn aktivieren(
        &self,
        raum: &RaumName,
        handle: JoinHandle<()>,
    ) -> Option<JoinHandle<()>> {
        match self.eintraege.get_mut(raum) {
            Some(mut eintrag) => {
                *eintrag = AboZustand::Aktiv(handle);
                None
            }
            None => Some(handle),
        }
    }

    /// Traegt einen Raum aus und gibt den bisherigen Zustand zurueck
    ///
    /// Ein `Aktiv`-Zustand traegt den Listener-Task; der Aufrufer bricht
    /// ihn ab und wartet sein Ende ab. Redundantes Austragen ist sicher –
    /// mehrere Prozesse duerfen die Leerung desselben Raums gleichzeitig
    /// beobachten.
    pub fn austragen(&self, raum: &RaumName) -> Option<AboZustand> {
        self.eintraege.remove(raum).map(|(_, zustand)| zustand)
    }

    /// Prueft ob ein Raum abonniert oder vorgemerkt ist
    pub fn ist_abonniert(&self, raum: &RaumName) -> bool {
        self.eintraege.contains_key(raum)
    }

    /// Gibt die Anzahl abonnierter Raeume zurueck
    pub fn anzahl(&self) -> usize {
        self.eintraege.len()
    }

    /// Gibt alle abonnierten Raeume zurueck
    pub fn raeume(&self) -> Vec<RaumName> {
        self.eintraege
            .iter()
            .map(|eintrag| eintrag.key().clone())
            .collect()
    }
}

impl Default for AboRegister {
    fn default() -> Self {
        Self::neu()
    }
}

impl Drop for AboRegister {
    fn drop(&mut self) {
        self.eintraege.iter().for_each(|eintrag| {
            if let AboZustand::Aktiv(handle) = eintrag.value() {
                handle.abort();
            }
        });
    }
}
