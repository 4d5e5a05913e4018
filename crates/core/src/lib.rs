//! raumfunk-core – Gemeinsame Typen, Fehlertypen und Schluessel-Schema
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Raumfunk-Crates gemeinsam genutzt werden:
//! - Identifikationstypen (`SocketId`, `RaumName`)
//! - Der globale Fehler-Enum (`RaumfunkError`) samt `Result`-Alias
//! - Das Schluessel- und Kanal-Schema des geteilten Stores

pub mod error;
pub mod schluessel;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{RaumfunkError, Result};
pub use types::{Paket, RaumName, SocketId};
