//! raumfunk-store – Koordinations-Substrat des Adapters
//!
//! Dieses Crate definiert die beiden externen Kollaborateure, ueber die
//! sich Prozesse koordinieren:
//! - `SharedStore`: Set-Operationen und Schluessel-Suche im geteilten Store
//! - `PubSub`: Publish/Subscribe auf benannten Kanaelen
//!
//! Dazu kommt `MemoryStore`, eine prozess-lokale Implementierung beider
//! Traits. Mehrere Adapter-Instanzen, die denselben `MemoryStore` teilen,
//! verhalten sich wie mehrere Prozesse auf einem gemeinsamen Store – das
//! ist das Test-Substrat und zugleich ein brauchbares Single-Node-Backend.

pub mod memory;
pub mod pubsub;
pub mod store;

// Bequeme Re-Exporte
pub use memory::MemoryStore;
pub use pubsub::{KanalNachricht, PubSub};
pub use store::SharedStore;
