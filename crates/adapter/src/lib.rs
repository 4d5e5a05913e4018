//! raumfunk-adapter – Prozessuebergreifender Raum-Broadcast
//!
//! Viele unabhaengige Serverprozesse, jeder mit einer disjunkten Menge
//! lebender Verbindungen, teilen sich ueber einen gemeinsamen Store eine
//! logische Vorstellung von "Raeumen" und koennen ein Paket an alle
//! Mitglieder eines Raums senden – egal welcher Prozess die Verbindung
//! haelt.
//!
//! Dieses Crate implementiert:
//! - `Adapter`: Mitgliedschaft (`beitreten`/`verlassen`/`alle_verlassen`)
//!   und `broadcast`
//! - `AboRegister`: prozess-lokale Abonnement-Buchhaltung
//! - Kanal-Listener: Pub/Sub-Nachricht wird zu lokalem Fan-out
//! - `Dispatcher` + `VerbundeneSockets`: Zustellung an lokale Sockets
//! - `AdapterMetrics`: Prometheus-Zaehler fuer Broadcasts und Zustellung
//!
//! # Beispiel
//!
//! ```no_run
//! use std::sync::Arc;
//! use bytes::Bytes;
//! use raumfunk_adapter::{Adapter, BroadcastOptionen, VerbundeneSockets};
//! use raumfunk_core::{RaumName, SocketId};
//! use raumfunk_store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // MemoryStore ist Store und Pub/Sub zugleich
//!     let store = Arc::new(MemoryStore::neu());
//!     let sockets = Arc::new(VerbundeneSockets::neu());
//!     let adapter = Adapter::neu(store.clone(), store, sockets.clone())?;
//!
//!     // Die Verbindungsschicht registriert den Socket
//!     let id = SocketId::neu();
//!     let mut empfang = sockets.registrieren(id.clone());
//!
//!     let lobby = RaumName::from("lobby");
//!     adapter.beitreten(&id, &lobby).await?;
//!     adapter
//!         .broadcast(
//!             Bytes::from_static(b"hallo"),
//!             BroadcastOptionen::fuer_raeume([lobby]),
//!         )
//!         .await?;
//!
//!     let _paket = empfang.recv().await;
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod config;
pub mod dispatcher;
pub mod listener;
pub mod metrics;
pub mod registry;
pub mod verzeichnis;

#[cfg(test)]
mod tests;

// Bequeme Re-Exporte
pub use adapter::{Adapter, BroadcastOptionen};
pub use config::AdapterConfig;
pub use dispatcher::Dispatcher;
pub use metrics::AdapterMetrics;
pub use registry::{AboRegister, AboZustand};
pub use verzeichnis::{SocketSender, SocketVerzeichnis, VerbundeneSockets};
