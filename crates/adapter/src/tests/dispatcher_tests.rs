//! Unit-Tests fuer Dispatcher und Socket-Verzeichnis

use std::sync::Arc;

use bytes::Bytes;
use raumfunk_core::{Paket, SocketId};

use crate::config::AdapterConfig;
use crate::dispatcher::Dispatcher;
use crate::verzeichnis::{SocketVerzeichnis, VerbundeneSockets};

fn paket(inhalt: &str) -> Paket {
    Bytes::copy_from_slice(inhalt.as_bytes())
}

#[tokio::test]
async fn zustellung_an_verbundenen_socket() {
    let sockets = Arc::new(VerbundeneSockets::neu());
    let dispatcher = Dispatcher::neu(sockets.clone());
    let id = SocketId::from("s1");

    let mut rx = sockets.registrieren(id.clone());

    assert!(dispatcher.senden(&id, &paket("hi"), &[]));
    assert_eq!(rx.try_recv().unwrap(), paket("hi"));
}

#[tokio::test]
async fn ausgeschlossene_sockets_werden_uebersprungen() {
    let sockets = Arc::new(VerbundeneSockets::neu());
    let dispatcher = Dispatcher::neu(sockets.clone());
    let id = SocketId::from("s1");

    let mut rx = sockets.registrieren(id.clone());

    assert!(!dispatcher.senden(&id, &paket("hi"), &[id.clone()]));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn unbekannter_socket_ist_kein_fehler() {
    let sockets = Arc::new(VerbundeneSockets::neu());
    let dispatcher = Dispatcher::neu(sockets);

    // Anderer Prozess oder getrennt: stilles Ueberspringen
    assert!(!dispatcher.senden(&SocketId::from("fremd"), &paket("hi"), &[]));
}

#[tokio::test]
async fn fanout_zaehlt_nur_erfolgreiche_zustellungen() {
    let sockets = Arc::new(VerbundeneSockets::neu());
    let dispatcher = Dispatcher::neu(sockets.clone());

    let s1 = SocketId::from("s1");
    let s2 = SocketId::from("s2");
    let s3 = SocketId::from("s3"); // nicht verbunden

    let mut rx1 = sockets.registrieren(s1.clone());
    let mut rx2 = sockets.registrieren(s2.clone());

    let ids = vec![s1.clone(), s2.clone(), s3];
    let zugestellt = dispatcher.fanout(&ids, &paket("hi"), &[s2]);

    assert_eq!(zugestellt, 1, "nur s1 ist verbunden und nicht ausgeschlossen");
    assert!(rx1.try_recv().is_ok());
    assert!(rx2.try_recv().is_err());
}

#[tokio::test]
async fn volle_send_queue_verwirft_pakete() {
    let config = AdapterConfig {
        send_queue_groesse: 1,
    };
    let sockets = Arc::new(VerbundeneSockets::mit_config(&config));
    let dispatcher = Dispatcher::neu(sockets.clone());
    let id = SocketId::from("s1");

    let _rx = sockets.registrieren(id.clone());

    assert!(dispatcher.senden(&id, &paket("1"), &[]));
    assert!(!dispatcher.senden(&id, &paket("2"), &[]), "Queue ist voll");
}

#[tokio::test]
async fn entfernte_sockets_sind_nicht_auffindbar() {
    let sockets = VerbundeneSockets::neu();
    let id = SocketId::from("s1");

    let _rx = sockets.registrieren(id.clone());
    assert!(sockets.ist_verbunden(&id));
    assert_eq!(sockets.anzahl(), 1);

    sockets.entfernen(&id);
    assert!(!sockets.ist_verbunden(&id));
    assert!(sockets.lookup(&id).is_none());
}
