//! Integration-Tests: zwei Adapter-Instanzen auf einem geteilten Store
//!
//! Jede Instanz steht fuer einen Prozess mit eigenem Socket-Verzeichnis;
//! der geteilte `MemoryStore` uebernimmt die Rolle des gemeinsamen
//! Koordinations-Substrats.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use raumfunk_adapter::{Adapter, BroadcastOptionen, VerbundeneSockets};
use raumfunk_core::{schluessel, Paket, RaumName, SocketId};
use raumfunk_store::MemoryStore;
use tokio::time::timeout;

type ProzessAdapter = Adapter<MemoryStore, MemoryStore, VerbundeneSockets>;

/// Simulierter Prozess: Adapter plus lokales Socket-Verzeichnis
struct Prozess {
    adapter: ProzessAdapter,
    sockets: Arc<VerbundeneSockets>,
}

fn logging_initialisieren() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn prozess(store: &Arc<MemoryStore>) -> Prozess {
    logging_initialisieren();
    let sockets = Arc::new(VerbundeneSockets::neu());
    let adapter = Adapter::neu(store.clone(), store.clone(), sockets.clone())
        .expect("Adapter anlegen fehlgeschlagen");
    Prozess { adapter, sockets }
}

fn paket(inhalt: &str) -> Paket {
    Bytes::copy_from_slice(inhalt.as_bytes())
}

async fn erwarte_paket(rx: &mut tokio::sync::mpsc::Receiver<Paket>, erwartet: &str) {
    let empfangen = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("Zustellung erwartet")
        .expect("Queue offen");
    assert_eq!(empfangen, paket(erwartet));
}

async fn erwarte_nichts(rx: &mut tokio::sync::mpsc::Receiver<Paket>) {
    let nichts = timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(nichts.is_err(), "es darf nichts zugestellt werden");
}

#[tokio::test]
async fn broadcast_erreicht_sockets_fremder_prozesse() {
    let store = Arc::new(MemoryStore::neu());
    let a = prozess(&store);
    let b = prozess(&store);

    let s1 = SocketId::from("s1");
    let s2 = SocketId::from("s2");
    let raum = RaumName::from("r1");

    let mut rx1 = a.sockets.registrieren(s1.clone());
    let mut rx2 = b.sockets.registrieren(s2.clone());

    a.adapter.beitreten(&s1, &raum).await.unwrap();
    b.adapter.beitreten(&s2, &raum).await.unwrap();

    // Prozess A sendet – beide Prozesse stellen lokal zu
    a.adapter
        .broadcast(paket("hallo"), BroadcastOptionen::fuer_raeume([raum]))
        .await
        .unwrap();

    erwarte_paket(&mut rx1, "hallo").await;
    erwarte_paket(&mut rx2, "hallo").await;
}

#[tokio::test]
async fn ausnahmen_gelten_prozessuebergreifend() {
    let store = Arc::new(MemoryStore::neu());
    let a = prozess(&store);
    let b = prozess(&store);

    let s1 = SocketId::from("s1");
    let s2 = SocketId::from("s2");
    let raum = RaumName::from("r1");

    let mut rx1 = a.sockets.registrieren(s1.clone());
    let mut rx2 = b.sockets.registrieren(s2.clone());

    a.adapter.beitreten(&s1, &raum).await.unwrap();
    b.adapter.beitreten(&s2, &raum).await.unwrap();

    let optionen = BroadcastOptionen::fuer_raeume([raum]).ausser([s2]);
    a.adapter.broadcast(paket("p"), optionen).await.unwrap();

    erwarte_paket(&mut rx1, "p").await;
    erwarte_nichts(&mut rx2).await;
}

#[tokio::test]
async fn mitgliedschaft_ist_prozessuebergreifend_sichtbar() {
    let store = Arc::new(MemoryStore::neu());
    let a = prozess(&store);
    let b = prozess(&store);

    let s1 = SocketId::from("s1");
    let raum = RaumName::from("r1");

    a.adapter.beitreten(&s1, &raum).await.unwrap();

    // Prozess B sieht die Mitgliedschaft, haelt aber kein Abo
    assert_eq!(b.adapter.mitglieder_von(&raum).await.unwrap(), vec![s1]);
    assert!(!b.adapter.ist_abonniert(&raum));
    assert!(a.adapter.ist_abonniert(&raum));
}

#[tokio::test]
async fn letzter_austritt_raeumt_clusterweit_auf() {
    let store = Arc::new(MemoryStore::neu());
    let a = prozess(&store);
    let b = prozess(&store);

    let s1 = SocketId::from("s1");
    let s2 = SocketId::from("s2");
    let raum = RaumName::from("r1");

    a.adapter.beitreten(&s1, &raum).await.unwrap();
    b.adapter.beitreten(&s2, &raum).await.unwrap();

    a.adapter.verlassen(&s1, &raum).await.unwrap();
    // Noch ein Mitglied auf Prozess B: kein Abbau
    assert!(store.schluessel_existiert(&schluessel::raum_schluessel(&raum)));

    b.adapter.verlassen(&s2, &raum).await.unwrap();
    assert!(
        !store.schluessel_existiert(&schluessel::raum_schluessel(&raum)),
        "leerer Raum muss clusterweit abgebaut sein"
    );
    assert!(!b.adapter.ist_abonniert(&raum));

    // Spaeterer Beitritt baut den Raum neu auf
    b.adapter.beitreten(&s2, &raum).await.unwrap();
    assert!(b.adapter.ist_abonniert(&raum));
}

#[tokio::test]
async fn alle_verlassen_ueber_mehrere_raeume() {
    let store = Arc::new(MemoryStore::neu());
    let a = prozess(&store);

    let s1 = SocketId::from("s1");
    let r1 = RaumName::from("r1");
    let r2 = RaumName::from("r2");

    a.adapter.beitreten(&s1, &r1).await.unwrap();
    a.adapter.beitreten(&s1, &r2).await.unwrap();

    a.adapter.alle_verlassen(&s1).await.unwrap();

    assert!(a.adapter.raeume_von(&s1).await.unwrap().is_empty());
    assert!(!store.schluessel_existiert(&schluessel::socket_schluessel(&s1)));
    assert!(!store.schluessel_existiert(&schluessel::raum_schluessel(&r1)));
    assert!(!store.schluessel_existiert(&schluessel::raum_schluessel(&r2)));
}

#[tokio::test]
async fn broadcast_ohne_raeume_bleibt_prozesslokal() {
    let store = Arc::new(MemoryStore::neu());
    let a = prozess(&store);
    let b = prozess(&store);

    let s1 = SocketId::from("s1");
    let s2 = SocketId::from("s2");

    let mut rx1 = a.sockets.registrieren(s1.clone());
    let mut rx2 = b.sockets.registrieren(s2.clone());

    a.adapter.beitreten(&s1, &RaumName::from("r1")).await.unwrap();
    b.adapter.beitreten(&s2, &RaumName::from("r2")).await.unwrap();

    // Degradierter Fallback: erreicht nur Sockets des sendenden Prozesses
    a.adapter
        .broadcast(paket("nur lokal"), BroadcastOptionen::default())
        .await
        .unwrap();

    erwarte_paket(&mut rx1, "nur lokal").await;
    erwarte_nichts(&mut rx2).await;
}

#[tokio::test]
async fn zustellung_liest_mitglieder_zum_zustellzeitpunkt() {
    let store = Arc::new(MemoryStore::neu());
    let a = prozess(&store);
    let b = prozess(&store);

    let s1 = SocketId::from("s1");
    let s2 = SocketId::from("s2");
    let raum = RaumName::from("r1");

    let mut rx1 = a.sockets.registrieren(s1.clone());
    a.adapter.beitreten(&s1, &raum).await.unwrap();

    // s2 tritt erst nach dem Abo von Prozess A bei – die Zustellung liest
    // die Mitglieder neu und erreicht ihn trotzdem
    let mut rx2 = b.sockets.registrieren(s2.clone());
    b.adapter.beitreten(&s2, &raum).await.unwrap();

    b.adapter
        .broadcast(paket("frisch"), BroadcastOptionen::fuer_raeume([raum]))
        .await
        .unwrap();

    erwarte_paket(&mut rx1, "frisch").await;
    erwarte_paket(&mut rx2, "frisch").await;
}
