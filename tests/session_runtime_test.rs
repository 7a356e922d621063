use std::time::Duration;

use tokio::sync::mpsc;

use tetrecs::engine::{GameConfig, Notification, Phase};
use tetrecs::session::{session, ClientMessage};
use tetrecs::types::{Command, Coordinate, PieceSlot};

/// Answers every `PIECE` request with a Dot, split across two chunks
fn spawn_fake_server(
    mut out_rx: mpsc::UnboundedReceiver<ClientMessage>,
    handle: tetrecs::session::SessionHandle,
) -> tokio::task::JoinHandle<Vec<ClientMessage>> {
    tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(message) = out_rx.recv().await {
            seen.push(message);
            match message {
                ClientMessage::RequestPiece => {
                    handle.text("PIE");
                    handle.text("CE 3\r\n");
                }
                ClientMessage::Die => break,
                _ => {}
            }
        }
        seen
    })
}

#[tokio::test(start_paused = true)]
async fn remote_session_plays_until_death() {
    let config = GameConfig {
        lives: 0,
        ..GameConfig::default()
    };
    let (notes_tx, mut notes_rx) = mpsc::unbounded_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (handle, session) = session(config, notes_tx);

    let server = spawn_fake_server(out_rx, handle.clone());
    let game = tokio::spawn(session.run_remote(out_tx));

    // Let both pieces arrive, then place one.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(handle.command(Command::PlaceAt(Coordinate::new(1, 1))));

    // Nobody plays any more; the turn runs out and the only life goes.
    let summary = tokio::time::timeout(Duration::from_secs(60), game)
        .await
        .expect("game did not end")
        .expect("session task panicked")
        .expect("session failed");
    assert_eq!(summary.phase, Phase::GameOver);
    assert_eq!(summary.lives, -1);

    let seen = server.await.unwrap();
    assert_eq!(
        seen,
        vec![
            ClientMessage::RequestPiece,
            ClientMessage::RequestPiece,
            ClientMessage::Score(0),
            ClientMessage::RequestPiece,
            ClientMessage::Lives(-1),
            ClientMessage::RequestPiece,
            ClientMessage::Die,
        ]
    );

    let mut deliveries = Vec::new();
    while let Ok(note) = notes_rx.try_recv() {
        if let Notification::PieceChanged { slot, .. } = note {
            deliveries.push(slot);
        }
    }
    assert_eq!(deliveries[..2], [PieceSlot::Current, PieceSlot::Following]);
}

#[tokio::test(start_paused = true)]
async fn local_session_handles_text_commands() {
    let (notes_tx, mut notes_rx) = mpsc::unbounded_channel();
    let config = GameConfig {
        seed: Some(11),
        ..GameConfig::default()
    };
    let (handle, session) = session(config, notes_tx);

    for line in ["right", "down", "down", "quit"] {
        let command = Command::from_str(line).expect("valid command");
        assert!(handle.command(command));
    }

    let summary = session.run_local().await.unwrap();
    assert_eq!(summary.phase, Phase::Stopped);

    let mut cursor = None;
    while let Ok(note) = notes_rx.try_recv() {
        if let Notification::CursorMoved { at } = note {
            cursor = Some(at);
        }
    }
    assert_eq!(cursor, Some(Coordinate::new(1, 2)));
    assert!(!handle.command(Command::Swap));
}

#[test]
fn remote_session_refuses_closed_connection() {
    let (notes_tx, _notes_rx) = mpsc::unbounded_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel::<ClientMessage>();
    drop(out_rx);
    let (_handle, session) = session(GameConfig::default(), notes_tx);

    tokio_test::assert_err!(tokio_test::block_on(session.run_remote(out_tx)));
}
