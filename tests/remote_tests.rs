//! Remote play - engine driven by server-delivered pieces

use tokio::sync::mpsc;

use tetrecs::core::{Piece, PieceKind};
use tetrecs::engine::{CommandError, Engine, GameConfig, ManualClock, Notification, Phase};
use tetrecs::session::{parse_line, ClientMessage, RemotePieces, ServerMessage};
use tetrecs::types::PieceSlot;

type Remote = Engine<RemotePieces, ManualClock, Vec<Notification>>;

fn remote(config: &GameConfig) -> (Remote, mpsc::UnboundedReceiver<ClientMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = Engine::new(config, RemotePieces::new(tx), ManualClock::new(), Vec::new());
    (engine, rx)
}

fn sent(rx: &mut mpsc::UnboundedReceiver<ClientMessage>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(message) = rx.try_recv() {
        out.push(message.to_string());
    }
    out
}

fn deliver(engine: &mut Remote, line: &str) -> Option<PieceSlot> {
    match parse_line(line) {
        Ok(ServerMessage::Piece(piece)) => engine.deliver(piece),
        other => panic!("not a piece: {other:?}"),
    }
}

#[test]
fn test_construction_requests_two_pieces() {
    let (mut engine, mut rx) = remote(&GameConfig::default());
    assert_eq!(sent(&mut rx), vec!["PIECE", "PIECE"]);
    assert!(engine.current().is_none());
    assert!(engine.following().is_none());

    engine.start();
    assert_eq!(deliver(&mut engine, "PIECE 4"), Some(PieceSlot::Current));
    assert_eq!(deliver(&mut engine, "PIECE 9"), Some(PieceSlot::Following));
    assert_eq!(engine.current().map(|p| p.kind()), Some(PieceKind::Square));
    assert_eq!(engine.following().map(|p| p.kind()), Some(PieceKind::T));

    // An unrequested extra piece still lands in following.
    assert_eq!(deliver(&mut engine, "PIECE 1"), Some(PieceSlot::Following));
    assert_eq!(engine.current().map(|p| p.kind()), Some(PieceKind::Square));
    assert_eq!(engine.following().map(|p| p.kind()), Some(PieceKind::C));
    assert!(sent(&mut rx).is_empty());
}

#[test]
fn test_commands_before_delivery_are_rejected() {
    let (mut engine, _rx) = remote(&GameConfig::default());
    engine.start();

    assert_eq!(engine.place_at(2, 2), Err(CommandError::NoCurrentPiece));
    assert_eq!(engine.rotate(1), Err(CommandError::NoCurrentPiece));
    assert_eq!(engine.swap(), Err(CommandError::NoCurrentPiece));

    deliver(&mut engine, "PIECE 3");
    assert_eq!(engine.swap(), Err(CommandError::NoFollowingPiece));
    assert_eq!(engine.turn(), 1);
}

#[test]
fn test_placement_publishes_score_then_requests() {
    let (mut engine, mut rx) = remote(&GameConfig::default());
    engine.start();
    deliver(&mut engine, "PIECE 3");
    deliver(&mut engine, "PIECE 2");
    sent(&mut rx);

    engine.place_at(0, 0).unwrap();
    assert_eq!(sent(&mut rx), vec!["SCORE 0", "PIECE"]);

    // Following moved up, the new following is still in flight.
    assert_eq!(engine.current().map(|p| p.kind()), Some(PieceKind::Plus));
    assert!(engine.following().is_none());
    assert_eq!(deliver(&mut engine, "PIECE 0"), Some(PieceSlot::Following));
}

#[test]
fn test_delivery_after_advance_goes_to_following() {
    let (mut engine, _rx) = remote(&GameConfig::default());
    engine.start();
    assert_eq!(deliver(&mut engine, "PIECE 3"), Some(PieceSlot::Current));

    engine.place_at(0, 0).unwrap();
    assert!(engine.current().is_none());

    // Only the first delivery ever targets current.
    assert_eq!(deliver(&mut engine, "PIECE 2"), Some(PieceSlot::Following));
    assert!(engine.current().is_none());
    assert_eq!(engine.following().map(|p| p.kind()), Some(PieceKind::Plus));
    assert_eq!(engine.place_at(2, 2), Err(CommandError::NoCurrentPiece));

    assert_eq!(deliver(&mut engine, "PIECE 5"), Some(PieceSlot::Following));
    assert_eq!(engine.following().map(|p| p.kind()), Some(PieceKind::L));
}

#[test]
fn test_late_delivery_after_timeout_goes_to_following() {
    let (mut engine, mut rx) = remote(&GameConfig::default());
    engine.start();
    assert_eq!(deliver(&mut engine, "PIECE 3"), Some(PieceSlot::Current));
    sent(&mut rx);

    // The turn runs out before the second piece arrives.
    let turn = engine.clock_mut().fire().unwrap();
    assert!(engine.on_turn_expired(turn));
    assert_eq!(sent(&mut rx), vec!["LIVES 2", "PIECE"]);
    assert!(engine.current().is_none());

    assert_eq!(deliver(&mut engine, "PIECE 2"), Some(PieceSlot::Following));
    assert!(engine.current().is_none());
    assert_eq!(engine.following().map(|p| p.kind()), Some(PieceKind::Plus));

    let slots: Vec<_> = engine
        .sink()
        .iter()
        .filter_map(|n| match n {
            Notification::PieceChanged { slot, .. } => Some(*slot),
            _ => None,
        })
        .collect();
    assert_eq!(slots, vec![PieceSlot::Current, PieceSlot::Following]);
}

#[test]
fn test_timeouts_publish_lives_and_death() {
    let config = GameConfig {
        lives: 1,
        ..GameConfig::default()
    };
    let (mut engine, mut rx) = remote(&config);
    engine.start();
    sent(&mut rx);

    let turn = engine.clock_mut().fire().unwrap();
    engine.on_turn_expired(turn);
    assert_eq!(sent(&mut rx), vec!["LIVES 0", "PIECE"]);

    let turn = engine.clock_mut().fire().unwrap();
    engine.on_turn_expired(turn);
    assert_eq!(sent(&mut rx), vec!["LIVES -1", "PIECE", "DIE"]);
    assert_eq!(engine.phase(), Phase::GameOver);

    // Late deliveries are ignored once the game is over.
    assert_eq!(engine.deliver(Piece::new(PieceKind::Dot)), None);
}

#[test]
fn test_malformed_piece_messages() {
    assert!(parse_line("PIECE").is_err());
    assert!(parse_line("PIECE -1").is_err());
    assert!(parse_line("PIECE 15").is_err());
    assert!(matches!(
        parse_line("USERS alice bob"),
        Ok(ServerMessage::Other { .. })
    ));
}
