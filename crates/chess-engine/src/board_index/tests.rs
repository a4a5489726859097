use super::*;
use crate::rules::DrawReason;
use chess_core::{MoveKind, Square};
use proptest::prelude::*;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POSITION3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POSITION5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

fn play(index: &mut ChessBoardIndex, uci: &str) -> Option<GameResult> {
    let m = index
        .find_move_uci(uci)
        .unwrap_or_else(|| panic!("{uci} is not legal in {}", index.to_fen()));
    index.make_move(m, false).unwrap()
}

fn sorted_moves(index: &ChessBoardIndex) -> Vec<(u8, u8, u8)> {
    let mut moves: Vec<_> = index
        .legal_moves()
        .iter()
        .map(|m| (m.from().index(), m.to().index(), m.kind().bits()))
        .collect();
    moves.sort_unstable();
    moves
}

/// Everything observable about a position, with list orders normalised.
#[derive(Debug, PartialEq)]
struct Snapshot {
    board: Board,
    squares: [Vec<Square>; 2],
    counts: [[usize; 6]; 2],
    kings: [Option<Square>; 2],
    side_to_move: Color,
    en_passant_pawn: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    state: BoardState,
    legal_moves: Vec<(u8, u8, u8)>,
}

impl Snapshot {
    fn of(index: &ChessBoardIndex) -> Self {
        let pieces = index.pieces();
        let squares = Color::BOTH.map(|color| {
            let mut squares = pieces.squares(color).to_vec();
            squares.sort_unstable();
            squares
        });
        Snapshot {
            board: index.board().clone(),
            squares,
            counts: Color::BOTH.map(|color| PieceKind::ALL.map(|kind| pieces.count(color, kind))),
            kings: Color::BOTH.map(|color| pieces.king_square(color)),
            side_to_move: index.side_to_move(),
            en_passant_pawn: index.en_passant_pawn(),
            halfmove_clock: index.halfmove_clock(),
            fullmove_number: index.fullmove_number(),
            state: index.state(),
            legal_moves: sorted_moves(index),
        }
    }
}

/// Board and piece lists describe the same set of pieces.
fn assert_consistent(index: &ChessBoardIndex) {
    let board = index.board();
    let pieces = index.pieces();
    for square in Square::all() {
        let piece = board.get(square);
        match piece.kind() {
            Some(kind) => {
                let slot = pieces.slot(square).expect("occupied square has a slot");
                assert_eq!(pieces.squares(piece.color())[slot], square);
                if kind == PieceKind::King {
                    assert_eq!(pieces.king_square(piece.color()), Some(square));
                }
            }
            None => assert_eq!(pieces.slot(square), None, "{square} is empty"),
        }
    }
    for color in Color::BOTH {
        for kind in PieceKind::ALL {
            let on_board = board
                .occupied()
                .filter(|(_, piece)| piece.is(kind, color))
                .count();
            assert_eq!(pieces.count(color, kind), on_board, "{color} {kind}");
        }
    }
}

#[test]
fn new_game_is_the_starting_position() {
    let index = ChessBoardIndex::new();
    assert_eq!(index.legal_moves().len(), 20);
    assert_eq!(index.side_to_move(), Color::White);
    assert_eq!(index.state(), BoardState::Idle);
    assert_eq!(index.to_fen(), FenParser::STARTPOS);
    assert_eq!(index.check_game_ended(), None);
    assert!(index.history().is_empty());
    assert_consistent(&index);
}

#[test]
fn counters_follow_moves() {
    let mut index = ChessBoardIndex::new();
    play(&mut index, "e2e4");
    assert_eq!(index.halfmove_clock(), 0);
    assert_eq!(index.fullmove_number(), 1);
    assert_eq!(index.en_passant_pawn(), Some(sq("e4")));
    assert_eq!(
        index.to_fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );

    play(&mut index, "g8f6");
    assert_eq!(index.halfmove_clock(), 1);
    assert_eq!(index.fullmove_number(), 2);
    assert_eq!(index.en_passant_pawn(), None);
}

#[test]
fn fools_mate() {
    let mut index = ChessBoardIndex::new();
    assert_eq!(play(&mut index, "f2f3"), None);
    assert_eq!(play(&mut index, "e7e5"), None);
    assert_eq!(play(&mut index, "g2g4"), None);
    assert_eq!(play(&mut index, "d8h4"), Some(GameResult::BlackWins));

    assert!(index.is_check());
    assert!(index.legal_moves().is_empty());
    assert_eq!(index.check_game_ended(), Some(GameResult::BlackWins));
}

#[test]
fn find_move_lookups() {
    let index = ChessBoardIndex::new();
    assert_eq!(index.find_move(sq("e2"), sq("e5")), None);
    assert_eq!(
        index.find_move(sq("e2"), sq("e4")).map(|m| m.kind()),
        Some(MoveKind::DoublePawnPush)
    );
    assert_eq!(index.find_move_uci("e2e4q"), None);
    assert_eq!(index.find_move_uci("nonsense"), None);
}

#[test]
fn en_passant_capture_and_undo() {
    let mut index =
        ChessBoardIndex::from_fen("rnbqkbnr/ppp1pppp/8/8/3p4/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .unwrap();
    play(&mut index, "e2e4");
    let after_push = index.to_fen();

    let capture = index.find_move(sq("d4"), sq("e3")).unwrap();
    assert_eq!(capture.kind(), MoveKind::EnPassantCapture);
    index.make_move(capture, false).unwrap();

    assert!(index.board().get(sq("e4")).is_empty());
    assert!(index.board().get(sq("e3")).is(PieceKind::Pawn, Color::Black));
    assert_eq!(index.pieces().count(Color::White, PieceKind::Pawn), 7);
    assert_consistent(&index);

    assert_eq!(index.unmake_last_move(true), Some(capture));
    assert_eq!(index.to_fen(), after_push);
    assert_eq!(index.en_passant_pawn(), Some(sq("e4")));
    assert!(index.board().get(sq("e4")).is_en_passant_target());
    assert_consistent(&index);
}

#[test]
fn en_passant_expires_after_one_ply() {
    let mut index =
        ChessBoardIndex::from_fen("rnbqkbnr/ppp1pppp/8/8/3p4/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .unwrap();
    play(&mut index, "e2e4");
    play(&mut index, "g8f6");
    play(&mut index, "a2a3");
    assert_eq!(index.find_move(sq("d4"), sq("e3")), None);
    assert!(!index.board().get(sq("e4")).is_en_passant_target());
}

#[test]
fn en_passant_square_from_fen() {
    let index = ChessBoardIndex::from_fen(
        "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
    )
    .unwrap();
    assert_eq!(index.en_passant_pawn(), Some(sq("e4")));
    assert_eq!(
        index.find_move_uci("d4e3").map(|m| m.kind()),
        Some(MoveKind::EnPassantCapture)
    );
}

#[test]
fn castling_blocked_by_attacks() {
    // f1 attacked: only the long castle survives
    let index = ChessBoardIndex::from_fen("5rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    assert_eq!(index.find_move(Square::E1, Square::G1), None);
    assert_eq!(
        index.find_move(Square::E1, Square::C1).map(|m| m.kind()),
        Some(MoveKind::QueenCastle)
    );

    // in check: no castling at all
    let index = ChessBoardIndex::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    assert!(!index.legal_moves().iter().any(|m| m.is_castle()));

    // destination attacked
    let index = ChessBoardIndex::from_fen("6rk/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    assert_eq!(index.find_move(Square::E1, Square::G1), None);
    assert!(index.find_move(Square::E1, Square::C1).is_some());
}

#[test]
fn castling_moves_the_rook_and_undoes_cleanly() {
    let start = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
    let mut index = ChessBoardIndex::from_fen(start).unwrap();
    let before = Snapshot::of(&index);

    play(&mut index, "e1g1");
    assert!(index.board().get(Square::G1).is(PieceKind::King, Color::White));
    assert!(index.board().get(sq("f1")).is(PieceKind::Rook, Color::White));
    assert!(index.board().get(Square::H1).is_empty());
    assert_eq!(index.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
    assert_consistent(&index);

    play(&mut index, "e8c8");
    assert_eq!(index.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");

    index.unmake_last_move(true);
    index.unmake_last_move(true);
    assert_eq!(index.to_fen(), start);
    assert_eq!(Snapshot::of(&index), before);
}

#[test]
fn pinned_piece_stays_put() {
    let index = ChessBoardIndex::from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
    assert!(!index.legal_moves().iter().any(|m| m.from() == sq("e2")));
}

#[test]
fn deferred_promotion() {
    let start = "8/P7/8/8/8/8/8/k6K w - - 0 1";
    let mut index = ChessBoardIndex::from_fen(start).unwrap();
    let push = index.find_move_uci("a7a8").unwrap();
    assert_eq!(push.kind(), MoveKind::KnightPromotion);

    assert_eq!(index.make_move(push, true), Ok(None));
    assert_eq!(index.state(), BoardState::AwaitingPromotion { square: Square::A8 });
    assert_eq!(index.side_to_move(), Color::White);
    assert!(index.board().get(Square::A8).is(PieceKind::Pawn, Color::White));
    assert_eq!(index.check_game_ended(), None);

    assert_eq!(
        index.make_move(push, false),
        Err(EngineError::PromotionPending)
    );
    assert_eq!(index.redo_next_move(), Err(EngineError::PromotionPending));
    assert_eq!(
        index.resolve_promotion(PieceKind::King),
        Err(EngineError::InvalidPromotion(PieceKind::King))
    );

    assert_eq!(index.resolve_promotion(PieceKind::Queen), Ok(None));
    assert_eq!(index.state(), BoardState::Idle);
    assert_eq!(index.side_to_move(), Color::Black);
    assert!(index.board().get(Square::A8).is(PieceKind::Queen, Color::White));
    assert_eq!(index.pieces().count(Color::White, PieceKind::Pawn), 0);
    assert_eq!(index.pieces().count(Color::White, PieceKind::Queen), 1);
    assert_eq!(
        index.history().last().map(|r| r.mv.kind()),
        Some(MoveKind::QueenPromotion)
    );
    assert_eq!(index.to_fen(), "Q7/8/8/8/8/8/8/k6K b - - 0 1");
    assert!(index.is_check());
    assert_consistent(&index);

    assert_eq!(
        index.resolve_promotion(PieceKind::Queen),
        Err(EngineError::NoPendingPromotion)
    );

    // taking back the promotion restores the pawn, redo replays the queen
    index.unmake_last_move(true);
    assert_eq!(index.to_fen(), start);
    assert_eq!(index.pieces().count(Color::White, PieceKind::Queen), 0);
    assert_consistent(&index);

    assert_eq!(
        index.redo_next_move().unwrap().map(|m| m.kind()),
        Some(MoveKind::QueenPromotion)
    );
    assert!(index.board().get(Square::A8).is(PieceKind::Queen, Color::White));
    assert_eq!(index.side_to_move(), Color::Black);
}

#[test]
fn undo_pending_promotion() {
    let start = "8/P7/8/8/8/8/8/k6K w - - 0 1";
    let mut index = ChessBoardIndex::from_fen(start).unwrap();
    let before = Snapshot::of(&index);
    let push = index.find_move_uci("a7a8").unwrap();

    index.make_move(push, true).unwrap();
    assert_eq!(index.unmake_last_move(true), Some(push));

    assert_eq!(index.state(), BoardState::Idle);
    assert_eq!(index.side_to_move(), Color::White);
    assert_eq!(index.to_fen(), start);
    assert_eq!(Snapshot::of(&index), before);
}

#[test]
fn pending_promotion_freezes_legal_moves() {
    let mut index = ChessBoardIndex::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
    let before = sorted_moves(&index);
    let push = index.find_move_uci("a7a8").unwrap();

    index.make_move(push, true).unwrap();
    assert_eq!(sorted_moves(&index), before);

    let pending = Snapshot::of(&index);
    index.refresh_legal_moves();
    assert_eq!(Snapshot::of(&index), pending);
    assert_eq!(index.side_to_move(), Color::White);
    assert_consistent(&index);

    assert_eq!(index.resolve_promotion(PieceKind::Rook), Ok(None));
    assert_eq!(index.to_fen(), "R7/8/8/8/8/8/8/k6K b - - 0 1");
    assert_consistent(&index);
}

#[test]
fn immediate_promotion_uses_the_encoded_piece() {
    let mut index = ChessBoardIndex::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
    play(&mut index, "a7a8r");
    assert!(index.board().get(Square::A8).is(PieceKind::Rook, Color::White));
    assert_eq!(index.state(), BoardState::Idle);
    assert_eq!(index.side_to_move(), Color::Black);
}

#[test]
fn undo_and_redo() {
    let mut index = ChessBoardIndex::new();
    assert_eq!(index.unmake_last_move(true), None);

    play(&mut index, "e2e4");
    let after_e4 = index.to_fen();
    play(&mut index, "e7e5");

    assert!(index.unmake_last_move(true).is_some());
    assert!(index.unmake_last_move(true).is_some());
    assert_eq!(index.to_fen(), FenParser::STARTPOS);
    assert_eq!(index.legal_moves().len(), 20);
    assert_eq!(index.history().redo_len(), 2);

    assert_eq!(
        index.redo_next_move().unwrap().map(|m| m.to_uci()),
        Some("e2e4".to_string())
    );
    assert_eq!(index.to_fen(), after_e4);
    assert!(index.redo_next_move().unwrap().is_some());
    assert_eq!(index.redo_next_move(), Ok(None));
    assert_eq!(index.history().len(), 2);
}

#[test]
fn replaying_the_redo_move_keeps_history() {
    let mut index = ChessBoardIndex::new();
    play(&mut index, "e2e4");
    play(&mut index, "e7e5");
    index.unmake_last_move(true);
    index.unmake_last_move(true);

    play(&mut index, "e2e4");
    assert_eq!(index.history().redo_len(), 1);

    play(&mut index, "d7d5");
    assert_eq!(index.history().redo_len(), 0);
    assert_eq!(index.redo_next_move(), Ok(None));
}

#[test]
fn stalemate() {
    let index = ChessBoardIndex::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(!index.is_check());
    assert!(index.legal_moves().is_empty());
    assert_eq!(
        index.check_game_ended(),
        Some(GameResult::Draw(DrawReason::Stalemate))
    );
}

#[test]
fn insufficient_material() {
    let index = ChessBoardIndex::from_fen("8/8/8/8/8/8/8/4K2k w - - 0 1").unwrap();
    assert_eq!(
        index.check_game_ended(),
        Some(GameResult::Draw(DrawReason::InsufficientMaterial))
    );

    let index = ChessBoardIndex::from_fen("8/8/8/8/8/8/8/2BBK2k w - - 0 1").unwrap();
    assert_eq!(index.check_game_ended(), None);

    let mut index = ChessBoardIndex::from_fen("8/8/8/8/8/8/5r2/4K2k w - - 0 1").unwrap();
    assert_eq!(
        play(&mut index, "e1f2"),
        Some(GameResult::Draw(DrawReason::InsufficientMaterial))
    );
}

#[test]
fn fifty_move_rule() {
    let mut index = ChessBoardIndex::from_fen("r6k/8/8/8/8/8/8/R6K w - - 0 1").unwrap();
    let shuffle = ["a1a2", "a8a7", "a2a1", "a7a8"];

    for ply in 1..100 {
        assert_eq!(play(&mut index, shuffle[(ply - 1) % 4]), None, "ply {ply}");
    }
    assert_eq!(index.halfmove_clock(), 99);
    assert_eq!(
        play(&mut index, shuffle[99 % 4]),
        Some(GameResult::Draw(DrawReason::FiftyMoveRule))
    );
    assert_eq!(index.halfmove_clock(), 100);

    let mut index = ChessBoardIndex::from_fen("r6k/8/8/8/8/8/8/R6K w - - 99 60").unwrap();
    assert_eq!(
        play(&mut index, "a1a2"),
        Some(GameResult::Draw(DrawReason::FiftyMoveRule))
    );
}

#[test]
fn fen_round_trips() {
    for fen in [
        FenParser::STARTPOS,
        KIWIPETE,
        POSITION3,
        POSITION4,
        POSITION5,
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        "r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1",
    ] {
        let index = ChessBoardIndex::from_fen(fen).unwrap();
        assert_eq!(index.to_fen(), fen);
        assert_consistent(&index);
    }
}

#[test]
fn short_fen_gets_defaults() {
    let index = ChessBoardIndex::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
    assert_eq!(index.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
}

#[test]
fn bad_fen_is_rejected_without_side_effects() {
    assert!(matches!(
        ChessBoardIndex::from_fen(""),
        Err(EngineError::Fen(FenError::InvalidPartCount(0)))
    ));
    assert!(matches!(
        ChessBoardIndex::from_fen("8/8/8 w - - 0 1"),
        Err(EngineError::Fen(FenError::InvalidPiecePlacement(_)))
    ));
    assert!(matches!(
        ChessBoardIndex::from_fen("PPPPPPPP/PPPPPPPP/PPPPPPPP/8/8/8/8/k6K w - - 0 1"),
        Err(EngineError::Fen(FenError::InvalidPiecePlacement(_)))
    ));

    let mut index = ChessBoardIndex::new();
    play(&mut index, "e2e4");
    let before = index.to_fen();
    assert!(index.load_position("not a fen").is_err());
    assert_eq!(index.to_fen(), before);
    assert_eq!(index.history().len(), 1);
}

#[test]
fn loading_clears_history() {
    let mut index = ChessBoardIndex::new();
    play(&mut index, "e2e4");
    index.load_position(KIWIPETE).unwrap();
    assert!(index.history().is_empty());
    assert_eq!(index.history().redo_len(), 0);
    assert_eq!(index.legal_moves().len(), 48);
}

const WALK_START: [&str; 5] = [
    FenParser::STARTPOS,
    KIWIPETE,
    POSITION3,
    POSITION4,
    POSITION5,
];

const PROMOTION_CHOICES: [PieceKind; 4] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

fn pick(index: &ChessBoardIndex, choice: &prop::sample::Index) -> Option<Move> {
    let moves = index.legal_moves();
    if moves.is_empty() {
        None
    } else {
        Some(moves[choice.index(moves.len())])
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: make_move followed by unmake_last_move restores the position exactly,
    /// including promotions that wait for a piece choice
    #[test]
    fn prop_make_unmake_restores_state(
        start in 0..WALK_START.len(),
        choices in prop::collection::vec(
            (any::<prop::sample::Index>(), any::<bool>(), 0..PROMOTION_CHOICES.len()),
            1..24,
        ),
    ) {
        let mut index = ChessBoardIndex::from_fen(WALK_START[start]).unwrap();
        for (choice, wait, piece) in &choices {
            let Some(m) = pick(&index, choice) else { break };
            let before = Snapshot::of(&index);

            if m.is_promotion() && *wait {
                let piece = PROMOTION_CHOICES[*piece];
                index.make_move(m, true).unwrap();
                prop_assert_eq!(&sorted_moves(&index), &before.legal_moves);
                index.refresh_legal_moves();
                prop_assert_eq!(&sorted_moves(&index), &before.legal_moves);
                assert_consistent(&index);
                prop_assert_eq!(index.unmake_last_move(true), Some(m));
                prop_assert_eq!(&Snapshot::of(&index), &before);

                index.make_move(m, true).unwrap();
                index.resolve_promotion(piece).unwrap();
                assert_consistent(&index);
                let resolved = Snapshot::of(&index);
                prop_assert_eq!(index.unmake_last_move(true), Some(m.with_promotion(piece)));
                prop_assert_eq!(Snapshot::of(&index), before);

                index.make_move(m.with_promotion(piece), false).unwrap();
                prop_assert_eq!(Snapshot::of(&index), resolved);
                continue;
            }

            index.make_move(m, false).unwrap();
            assert_consistent(&index);
            prop_assert_eq!(index.unmake_last_move(true), Some(m));
            prop_assert_eq!(Snapshot::of(&index), before);

            index.make_move(m, false).unwrap();
        }
    }

    /// Property: no legal move leaves the mover's king attacked
    #[test]
    fn prop_legal_moves_keep_king_safe(
        start in 0..WALK_START.len(),
        choices in prop::collection::vec(any::<prop::sample::Index>(), 1..24),
    ) {
        let mut index = ChessBoardIndex::from_fen(WALK_START[start]).unwrap();
        for choice in &choices {
            let Some(m) = pick(&index, choice) else { break };
            let mover = index.side_to_move();
            index.make_move(m, false).unwrap();

            let king = index.pieces().king_square(mover).unwrap();
            prop_assert!(!index.is_square_attacked(king, mover), "{:?} left the king attacked", m);
        }
    }

    /// Property: exporting and re-importing FEN keeps the position and its legal moves
    #[test]
    fn prop_fen_roundtrip(
        start in 0..WALK_START.len(),
        choices in prop::collection::vec(any::<prop::sample::Index>(), 1..24),
    ) {
        let mut index = ChessBoardIndex::from_fen(WALK_START[start]).unwrap();
        for choice in &choices {
            let Some(m) = pick(&index, choice) else { break };
            index.make_move(m, false).unwrap();
        }

        let fen = index.to_fen();
        let reloaded = ChessBoardIndex::from_fen(&fen).unwrap();
        prop_assert_eq!(reloaded.to_fen(), fen);
        prop_assert_eq!(sorted_moves(&reloaded), sorted_moves(&index));
    }
}
