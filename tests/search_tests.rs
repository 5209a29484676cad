//! Integration tests for the search core and the background worker.

use std::thread;
use std::time::{Duration, Instant};

use chessmate::board::evaluate;
use chessmate::engine::{start_search, SearchPoll};
use chessmate::search::find_best_move;
use chessmate::{Color, GameState, Move, Piece, Square};

fn sq(notation: &str) -> Square {
    notation.parse().expect("bad square in test")
}

fn poll_until_settled(handle: &chessmate::engine::SearchHandle) -> SearchPoll {
    let deadline = Instant::now() + Duration::from_secs(30);
    loop {
        match handle.poll() {
            SearchPoll::Pending => {
                assert!(Instant::now() < deadline, "search did not finish in time");
                thread::sleep(Duration::from_millis(5));
            }
            settled => return settled,
        }
    }
}

#[test]
fn search_is_deterministic() {
    let state =
        GameState::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 4 3")
            .unwrap();
    let moves = state.legal_moves();

    let first = find_best_move(&state, &moves, 3).expect("search should find a move");
    for _ in 0..2 {
        let again = find_best_move(&state, &moves, 3).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn depth_one_matches_exhaustive_single_ply_evaluation() {
    let state =
        GameState::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
            .unwrap();
    let moves = state.legal_moves();

    let chosen = find_best_move(&state, &moves, 1).unwrap();

    // White to move: the best single reply maximizes the white-positive
    // evaluation of the resulting position.
    let score_after = |mv: Move| {
        let mut scratch = state.clone();
        scratch.apply(mv).unwrap();
        evaluate(&scratch)
    };
    let best_score = moves.iter().map(|&m| score_after(m)).max().unwrap();
    assert_eq!(score_after(chosen), best_score);
    // exd5 wins a pawn outright and nothing else does better at one ply
    assert_eq!(chosen, Move::new(sq("e4"), sq("d5"), Piece::Pawn));
}

#[test]
fn finds_mate_in_one() {
    let state = GameState::from_fen("6k1/5ppp/8/8/8/8/8/4R2K w - - 0 1").unwrap();
    let moves = state.legal_moves();
    let chosen = find_best_move(&state, &moves, 2).unwrap();
    assert_eq!(chosen.from, sq("e1"));
    assert_eq!(chosen.to, sq("e8"));

    let mut next = state.clone();
    next.apply(chosen).unwrap();
    assert!(next.in_check(Color::Black));
    assert!(next.legal_moves().is_empty());
}

#[test]
fn prefers_faster_mate() {
    // Back-rank mate available immediately; a depth-4 search must not
    // wander into a slower forced line.
    let state = GameState::from_fen("6k1/5ppp/8/8/8/8/8/R3R2K w - - 0 1").unwrap();
    let moves = state.legal_moves();
    let chosen = find_best_move(&state, &moves, 4).unwrap();
    let mut next = state.clone();
    next.apply(chosen).unwrap();
    assert!(next.legal_moves().is_empty(), "expected immediate mate, got {chosen}");
}

#[test]
fn avoids_losing_the_queen() {
    // The white queen on d4 is attacked by the c6 knight; any non-queen
    // move loses 900 centipawns at depth 2.
    let state = GameState::from_fen("r1b1kbnr/pppppppp/2n5/8/3Q4/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1")
        .unwrap();
    let moves = state.legal_moves();
    let chosen = find_best_move(&state, &moves, 2).unwrap();

    let mut next = state.clone();
    next.apply(chosen).unwrap();
    let queen_hangs = next
        .legal_moves()
        .iter()
        .any(|m| m.captured == Some(Piece::Queen));
    assert!(!queen_hangs, "move {chosen} leaves the queen en prise");
}

#[test]
fn empty_move_list_yields_none() {
    let state = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(state.legal_moves().is_empty());
    assert_eq!(find_best_move(&state, &[], 3), None);
}

#[test]
fn worker_reports_done_with_a_legal_move() {
    let state = GameState::new();
    let moves = state.legal_moves();
    let handle = start_search(state.clone(), moves.clone(), 2);

    match poll_until_settled(&handle) {
        SearchPoll::Done(mv) => {
            assert!(moves.contains(&mv), "worker returned non-legal move {mv}");
            let mut next = state;
            next.apply(mv).unwrap();
        }
        other => panic!("expected Done, got {other:?}"),
    }
}

#[test]
fn cancel_discards_any_result() {
    let state = GameState::new();
    let moves = state.legal_moves();
    // Deep enough that cancellation lands mid-search on any machine.
    let handle = start_search(state, moves, 20);

    handle.cancel();
    assert_eq!(handle.poll(), SearchPoll::Cancelled);
    assert_eq!(handle.wait(), SearchPoll::Cancelled);
}

#[test]
fn cancel_after_completion_still_reads_cancelled() {
    let state = GameState::new();
    let moves = state.legal_moves();
    let handle = start_search(state, moves, 1);

    // Let the worker finish first.
    assert!(matches!(poll_until_settled(&handle), SearchPoll::Done(_)));
    handle.cancel();
    assert_eq!(handle.poll(), SearchPoll::Cancelled);
}

#[test]
fn worker_with_no_moves_resolves_cancelled() {
    let state = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let handle = start_search(state, Vec::new(), 3);
    assert_eq!(handle.wait(), SearchPoll::Cancelled);
}

#[test]
fn worker_search_matches_synchronous_search() {
    let state =
        GameState::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 4 3")
            .unwrap();
    let moves = state.legal_moves();

    let synchronous = find_best_move(&state, &moves, 3).unwrap();
    let handle = start_search(state, moves, 3);
    match handle.wait() {
        SearchPoll::Done(mv) => assert_eq!(mv, synchronous),
        other => panic!("expected Done, got {other:?}"),
    }
}
