//! Tests for whole-game scenarios through the public engine API.

use noughts_rules::{
    Board, Cell, Column, Move, MoveError, Side, Status, TurnState, apply_move, advance_turn, play,
    validate_move,
};

/// Plays `(side, position)` pairs, panicking on any rejected move.
fn play_all(moves: &[(Side, &str)]) -> (Board, TurnState) {
    let mut board = Board::new();
    let mut turn = TurnState::new();
    for (side, position) in moves {
        let action = Move::parse(*side, position).expect("position should parse");
        let transition = play(&board, &turn, &action)
            .unwrap_or_else(|e| panic!("{position} by {side} rejected: {e}"));
        board = transition.board;
        turn = transition.turn;
    }
    (board, turn)
}

#[test]
fn test_column_win_for_circle() {
    let (board, turn) = play_all(&[
        (Side::Circle, "A_1"),
        (Side::Cross, "B_1"),
        (Side::Circle, "A_2"),
        (Side::Cross, "C_3"),
    ]);
    assert_eq!(board.status(), Status::Unfinished);
    assert_eq!(turn.next(), Some(Side::Circle));

    let action = Move::parse(Side::Circle, "A_3").unwrap();
    validate_move(&board, &turn, &action).unwrap();
    let board = apply_move(&board, &action);
    assert_eq!(board.status(), Status::CircleWins);
    assert_eq!(board.circle().column(Column::A), &[1, 2, 3]);
    assert_eq!(advance_turn(turn, board.status()), TurnState::finished());
}

#[test]
fn test_diagonal_win_for_circle() {
    let (board, turn) = play_all(&[
        (Side::Circle, "A_1"),
        (Side::Cross, "A_2"),
        (Side::Circle, "B_2"),
        (Side::Cross, "A_3"),
        (Side::Circle, "C_3"),
    ]);
    assert_eq!(board.status(), Status::CircleWins);
    assert_eq!(turn.next(), None);
}

#[test]
fn test_anti_diagonal_win_for_cross() {
    let (board, _) = play_all(&[
        (Side::Circle, "A_1"),
        (Side::Cross, "A_3"),
        (Side::Circle, "A_2"),
        (Side::Cross, "B_2"),
        (Side::Circle, "B_1"),
        (Side::Cross, "C_1"),
    ]);
    assert_eq!(board.status(), Status::CrossWins);
}

#[test]
fn test_row_win_for_cross() {
    let (board, _) = play_all(&[
        (Side::Circle, "A_1"),
        (Side::Cross, "A_2"),
        (Side::Circle, "B_1"),
        (Side::Cross, "B_2"),
        (Side::Circle, "C_3"),
        (Side::Cross, "C_2"),
    ]);
    assert_eq!(board.status(), Status::CrossWins);
}

#[test]
fn test_full_board_without_line_is_draw() {
    // O X O
    // O X X
    // X O O
    let (board, turn) = play_all(&[
        (Side::Circle, "A_1"),
        (Side::Cross, "B_1"),
        (Side::Circle, "C_1"),
        (Side::Cross, "B_2"),
        (Side::Circle, "B_3"),
        (Side::Cross, "C_2"),
        (Side::Circle, "A_2"),
        (Side::Cross, "A_3"),
    ]);
    assert_eq!(board.status(), Status::Unfinished);
    assert_eq!(board.occupied_count(), 8);

    let transition = play(&board, &turn, &Move::parse(Side::Circle, "C_3").unwrap()).unwrap();
    assert_eq!(transition.status(), Status::Draw);
    assert_eq!(transition.turn.next(), None);
    assert_eq!(transition.board.render(), "  A B C\n1 O X O\n2 O X X\n3 X O O");
}

#[test]
fn test_out_of_turn_move_is_rejected() {
    let board = Board::new();
    let turn = TurnState::new();
    let action = Move::new(Side::Cross, 'A', 1);

    assert_eq!(
        validate_move(&board, &turn, &action),
        Err(MoveError::NotYourTurn(Side::Cross))
    );
    assert_eq!(board, Board::new());
}

#[test]
fn test_taken_cell_is_rejected_for_either_side() {
    let (board, turn) = play_all(&[(Side::Circle, "A_1")]);
    let taken = Cell::new(Column::A, 1).unwrap();

    assert_eq!(
        validate_move(&board, &turn, &Move::new(Side::Cross, 'A', 1)),
        Err(MoveError::PositionTaken(taken))
    );

    let (board, turn) = play_all(&[(Side::Circle, "B_2"), (Side::Cross, "A_1")]);
    assert_eq!(
        validate_move(&board, &turn, &Move::new(Side::Circle, 'A', 1)),
        Err(MoveError::PositionTaken(taken))
    );
}

#[test]
fn test_column_d_is_invalid_before_other_checks() {
    // Finished board, cross to move nowhere: the position check still wins.
    let (board, turn) = play_all(&[
        (Side::Circle, "A_1"),
        (Side::Cross, "A_2"),
        (Side::Circle, "B_2"),
        (Side::Cross, "A_3"),
        (Side::Circle, "C_3"),
    ]);
    let action = Move::parse(Side::Cross, "D_1").unwrap();
    assert_eq!(
        validate_move(&board, &turn, &action),
        Err(MoveError::InvalidPosition("D_1".to_string()))
    );
}

#[test]
fn test_finished_board_rejects_further_moves() {
    let (board, turn) = play_all(&[
        (Side::Circle, "A_1"),
        (Side::Cross, "B_1"),
        (Side::Circle, "A_2"),
        (Side::Cross, "B_2"),
        (Side::Circle, "A_3"),
    ]);
    for side in [Side::Circle, Side::Cross] {
        assert_eq!(
            validate_move(&board, &turn, &Move::new(side, 'C', 3)),
            Err(MoveError::GameAlreadyFinished(Status::CircleWins))
        );
    }
}

#[test]
fn test_board_json_round_trip_resumes_play() {
    let (board, turn) = play_all(&[(Side::Circle, "C_1"), (Side::Cross, "A_3")]);
    let stored = serde_json::to_string(&(&board, &turn)).unwrap();
    let (board, turn): (Board, TurnState) = serde_json::from_str(&stored).unwrap();

    let transition = play(&board, &turn, &Move::parse(Side::Circle, "B_2").unwrap()).unwrap();
    assert_eq!(transition.board.occupied_count(), 3);
}
