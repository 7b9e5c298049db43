//! Local two-player game on one terminal.

use std::io::{BufRead, Write};

use noughts_rules::{Board, Move, TurnState, play};
use tracing::{debug, info, instrument};

/// Plays a game reading positions (`A_1` style) from `input`.
///
/// Rejected moves are reported and the same side is asked again. Returns
/// the final board, which is still unfinished if input ran out early.
#[instrument(skip_all)]
pub fn run_hotseat<R: BufRead, W: Write>(input: R, mut output: W) -> std::io::Result<Board> {
    let mut board = Board::new();
    let mut turn = TurnState::new();
    let mut lines = input.lines();

    writeln!(output, "{}", board.render())?;
    while let Some(side) = turn.next() {
        write!(output, "{} ({}) to move: ", side, side.mark())?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            info!("Input closed before the game ended");
            writeln!(output)?;
            return Ok(board);
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = Move::parse(side, line).and_then(|action| play(&board, &turn, &action));
        let transition = match result {
            Ok(transition) => transition,
            Err(e) => {
                debug!(error = %e, "Hot-seat move rejected");
                writeln!(output, "{}", e)?;
                continue;
            }
        };
        board = transition.board;
        turn = transition.turn;
        writeln!(output, "{}", board.render())?;
    }

    let status = board.status();
    match status.winner() {
        Some(side) => writeln!(output, "{} wins!", side)?,
        None => writeln!(output, "{}.", status.label())?,
    }
    info!(%status, "Hot-seat game finished");
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_rules::Status;

    fn run(script: &str) -> (Board, String) {
        let mut output = Vec::new();
        let board = run_hotseat(script.as_bytes(), &mut output).unwrap();
        (board, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_circle_wins_on_column() {
        let (board, output) = run("A_1\nB_1\nA_2\nB_2\nA_3\n");
        assert_eq!(board.status(), Status::CircleWins);
        assert!(output.ends_with("circle wins!\n"));
    }

    #[test]
    fn test_rejected_move_is_retried() {
        let (board, output) = run("A_1\nA_1\nD_9\nB_1\n");
        assert!(output.contains("Position A_1 is already taken"));
        assert!(output.contains("Invalid position 'D_9'"));
        assert_eq!(board.occupied_count(), 2);
        assert_eq!(board.status(), Status::Unfinished);
    }

    #[test]
    fn test_draw() {
        let (board, output) = run("A_1\nB_1\nC_1\nB_2\nB_3\nC_2\nA_2\nA_3\nC_3\n");
        assert_eq!(board.status(), Status::Draw);
        assert!(output.ends_with("Draw.\n"));
    }
}
