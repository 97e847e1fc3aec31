//! Turn state machine: scenarios, pass rule, end rule and winner.

use chrono::NaiveDateTime;
use reversi::{Board, Disc, DomainError, GameResult, Point, Turn};

fn at(seconds: i64) -> NaiveDateTime {
    chrono::DateTime::from_timestamp(1_700_000_000 + seconds, 0)
        .expect("valid timestamp")
        .naive_utc()
}

/// Parses 8 rows of `.`/`x`/`o` (x = Dark, o = Light).
fn board(rows: [&str; 8]) -> Board {
    let rows: Vec<Vec<Disc>> = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|c| match c {
                    'x' => Disc::Dark,
                    'o' => Disc::Light,
                    _ => Disc::Empty,
                })
                .collect()
        })
        .collect();
    Board::from_rows(&rows).expect("8x8 board")
}

fn dark_to_move(board: Board) -> Turn {
    Turn::restore(1, 10, Some(Disc::Dark), None, board, at(0))
}

#[test]
fn test_dark_opening_flips_one() {
    let first = Turn::first(1, at(0));
    let next = first
        .place_next_at(Disc::Dark, Point::new(2, 3), at(1))
        .expect("legal opening");

    assert_eq!(next.turn_count(), 1);
    assert_eq!(next.board().get(Point::new(3, 3)), Some(Disc::Dark));
    assert_eq!(next.board().count(Disc::Dark), 4);
    assert_eq!(next.board().count(Disc::Light), 1);
    assert_eq!(next.next_disc(), Some(Disc::Light));
    assert_eq!(next.mv().map(|m| m.point()), Some(Point::new(2, 3)));
    assert!(!next.game_ended());

    // The previous turn is untouched.
    assert_eq!(*first.board(), Board::initial());
}

#[test]
fn test_occupied_cell_rejected_for_either_color() {
    let first = Turn::first(1, at(0));
    assert_eq!(
        first.place_next(Disc::Dark, Point::new(4, 4)),
        Err(DomainError::CellOccupied(Point::new(4, 4)))
    );

    let second = first
        .place_next(Disc::Dark, Point::new(2, 3))
        .expect("legal opening");
    assert_eq!(
        second.place_next(Disc::Light, Point::new(2, 3)),
        Err(DomainError::CellOccupied(Point::new(2, 3)))
    );
}

#[test]
fn test_corner_without_flips_rejected() {
    let first = Turn::first(1, at(0));
    assert_eq!(
        first.place_next(Disc::Dark, Point::new(0, 0)),
        Err(DomainError::NoDiscsToFlip(Point::new(0, 0)))
    );
}

#[test]
fn test_wrong_color_rejected() {
    let first = Turn::first(1, at(0));
    assert_eq!(
        first.place_next(Disc::Light, Point::new(2, 4)),
        Err(DomainError::NotPlayersTurn {
            disc: Disc::Light,
            expected: Some(Disc::Dark),
        })
    );
}

#[test]
fn test_empty_disc_rejected() {
    let first = Turn::first(1, at(0));
    assert_eq!(
        first.place_next(Disc::Empty, Point::new(2, 3)),
        Err(DomainError::InvalidDisc(0))
    );
}

#[test]
fn test_pass_keeps_dark_to_move() {
    let before = dark_to_move(board([
        "xo......",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "xo......",
    ]));

    let next = before
        .place_next(Disc::Dark, Point::new(2, 0))
        .expect("legal move");

    // Light's only disc sits against the wall, so Light cannot move.
    assert!(!next.board().exist_valid_move(Disc::Light));
    assert_eq!(next.next_disc(), Some(Disc::Dark));
    assert_eq!(next.board().valid_moves(Disc::Dark), vec![Point::new(2, 7)]);
}

#[test]
fn test_no_moves_left_ends_game() {
    let before = dark_to_move(board([
        "xo......",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
    ]));

    let last = before
        .place_next(Disc::Dark, Point::new(2, 0))
        .expect("legal move");

    assert!(last.game_ended());
    assert_eq!(last.next_disc(), None);
    assert_eq!(last.winner_disc(), Ok(Some(Disc::Dark)));
}

#[test]
fn test_full_board_ends_game() {
    let before = dark_to_move(board([
        "oooooooo",
        "oooooooo",
        "oooooooo",
        "oooooooo",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxo.",
    ]));

    let last = before
        .place_next(Disc::Dark, Point::new(7, 7))
        .expect("legal move");

    assert!(last.game_ended());
    assert_eq!(last.board().count(Disc::Empty), 0);
    assert_eq!(last.board().count(Disc::Dark), 32);
    assert_eq!(last.board().count(Disc::Light), 32);
    assert_eq!(last.winner_disc(), Ok(None));
}

#[test]
fn test_equal_counts_is_draw() {
    let before = dark_to_move(board([
        "xo.x....",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "oooo....",
    ]));

    let last = before
        .place_next(Disc::Dark, Point::new(2, 0))
        .expect("legal move");

    assert!(last.game_ended());
    assert_eq!(last.board().count(Disc::Dark), 4);
    assert_eq!(last.board().count(Disc::Light), 4);
    assert_eq!(last.winner_disc(), Ok(None));

    let result = GameResult::from_final_turn(&last).expect("ended");
    assert!(result.is_draw());
    assert_eq!(*result.end_at(), last.end_at());
}

#[test]
fn test_winner_requires_ended_game() {
    let first = Turn::first(1, at(0));
    assert_eq!(first.winner_disc(), Err(DomainError::GameNotEnded));
    assert_eq!(
        GameResult::from_final_turn(&first),
        Err(DomainError::GameNotEnded)
    );
}

#[test]
fn test_ended_turn_rejects_moves() {
    let last = Turn::restore(1, 60, None, None, Board::initial(), at(0));
    assert_eq!(
        last.place_next(Disc::Dark, Point::new(2, 3)),
        Err(DomainError::NotPlayersTurn {
            disc: Disc::Dark,
            expected: None,
        })
    );
}

#[test]
fn test_greedy_game_plays_to_completion() {
    let mut turn = Turn::first(1, at(0));
    let mut seconds = 0;

    while let Some(disc) = turn.next_disc() {
        let moves = turn.board().valid_moves(disc);
        let point = *moves.first().expect("next mover has a legal move");
        seconds += 1;

        let next = turn
            .place_next_at(disc, point, at(seconds))
            .expect("legal move");

        let total = |t: &Turn| t.board().count(Disc::Dark) + t.board().count(Disc::Light);
        assert_eq!(total(&next), total(&turn) + 1);
        assert_eq!(next.turn_count(), turn.turn_count() + 1);
        turn = next;
    }

    assert!(turn.turn_count() <= 60);
    assert!(!turn.board().exist_valid_move(Disc::Dark));
    assert!(!turn.board().exist_valid_move(Disc::Light));

    let dark = turn.board().count(Disc::Dark);
    let light = turn.board().count(Disc::Light);
    let expected = match dark.cmp(&light) {
        std::cmp::Ordering::Greater => Some(Disc::Dark),
        std::cmp::Ordering::Less => Some(Disc::Light),
        std::cmp::Ordering::Equal => None,
    };
    assert_eq!(turn.winner_disc(), Ok(expected));
}
