use block_slide_board::{apply, placement, query, Board, GridLayout, Placement, ShapeCatalog};
use block_slide_core::{
    CellCoord, CellOffset, Command, DragInput, DragOutcome, DragRejection, Event, PieceId,
    ShapeFootprint,
};
use block_slide_system_drag::{DragError, DragSession};
use glam::Vec3;

const MOVER: PieceId = PieceId::new(0);
const BLOCKER: PieceId = PieceId::new(1);

/// 4x5 unit grid with a single-cell mover at (0, 0) and a blocker at (1, 0).
fn board_with_blocker() -> Board {
    board_with_mover(ShapeFootprint::single_cell(), CellCoord::new(0, 0))
}

fn board_with_mover(footprint: ShapeFootprint, pivot: CellCoord) -> Board {
    board_on_layout(GridLayout::new(4, 5, 1.0), footprint, pivot)
}

fn board_on_layout(layout: GridLayout, footprint: ShapeFootprint, pivot: CellCoord) -> Board {
    let grid = layout.build().expect("valid layout");
    let mut shapes = ShapeCatalog::new();
    let mover = shapes.register("mover", footprint).expect("unique name");
    let single = shapes
        .register("single", ShapeFootprint::single_cell())
        .expect("unique name");
    let mut board = Board::new(grid, shapes);

    let mut events = Vec::new();
    apply(
        &mut board,
        Command::PlacePiece {
            shape: mover,
            pivot,
        },
        &mut events,
    )
    .expect("valid command");
    apply(
        &mut board,
        Command::PlacePiece {
            shape: single,
            pivot: CellCoord::new(1, 0),
        },
        &mut events,
    )
    .expect("valid command");
    assert_eq!(query::pieces(&board).len(), 2, "both pieces fit");
    board
}

fn anchor(board: &Board, cell: CellCoord) -> Vec3 {
    query::grid(board)
        .world_from_coordinate(cell)
        .expect("inside the grid")
}

fn grab(session: &mut DragSession, board: &mut Board, piece: PieceId) -> Vec<Event> {
    let point = query::piece(board, piece)
        .and_then(|snapshot| snapshot.placement.settled_pivot())
        .map_or(Vec3::ZERO, |pivot| anchor(board, pivot));
    let mut events = Vec::new();
    session
        .handle(board, DragInput::Grab { piece, point }, &mut events)
        .expect("grab succeeds");
    events
}

fn drag(session: &mut DragSession, board: &mut Board, point: Vec3) -> Vec<Event> {
    let mut events = Vec::new();
    session
        .handle(board, DragInput::Drag { point }, &mut events)
        .expect("drag succeeds");
    events
}

fn release(session: &mut DragSession, board: &mut Board, at: Option<Vec3>) -> Vec<Event> {
    let mut events = Vec::new();
    session
        .handle(board, DragInput::Release { at }, &mut events)
        .expect("release succeeds");
    events
}

#[test]
fn grab_lifts_the_piece_and_vacates_its_cells() {
    let mut board = board_with_blocker();
    let mut session = DragSession::new();

    let events = grab(&mut session, &mut board, MOVER);

    assert_eq!(
        events,
        vec![
            Event::PieceLifted {
                piece: MOVER,
                from: CellCoord::new(0, 0),
            },
            Event::DragStarted {
                piece: MOVER,
                from: CellCoord::new(0, 0),
            },
        ]
    );
    assert_eq!(session.active_piece(), Some(MOVER));
    assert_eq!(
        query::grid(&board).is_occupied(CellCoord::new(0, 0)),
        Ok(false)
    );
    assert_eq!(
        query::grid(&board).is_occupied(CellCoord::new(1, 0)),
        Ok(true)
    );
}

#[test]
fn drag_advances_one_cell_per_update_around_the_blocker() {
    let mut board = board_with_blocker();
    let mut session = DragSession::new();
    let _ = grab(&mut session, &mut board, MOVER);
    let target = anchor(&board, CellCoord::new(3, 0));

    let mut visited = vec![CellCoord::new(0, 0)];
    for _ in 0..10 {
        match drag(&mut session, &mut board, target).as_slice() {
            [Event::PieceStepped {
                from, to, position, ..
            }] => {
                assert_eq!(Some(from), visited.last(), "steps start where the last ended");
                assert!(from.is_adjacent(*to), "{from} -> {to} skips a cell");
                assert_eq!(*position, anchor(&board, *to));
                visited.push(*to);
            }
            [Event::PieceHeld { cell, .. }] => {
                assert_eq!(*cell, CellCoord::new(3, 0));
                break;
            }
            other => panic!("unexpected drag events {other:?}"),
        }
    }

    assert_eq!(
        visited,
        vec![
            CellCoord::new(0, 0),
            CellCoord::new(0, 1),
            CellCoord::new(1, 1),
            CellCoord::new(2, 1),
            CellCoord::new(2, 0),
            CellCoord::new(3, 0),
        ]
    );
    assert_eq!(session.last_valid(), Some(CellCoord::new(3, 0)));

    let events = release(&mut session, &mut board, None);
    assert_eq!(
        events,
        vec![
            Event::PieceSettled {
                piece: MOVER,
                pivot: CellCoord::new(3, 0),
            },
            Event::DragEnded {
                piece: MOVER,
                pivot: CellCoord::new(3, 0),
                position: anchor(&board, CellCoord::new(3, 0)),
                outcome: DragOutcome::Committed,
            },
        ]
    );
    assert_eq!(session.active_piece(), None);
    assert_eq!(query::grid(&board).occupied_count(), 2);
    assert_eq!(query::piece_at(&board, CellCoord::new(3, 0)), Some(MOVER));
}

#[test]
fn release_over_an_occupied_cell_reverts_to_the_last_legal_cell() {
    let mut board = board_with_blocker();
    let mut session = DragSession::new();
    let _ = grab(&mut session, &mut board, MOVER);
    let a = anchor(&board, CellCoord::new(0, 3));
    let _ = drag(&mut session, &mut board, a);
    assert_eq!(session.last_valid(), Some(CellCoord::new(0, 1)));

    let events = release(&mut session, &mut board, Some(Vec3::new(1.1, 0.0, 0.1)));

    assert_eq!(
        events.last(),
        Some(&Event::DragEnded {
            piece: MOVER,
            pivot: CellCoord::new(0, 1),
            position: anchor(&board, CellCoord::new(0, 1)),
            outcome: DragOutcome::Reverted,
        })
    );
    assert_eq!(
        query::piece(&board, BLOCKER).map(|snapshot| snapshot.placement),
        Some(Placement::Settled {
            pivot: CellCoord::new(1, 0)
        }),
        "the blocker never moves"
    );
    assert_eq!(
        query::grid(&board).is_occupied(CellCoord::new(1, 0)),
        Ok(true)
    );
    assert_eq!(
        query::grid(&board).is_occupied(CellCoord::new(0, 1)),
        Ok(true)
    );
    assert_eq!(query::grid(&board).occupied_count(), 2);
}

#[test]
fn release_position_overrides_the_tracked_target() {
    let mut board = board_with_blocker();
    let mut session = DragSession::new();
    let _ = grab(&mut session, &mut board, MOVER);
    let a = anchor(&board, CellCoord::new(0, 4));
    let _ = drag(&mut session, &mut board, a);

    let events = release(&mut session, &mut board, Some(Vec3::new(0.1, 0.0, 0.45)));

    assert_eq!(
        events.last(),
        Some(&Event::DragEnded {
            piece: MOVER,
            pivot: CellCoord::new(0, 0),
            position: anchor(&board, CellCoord::new(0, 0)),
            outcome: DragOutcome::Committed,
        }),
        "a piece caught mid-step settles where it is shown"
    );
}

#[test]
fn grab_offset_keeps_the_piece_under_the_pointer() {
    let mut board = board_with_blocker();
    let mut session = DragSession::new();
    let mut events = Vec::new();
    session
        .handle(
            &mut board,
            DragInput::Grab {
                piece: MOVER,
                point: Vec3::new(0.3, 0.0, 0.2),
            },
            &mut events,
        )
        .expect("grab succeeds");

    let events = drag(&mut session, &mut board, Vec3::new(0.3, 0.0, 1.2));

    assert!(
        matches!(
            events.as_slice(),
            [Event::PieceStepped { to, .. }] if *to == CellCoord::new(0, 1)
        ),
        "pointer moved one cell south of the grab point: {events:?}"
    );
}

#[test]
fn second_grab_is_rejected_while_dragging() {
    let mut board = board_with_blocker();
    let mut session = DragSession::new();
    let _ = grab(&mut session, &mut board, MOVER);

    let events = grab(&mut session, &mut board, BLOCKER);

    assert_eq!(
        events,
        vec![Event::DragRejected {
            piece: BLOCKER,
            reason: DragRejection::SessionBusy { active: MOVER },
        }]
    );
    assert_eq!(session.active_piece(), Some(MOVER));
    assert_eq!(
        query::grid(&board).is_occupied(CellCoord::new(1, 0)),
        Ok(true)
    );
}

#[test]
fn grabs_of_missing_or_airborne_pieces_are_rejected() {
    let mut board = board_with_blocker();
    let mut session = DragSession::new();

    let missing = grab(&mut session, &mut board, PieceId::new(7));
    assert_eq!(
        missing,
        vec![Event::DragRejected {
            piece: PieceId::new(7),
            reason: DragRejection::UnknownPiece,
        }]
    );

    let mut events = Vec::new();
    apply(&mut board, Command::LiftPiece { piece: MOVER }, &mut events).expect("settled piece");
    let airborne = grab(&mut session, &mut board, MOVER);
    assert_eq!(
        airborne,
        vec![Event::DragRejected {
            piece: MOVER,
            reason: DragRejection::PieceUnavailable,
        }]
    );
    assert_eq!(session.active_piece(), None);
}

#[test]
fn pointer_off_the_grid_is_clamped_for_multi_cell_pieces() {
    let vertical_domino =
        ShapeFootprint::new(vec![CellOffset::new(0, 0), CellOffset::new(0, 1)])
            .expect("valid footprint");
    let mut board = board_with_mover(vertical_domino.clone(), CellCoord::new(0, 2));
    let mut session = DragSession::new();
    let _ = grab(&mut session, &mut board, MOVER);

    for _ in 0..10 {
        let events = drag(&mut session, &mut board, Vec3::new(-20.0, 0.0, -20.0));
        if matches!(events.as_slice(), [Event::PieceHeld { .. }]) {
            break;
        }
    }

    let resting = session.last_valid().expect("drag is active");
    assert_eq!(resting, CellCoord::new(0, 1), "upper cell stops at the top row");
    assert!(placement::fits(
        query::grid(&board),
        resting,
        &vertical_domino
    ));
}

#[test]
fn stranded_piece_keeps_the_drag_active() {
    let mut board = board_with_blocker();
    let mut session = DragSession::new();
    let _ = grab(&mut session, &mut board, MOVER);

    let mut events = Vec::new();
    apply(
        &mut board,
        Command::PlacePiece {
            shape: block_slide_core::ShapeId::new(1),
            pivot: CellCoord::new(0, 0),
        },
        &mut events,
    )
    .expect("valid command");

    let error = session
        .handle(
            &mut board,
            DragInput::Release {
                at: Some(Vec3::ZERO),
            },
            &mut events,
        )
        .expect_err("origin is now occupied");

    assert_eq!(error, DragError::Stranded { piece: MOVER });
    assert_eq!(session.active_piece(), Some(MOVER));
}

#[test]
fn tall_piece_steps_along_a_spaced_centred_grid() {
    let tall = ShapeFootprint::new(vec![
        CellOffset::new(0, 0),
        CellOffset::new(0, 1),
        CellOffset::new(0, 2),
    ])
    .expect("valid footprint");
    let layout = GridLayout {
        spacing: 0.5,
        centered: true,
        ..GridLayout::new(4, 5, 1.0)
    };
    let mut board = board_on_layout(layout, tall.clone(), CellCoord::new(0, 4));
    let mut session = DragSession::new();
    let _ = grab(&mut session, &mut board, MOVER);

    let mut visited = vec![CellCoord::new(0, 4)];
    for _ in 0..10 {
        match drag(&mut session, &mut board, Vec3::new(-2.25, 0.0, -50.0)).as_slice() {
            [Event::PieceStepped { to, position, .. }] => {
                assert_eq!(*position, anchor(&board, *to));
                visited.push(*to);
            }
            [Event::PieceHeld { .. }] => break,
            other => panic!("unexpected drag events {other:?}"),
        }
    }

    assert_eq!(
        visited,
        vec![
            CellCoord::new(0, 4),
            CellCoord::new(0, 3),
            CellCoord::new(0, 2),
        ],
        "the pivot stops where the top cell reaches the first row"
    );
    assert!(placement::fits(query::grid(&board), CellCoord::new(0, 2), &tall));

    let events = release(&mut session, &mut board, None);
    assert_eq!(
        events.last(),
        Some(&Event::DragEnded {
            piece: MOVER,
            pivot: CellCoord::new(0, 2),
            position: anchor(&board, CellCoord::new(0, 2)),
            outcome: DragOutcome::Committed,
        })
    );
}
