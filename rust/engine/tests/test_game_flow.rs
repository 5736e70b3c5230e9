use riverboat_engine::betting::{HandEndReason, RoundStatus};
use riverboat_engine::cards::{full_deck, parse_cards};
use riverboat_engine::deck::Deck;
use riverboat_engine::errors::GameError;
use riverboat_engine::events::TableEvent;
use riverboat_engine::game::{Table, TableConfig};
use riverboat_engine::logger::Street;
use riverboat_engine::player::{PlayerAction as A, PlayerId};

const ANA: PlayerId = PlayerId(1);
const BO: PlayerId = PlayerId(2);
const CY: PlayerId = PlayerId(3);

fn table(stacks: &[u32]) -> Table {
    let mut t = Table::new(TableConfig::default()).expect("default config is valid");
    for (i, &stack) in stacks.iter().enumerate() {
        let id = PlayerId(i as u64 + 1);
        t.sit(id, &format!("p{}", id), stack).expect("sit");
    }
    t
}

/// Deck dealing `order` front to back.
fn deck(order: &str) -> Deck {
    let mut cards = parse_cards(order).expect("valid cards");
    cards.reverse();
    Deck::stacked(cards)
}

fn run_out(t: &mut Table) -> RoundStatus {
    loop {
        let status = t.advance_street().expect("advance");
        if status.status != RoundStatus::StreetComplete {
            return status.status;
        }
    }
}

#[test]
fn heads_up_blind_flow() {
    let mut t = table(&[1000, 1000]);
    let out = t.start_hand_seeded(1).expect("start");

    assert_eq!(t.dealer(), Some(ANA));
    assert_eq!(t.seat(ANA).unwrap().street_bet(), 10);
    assert_eq!(t.seat(BO).unwrap().street_bet(), 20);
    assert_eq!(t.current_bet(), 20);
    assert_eq!(out.status, RoundStatus::AwaitingAction(ANA));
    assert!(matches!(
        out.events[0],
        TableEvent::HandStarted {
            small_blind: (ANA, 10),
            big_blind: (BO, 20),
            ..
        }
    ));

    let out = t.apply_action(ANA, A::Call).expect("call");
    assert_eq!(out.status, RoundStatus::AwaitingAction(BO));
    let out = t.apply_action(BO, A::Check).expect("check");
    assert_eq!(out.status, RoundStatus::StreetComplete);
    assert_eq!(t.pot(), 40);
    assert!(t.seats().iter().all(|s| s.street_bet() == 0));

    let out = t.advance_street().expect("flop");
    assert_eq!(t.street(), Some(Street::Flop));
    assert_eq!(t.board().len(), 3);
    // heads-up after the flop the big blind acts first
    assert_eq!(out.status, RoundStatus::AwaitingAction(BO));
}

#[test]
fn three_handed_blinds_and_first_actor() {
    let mut t = table(&[1000, 1000, 1000]);
    let out = t.start_hand_seeded(2).expect("start");
    assert_eq!(t.dealer(), Some(ANA));
    assert_eq!(t.seat(BO).unwrap().street_bet(), 10);
    assert_eq!(t.seat(CY).unwrap().street_bet(), 20);
    assert_eq!(out.status, RoundStatus::AwaitingAction(ANA));
}

#[test]
fn big_blind_keeps_the_option_after_limps() {
    let mut t = table(&[1000, 1000, 1000]);
    t.start_hand_seeded(3).unwrap();
    t.apply_action(ANA, A::Call).unwrap();
    let out = t.apply_action(BO, A::Call).unwrap();
    assert_eq!(out.status, RoundStatus::AwaitingAction(CY));
    let out = t.apply_action(CY, A::Raise(40)).unwrap();
    assert_eq!(t.current_bet(), 60);
    assert_eq!(out.status, RoundStatus::AwaitingAction(ANA));
}

#[test]
fn button_rotates_every_hand() {
    let mut t = table(&[1000, 1000, 1000]);
    for expected in [ANA, BO, CY, ANA] {
        t.start_hand_seeded(4).unwrap();
        assert_eq!(t.dealer(), Some(expected));
        t.abort_hand().unwrap();
        t.end_hand().unwrap();
    }
}

#[test]
fn all_in_side_pot_flow() {
    let mut t = table(&[500, 500, 1000]);
    t.start_hand_seeded(5).unwrap();
    t.apply_action(ANA, A::Raise(1000)).unwrap();
    assert!(t.seat(ANA).unwrap().is_all_in());
    t.apply_action(BO, A::Call).unwrap();
    let out = t.apply_action(CY, A::Fold).unwrap();
    assert_eq!(out.status, RoundStatus::StreetComplete);
    assert_eq!(t.pot(), 1020);
    assert!(t.is_runout());

    let before = t.total_chips();
    let mut pots = Vec::new();
    loop {
        let out = t.advance_street().unwrap();
        assert_eq!(t.total_chips(), before);
        for ev in &out.events {
            if let TableEvent::PotAwarded { amount, winners, .. } = ev {
                pots.push((*amount, winners.clone()));
            }
            assert!(!matches!(ev, TableEvent::ActionPrompt { .. }));
        }
        if let RoundStatus::HandComplete(reason) = out.status {
            assert_eq!(reason, HandEndReason::ShowdownReached);
            break;
        }
    }
    assert_eq!(t.board().len(), 5);
    assert_eq!(pots.len(), 2);
    assert_eq!(pots[0].0, 60);
    assert_eq!(pots[1].0, 960);
    assert_eq!(t.seat(CY).unwrap().stack(), 980);

    let end = t.end_hand().unwrap();
    let total: u32 = end.final_stacks.iter().map(|(_, s)| s).sum();
    assert_eq!(total, 2000);
}

#[test]
fn showdown_pays_the_best_hand() {
    let mut t = table(&[1000, 1000]);
    // ana: aces, bo: seven-deuce; board pairs kings
    t.start_hand_with_deck(deck("As Ah 2c 7d Ks Kd 9h 4c 3s"))
        .unwrap();
    t.apply_action(ANA, A::Call).unwrap();
    t.apply_action(BO, A::Check).unwrap();
    for _ in 0..3 {
        t.advance_street().unwrap();
        t.apply_action(BO, A::Check).unwrap();
        t.apply_action(ANA, A::Check).unwrap();
    }
    let out = t.advance_street().unwrap();
    assert_eq!(
        out.status,
        RoundStatus::HandComplete(HandEndReason::ShowdownReached)
    );
    assert!(matches!(&out.events[0], TableEvent::ShowdownSummary { hands } if hands.len() == 2));
    assert_eq!(t.seat(ANA).unwrap().stack(), 1020);
    assert_eq!(t.seat(BO).unwrap().stack(), 980);
}

#[test]
fn board_tie_splits_the_pot() {
    let mut t = table(&[1000, 1000]);
    t.start_hand_with_deck(deck("2c 3d 4h 5s Ah Ks Qc Jd 10h"))
        .unwrap();
    t.apply_action(ANA, A::Call).unwrap();
    t.apply_action(BO, A::Check).unwrap();
    for _ in 0..3 {
        t.advance_street().unwrap();
        t.apply_action(BO, A::Check).unwrap();
        t.apply_action(ANA, A::Check).unwrap();
    }
    let dist = t.resolve_showdown().unwrap();
    assert_eq!(dist.total, 40);
    assert_eq!(dist.awards[0].winners, vec![ANA, BO]);
    assert_eq!(dist.winnings, vec![(ANA, 20), (BO, 20)]);
    assert_eq!(t.seat(ANA).unwrap().stack(), 1000);
}

#[test]
fn uncalled_raise_returns_through_its_own_pot() {
    let mut t = table(&[1000, 300]);
    // bo cannot match ana's shove; the excess comes back to ana
    t.start_hand_with_deck(deck("2c 7d As Ah Ks Kd 9h 4c 3s"))
        .unwrap();
    t.apply_action(ANA, A::Raise(1000)).unwrap();
    let out = t.apply_action(BO, A::Call).unwrap();
    assert_eq!(out.status, RoundStatus::StreetComplete);
    run_out(&mut t);
    assert_eq!(t.seat(BO).unwrap().stack(), 600);
    assert_eq!(t.seat(ANA).unwrap().stack(), 700);
}

#[test]
fn everyone_folding_to_one_skips_evaluation() {
    let mut t = table(&[1000, 1000, 1000]);
    t.start_hand_seeded(6).unwrap();
    t.apply_action(ANA, A::Raise(60)).unwrap();
    t.apply_action(BO, A::Fold).unwrap();
    let out = t.apply_action(CY, A::Fold).unwrap();
    assert_eq!(
        out.status,
        RoundStatus::HandComplete(HandEndReason::AllButOneFolded)
    );
    assert!(!out
        .events
        .iter()
        .any(|e| matches!(e, TableEvent::ShowdownSummary { .. })));
    assert_eq!(t.seat(ANA).unwrap().stack(), 1030);
    assert_eq!(t.board().len(), 0);
}

#[test]
fn short_big_blind_closes_preflop_after_call() {
    let mut t = table(&[1000, 15]);
    let out = t.start_hand_seeded(7).unwrap();
    assert!(t.seat(BO).unwrap().is_all_in());
    assert_eq!(t.current_bet(), 15);
    assert_eq!(out.status, RoundStatus::AwaitingAction(ANA));
    let out = t.apply_action(ANA, A::Call).unwrap();
    assert_eq!(out.status, RoundStatus::StreetComplete);
    assert_eq!(t.pot(), 30);
    assert!(matches!(run_out(&mut t), RoundStatus::HandComplete(_)));
}

#[test]
fn illegal_actions_leave_state_untouched() {
    let mut t = table(&[1000, 1000, 1000]);
    t.start_hand_seeded(8).unwrap();
    let before = t.view();

    assert_eq!(
        t.apply_action(BO, A::Call),
        Err(GameError::NotPlayersTurn {
            expected: ANA,
            actual: BO
        })
    );
    assert_eq!(
        t.apply_action(PlayerId(9), A::Call),
        Err(GameError::UnknownSeat(PlayerId(9)))
    );
    assert_eq!(
        t.apply_action(ANA, A::Check),
        Err(GameError::CannotCheck { owed: 20 })
    );
    assert!(matches!(
        t.apply_action(ANA, A::Raise(5)),
        Err(GameError::InvalidRaise { .. })
    ));
    assert_eq!(t.view(), before);

    t.apply_action(ANA, A::Fold).unwrap();
    t.apply_action(BO, A::Call).unwrap();
    assert_eq!(
        t.apply_action(ANA, A::Call),
        Err(GameError::PlayerAlreadyFolded(ANA))
    );
}

#[test]
fn lifecycle_guards() {
    let mut t = table(&[1000]);
    assert_eq!(
        t.start_hand_seeded(1).unwrap_err(),
        GameError::NotEnoughPlayers {
            needed: 2,
            actual: 1
        }
    );
    t.sit(BO, "bo", 1000).unwrap();
    assert_eq!(t.end_hand().unwrap_err(), GameError::NoHandInProgress);

    t.start_hand_seeded(1).unwrap();
    assert_eq!(t.start_hand_seeded(2).unwrap_err(), GameError::HandInProgress);
    assert_eq!(t.advance_street().unwrap_err(), GameError::StreetNotComplete);
    assert_eq!(t.end_hand().unwrap_err(), GameError::HandNotComplete);
    assert_eq!(t.sit(CY, "cy", 100).unwrap_err(), GameError::HandInProgress);
    assert_eq!(t.leave(ANA).unwrap_err(), GameError::HandInProgress);

    t.apply_action(ANA, A::Call).unwrap();
    t.apply_action(BO, A::Check).unwrap();
    assert_eq!(
        t.apply_action(BO, A::Check).unwrap_err(),
        GameError::NoActionPending
    );
}

#[test]
fn seating_rules() {
    let config = TableConfig {
        max_seats: 2,
        ..TableConfig::default()
    };
    let mut t = Table::new(config).unwrap();
    assert!(matches!(
        t.sit(ANA, "a-name-well-over-twenty", 100),
        Err(GameError::InvalidName(_))
    ));
    assert_eq!(t.sit(ANA, "ana", 0), Err(GameError::EmptyStack(ANA)));
    t.sit(ANA, "ana", 100).unwrap();
    assert_eq!(t.sit(ANA, "ana", 100), Err(GameError::AlreadySeated(ANA)));
    t.sit(BO, "bo", 100).unwrap();
    assert_eq!(t.sit(CY, "cy", 100), Err(GameError::TableFull(2)));
    let gone = t.leave(BO).unwrap();
    assert_eq!(gone.stack(), 100);
    assert_eq!(t.leave(BO).unwrap_err(), GameError::UnknownSeat(BO));
}

#[test]
fn invalid_config_is_rejected() {
    let bad = TableConfig {
        small_blind: 30,
        big_blind: 20,
        ..TableConfig::default()
    };
    assert!(matches!(Table::new(bad), Err(GameError::InvalidConfig(_))));
}

#[test]
fn hole_and_board_cards_never_collide() {
    let mut t = table(&[1000, 1000, 1000, 1000]);
    t.start_hand_seeded(99).unwrap();
    assert_eq!(t.deck_remaining(), Some(52 - 8));
    while t.outcome().is_none() {
        match t.actor() {
            Some(seat) => {
                t.apply_action(seat, A::Call).unwrap();
            }
            None => {
                t.advance_street().unwrap();
            }
        }
    }
    let mut seen: Vec<_> = t.board().to_vec();
    for s in t.seats() {
        seen.extend(s.hole_cards().unwrap());
    }
    let unique: std::collections::HashSet<_> = seen.iter().collect();
    assert_eq!(unique.len(), seen.len());
    assert_eq!(seen.len(), 13);
}

#[test]
fn deck_exhaustion_aborts_and_refunds() {
    let mut t = table(&[1000, 1000]);
    let five: Vec<_> = full_deck().into_iter().take(5).collect();
    t.start_hand_with_deck(Deck::stacked(five)).unwrap();
    t.apply_action(ANA, A::Raise(40)).unwrap();
    t.apply_action(BO, A::Call).unwrap();

    assert_eq!(t.advance_street().unwrap_err(), GameError::DeckExhausted);
    assert_eq!(t.outcome(), Some(HandEndReason::Aborted));
    assert_eq!(t.board().len(), 0);
    let end = t.end_hand().unwrap();
    assert_eq!(end.final_stacks, vec![(ANA, 1000), (BO, 1000)]);
}

#[test]
fn short_deck_fails_before_any_chip_moves() {
    let mut t = table(&[1000, 1000]);
    let three: Vec<_> = full_deck().into_iter().take(3).collect();
    assert_eq!(
        t.start_hand_with_deck(Deck::stacked(three)).unwrap_err(),
        GameError::DeckExhausted
    );
    assert!(!t.is_hand_in_progress());
    assert_eq!(t.dealer(), None);
    assert_eq!(t.seat(ANA).unwrap().stack(), 1000);
}

#[test]
fn abort_refunds_committed_chips() {
    let mut t = table(&[1000, 1000, 1000]);
    t.start_hand_seeded(10).unwrap();
    t.apply_action(ANA, A::Raise(100)).unwrap();
    t.apply_action(BO, A::Call).unwrap();
    let out = t.abort_hand().unwrap();
    match &out.events[0] {
        TableEvent::HandAborted { refunds } => {
            assert_eq!(refunds, &vec![(ANA, 120), (BO, 120), (CY, 20)]);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(t.abort_hand().unwrap_err(), GameError::HandAlreadyComplete);
    let end = t.end_hand().unwrap();
    assert!(end.final_stacks.iter().all(|&(_, s)| s == 1000));
    assert_eq!(end.record.result.as_deref(), Some("aborted"));
}

#[test]
fn view_never_leaks_hole_cards() {
    let mut t = table(&[1000, 1000]);
    t.start_hand_seeded(11).unwrap();
    assert!(t.hole_cards(ANA).is_some());
    // preflop the board is empty, so no card may appear anywhere
    let json = serde_json::to_string(&t.view()).unwrap();
    assert!(!json.contains("rank"));
    assert!(t.view().token.is_some());
}
