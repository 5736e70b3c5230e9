use std::fs;
use std::path::PathBuf;

use riverboat_engine::cards::{Card, Rank as R, Suit as S};
use riverboat_engine::game::{Table, TableConfig};
use riverboat_engine::logger::{ActionRecord, HandLogger, HandRecord, Street};
use riverboat_engine::player::{PlayerAction, PlayerId};
use riverboat_engine::rules::ValidatedAction;

fn tmp_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("target");
    p.push(format!("{}_{}.jsonl", name, std::process::id()));
    p
}

fn sample(hand_id: &str) -> HandRecord {
    HandRecord {
        hand_id: hand_id.to_string(),
        seed: Some(1),
        dealer: PlayerId(1),
        small_blind: 10,
        big_blind: 20,
        posted: vec![(PlayerId(1), 10), (PlayerId(2), 20)],
        actions: vec![ActionRecord {
            seat: PlayerId(1),
            street: Street::Preflop,
            action: ValidatedAction::Call { pay: 10 },
            amount: 10,
            auto: false,
        }],
        board: vec![Card::new(R::Ace, S::Clubs)],
        awards: vec![],
        showdown: vec![],
        results: vec![],
        result: Some("showdown".to_string()),
        ts: None,
        meta: None,
    }
}

#[test]
fn writes_jsonl_with_lf_only() {
    let path = tmp_path("handlog");
    let mut logger = HandLogger::create(&path).expect("create logger");
    logger.write(&sample("20250102-000001")).expect("write");
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
}

#[test]
fn sequential_ids_increment() {
    let mut logger = HandLogger::with_seq_for_test("20251231");
    assert_eq!(logger.next_id(), "20251231-000001");
    assert_eq!(logger.next_id(), "20251231-000002");
}

#[test]
fn ts_is_generated_when_missing_and_preserved_when_present() {
    let path = tmp_path("handlog_ts");
    let mut logger = HandLogger::create(&path).expect("create logger");
    let rec = sample("20250102-000010");
    logger.write(&rec).expect("write");
    let line = String::from_utf8(fs::read(&path).unwrap()).unwrap();
    assert!(line.contains("\"ts\":"), "ts should be injected");

    let preset = "2030-01-01T00:00:00Z".to_string();
    let rec2 = HandRecord {
        ts: Some(preset.clone()),
        ..rec
    };
    logger.write(&rec2).expect("write2");
    let content = String::from_utf8(fs::read(&path).unwrap()).unwrap();
    assert!(content.contains(&preset), "preset ts must be kept");
    assert_eq!(content.lines().count(), 2);
}

#[test]
fn end_hand_record_round_trips_through_the_log() {
    let mut t = Table::new(TableConfig::default()).unwrap();
    t.sit(PlayerId(1), "ana", 1000).unwrap();
    t.sit(PlayerId(2), "bo", 1000).unwrap();
    t.start_hand_seeded(42).unwrap();
    t.apply_action(PlayerId(1), PlayerAction::Raise(40)).unwrap();
    t.apply_action(PlayerId(2), PlayerAction::Fold).unwrap();
    let end = t.end_hand().unwrap();

    let record = &end.record;
    assert_eq!(record.seed, Some(42));
    assert_eq!(record.hand_id, end.hand_id);
    assert_eq!(record.actions.len(), 2);
    assert_eq!(record.actions[0].amount, 50);
    assert_eq!(record.result.as_deref(), Some("all_but_one_folded"));
    assert_eq!(record.awards[0].winners, vec![PlayerId(1)]);
    assert_eq!(record.awards[0].pot.amount, 80);

    let path = tmp_path("handlog_table");
    let mut logger = HandLogger::create(&path).unwrap();
    logger.write(record).unwrap();
    let line = fs::read_to_string(&path).unwrap();
    let parsed: HandRecord = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(parsed.actions, record.actions);
    assert_eq!(parsed.results, record.results);
    assert!(parsed.ts.is_some());
}

#[test]
fn street_order() {
    let mut s = Street::Preflop;
    let mut seen = vec![s];
    while let Some(n) = s.next() {
        seen.push(n);
        s = n;
    }
    assert_eq!(
        seen,
        vec![
            Street::Preflop,
            Street::Flop,
            Street::Turn,
            Street::River,
            Street::Showdown
        ]
    );
    assert_eq!(Street::Flop.cards_revealed(), 3);
}
