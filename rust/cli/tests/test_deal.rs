use riverboat_cli::run;
use std::collections::HashSet;

fn deal(args: &[&str]) -> (i32, String) {
    let mut argv = vec!["riverboat", "deal"];
    argv.extend_from_slice(args);
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(argv, &mut out, &mut err);
    (code, String::from_utf8_lossy(&out).into_owned())
}

#[test]
fn deal_prints_board_and_holes() {
    let (code, s) = deal(&["--seed", "1"]);
    assert_eq!(code, 0);
    assert!(s.starts_with("Seed: 1\n"));
    assert!(s.contains("Hole P1:"));
    assert!(s.contains("Hole P2:"));
    assert!(s.contains("Board: ["));
}

#[test]
fn seeded_deals_repeat_and_differ_across_seeds() {
    let (_, a) = deal(&["--seed", "77", "--seats", "3"]);
    let (_, b) = deal(&["--seed", "77", "--seats", "3"]);
    let (_, c) = deal(&["--seed", "78", "--seats", "3"]);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn no_card_is_dealt_twice() {
    let (code, s) = deal(&["--seed", "5", "--seats", "10"]);
    assert_eq!(code, 0);
    let mut cards = Vec::new();
    for line in s.lines() {
        if let Some(rest) = line.split_once(": ").map(|(_, r)| r)
            && (line.starts_with("Hole") || line.starts_with("Board"))
        {
            cards.extend(
                rest.trim_matches(|c| c == '[' || c == ']')
                    .split_whitespace()
                    .map(str::to_string),
            );
        }
    }
    assert_eq!(cards.len(), 25);
    let unique: HashSet<_> = cards.iter().collect();
    assert_eq!(unique.len(), 25);
}

#[test]
fn too_many_seats_is_a_usage_error() {
    let (code, s) = deal(&["--seats", "11"]);
    assert_eq!(code, 2);
    assert!(s.is_empty());
}
