use std::fs;

use montyhall_engine::engine::Engine;
use montyhall_engine::game::Strategy;
use montyhall_engine::logger::{read_results, ResultLogger};
use montyhall_engine::result::SequentialIds;
use montyhall_engine::stats::Statistics;

fn play_rounds(engine: &mut Engine, n: usize) -> Vec<montyhall_engine::result::GameResult> {
    let mut out = Vec::new();
    for i in 0..n {
        let round = engine.new_round();
        let first = montyhall_engine::door::DoorId::ALL[i % 3];
        let revealed = engine.choose_initial(&round, first).unwrap();
        let last = if i % 2 == 0 {
            first
        } else {
            revealed.switch_target().unwrap()
        };
        let done = engine.choose_final(&revealed, last).unwrap();
        out.push(engine.result(&done, "log-test").unwrap());
    }
    out
}

#[test]
fn writes_jsonl_with_lf_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("results.jsonl");
    let mut engine = Engine::with_ids(Some(10), Box::new(SequentialIds::new("r")));
    let results = play_rounds(&mut engine, 3);

    let mut logger = ResultLogger::create(&path).expect("create logger");
    for r in &results {
        logger.write(r).expect("write");
    }
    assert_eq!(logger.written(), 3);

    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
    assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 3);
}

#[test]
fn logged_results_read_back_into_stats() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("results.jsonl");
    let mut engine = Engine::new(Some(11));
    let results = play_rounds(&mut engine, 6);

    {
        let mut logger = ResultLogger::create(&path).unwrap();
        for r in &results[..3] {
            logger.write(r).unwrap();
        }
    }
    // reopening appends
    {
        let mut logger = ResultLogger::create(&path).unwrap();
        for r in &results[3..] {
            logger.write(r).unwrap();
        }
    }

    let log = read_results(&fs::read_to_string(&path).unwrap());
    assert_eq!(log.skipped, 0);
    assert_eq!(log.results, results);

    let stats = Statistics::from_results(&log.results);
    assert_eq!(stats.total_games, 6);
    assert_eq!(stats.stay_total, 3);
    assert_eq!(stats.switch_total, 3);
    assert!(log.results.iter().any(|r| r.strategy == Strategy::Switch));
}
