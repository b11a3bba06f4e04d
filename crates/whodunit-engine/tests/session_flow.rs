use whodunit_engine::{
    CLAIMS_PER_ACCUSER, CaseSeed, ConsistencyChecker, EngineError, GameConfig, GameSession,
    GuessOutcome, Location, SessionState, StatedAlibis, Suspect, Weapon,
};

fn assert_normalized(beliefs: impl IntoIterator<Item = f64>) {
    let mut total = 0.0;
    for p in beliefs {
        assert!((0.0..=1.0).contains(&p), "belief {p} out of range");
        total += p;
    }
    assert!((total - 1.0).abs() < 1e-6, "beliefs sum to {total}");
}

#[test]
fn full_game_solves_the_case() {
    let mut session = GameSession::with_seed(GameConfig::default(), CaseSeed::from(2024)).unwrap();

    let dossiers = session.interview().unwrap();
    assert_eq!(dossiers.iter().count(), Suspect::LEN);

    let claims = session.publish_alibis().unwrap().clone();
    for accuser in Suspect::ALL {
        assert_eq!(claims.by(accuser).len(), CLAIMS_PER_ACCUSER);
    }

    for suspect in Suspect::ALL {
        let report = session.verify_alibi(suspect).unwrap();
        assert_eq!(report.verification.suspect, suspect);
        assert_normalized(report.beliefs.values().copied());
    }
    for suspect in Suspect::ALL {
        assert!(session.verify_alibi(suspect).unwrap_err().is_already_verified());
    }

    let deduction = session.final_deduction().unwrap();
    assert_eq!(deduction.top_suspects.len(), 2);
    let score = |i: usize| {
        let ranked = &deduction.top_suspects[i];
        ranked.probability + if ranked.csp_valid { 0.3 } else { 0.0 }
    };
    assert!(score(0) >= score(1));
    assert_normalized(deduction.beliefs.values().copied());

    let truth = session.solution();
    let outcome = session.guess(truth.killer, truth.weapon).unwrap();
    assert!(outcome.is_solved());
    assert_eq!(session.state(), SessionState::Solved);
}

#[test]
fn killer_always_lies_and_liars_are_never_alone() {
    for seed in 0..500 {
        let session = GameSession::with_seed(GameConfig::default(), CaseSeed::from(seed)).unwrap();
        let liars = session.liars();
        assert!(liars.contains(&session.solution().killer));
        assert!(liars.len() >= 2);
    }
}

#[test]
fn replay_from_seed_is_exact() {
    let seed = CaseSeed::from(31_337);
    let mut a = GameSession::with_seed(GameConfig::default(), seed).unwrap();
    let mut b = GameSession::with_seed(GameConfig::default(), seed).unwrap();
    assert_eq!(a.solution(), b.solution());
    assert_eq!(a.stated_alibis(), b.stated_alibis());
    assert_eq!(a.publish_alibis().unwrap(), b.publish_alibis().unwrap());

    for suspect in [Suspect::ZehabRose, Suspect::ChrisBlaine] {
        assert_eq!(a.verify_alibi(suspect).unwrap(), b.verify_alibi(suspect).unwrap());
    }
    assert_eq!(a.final_deduction().unwrap(), b.final_deduction().unwrap());
}

#[test]
fn three_misses_exhaust_the_budget() {
    let mut session = GameSession::with_seed(GameConfig::default(), CaseSeed::from(5)).unwrap();
    session.publish_alibis().unwrap();
    session.final_deduction().unwrap();

    let truth = session.solution();
    let wrong_weapon = Weapon::ALL
        .into_iter()
        .find(|w| *w != truth.weapon)
        .unwrap();

    for _ in 0..2 {
        let outcome = session.guess(truth.killer, wrong_weapon).unwrap();
        assert!(outcome.is_incorrect());
        assert_eq!(session.state(), SessionState::Guessing);
    }
    let outcome = session.guess(truth.killer, wrong_weapon).unwrap();
    assert_eq!(outcome, GuessOutcome::Exhausted { solution: truth });
    assert_eq!(session.tries_remaining(), 0);
    assert_eq!(
        session.guess(truth.killer, truth.weapon).unwrap_err(),
        EngineError::CaseClosed {
            state: SessionState::Exhausted,
            solution: truth,
        }
    );
}

#[test]
fn correct_guess_on_last_try_still_solves() {
    let mut session = GameSession::with_seed(GameConfig::default(), CaseSeed::from(6)).unwrap();
    session.publish_alibis().unwrap();
    session.final_deduction().unwrap();

    let truth = session.solution();
    let innocent = truth.killer.others().next().unwrap();
    session.guess(innocent, truth.weapon).unwrap();
    session.guess(innocent, truth.weapon).unwrap();
    let outcome = session.guess(truth.killer, truth.weapon).unwrap();
    assert!(matches!(
        outcome,
        GuessOutcome::Solved {
            tries_remaining: 1,
            incorrect_guesses: 2,
            ..
        }
    ));
}

#[test]
fn consistency_requires_the_crime_scene() {
    for seed in 0..100 {
        let mut rng = CaseSeed::from(seed).rng();
        for killer in Suspect::ALL {
            let stated = StatedAlibis::generate(killer, &mut rng);
            for scene in Location::ALL {
                let valid = ConsistencyChecker::new(&stated, scene).solve();
                for suspect in Suspect::ALL {
                    if stated.claimed(suspect) != scene {
                        assert!(!valid.contains(&suspect));
                    }
                }
            }
        }
    }
}

#[test]
fn status_is_idempotent() {
    let mut session = GameSession::with_seed(GameConfig::default(), CaseSeed::from(8)).unwrap();
    session.publish_alibis().unwrap();
    session.verify_alibi(Suspect::KateIvory).unwrap();
    let first = serde_json::to_value(session.status()).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(1100));
    let second = serde_json::to_value(session.status()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first["state"], "verifying_alibis");
}
