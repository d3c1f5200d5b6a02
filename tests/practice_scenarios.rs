use khatt::config::Config;
use khatt::engine::letter_stats::LetterStat;
use khatt::keyboard::mapper::MappingIntent;
use khatt::session::practice::{InputEffect, PracticeSession};
use khatt::session::tracker::TypeOutcome;
use khatt::store::StateStore;
use khatt::store::json_store::JsonStore;
use khatt::store::memory::MemoryStore;
use khatt::store::schema::PersistedState;
use tempfile::TempDir;

fn stored_session(raw: &str, config: Config) -> (MemoryStore, PracticeSession) {
    let store = MemoryStore::new(PersistedState {
        config,
        text: Some(raw.to_string()),
        ..PersistedState::default()
    });
    let session = PracticeSession::with_store(Box::new(store.clone()));
    (store, session)
}

#[test]
fn two_line_walkthrough_with_auto_advance() {
    let (store, mut session) = stored_session("اب\nتث", Config::default());

    session.type_char('ا');
    session.type_char('ب');

    assert_eq!(session.active_line(), 1);
    assert_eq!(session.stats().correct_chars, 2);
    assert_eq!(session.progress()[0], "اب");

    // Nothing to delete on the fresh line.
    session.delete_char(1);
    assert_eq!(session.active_line(), 1);
    assert_eq!(session.stats().correct_chars, 2);

    session.backspace();
    assert_eq!(session.active_line(), 0);
    assert_eq!(session.progress()[0], "اب");

    let saved = store.snapshot();
    assert_eq!(saved.active_line, 0);
    assert_eq!(saved.progress, vec!["اب".to_string(), String::new()]);
    assert_eq!(saved.stats.correct_chars, 2);
}

#[test]
fn letter_statistics_count_attempts_and_successes() {
    let mut session = PracticeSession::new(Config::default(), "اا");

    session.type_char('ا');
    session.type_char('ب');

    assert_eq!(
        session.letter_stats().get('ا'),
        Some(&LetterStat {
            attempts: 2,
            successes: 1
        })
    );
    assert_eq!(session.letter_stats().len(), 1);
}

#[test]
fn deleting_restores_counters_but_not_letters() {
    let mut session = PracticeSession::new(Config::default(), "أبت");
    let before = session.stats();

    session.type_char('ا');
    session.type_char('ب');
    session.type_char('x');
    assert_eq!(session.stats().close_matches, 1);
    assert_eq!(session.stats().correct_chars, 1);
    assert_eq!(session.stats().mistakes, 1);

    session.delete_char(3);
    assert_eq!(session.stats(), before);
    assert_eq!(session.letter_stats().len(), 3);
}

#[test]
fn strict_mode_rejects_without_side_effects() {
    let config = Config {
        strict_mode: true,
        ..Config::default()
    };
    let (store, mut session) = stored_session("اب", config);

    let outcome = session.type_char('ب');

    assert_eq!(outcome, TypeOutcome::Rejected { expected: Some('ا') });
    assert_eq!(session.progress()[0], "");
    assert_eq!(session.stats().total(), 0);
    assert!(session.letter_stats().is_empty());
    assert_eq!(store.save_count(), 0);
}

#[test]
fn latin_input_enables_mapping_and_types_arabic() {
    let mut session = PracticeSession::new(Config::default(), "اب");

    let first = session.handle_char('h', false);
    assert_eq!(first.intent, MappingIntent::Enable);
    assert!(session.config().use_key_mapping);

    let second = session.handle_char('f', false);
    assert_eq!(second.intent, MappingIntent::NoChange);
    assert!(matches!(second.effect, InputEffect::Typed(TypeOutcome::Accepted { .. })));
    assert_eq!(session.progress()[0], "اب");
    assert_eq!(session.stats().correct_chars, 2);

    let third = session.handle_char('ب', false);
    assert_eq!(third.intent, MappingIntent::Disable);
    assert!(!session.config().use_key_mapping);
}

#[test]
fn space_on_finished_line_moves_on() {
    let config = Config {
        auto_advance: false,
        ..Config::default()
    };
    let mut session = PracticeSession::new(config, "ا\nب");

    session.handle_char('ا', false);
    assert_eq!(session.active_line(), 0);

    let handled = session.handle_char(' ', false);
    assert_eq!(handled.effect, InputEffect::Advanced);
    assert_eq!(session.active_line(), 1);
    assert_eq!(session.progress()[0], "ا");
}

#[test]
fn replacing_text_resizes_progress() {
    let mut session = PracticeSession::new(Config::default(), "ا\nب\nت");
    session.type_char('ا');

    session.set_text("ا");
    assert_eq!(session.progress().len(), 1);
    assert_eq!(session.progress()[0], "ا");

    session.set_text("ا\nب\nت\nث\nج");
    assert_eq!(session.progress().len(), 5);
    assert_eq!(session.stats().total(), 0);
}

#[test]
fn json_store_resumes_where_the_last_run_stopped() {
    let dir = TempDir::new().unwrap();

    {
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut session = PracticeSession::with_store(Box::new(store));
        session.set_text("سلام\nعليكم");
        for ch in "سلام".chars() {
            session.type_char(ch);
        }
        session.set_layout("arabic-101");
        session.update_config(|c| c.strict_mode = true);
    }

    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let state = store.load();
    assert_eq!(state.config.keyboard_layout, "arabic-101");
    assert!(state.config.strict_mode);
    assert_eq!(state.active_line, 1);

    let session = PracticeSession::with_store(Box::new(store));
    assert_eq!(session.line_count(), 2);
    assert_eq!(session.progress()[0], "سلام");
    assert_eq!(session.progress()[1], "");
    assert_eq!(session.stats().correct_chars, 4);
    assert_eq!(session.letter_stats().accuracy('س'), Some(1.0));
}

#[test]
fn unknown_layout_falls_back_to_default() {
    let mut session = PracticeSession::new(Config::default(), "ا");
    session.set_layout("dvorak-arabic");
    assert_eq!(session.config().keyboard_layout, "osx-arabic");
    assert_eq!(session.map_key('h', false), Some('ا'));
}

#[test]
fn relaunch_with_same_text_keeps_statistics() {
    let dir = TempDir::new().unwrap();
    let raw = "اب\nتث";

    {
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut session = PracticeSession::with_store(Box::new(store));
        assert!(session.use_text(raw));
        session.type_char('ا');
        session.type_char('x');
    }

    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let mut session = PracticeSession::with_store(Box::new(store));
    assert!(!session.use_text(raw));
    assert_eq!(session.progress()[0], "اx");
    assert_eq!(session.stats().correct_chars, 1);
    assert_eq!(session.stats().mistakes, 1);
    assert_eq!(session.letter_stats().len(), 2);

    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    assert_eq!(store.load().stats.correct_chars, 1);
}

#[test]
fn keystrokes_leave_settings_and_text_files_alone() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let mut session = PracticeSession::with_store(Box::new(store));
    session.set_text("اب\nتث");

    let text_file = dir.path().join("text.txt");
    std::fs::write(&text_file, "marker").unwrap();

    session.type_char('ا');
    session.type_char('ب');
    session.delete_char(1);
    session.advance_line();

    assert_eq!(std::fs::read_to_string(&text_file).unwrap(), "marker");
    assert!(!dir.path().join("config.toml").exists());
    assert!(dir.path().join("progress.json").exists());
}
