use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use argtree::{ArgTree, Flag, ParseError, PathSegment, UnexpectedFlagHandler};

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[test]
fn short_flag_matches_once() {
    let flag = Arc::new(Flag::new().short('x'));
    let tree = ArgTree::new().child(flag.clone());

    let consumed = tree.parse(&args(&["foo", "-x"])).unwrap();

    assert_eq!(consumed, 2);
    assert_eq!(flag.values(), [true]);
    assert_eq!(flag.value(), Some(true));
}

#[test]
fn long_and_short_aliases_both_match() {
    let flag = Arc::new(Flag::new().long("verbose").short('v').multi_allowed(true));
    let tree = ArgTree::new().child(flag.clone());

    let consumed = tree.parse(&args(&["foo", "--verbose", "-v"])).unwrap();

    assert_eq!(consumed, 3);
    assert_eq!(flag.values(), [true, true]);
    assert_eq!(flag.value(), None, "more than one match has no single value");
}

#[test]
fn second_occurrence_is_an_error() {
    let flag = Arc::new(Flag::new().short('x'));
    let tree = ArgTree::new().child(flag.clone());

    let err = tree.parse(&args(&["foo", "-x", "-x"])).unwrap_err();

    assert_eq!(
        err,
        ParseError::FlagAllowedOnlyOnce {
            flag: "-x".to_string(),
            index: 2
        }
    );
    // The first match is kept; errors do not roll back.
    assert_eq!(flag.values(), [true, true]);
}

#[test]
fn multi_allowed_permits_repeats() {
    let flag = Arc::new(Flag::new().short('x').multi_allowed(true));
    let tree = ArgTree::new().child(flag.clone());

    let consumed = tree.parse(&args(&["foo", "-x", "-x", "-x"])).unwrap();

    assert_eq!(consumed, 4);
    assert_eq!(flag.values(), [true, true, true]);
}

#[test]
fn custom_prefixes_rebuild_the_aliases() {
    let flag = Arc::new(
        Flag::new()
            .long("force")
            .short('f')
            .long_prefix("++")
            .short_prefix('+'),
    );
    assert_eq!(flag.aliases(), ["++force", "+f"]);

    let tree = ArgTree::new().child(flag.clone());
    let consumed = tree.parse(&args(&["foo", "+f"])).unwrap();

    assert_eq!(consumed, 2);
    assert_eq!(flag.value(), Some(true));
}

#[test]
fn on_parsed_fires_with_the_root_path() {
    let fired = Arc::new(Mutex::new(Vec::new()));
    let flag = Arc::new(Flag::new().short('x').on_parsed({
        let fired = fired.clone();
        move |path: &[PathSegment]| fired.lock().unwrap().push(path.to_vec())
    }));
    let tree = ArgTree::new().child(flag);

    tree.parse(&args(&["foo", "-x"])).unwrap();

    assert_eq!(*fired.lock().unwrap(), [Vec::<PathSegment>::new()]);
}

#[test]
fn clear_values_resets_the_flag_for_reuse() {
    let flag = Arc::new(Flag::new().short('x'));
    let tree = ArgTree::new().child(flag.clone());

    tree.parse(&args(&["foo", "-x"])).unwrap();
    flag.clear_values();
    let consumed = tree.parse(&args(&["foo", "-x"])).unwrap();

    assert_eq!(consumed, 2);
    assert_eq!(flag.values(), [true]);
}

#[test]
fn unknown_flag_is_skipped_without_a_handler() {
    let flag = Arc::new(Flag::new().short('x'));
    let tree = ArgTree::new().child(flag.clone());

    let consumed = tree.parse(&args(&["foo", "-y", "-x"])).unwrap();

    assert_eq!(consumed, 2, "skipped tokens do not count as consumed");
    assert_eq!(flag.values(), [true]);
}

#[test]
fn handler_turns_unknown_flags_into_errors() {
    let tree = ArgTree::new()
        .child(Arc::new(Flag::new().short('x')))
        .child(Arc::new(UnexpectedFlagHandler::new()));

    let err = tree.parse(&args(&["foo", "-y"])).unwrap_err();

    assert_eq!(
        err,
        ParseError::UnexpectedFlag {
            flag: "-y".to_string(),
            index: 1
        }
    );
}

#[test]
fn handler_ignores_plain_tokens_and_the_stop_token() {
    let tree = ArgTree::new().child(Arc::new(UnexpectedFlagHandler::new()));

    let consumed = tree.parse(&args(&["foo", "bar", "--"])).unwrap();

    assert_eq!(consumed, 1);
}

#[test]
fn help_seen_flag_state_via_atomic() {
    let seen = Arc::new(AtomicBool::new(false));
    let flag = Arc::new(Flag::new().long("help").on_parsed({
        let seen = seen.clone();
        move |_| seen.store(true, Ordering::SeqCst)
    }));
    let tree = ArgTree::new().child(flag);

    tree.parse(&args(&["foo", "--help"])).unwrap();

    assert!(seen.load(Ordering::SeqCst));
}
