use std::sync::{Arc, Mutex};

use argtree::{ArgTree, Flag, MultiFlag, ParseError, PathSegment};

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[test]
fn grouped_token_expands_to_member_flags() {
    let x = Arc::new(Flag::new().short('x'));
    let y = Arc::new(Flag::new().short('y'));
    let multi = Arc::new(MultiFlag::new().child(x.clone()).child(y.clone()));
    let tree = ArgTree::new().child(multi);

    let consumed = tree.parse(&args(&["p", "-xy"])).unwrap();

    assert_eq!(consumed, 2);
    assert_eq!(x.values(), [true]);
    assert_eq!(y.values(), [true]);
}

#[test]
fn single_short_flag_still_matches_through_the_group() {
    let x = Arc::new(Flag::new().short('x'));
    let multi = Arc::new(MultiFlag::new().child(x.clone()));
    let tree = ArgTree::new().child(multi);

    let consumed = tree.parse(&args(&["p", "-x"])).unwrap();

    assert_eq!(consumed, 2);
    assert_eq!(x.values(), [true]);
}

#[test]
fn unknown_member_makes_the_whole_token_no_group() {
    let x = Arc::new(Flag::new().short('x'));
    let multi = Arc::new(MultiFlag::new().child(x.clone()));
    let tree = ArgTree::new().child(multi);

    let consumed = tree.parse(&args(&["p", "-xz"])).unwrap();

    assert_eq!(consumed, 1, "the token is skipped, not partially expanded");
    assert!(x.values().is_empty());
}

#[test]
fn repeated_member_within_a_group_is_an_error() {
    let x = Arc::new(Flag::new().short('x'));
    let multi = Arc::new(MultiFlag::new().child(x.clone()));
    let tree = ArgTree::new().child(multi);

    let err = tree.parse(&args(&["p", "-xx"])).unwrap_err();

    assert_eq!(
        err,
        ParseError::FlagAllowedOnlyOnce {
            flag: "-x".to_string(),
            index: 1
        }
    );
}

#[test]
fn group_and_separate_occurrence_trip_the_once_guard() {
    let x = Arc::new(Flag::new().short('x'));
    let y = Arc::new(Flag::new().short('y'));
    let multi = Arc::new(MultiFlag::new().child(x).child(y));
    let tree = ArgTree::new().child(multi);

    let err = tree.parse(&args(&["p", "-x", "-xy"])).unwrap_err();

    assert_eq!(
        err,
        ParseError::FlagAllowedOnlyOnce {
            flag: "-x".to_string(),
            index: 2
        }
    );
}

#[test]
fn non_group_tokens_fall_through_to_the_children() {
    let verbose = Arc::new(Flag::new().long("verbose"));
    let multi = Arc::new(MultiFlag::new().child(verbose.clone()));
    let tree = ArgTree::new().child(multi);

    let consumed = tree.parse(&args(&["p", "--verbose"])).unwrap();

    assert_eq!(consumed, 2);
    assert_eq!(verbose.values(), [true]);
}

#[test]
fn custom_short_prefix() {
    let x = Arc::new(Flag::new().short('x').short_prefix('+'));
    let y = Arc::new(Flag::new().short('y').short_prefix('+'));
    let multi = Arc::new(MultiFlag::new().short_prefix('+').child(x.clone()).child(y.clone()));
    let tree = ArgTree::new().child(multi);

    let consumed = tree.parse(&args(&["p", "+yx"])).unwrap();

    assert_eq!(consumed, 2);
    assert_eq!(x.values(), [true]);
    assert_eq!(y.values(), [true]);
}

#[test]
fn member_callbacks_see_the_group_path() {
    let paths = Arc::new(Mutex::new(Vec::new()));
    let x = Arc::new(Flag::new().short('x').on_parsed({
        let paths = paths.clone();
        move |path: &[PathSegment]| paths.lock().unwrap().push(path.to_vec())
    }));
    let multi = Arc::new(MultiFlag::new().child(x));
    let tree = ArgTree::new().child(multi);

    tree.parse(&args(&["p", "-x"])).unwrap();

    assert_eq!(*paths.lock().unwrap(), [vec![PathSegment::MultiFlag('-')]]);
}

#[test]
fn stop_token_is_never_a_group() {
    let x = Arc::new(Flag::new().short('x'));
    let multi = Arc::new(MultiFlag::new().child(x.clone()));
    let tree = ArgTree::new().child(multi);

    let consumed = tree.parse(&args(&["p", "--"])).unwrap();

    assert_eq!(consumed, 1);
    assert!(x.values().is_empty());
}

#[test]
fn descriptions_aggregate_the_member_flags() {
    let multi = MultiFlag::new()
        .child(Arc::new(Flag::new().short('x').description("an x flag")))
        .child(Arc::new(Flag::new().short('y').description("a y flag")));

    let rows: Vec<(String, String)> = argtree::Parser::descriptions(&multi);

    assert_eq!(
        rows,
        [
            ("-x".to_string(), "an x flag".to_string()),
            ("-y".to_string(), "a y flag".to_string())
        ]
    );
}
