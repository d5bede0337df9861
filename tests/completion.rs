//! Integration tests for tab completion.

mod common;

use common::{args, sample_registry, WARPS};
use plugcmd::command::CapturingSender;

#[test]
fn warp_offers_every_warp_point() {
    let (registry, _) = sample_registry();
    let steve = CapturingSender::new("Steve");

    // Completer output is passed through unfiltered
    assert_eq!(registry.complete_for(&steve, "warp", &args(&["sp"])), WARPS);
    assert_eq!(registry.complete_for(&steve, "WARP", &args(&[""])), WARPS);
}

#[test]
fn group_offers_child_names_matching_the_typed_prefix() {
    let (registry, _) = sample_registry();
    let steve = CapturingSender::new("Steve");

    assert_eq!(
        registry.complete_for(&steve, "home", &args(&[""])),
        vec!["set", "add", "del", "delete", "list"]
    );
    assert_eq!(registry.complete_for(&steve, "h", &args(&["d"])), vec!["del", "delete"]);
    assert_eq!(registry.complete_for(&steve, "home", &args(&["L"])), vec!["list"]);
    assert!(registry.complete_for(&steve, "home", &args(&["x"])).is_empty());

    // No token at all still lists the children
    assert_eq!(registry.complete_for(&steve, "home", &[]).len(), 5);
}

#[test]
fn completion_descends_only_on_exact_names() {
    let (registry, homes) = sample_registry();
    let steve = CapturingSender::new("Steve");
    homes.set("Steve", "base");
    homes.set("Steve", "bunker");
    homes.set("Alex", "cave");

    assert_eq!(
        registry.complete_for(&steve, "home", &args(&["del", "b"])),
        vec!["base", "bunker"]
    );
    assert_eq!(
        registry.complete_for(&steve, "home", &args(&["delete", "bu"])),
        vec!["bunker"]
    );
    assert_eq!(
        registry.complete_for(&steve, "home", &args(&["del", "BU"])),
        vec!["bunker"]
    );

    // "DEL" is not an exact child name, so completion stays at `home`
    assert_eq!(
        registry.complete_for(&steve, "home", &args(&["DEL", ""])),
        vec!["del", "delete"]
    );
}

#[test]
fn leaf_without_completer_offers_nothing() {
    let (registry, _) = sample_registry();
    let steve = CapturingSender::new("Steve");

    assert!(registry.complete_for(&steve, "tp", &args(&["A"])).is_empty());
    assert!(registry.complete_for(&steve, "home", &args(&["set", ""])).is_empty());
}

#[test]
fn unknown_label_offers_every_known_name() {
    let (registry, _) = sample_registry();
    let steve = CapturingSender::new("Steve");

    let names = registry.complete_for(&steve, "wa", &args(&[""]));
    assert_eq!(names, registry.known_names());
    assert_eq!(
        names,
        vec![
            "home", "h", "set", "add", "del", "delete", "list", "warp", "tp", "teleport", "tpa",
            "give", "help", "stats", "metrics",
        ]
    );
}

#[test]
fn completion_is_repeatable_and_side_effect_free() {
    let (registry, homes) = sample_registry();
    let steve = CapturingSender::new("Steve");

    let first = registry.on_completion_request(&steve, "home", &args(&["set", "base"]));
    let second = registry.on_completion_request(&steve, "home", &args(&["set", "base"]));
    assert_eq!(first, second);

    assert!(homes.list("Steve").is_empty());
    assert!(steve.messages().is_empty());
    assert!(registry.command_stats().is_empty());
}
