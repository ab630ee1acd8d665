//! Profile command tests through the spec manager

mod helpers;

use helpers::{args, Fixture, OUTPUT_FILE, TEST_PROFILE};
use infrared::{IrError, ProfileSpec};

fn fixture_with_profile_spec() -> Fixture {
    let mut fx = Fixture::new();
    fx.sm.register_spec(Box::new(ProfileSpec)).unwrap();
    fx
}

#[test]
fn test_checkout_create_then_run() {
    let fx = fixture_with_profile_spec();

    fx.sm
        .run_specs(args(&["profile", "checkout", "other", "--create"]))
        .unwrap();
    assert_eq!(
        fx.sm.profiles().get_active().unwrap().unwrap().name,
        "other"
    );

    fx.sm.run_specs(args(&["example"])).unwrap();

    // output lands in the active profile only
    let other = fx.sm.profiles().get("other").unwrap();
    assert!(other.path.join(OUTPUT_FILE).exists());
    assert!(!fx.output_path().exists());
}

#[test]
fn test_switching_profiles_moves_output() {
    let fx = fixture_with_profile_spec();
    fx.sm.run_specs(args(&["profile", "create", "second"])).unwrap();

    fx.sm
        .run_specs(args(&["profile", "activate", TEST_PROFILE]))
        .unwrap();
    fx.sm
        .run_specs(args(&["profile", "activate", "second"]))
        .unwrap();
    assert!(!fx.sm.profiles().is_active(TEST_PROFILE).unwrap());

    fx.sm.run_specs(args(&["example"])).unwrap();
    let second = fx.sm.profiles().get("second").unwrap();
    assert!(second.path.join(OUTPUT_FILE).exists());
    assert!(!fx.output_path().exists());
}

#[test]
fn test_deactivate_blocks_execution() {
    let fx = fixture_with_profile_spec();
    fx.activate();
    fx.sm.run_specs(args(&["profile", "deactivate"])).unwrap();

    assert!(matches!(
        fx.sm.run_specs(args(&["example"])),
        Err(IrError::NoActiveProfileFound)
    ));
}

#[test]
fn test_cleanup_removes_output() {
    let fx = fixture_with_profile_spec();
    fx.activate();
    fx.sm.run_specs(args(&["example"])).unwrap();
    assert!(fx.output_path().exists());

    fx.sm
        .run_specs(args(&["profile", "cleanup", TEST_PROFILE]))
        .unwrap();
    assert!(!fx.output_path().exists());
    assert!(fx.profile.inventory().exists());
}

#[test]
fn test_show_and_list_succeed() {
    let fx = fixture_with_profile_spec();

    assert!(matches!(
        fx.sm.run_specs(args(&["profile", "show"])),
        Err(IrError::NoActiveProfileFound)
    ));

    fx.activate();
    assert_eq!(fx.sm.run_specs(args(&["profile", "show"])).unwrap(), None);
    assert_eq!(fx.sm.run_specs(args(&["profile", "list"])).unwrap(), None);
    assert_eq!(
        fx.sm
            .run_specs(args(&["profile", "list", "--active"]))
            .unwrap(),
        None
    );
}

#[test]
fn test_missing_profile_errors() {
    let fx = fixture_with_profile_spec();
    assert!(matches!(
        fx.sm.run_specs(args(&["profile", "activate", "ghost"])),
        Err(IrError::ProfileMissing { .. })
    ));
    assert!(matches!(
        fx.sm.run_specs(args(&["profile", "create", TEST_PROFILE])),
        Err(IrError::ProfileExists { .. })
    ));
}
