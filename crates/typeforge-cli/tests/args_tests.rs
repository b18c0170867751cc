//! `CliArgs` parsing, grounded directly on `tsz-cli`'s own top-level
//! `tests/args_tests.rs` (`CliArgs::try_parse_from` against argv arrays).

use clap::Parser;
use typeforge_cli::CliArgs;

#[test]
fn parses_just_the_input_path() {
    let args = CliArgs::try_parse_from(["typeforge", "program.json"]).expect("the only required arg is input");

    assert_eq!(args.input, std::path::PathBuf::from("program.json"));
    assert!(args.out.is_none());
    assert!(args.fuel_limit.is_none());
    assert!(args.max_recursion_depth.is_none());
    assert!(!args.strict);
    assert!(args.sandbox_root.is_none());
    assert!(!args.trace);
}

#[test]
fn parses_every_flag() {
    let args = CliArgs::try_parse_from([
        "typeforge",
        "program.json",
        "--out",
        "runtime.json",
        "--fuel-limit",
        "10000",
        "--max-recursion-depth",
        "64",
        "--strict",
        "--sandbox-root",
        "/srv/sandbox",
        "--trace",
    ])
    .expect("every documented flag should parse");

    assert_eq!(args.out.as_deref(), Some(std::path::Path::new("runtime.json")));
    assert_eq!(args.fuel_limit, Some(10_000));
    assert_eq!(args.max_recursion_depth, Some(64));
    assert!(args.strict);
    assert_eq!(args.sandbox_root.as_deref(), Some(std::path::Path::new("/srv/sandbox")));
    assert!(args.trace);
}

#[test]
fn missing_input_path_is_rejected() {
    assert!(CliArgs::try_parse_from(["typeforge"]).is_err());
}
