//! Integration tests for `--action install`

#![cfg(unix)]

mod common;

use assert_fs::prelude::*;
use common::{FakeTools, TestProject, SAMPLE_DEPENDENCIES};
use predicates::prelude::*;

#[test]
fn test_install_scenario() {
    let project = TestProject::new();
    project.write_dependencies(SAMPLE_DEPENDENCIES);
    project.run_ok("download", "foo");
    let output = project.run(&["-a", "install", "-t", "foo", "-j", "6"]);
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));

    let prefix = project.prefix("gcc-none");
    let generate = project.read_lines(&project.build("gcc-none", "foo").join("generate.args"));
    assert_eq!(generate[0], project.source("foo").display().to_string());
    assert_eq!(generate[1], "-GNinja");
    assert!(generate.contains(&format!("-DCMAKE_INSTALL_PREFIX:PATH={}", prefix.display())));
    assert!(generate.contains(&"-DCMAKE_EXPORT_COMPILE_COMMANDS=1".to_string()));
    assert_eq!(generate.last().map(String::as_str), Some("-DFOO=ON"));

    project
        .dir
        .child("root/build/gcc-none/foo/install.args")
        .assert("install\n-j6\n");
    project
        .dir
        .child("root/install/gcc-none/lib/libfoo.so")
        .assert(predicate::path::is_file());
    project
        .dir
        .child("root/manifests/gcc-none/foo.json")
        .assert(predicate::str::contains("lib/libfoo.so"));
}

#[test]
fn test_install_uses_job_count_from_settings() {
    let project = TestProject::new();
    project.write_dependencies(SAMPLE_DEPENDENCIES);
    project.run_ok("download", "foo");
    project.run_ok("install", "foo");

    project
        .dir
        .child("root/build/gcc-none/foo/install.args")
        .assert("install\n-j2\n");
}

#[test]
fn test_build_directory_is_recreated() {
    let project = TestProject::new();
    project.write_dependencies(SAMPLE_DEPENDENCIES);
    project.run_ok("download", "foo");
    project.create_file("root/build/gcc-none/foo/CMakeCache.txt", "stale");

    project.run_ok("install", "foo");

    project
        .dir
        .child("root/build/gcc-none/foo/CMakeCache.txt")
        .assert(predicate::path::missing());
}

#[test]
fn test_variant_selects_trees_and_environment() {
    let project = TestProject::new();
    project.write_dependencies(SAMPLE_DEPENDENCIES);
    project.run_ok("download", "foo");
    let output = project.run(&["-a", "install", "-t", "foo", "-c", "clang", "-s", "tsan"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let env = project.read_lines(&project.build("clang-thread", "foo").join("generate.env"));
    assert!(env.contains(&"CC=clang-17".to_string()));
    assert!(env.contains(&"CXX=clang++-17".to_string()));
    assert!(env.contains(&"CFLAGS=-fsanitize=thread -g".to_string()));
    assert!(env.contains(&"LDFLAGS=-fsanitize=thread".to_string()));
    assert!(env.contains(&"CMAKE_BUILD_TYPE=Debug".to_string()));
    let bin = project.prefix("clang-thread").join("bin");
    assert!(env
        .iter()
        .any(|line| line.starts_with(&format!("PATH={}:", bin.display()))));
    assert!(project.prefix("clang-thread").join("lib/libfoo.so").is_file());
    assert!(!project.prefix("gcc-none").join("lib/libfoo.so").exists());
}

#[test]
fn test_install_without_download_fails() {
    let project = TestProject::new();
    project.write_dependencies(SAMPLE_DEPENDENCIES);
    let output = project.run(&["-a", "install", "-t", "foo"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--action download"));
}

#[test]
fn test_failing_generator_never_runs_executor() {
    let project = TestProject::new();
    project.write_dependencies(SAMPLE_DEPENDENCIES);
    project.run_ok("download", "all");
    project.set_tools(&FakeTools {
        fail_generate: true,
        ..FakeTools::default()
    });

    let output = project.run(&["-a", "install", "-t", "all"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("foo.log"));
    assert!(!project.build("gcc-none", "foo").join("install.args").exists());
    assert!(!project.build("gcc-none", "bar").exists());
}

#[test]
fn test_failing_executor_keeps_partial_manifest() {
    let project = TestProject::new();
    project.write_dependencies(SAMPLE_DEPENDENCIES);
    project.run_ok("download", "foo");
    project.set_tools(&FakeTools {
        fail_install: true,
        ..FakeTools::default()
    });

    let output = project.run(&["-a", "install", "-t", "foo"]);
    assert_eq!(output.status.code(), Some(1));

    project
        .dir
        .child("root/manifests/gcc-none/foo.json")
        .assert(predicate::str::contains("\"complete\": false"));
}

#[test]
fn test_named_target_matches_all_restricted_to_it() {
    let single = TestProject::new();
    single.write_dependencies(SAMPLE_DEPENDENCIES);
    single.run_ok("download", "bar");
    single.run_ok("install", "bar");

    let every = TestProject::new();
    every.write_dependencies(SAMPLE_DEPENDENCIES);
    every.run_ok("download", "all");
    every.run_ok("install", "all");

    let relative = |project: &TestProject| {
        let args = project.read_lines(&project.build("gcc-none", "bar").join("generate.args"));
        let root = project.root().display().to_string();
        args.iter().map(|a| a.replace(&root, "<root>")).collect::<Vec<_>>()
    };
    assert_eq!(relative(&single), relative(&every));
    assert_eq!(
        single.read_lines(&single.source("bar").join(".checked-out")),
        every.read_lines(&every.source("bar").join(".checked-out"))
    );
}
