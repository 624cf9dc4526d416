//! Shell-script stand-ins for git, cmake and ninja
//!
//! Shared by the unit test fixtures and the binary-level tests. The scripts
//! record their arguments in the directory they run in so tests can inspect
//! what depbuild asked for.

const FAIL: &str = "echo 'simulated failure' >&2; exit 1";

/// Behaviour of the scripted tools
#[derive(Debug, Clone, Default)]
pub struct FakeTools {
    /// `git clone` fails
    pub fail_clone: bool,
    /// `git checkout` fails
    pub fail_checkout: bool,
    /// the generator fails
    pub fail_generate: bool,
    /// the executor fails after installing its first file
    pub fail_install: bool,
}

impl FakeTools {
    /// Script standing in for git
    pub fn git_script(&self) -> String {
        format!(
            r#"#!/bin/sh
case "$1" in
  clone)
    {clone}
    echo "cmake_minimum_required(VERSION 3.10)" > CMakeLists.txt
    echo "$2" > .origin
    ;;
  checkout)
    {checkout}
    echo "$2" >> .checked-out
    ;;
esac
"#,
            clone = if self.fail_clone { FAIL } else { ":" },
            checkout = if self.fail_checkout { FAIL } else { ":" },
        )
    }

    /// Script standing in for the generator
    pub fn generator_script(&self) -> String {
        format!(
            r#"#!/bin/sh
{fail}
printf '%s\n' "$@" > generate.args
echo "$1" > .source
for arg in "$@"; do
  case "$arg" in
    -DCMAKE_INSTALL_PREFIX:PATH=*) echo "${{arg#-DCMAKE_INSTALL_PREFIX:PATH=}}" > .prefix ;;
  esac
done
env > generate.env
echo "-- Configuring done"
"#,
            fail = if self.fail_generate { FAIL } else { ":" },
        )
    }

    /// Script standing in for the executor
    ///
    /// Installs `install.list` from the source tree when present, otherwise
    /// `lib/lib<name>.so` and `include/<name>/<name>.h`.
    pub fn executor_script(&self) -> String {
        format!(
            r#"#!/bin/sh
printf '%s\n' "$@" > install.args
prefix=$(cat .prefix)
source=$(cat .source)
name=$(basename "$PWD")
if [ -f "$source/install.list" ]; then
  files=$(cat "$source/install.list")
else
  files="lib/lib$name.so include/$name/$name.h"
fi
: > install_manifest.txt
for f in $files; do
  mkdir -p "$(dirname "$prefix/$f")"
  echo "$name" > "$prefix/$f"
  echo "$prefix/$f" >> install_manifest.txt
  {fail}
done
"#,
            fail = if self.fail_install { FAIL } else { ":" },
        )
    }
}
