//! End-to-end coverage of the concrete scenarios: a mock repository stands
//! in for the real upstream host (via the `test-support` feature's
//! `HOSTPKG_TEST_REPO_ORIGIN` override), and each scenario drives the
//! engine's public API exactly as the CLI layer would.

use std::io::Write;
use std::sync::Mutex;

use hostpkg_core::{InstallOpts, RemoveOpts};
use hostpkg_schema::Abi;

/// Every test that touches process-global environment (`HOSTPKG_PREFIX`,
/// `HOSTPKG_TEST_REPO_ORIGIN`, `PATH`) must hold this for its duration.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const BRANCH: &str = "quarterly";

/// The triple `Abi::detect()` actually resolves to on whatever host runs
/// these tests -- mock routes must be registered under this, not a
/// hardcoded triple, since `install_one`/`catalogue::refresh` call
/// `Abi::detect()` internally rather than accepting an injected `Abi`.
fn detected_triple() -> String {
    Abi::detect().unwrap().triple()
}

/// Pack `entries` into a `zstd`-compressed tar stream, matching the
/// upstream archive format (§6) for both the catalogue and package
/// archives.
fn build_tzst(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let encoder = zstd::stream::Encoder::new(&mut buf, 0).unwrap();
        let mut builder = tar::Builder::new(encoder);
        for (path, contents) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, *path, *contents).unwrap();
        }
        let encoder = builder.into_inner().unwrap();
        encoder.finish().unwrap().flush().unwrap();
    }
    buf
}

fn package_manifest(version: &str, comment: &str, origin: &str, deps: &[&str]) -> String {
    let deps_obj: String = deps
        .iter()
        .map(|d| format!("\"{d}\":{{}}"))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"{{"version":"{version}","comment":"{comment}","origin":"{origin}","deps":{{{deps_obj}}}}}"#
    )
}

/// A package whose only content is a single installed file, so every
/// scenario can assert on a concrete path under the prefix.
fn package_archive(version: &str, comment: &str, origin: &str, deps: &[&str], bin_name: &str) -> Vec<u8> {
    let manifest = package_manifest(version, comment, origin, deps);
    build_tzst(&[
        ("+MANIFEST", manifest.as_bytes()),
        (&format!("usr/local/bin/{bin_name}"), b"#!/bin/sh\necho hi\n"),
    ])
}

fn catalogue_entry(name: &str, version: &str, comment: &str, deps: &[&str]) -> String {
    let deps_obj: String = deps
        .iter()
        .map(|d| format!("\"{d}\":{{}}"))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"{{"name":"{name}","version":"{version}","comment":"{comment}","deps":{{{deps_obj}}},"path":"All/{name}-{version}.pkg"}}"#
    )
}

/// Scratch state for one test: a temp prefix, a temp PATH-prepended
/// directory (for faking shadowed executables), and a mock repository.
struct Harness {
    _prefix_dir: tempfile::TempDir,
    _path_dir: tempfile::TempDir,
    server: mockito::ServerGuard,
    original_path: Option<String>,
}

impl Harness {
    fn new() -> Self {
        let prefix_dir = tempfile::tempdir().unwrap();
        std::env::set_var(hostpkg_core::paths::PREFIX_ENV_VAR, prefix_dir.path());

        let server = mockito::Server::new();
        std::env::set_var("HOSTPKG_TEST_REPO_ORIGIN", server.url());

        let path_dir = tempfile::tempdir().unwrap();
        let original_path = std::env::var("PATH").ok();
        let new_path = match &original_path {
            Some(existing) => format!("{}:{existing}", path_dir.path().display()),
            None => path_dir.path().display().to_string(),
        };
        std::env::set_var("PATH", new_path);

        Self {
            _prefix_dir: prefix_dir,
            _path_dir: path_dir,
            server,
            original_path,
        }
    }

    fn mock_catalogue(&mut self, ndjson: &str) {
        let archive = build_tzst(&[("packagesite.yaml", ndjson.as_bytes())]);
        let triple = detected_triple();
        self.server
            .mock("GET", format!("/{triple}/{BRANCH}/packagesite.tzst").as_str())
            .with_status(200)
            .with_body(archive)
            .create();
    }

    fn mock_package(&mut self, filename: &str, bytes: &[u8]) {
        let triple = detected_triple();
        self.server
            .mock("GET", format!("/{triple}/{BRANCH}/All/{filename}").as_str())
            .with_status(200)
            .with_body(bytes)
            .create();
    }

    /// Makes `which::which(name)` succeed, simulating a host package that
    /// already provides `name` outside this engine's prefix.
    fn fake_host_executable(&self, name: &str) {
        let path = self._path_dir.path().join(name);
        std::fs::write(&path, b"#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        std::env::remove_var(hostpkg_core::paths::PREFIX_ENV_VAR);
        std::env::remove_var("HOSTPKG_TEST_REPO_ORIGIN");
        match self.original_path.take() {
            Some(path) => std::env::set_var("PATH", path),
            None => std::env::remove_var("PATH"),
        }
    }
}

/// Scenario 1: a dependency-free package installs cleanly and is recorded.
#[test]
fn scenario_1_install_records_store_and_manifest() {
    let _guard = ENV_LOCK.lock().unwrap();
    let mut harness = Harness::new();
    harness.mock_catalogue(&catalogue_entry("hello", "2.12", "friendly greeter", &[]));
    harness.mock_package("hello-2.12.pkg", &package_archive("2.12", "friendly greeter", "misc/hello", &[], "hello"));

    let client = hostpkg_core::fetch::client().unwrap();
    hostpkg_core::install(&client, "hello", InstallOpts::default()).unwrap();

    assert!(hostpkg_core::store::contains("hello").unwrap());
    assert!(hostpkg_core::store::manifest_exists("hello"));
    let record = hostpkg_core::store::read_all()
        .unwrap()
        .into_iter()
        .find(|r| r.name == "hello")
        .unwrap();
    assert_eq!(record.version, "2.12");
    assert!(hostpkg_core::paths::bin_dir().join("hello").exists());
}

/// Scenario 2: a shadowed dependency is skipped by default.
#[test]
fn scenario_2_shadowed_dependency_is_skipped_by_default() {
    let _guard = ENV_LOCK.lock().unwrap();
    let mut harness = Harness::new();
    harness.fake_host_executable("gettext-runtime");
    harness.mock_catalogue(&format!(
        "{}\n{}",
        catalogue_entry("hello", "2.12", "friendly greeter", &["gettext-runtime"]),
        catalogue_entry("gettext-runtime", "0.21", "i18n runtime", &[]),
    ));
    harness.mock_package(
        "hello-2.12.pkg",
        &package_archive("2.12", "friendly greeter", "misc/hello", &["gettext-runtime"], "hello"),
    );

    let client = hostpkg_core::fetch::client().unwrap();
    hostpkg_core::install(&client, "hello", InstallOpts::default()).unwrap();

    assert!(hostpkg_core::store::contains("hello").unwrap());
    assert!(!hostpkg_core::store::contains("gettext-runtime").unwrap());
}

/// Scenario 3: `--full-deps` installs a shadowed dependency anyway.
#[test]
fn scenario_3_full_deps_installs_shadowed_dependency() {
    let _guard = ENV_LOCK.lock().unwrap();
    let mut harness = Harness::new();
    harness.fake_host_executable("gettext-runtime");
    harness.mock_catalogue(&format!(
        "{}\n{}",
        catalogue_entry("hello", "2.12", "friendly greeter", &["gettext-runtime"]),
        catalogue_entry("gettext-runtime", "0.21", "i18n runtime", &[]),
    ));
    harness.mock_package(
        "hello-2.12.pkg",
        &package_archive("2.12", "friendly greeter", "misc/hello", &["gettext-runtime"], "hello"),
    );
    harness.mock_package(
        "gettext-runtime-0.21.pkg",
        &package_archive("0.21", "i18n runtime", "devel/gettext-runtime", &[], "gettext"),
    );

    let client = hostpkg_core::fetch::client().unwrap();
    let opts = InstallOpts { full_deps: true, no_deps: false };
    hostpkg_core::install(&client, "hello", opts).unwrap();

    assert!(hostpkg_core::store::contains("hello").unwrap());
    assert!(hostpkg_core::store::contains("gettext-runtime").unwrap());
}

/// Scenario 4 and 5: a dependency cycle is cut and terminates successfully,
/// and the cycle's packages remain mutually required afterwards.
#[test]
fn scenario_4_and_5_cycle_installs_then_blocks_removal() {
    let _guard = ENV_LOCK.lock().unwrap();
    let mut harness = Harness::new();
    harness.mock_catalogue(&format!(
        "{}\n{}",
        catalogue_entry("pkg-a", "1.0", "package a", &["pkg-b"]),
        catalogue_entry("pkg-b", "1.0", "package b", &["pkg-a"]),
    ));
    harness.mock_package("pkg-a-1.0.pkg", &package_archive("1.0", "package a", "misc/pkg-a", &["pkg-b"], "a-bin"));
    harness.mock_package("pkg-b-1.0.pkg", &package_archive("1.0", "package b", "misc/pkg-b", &["pkg-a"], "b-bin"));

    let client = hostpkg_core::fetch::client().unwrap();
    hostpkg_core::install(&client, "pkg-a", InstallOpts::default()).unwrap();

    assert!(hostpkg_core::store::contains("pkg-a").unwrap());
    assert!(hostpkg_core::store::contains("pkg-b").unwrap());

    let err = hostpkg_core::remove("pkg-b", RemoveOpts::default()).unwrap_err();
    assert!(matches!(err, hostpkg_core::EngineError::RequiredBy(_)));
    assert!(hostpkg_core::store::contains("pkg-a").unwrap());
    assert!(hostpkg_core::store::contains("pkg-b").unwrap());
}

/// Scenario 6: `search` and `info`-equivalent queries over the cached
/// catalogue after a successful install.
#[test]
fn scenario_6_search_and_lookup_after_install() {
    let _guard = ENV_LOCK.lock().unwrap();
    let mut harness = Harness::new();
    harness.mock_catalogue(&catalogue_entry("hello", "2.12", "friendly greeter", &[]));
    harness.mock_package("hello-2.12.pkg", &package_archive("2.12", "friendly greeter", "misc/hello", &[], "hello"));

    let client = hostpkg_core::fetch::client().unwrap();
    hostpkg_core::install(&client, "hello", InstallOpts::default()).unwrap();

    let index = hostpkg_core::catalogue::load().unwrap();
    let hits = index.search("hel", hostpkg_schema::SearchMode::Names).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "hello");
    assert_eq!(hits[0].version, "2.12");

    let entry = index.find_exact(&hostpkg_schema::PackageName::new("hello")).unwrap();
    assert!(entry.deps.is_empty());
}
