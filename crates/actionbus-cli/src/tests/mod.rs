//! Unit and behaviour tests for the CLI runtime.

use std::ffi::OsString;
use std::fs;
use std::process::ExitCode;

use actionbus::{DigestResolver, Resolver};
use actionbus_config::Config;
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;


pub(crate) const EXAMPLE_MANIFEST: &str = include_str!("../../tests/fixtures/bootstrap.yaml");

pub(crate) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(crate) const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Captured result of one CLI invocation.
pub(crate) struct Invocation {
    pub(crate) exit_code: ExitCode,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

pub(crate) fn invoke(config: Config, args: &[&str]) -> Invocation {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit_code = {
        let mut io = IoStreams::new(&mut stdout, &mut stderr);
        let argv = std::iter::once("actionbus")
            .chain(args.iter().copied())
            .map(OsString::from);
        run_with_loader(argv, &mut io, &StaticConfigLoader::new(config))
    };
    Invocation {
        exit_code,
        stdout: String::from_utf8(stdout).expect("stdout utf8"),
        stderr: String::from_utf8(stderr).expect("stderr utf8"),
    }
}

pub(crate) struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub(crate) fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub(crate) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write manifest");
        Utf8PathBuf::from_path_buf(path).expect("utf8 path")
    }
}

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

#[rstest]
fn run_applies_example_manifest(workspace: Workspace) {
    let path = workspace.write("bootstrap.yaml", EXAMPLE_MANIFEST);

    let outcome = invoke(Config::default(), &["run", path.as_str()]);

    assert_eq!(outcome.exit_code, ExitCode::SUCCESS, "{}", outcome.stderr);
    assert!(
        outcome.stdout.contains("2 assignment(s), 1 subscription(s), 2 post(s)"),
        "unexpected stdout: {}",
        outcome.stdout
    );
}

#[rstest]
fn run_uses_configured_bootstrap_path(workspace: Workspace) {
    let path = workspace.write("configured.yaml", EXAMPLE_MANIFEST);
    let config = Config {
        bootstrap_path: path.clone(),
        ..Config::default()
    };

    let outcome = invoke(config, &["run"]);

    assert_eq!(outcome.exit_code, ExitCode::SUCCESS, "{}", outcome.stderr);
    assert!(outcome.stdout.starts_with(path.as_str()));
}

#[rstest]
fn run_fails_for_unknown_handler(workspace: Workspace) {
    let path = workspace.write(
        "broken.yaml",
        "subscriptions:\n  - category: X\n    handler: nowhere\n",
    );

    let outcome = invoke(Config::default(), &["run", path.as_str()]);

    assert_eq!(outcome.exit_code, ExitCode::FAILURE);
    assert!(
        outcome.stderr.contains("unknown handler 'nowhere'"),
        "unexpected stderr: {}",
        outcome.stderr
    );
}

#[rstest]
#[case::flag(&["run", "--strict"], false)]
#[case::config(&["run"], true)]
fn strict_mode_fails_unrecognized_posts(
    workspace: Workspace,
    #[case] args: &[&str],
    #[case] strict_config: bool,
) {
    let path = workspace.write("ghost.yaml", "posts:\n  - action: Ghost\n");
    let config = Config {
        bootstrap_path: path,
        strict_bootstrap: strict_config,
        ..Config::default()
    };

    let outcome = invoke(config, args);

    assert_eq!(outcome.exit_code, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("Ghost"), "{}", outcome.stderr);
}

#[rstest]
fn lenient_mode_tolerates_unrecognized_posts(workspace: Workspace) {
    let path = workspace.write("ghost.yaml", "posts:\n  - action: Ghost\n");

    let outcome = invoke(Config::default(), &["run", path.as_str()]);

    assert_eq!(outcome.exit_code, ExitCode::SUCCESS, "{}", outcome.stderr);
    assert!(outcome.stdout.contains("1 unrecognized"));
}

#[rstest]
fn run_reports_missing_manifest(workspace: Workspace) {
    let path = workspace.write("present.yaml", "");
    let missing = path.with_file_name("absent.yaml");

    let outcome = invoke(Config::default(), &["run", missing.as_str()]);

    assert_eq!(outcome.exit_code, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("failed to read bootstrap manifest"));
}

#[rstest]
fn check_validates_without_dispatching(workspace: Workspace) {
    let path = workspace.write("bootstrap.yaml", EXAMPLE_MANIFEST);

    let outcome = invoke(Config::default(), &["check", path.as_str()]);

    assert_eq!(outcome.exit_code, ExitCode::SUCCESS, "{}", outcome.stderr);
    assert_eq!(
        outcome.stdout,
        format!("{path}: ok (2 assignment(s), 1 subscription(s), 2 post(s))\n")
    );
}

#[rstest]
fn check_rejects_malformed_yaml(workspace: Workspace) {
    let path = workspace.write("bad.yaml", "assignments: [");

    let outcome = invoke(Config::default(), &["check", path.as_str()]);

    assert_eq!(outcome.exit_code, ExitCode::FAILURE);
    assert!(outcome.stderr.starts_with("manifest is invalid"));
}

#[test]
fn resolve_prints_tab_separated_ids() {
    let outcome = invoke(Config::default(), &["resolve", "ExampleAction", "Jump"]);

    assert_eq!(outcome.exit_code, ExitCode::SUCCESS);
    let expected = format!(
        "ExampleAction\t{}\nJump\t{}\n",
        DigestResolver.resolve("ExampleAction"),
        DigestResolver.resolve("Jump"),
    );
    assert_eq!(outcome.stdout, expected);
}

#[test]
fn resolve_rejects_blank_names() {
    let outcome = invoke(Config::default(), &["resolve", " "]);

    assert_eq!(outcome.exit_code, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("invalid action name"));
}

#[test]
fn missing_command_is_a_usage_error() {
    let outcome = invoke(Config::default(), &[]);

    assert_eq!(outcome.exit_code, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("Usage"), "{}", outcome.stderr);
}

#[test]
fn help_is_written_to_stdout() {
    let outcome = invoke(Config::default(), &["--help"]);

    assert_eq!(outcome.exit_code, ExitCode::SUCCESS);
    assert!(outcome.stdout.contains("resolve"));
    assert!(outcome.stderr.is_empty());
}

#[test]
fn configuration_errors_are_reported() {
    struct FailingLoader;

    impl ConfigLoader for FailingLoader {
        fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
            Err(AppError::WriteOutput(std::io::Error::other(
                "configuration unavailable",
            )))
        }
    }

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit_code = {
        let mut io = IoStreams::new(&mut stdout, &mut stderr);
        let args = ["actionbus", "resolve", "A"].map(OsString::from);
        run_with_loader(args, &mut io, &FailingLoader)
    };

    assert_eq!(exit_code, ExitCode::FAILURE);
    assert!(stdout.is_empty());
    assert!(!stderr.is_empty());
}
