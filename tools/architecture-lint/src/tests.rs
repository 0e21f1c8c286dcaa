//! Unit tests for the architecture lint.

use rstest::fixture;
use rstest::rstest;

use super::*;

#[derive(Clone, Copy)]
struct LintSingle;

impl LintSingle {
    fn lint(self, file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
        lint_sources(&[LintSource {
            file: Utf8PathBuf::from(file),
            contents: contents.to_owned(),
        }])
    }
}

#[fixture]
fn lint_single() -> LintSingle {
    LintSingle
}

#[rstest]
#[case::cli_uses_domain(
    "inbound/cli/dispatch.rs",
    "use crate::domain::catalog::StudentApi; fn run() { let _ = StudentApi::new; }",
    true
)]
#[case::cli_uses_settings(
    "inbound/cli/mod.rs",
    "use crate::settings::SettingsOverrides; fn run(_o: SettingsOverrides) {}",
    true
)]
#[case::cli_uses_transport(
    "inbound/cli/dispatch.rs",
    "use crate::outbound::http::ReqwestTransport; fn run() { let _ = ReqwestTransport::new(); }",
    false
)]
#[case::cli_uses_transport_unprefixed(
    "inbound/cli/dispatch.rs",
    "use outbound::storage::FileTokenStore; fn run() {}",
    false
)]
#[case::cli_uses_transport_via_crate_name(
    "inbound/cli/dispatch.rs",
    "use amep_client::outbound::storage::FileTokenStore; fn run() {}",
    false
)]
#[case::cli_uses_reqwest(
    "inbound/cli/dispatch.rs",
    "fn run() { let _ = reqwest::Client::new(); }",
    false
)]
#[case::domain_uses_cli(
    "domain/executor.rs",
    "use crate::inbound::cli::TerminalNavigator; fn thing() {}",
    false
)]
#[case::domain_uses_settings(
    "domain/executor.rs",
    "use super::super::settings::ClientSettings; fn thing() {}",
    false
)]
#[case::domain_uses_cap_std(
    "domain/session.rs",
    "use cap_std::fs::Dir; fn thing(_d: Dir) {}",
    false
)]
#[case::domain_uses_url(
    "domain/endpoint.rs",
    "use url::Url; fn thing(_u: Url) {}",
    true
)]
#[case::domain_sibling_module(
    "domain/catalog/student.rs",
    "use super::super::endpoint::EndpointDescriptor; fn thing(_e: EndpointDescriptor) {}",
    true
)]
#[case::storage_uses_cli(
    "outbound/storage/file_token_store.rs",
    "use crate::inbound::cli; fn thing() {}",
    false
)]
#[case::storage_uses_clap(
    "outbound/storage/file_token_store.rs",
    "use clap::Parser; fn thing() {}",
    false
)]
fn detects_boundary_violations(
    lint_single: LintSingle,
    #[case] file: &str,
    #[case] contents: &str,
    #[case] ok: bool,
) {
    let result = lint_single.lint(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn files_outside_the_layers_are_rejected(lint_single: LintSingle) {
    let result = lint_single.lint("settings.rs", "fn thing() {}");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}

#[rstest]
fn violations_list_every_offending_file() {
    let result = lint_sources(&[
        LintSource {
            file: Utf8PathBuf::from("domain/a.rs"),
            contents: "use reqwest::Client;".to_owned(),
        },
        LintSource {
            file: Utf8PathBuf::from("outbound/b.rs"),
            contents: "use crate::inbound::cli;".to_owned(),
        },
    ]);
    let Err(err) = result else {
        panic!("expected violations");
    };
    let rendered = err.to_string();
    assert!(rendered.starts_with("Architecture boundary violations:\n"));
    assert!(rendered.contains("- domain/a.rs: domain module must not depend on external crate `reqwest`"));
    assert!(rendered.contains("- outbound/b.rs: outbound module must not depend on crate::inbound"));
}
