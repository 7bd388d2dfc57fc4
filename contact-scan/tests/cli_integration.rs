// contact-scan/tests/cli_integration.rs

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a command isolated from user config files and CS_* variables.
fn contact_scan(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("contact-scan").unwrap();
    cmd.current_dir(workdir)
        .env("HOME", workdir)
        .env("XDG_CONFIG_HOME", workdir)
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("CS_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

/// Helper to create a domains table with a header row
fn write_domains_file(dir: &Path, domains: &[&str]) -> String {
    let file = dir.join("domains.csv");
    let mut content = String::from("domain\n");
    for domain in domains {
        content.push_str(domain);
        content.push('\n');
    }
    fs::write(&file, content).expect("Failed to write domains file");
    file.to_string_lossy().to_string()
}

fn closed_domain() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

async fn contact_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><p>Call (555) 123-4567</p>
               <a href="https://www.facebook.com/acmebakery">Facebook</a>
               <p>12 Elm St, Austin, TX 78701</p></body></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    server
}

#[test]
fn test_help_shows_flags() {
    let dir = TempDir::new().unwrap();
    let mut cmd = contact_scan(dir.path());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("DOMAINS_CSV"))
        .stdout(predicate::str::contains("--companies"))
        .stdout(predicate::str::contains("--concurrency"))
        .stdout(predicate::str::contains("--no-index"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    let mut cmd = contact_scan(dir.path());
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_default_domains_file_fails() {
    let dir = TempDir::new().unwrap();
    let mut cmd = contact_scan(dir.path());
    cmd.arg("--no-index");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("sample-websites.csv"));
}

#[test]
fn test_invalid_concurrency() {
    let dir = TempDir::new().unwrap();
    let mut cmd = contact_scan(dir.path());
    cmd.args(["--concurrency", "0"]);

    cmd.assert().failure().stderr(predicate::str::contains(
        "Concurrency must be between 1 and 100",
    ));
}

#[test]
fn test_invalid_timeout() {
    let dir = TempDir::new().unwrap();
    let mut cmd = contact_scan(dir.path());
    cmd.args(["--timeout", "soon"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timeout"));
}

#[test]
fn test_timeout_above_one_hour_is_rejected() {
    let dir = TempDir::new().unwrap();
    for timeout in ["18446744073709551615", "307445734561825862m", "61m"] {
        let mut cmd = contact_scan(dir.path());
        cmd.args(["--timeout", timeout]);

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("Invalid timeout"));
    }
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    let dir = TempDir::new().unwrap();
    let mut cmd = contact_scan(dir.path());
    cmd.args(["--quiet", "--verbose"]);

    cmd.assert().failure();
}

#[test]
fn test_missing_explicit_companies_file_fails() {
    let dir = TempDir::new().unwrap();
    let domains = write_domains_file(dir.path(), &["example.invalid"]);

    let mut cmd = contact_scan(dir.path());
    cmd.args([domains.as_str(), "--companies", "missing-companies.csv", "--no-index"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("missing-companies.csv"));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[defaults]\nconcurrency = 500\n").unwrap();

    let mut cmd = contact_scan(dir.path());
    cmd.args(["--config", config.to_str().unwrap()]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_end_to_end_report() {
    let server = contact_server().await;
    let dir = TempDir::new().unwrap();
    let reachable = server.address().to_string();
    let unreachable = closed_domain();
    let domains = write_domains_file(dir.path(), &[&unreachable, &reachable]);

    fs::write(
        dir.path().join("sample-websites-company-names.csv"),
        format!(
            "domain,company_commercial_name,company_legal_name,company_all_available_names\n\
             {},Acme Bakery,Acme Bakery LLC,Acme Bakery | Acme Bakery LLC\n",
            reachable
        ),
    )
    .unwrap();

    let report = dir.path().join("report.csv");
    let mut cmd = contact_scan(dir.path());
    cmd.args([
        domains.as_str(),
        "-o",
        report.to_str().unwrap(),
        "--no-index",
        "--timeout",
        "2s",
    ]);

    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Data has been written to"))
        .stdout(predicate::str::contains("Successfully accessed 1 websites."))
        .stdout(predicate::str::contains("Failed to access 1 websites."))
        .stdout(predicate::str::contains("minutes and"));

    let content = fs::read_to_string(&report).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Domain,Phone Numbers,Facebook Links,Addresses"));
    assert_eq!(lines[1], format!("{},N/A,N/A,N/A,N/A,N/A,N/A", unreachable));
    assert!(lines[2].starts_with(&reachable));
    assert!(lines[2].contains("(555) 123-4567"));
    assert!(lines[2].contains("https://www.facebook.com/acmebakery"));
    assert!(lines[2].contains("Austin, TX 78701"));
    assert!(lines[2].ends_with("Acme Bakery,Acme Bakery LLC,Acme Bakery | Acme Bakery LLC"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_json_output_goes_to_stdout() {
    let server = contact_server().await;
    let dir = TempDir::new().unwrap();
    let reachable = server.address().to_string();
    let domains = write_domains_file(dir.path(), &[&reachable]);

    let mut cmd = contact_scan(dir.path());
    cmd.args([domains.as_str(), "--json", "--no-index", "--quiet"]);

    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["domain"], reachable.as_str());
    assert_eq!(records[0]["result"]["primary_page_reachable"], true);
    assert_eq!(records[0]["result"]["phone_numbers"][0], "(555) 123-4567");
    assert!(records[0]["company"].is_null());

    // The default report location is used when -o is not given
    assert!(dir
        .path()
        .join("PhoneNumber_FacebookLink_Addresses_CompanyNames.csv")
        .exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_file_supplies_paths() {
    let server = contact_server().await;
    let dir = TempDir::new().unwrap();
    let domains = write_domains_file(dir.path(), &[&server.address().to_string()]);

    fs::write(
        dir.path().join("contact-scan.toml"),
        format!(
            "[defaults]\nconcurrency = 2\n\n[input]\ndomains = \"{}\"\n\n[output]\nreport = \"configured.csv\"\n",
            domains.replace('\\', "\\\\")
        ),
    )
    .unwrap();

    let mut cmd = contact_scan(dir.path());
    cmd.args(["--no-index", "--quiet"]);

    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("configured.csv"));

    assert!(dir.path().join("configured.csv").exists());
}
