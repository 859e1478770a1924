/// Deployment helper tests.
///
/// Step execution is driven through a recording runner; URL verification
/// runs against a local `tiny_http` server.
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use squill::config::schema::DeployConfig;
use squill::deploy::{
    self, CommandRunner, DISTRIBUTION_STEP, DeploymentInfo, StepStatus, cloudfront_domain,
    extract_api_url, plan_backend, plan_frontend, run_steps,
};
use squill::events::{EventKind, EventLog};
use squill::utils::process::ProcessOutput;
use tiny_http::{Header, Response, Server, StatusCode};

const CREATED_DISTRIBUTION: &str = r#"{
    "Location": "https://cloudfront.amazonaws.com/2020-05-31/distribution/E2QWRUHEXAMPLE",
    "Distribution": {
        "Id": "E2QWRUHEXAMPLE",
        "Status": "InProgress",
        "DomainName": "d2x4example.cloudfront.net"
    }
}"#;

struct Recording {
    ran: Vec<String>,
    fail_containing: Option<&'static str>,
}

impl CommandRunner for Recording {
    fn run(&mut self, command: &str) -> Result<ProcessOutput> {
        self.ran.push(command.to_string());
        let failed = self.fail_containing.is_some_and(|f| command.contains(f));
        let stdout = if !failed && command.contains("create-distribution") {
            CREATED_DISTRIBUTION.to_string()
        } else {
            String::new()
        };
        Ok(ProcessOutput {
            stdout,
            stderr: if failed { "BucketAlreadyExists".to_string() } else { String::new() },
            exit_code: Some(if failed { 1 } else { 0 }),
            success: !failed,
        })
    }
}

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("squill-deploy-{}-{name}", std::process::id()))
}

#[test]
fn frontend_plan_runs_in_order_and_stages_documents() {
    let staging = scratch("staging");
    let log = scratch("events.jsonl");
    let _ = std::fs::remove_file(&log);
    let config = DeployConfig::default();
    let steps = plan_frontend(&config, "squill-frontend-bucket-1", &staging);

    let mut runner = Recording {
        ran: Vec::new(),
        fail_containing: Some(" s3 mb "),
    };
    let outcomes = run_steps(&steps, false, &mut runner, &EventLog::at(&log)).unwrap();

    assert_eq!(runner.ran.len(), 7);
    assert!(matches!(outcomes[0].status, StepStatus::Warned(_)));
    assert!(outcomes[1..].iter().all(|o| o.status == StepStatus::Ok));

    let policy: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(staging.join("bucket-policy.json")).unwrap())
            .unwrap();
    assert_eq!(
        policy["Statement"][0]["Resource"],
        "arn:aws:s3:::squill-frontend-bucket-1/*"
    );
    assert!(staging.join("website-config.json").exists());

    let cdn: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(staging.join("cloudfront-config.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        cdn["Origins"]["Items"][0]["DomainName"],
        "squill-frontend-bucket-1.s3.amazonaws.com"
    );
    assert!(cdn["CallerReference"].as_str().unwrap().starts_with("squill-"));

    let events = EventLog::at(&log).read_all();
    assert_eq!(events.len(), 7);
    assert!(events.iter().all(|e| e.kind == EventKind::DeployStep));

    let _ = std::fs::remove_dir_all(&staging);
    let _ = std::fs::remove_file(&log);
}

#[test]
fn distribution_domain_lands_in_deployment_info() {
    let staging = scratch("staging-cdn");
    let steps = plan_frontend(&DeployConfig::default(), "squill-frontend-bucket-2", &staging);
    let names: Vec<&str> = steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names.last(), Some(&DISTRIBUTION_STEP));
    // the distribution comes after both uploads
    let html = names.iter().position(|n| *n == "upload html").unwrap();
    assert_eq!(html + 1, names.len() - 1);

    let mut runner = Recording {
        ran: Vec::new(),
        fail_containing: None,
    };
    let outcomes = run_steps(&steps, false, &mut runner, &EventLog::disabled()).unwrap();
    let domain = cloudfront_domain(&outcomes);
    assert_eq!(domain.as_deref(), Some("d2x4example.cloudfront.net"));

    let info = DeploymentInfo::new("squill-frontend-bucket-2", "us-east-1", domain);
    assert_eq!(
        info.cloudfront_url.as_deref(),
        Some("https://d2x4example.cloudfront.net")
    );
    assert_eq!(info.urls().len(), 2);

    let _ = std::fs::remove_dir_all(&staging);
}

#[test]
fn failed_distribution_only_warns() {
    let staging = scratch("staging-cdn-fail");
    let steps = plan_frontend(&DeployConfig::default(), "b", &staging);
    let mut runner = Recording {
        ran: Vec::new(),
        fail_containing: Some("create-distribution"),
    };
    let outcomes = run_steps(&steps, false, &mut runner, &EventLog::disabled()).unwrap();

    assert!(matches!(outcomes[6].status, StepStatus::Warned(_)));
    assert_eq!(cloudfront_domain(&outcomes), None);

    let _ = std::fs::remove_dir_all(&staging);
}

#[test]
fn required_failure_stops_the_run() {
    let staging = scratch("staging-fail");
    let config = DeployConfig::default();
    let steps = plan_frontend(&config, "b", &staging);

    let mut runner = Recording {
        ran: Vec::new(),
        fail_containing: Some("put-bucket-policy"),
    };
    let err = run_steps(&steps, false, &mut runner, &EventLog::disabled()).unwrap_err();

    assert!(err.to_string().contains("set bucket policy"));
    // nothing after the failing step ran
    assert_eq!(runner.ran.len(), 4);

    let _ = std::fs::remove_dir_all(&staging);
}

#[test]
fn dry_run_executes_nothing() {
    let config = DeployConfig::default();
    let mut runner = Recording {
        ran: Vec::new(),
        fail_containing: None,
    };
    let outcomes =
        run_steps(&plan_backend(&config), true, &mut runner, &EventLog::disabled()).unwrap();

    assert!(runner.ran.is_empty());
    assert!(outcomes.iter().all(|o| o.status == StepStatus::Skipped));
}

#[test]
fn api_url_is_found_in_serverless_info() {
    let info = "\
Service Information
service: squill-backend
stage: prod
region: us-east-1
endpoints:
  POST - https://ab12cd34ef.execute-api.us-east-1.amazonaws.com/prod/auth/login
  GET - https://ab12cd34ef.execute-api.us-east-1.amazonaws.com/prod/analytics
functions:
  auth: squill-backend-prod-auth
";
    assert_eq!(
        extract_api_url(info).as_deref(),
        Some("https://ab12cd34ef.execute-api.us-east-1.amazonaws.com/prod")
    );
    assert_eq!(extract_api_url("endpoints: none"), None);
}

#[test]
fn deployment_info_is_camel_case_json() {
    let path = scratch("deployment-info.json");
    let info = DeploymentInfo::new("squill-frontend-bucket-7", "us-east-1", None);
    info.save(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains(r#""bucketName": "squill-frontend-bucket-7""#));
    assert!(raw.contains(
        r#""s3WebsiteUrl": "http://squill-frontend-bucket-7.s3-website-us-east-1.amazonaws.com""#
    ));
    assert!(!raw.contains("cloudfront"));

    let loaded = DeploymentInfo::load(&path).unwrap();
    assert_eq!(loaded.urls(), vec![info.s3_website_url.clone()]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn verify_counts_any_http_answer_as_reachable() {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    thread::spawn(move || {
        for req in server.incoming_requests() {
            let resp = if req.url() == "/" {
                Response::from_data(b"<html></html>".to_vec())
                    .with_header(
                        Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..]).unwrap(),
                    )
                    .with_status_code(StatusCode(200))
            } else {
                Response::from_string("missing").with_status_code(StatusCode(404))
            };
            let _ = req.respond(resp);
        }
    });

    let urls = vec![
        format!("http://127.0.0.1:{port}/"),
        format!("http://127.0.0.1:{port}/gone"),
        "http://127.0.0.1:9/".to_string(),
    ];
    let checks = deploy::verify(&urls, Duration::from_secs(2));

    assert_eq!(checks[0].status, Some(200));
    assert_eq!(checks[0].content_type.as_deref(), Some("text/html"));
    assert_eq!(checks[1].status, Some(404));
    assert!(checks[1].reachable());
    assert!(!checks[2].reachable());
    assert!(checks[2].error.is_some());
}
