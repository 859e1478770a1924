//! Deployment helpers.
//!
//! Publishes the built frontend as a static website in object storage,
//! deploys the serverless backend, and checks that the resulting URLs
//! answer. Every cloud interaction goes through the provider's CLI via
//! [`crate::utils::process`]; nothing here talks to the cloud directly.
//!
//! Steps run in order with no rollback. A best-effort step that fails is
//! reported as a warning and the run continues; a required step that fails
//! stops the run.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::schema::DeployConfig;
use crate::events::{Event, EventKind, EventLog};
use crate::utils::process::{self, ProcessOutput, shell_quote};

/// Serverless framework entry point.
pub const SERVERLESS_CLI: &str = "npx serverless";
/// Timeout applied to each URL check.
pub const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

const LONG_CACHE: &str = "max-age=31536000";
const NO_CACHE: &str = "max-age=0, no-cache, no-store, must-revalidate";

// ---------------------------------------------------------------------------
// Bucket documents
// ---------------------------------------------------------------------------

/// `{prefix}{millis}`, e.g. `squill-frontend-bucket-1756485949914`.
pub fn bucket_name(prefix: &str, millis: i64) -> String {
    format!("{prefix}{millis}")
}

/// Static website configuration; errors fall through to the SPA entry.
pub fn website_config() -> Value {
    json!({
        "IndexDocument": { "Suffix": "index.html" },
        "ErrorDocument": { "Key": "index.html" }
    })
}

/// Bucket policy granting anonymous read on every object.
pub fn bucket_policy(bucket: &str) -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [
            {
                "Sid": "PublicReadGetObject",
                "Effect": "Allow",
                "Principal": "*",
                "Action": "s3:GetObject",
                "Resource": format!("arn:aws:s3:::{bucket}/*")
            }
        ]
    })
}

/// CloudFront distribution in front of the bucket; `CallerReference` is
/// `squill-{millis}` so each deployment creates a new one.
pub fn distribution_config(bucket: &str, millis: i64) -> Value {
    let origin_id = format!("S3-{bucket}");
    json!({
        "CallerReference": format!("squill-{millis}"),
        "Comment": format!("squill frontend ({bucket})"),
        "Enabled": true,
        "DefaultRootObject": "index.html",
        "Origins": {
            "Quantity": 1,
            "Items": [
                {
                    "Id": origin_id,
                    "DomainName": format!("{bucket}.s3.amazonaws.com"),
                    "S3OriginConfig": { "OriginAccessIdentity": "" }
                }
            ]
        },
        "DefaultCacheBehavior": {
            "TargetOriginId": origin_id,
            "ViewerProtocolPolicy": "redirect-to-https",
            "TrustedSigners": { "Enabled": false, "Quantity": 0 },
            "ForwardedValues": {
                "QueryString": false,
                "Cookies": { "Forward": "none" }
            },
            "MinTTL": 0
        },
        "CustomErrorResponses": {
            "Quantity": 1,
            "Items": [
                {
                    "ErrorCode": 404,
                    "ResponsePagePath": "/index.html",
                    "ResponseCode": "200",
                    "ErrorCachingMinTTL": 300
                }
            ]
        },
        "PriceClass": "PriceClass_100"
    })
}

/// `Distribution.DomainName` from `cloudfront create-distribution` output.
pub fn distribution_domain(output: &str) -> Option<String> {
    let value: Value = serde_json::from_str(output).ok()?;
    value["Distribution"]["DomainName"]
        .as_str()
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

pub fn website_url(bucket: &str, region: &str) -> String {
    format!("http://{bucket}.s3-website-{region}.amazonaws.com")
}

/// Production API gateway base URL as printed by `serverless info`.
static API_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://[a-z0-9]+\.execute-api\.[a-z0-9-]+\.amazonaws\.com/prod")
        .expect("API URL regex must compile")
});

/// First production API gateway URL found in `text` (e.g. the output of
/// `serverless info`).
pub fn extract_api_url(text: &str) -> Option<String> {
    API_URL_RE.find(text).map(|m| m.as_str().to_string())
}

// ---------------------------------------------------------------------------
// Deployment record
// ---------------------------------------------------------------------------

/// What a frontend deployment produced. Stored as camelCase JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentInfo {
    pub timestamp: String,
    pub bucket_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cloudfront_domain: Option<String>,
    pub s3_website_url: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cloudfront_url: Option<String>,
    pub region: String,
}

impl DeploymentInfo {
    pub fn new(bucket: &str, region: &str, cloudfront_domain: Option<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            bucket_name: bucket.to_string(),
            cloudfront_url: cloudfront_domain.as_ref().map(|d| format!("https://{d}")),
            cloudfront_domain,
            s3_website_url: website_url(bucket, region),
            region: region.to_string(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    /// The URLs worth verifying, public website first.
    pub fn urls(&self) -> Vec<String> {
        let mut urls = vec![self.s3_website_url.clone()];
        urls.extend(self.cloudfront_url.clone());
        urls
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// A file written just before its step runs.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub name: String,
    pub command: String,
    /// A failed required step aborts the run.
    pub required: bool,
    pub staged: Vec<StagedFile>,
}

impl Step {
    fn required(name: &str, command: String) -> Self {
        Self {
            name: name.to_string(),
            command,
            required: true,
            staged: Vec::new(),
        }
    }

    fn best_effort(name: &str, command: String) -> Self {
        Self {
            required: false,
            ..Self::required(name, command)
        }
    }

    fn staging(mut self, path: PathBuf, contents: &Value) -> Self {
        self.staged.push(StagedFile {
            path,
            contents: serde_json::to_string_pretty(contents).unwrap_or_default(),
        });
        self
    }
}

/// How one step ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StepStatus {
    Ok,
    /// A best-effort step failed; the run went on.
    Warned(String),
    /// Dry run: printed, not executed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub name: String,
    pub status: StepStatus,
    pub output: Option<ProcessOutput>,
}

/// Executes step commands. The shell runner is the real one; tests script
/// their own.
pub trait CommandRunner {
    fn run(&mut self, command: &str) -> Result<ProcessOutput>;
}

pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&mut self, command: &str) -> Result<ProcessOutput> {
        process::run_shell_command(command)
    }
}

/// Name of the step whose output carries the CDN domain.
pub const DISTRIBUTION_STEP: &str = "create distribution";

/// Steps that publish `config.build_dir` to a fresh public bucket and put
/// a CloudFront distribution in front of it.
///
/// Policy, website and distribution documents are staged under `staging`.
pub fn plan_frontend(config: &DeployConfig, bucket: &str, staging: &Path) -> Vec<Step> {
    let aws = &config.aws_cli;
    let region = shell_quote(&config.region);
    let target = format!("s3://{bucket}");
    let build = shell_quote(&format!("{}/", config.build_dir.trim_end_matches('/')));
    let website_file = staging.join("website-config.json");
    let policy_file = staging.join("bucket-policy.json");
    let distribution_file = staging.join("cloudfront-config.json");

    vec![
        Step::best_effort(
            "create bucket",
            format!("{aws} s3 mb {target} --region {region}"),
        ),
        Step::best_effort(
            "allow public access",
            format!(
                "{aws} s3api put-public-access-block --bucket {bucket} \
                 --public-access-block-configuration \
                 BlockPublicAcls=false,IgnorePublicAcls=false,BlockPublicPolicy=false,RestrictPublicBuckets=false"
            ),
        ),
        Step::required(
            "configure website hosting",
            format!(
                "{aws} s3api put-bucket-website --bucket {bucket} --website-configuration {}",
                shell_quote(&file_uri(&website_file))
            ),
        )
        .staging(website_file, &website_config()),
        Step::required(
            "set bucket policy",
            format!(
                "{aws} s3api put-bucket-policy --bucket {bucket} --policy {}",
                shell_quote(&file_uri(&policy_file))
            ),
        )
        .staging(policy_file, &bucket_policy(bucket)),
        Step::required(
            "upload assets",
            format!(
                "{aws} s3 sync {build} {target} --delete --cache-control {} --exclude {}",
                shell_quote(LONG_CACHE),
                shell_quote("*.html")
            ),
        ),
        Step::required(
            "upload html",
            format!(
                "{aws} s3 sync {build} {target} --delete --cache-control {} --include {}",
                shell_quote(NO_CACHE),
                shell_quote("*.html")
            ),
        ),
        Step::best_effort(
            DISTRIBUTION_STEP,
            format!(
                "{aws} cloudfront create-distribution --output json --distribution-config {}",
                shell_quote(&file_uri(&distribution_file))
            ),
        )
        .staging(
            distribution_file,
            &distribution_config(bucket, Utc::now().timestamp_millis()),
        ),
    ]
}

/// CDN domain reported by a successful distribution step, if any.
pub fn cloudfront_domain(outcomes: &[StepOutcome]) -> Option<String> {
    outcomes
        .iter()
        .filter(|o| o.name == DISTRIBUTION_STEP && o.status == StepStatus::Ok)
        .find_map(|o| distribution_domain(&o.output.as_ref()?.stdout))
}

/// Steps that deploy the serverless backend and print its endpoints.
pub fn plan_backend(config: &DeployConfig) -> Vec<Step> {
    let stage = shell_quote(&config.stage);
    vec![
        Step::required(
            "deploy backend",
            format!("{SERVERLESS_CLI} deploy --stage {stage}"),
        ),
        Step::required(
            "describe backend",
            format!("{SERVERLESS_CLI} info --stage {stage}"),
        ),
    ]
}

fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Run `steps` in order, recording a `deploy_step` event for each.
///
/// Returns an error at the first failed required step; outcomes of the
/// steps before it are lost with it.
pub fn run_steps(
    steps: &[Step],
    dry_run: bool,
    runner: &mut impl CommandRunner,
    events: &EventLog,
) -> Result<Vec<StepOutcome>> {
    let mut outcomes = Vec::with_capacity(steps.len());

    for step in steps {
        if dry_run {
            outcomes.push(StepOutcome {
                name: step.name.clone(),
                status: StepStatus::Skipped,
                output: None,
            });
            continue;
        }

        for file in &step.staged {
            if let Some(parent) = file.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&file.path, &file.contents)
                .with_context(|| format!("failed to write {}", file.path.display()))?;
        }

        let output = match runner.run(&step.command) {
            Ok(output) => output,
            Err(e) => ProcessOutput {
                stderr: format!("{e:#}"),
                ..ProcessOutput::default()
            },
        };

        if output.success {
            events.record(Event::new(EventKind::DeployStep).detail(format!("{}: ok", step.name)));
            outcomes.push(StepOutcome {
                name: step.name.clone(),
                status: StepStatus::Ok,
                output: Some(output),
            });
            continue;
        }

        let summary = output.failure_summary();
        if step.required {
            events.record(
                Event::new(EventKind::DeployStep).detail(format!("{}: failed: {summary}", step.name)),
            );
            bail!("step '{}' failed: {summary}", step.name);
        }

        events.record(
            Event::new(EventKind::DeployStep).detail(format!("{}: warn: {summary}", step.name)),
        );
        outcomes.push(StepOutcome {
            name: step.name.clone(),
            status: StepStatus::Warned(summary),
            output: Some(output),
        });
    }

    Ok(outcomes)
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Result of requesting one deployed URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlCheck {
    pub url: String,
    pub status: Option<u16>,
    pub content_type: Option<String>,
    pub error: Option<String>,
}

impl UrlCheck {
    /// Any HTTP answer counts; only transport failures do not.
    pub fn reachable(&self) -> bool {
        self.status.is_some()
    }
}

/// GET every URL once.
pub fn verify(urls: &[String], timeout: Duration) -> Vec<UrlCheck> {
    urls.iter().map(|url| check_url(url, timeout)).collect()
}

fn check_url(url: &str, timeout: Duration) -> UrlCheck {
    let response = match ureq::get(url).timeout(timeout).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(_, response)) => response,
        Err(ureq::Error::Transport(t)) => {
            return UrlCheck {
                url: url.to_string(),
                status: None,
                content_type: None,
                error: Some(t.to_string()),
            };
        }
    };

    UrlCheck {
        url: url.to_string(),
        status: Some(response.status()),
        content_type: response.header("content-type").map(str::to_string),
        error: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        fail: Vec<&'static str>,
        ran: Vec<String>,
    }

    impl Scripted {
        fn failing(fail: Vec<&'static str>) -> Self {
            Self {
                fail,
                ran: Vec::new(),
            }
        }
    }

    impl CommandRunner for Scripted {
        fn run(&mut self, command: &str) -> Result<ProcessOutput> {
            self.ran.push(command.to_string());
            let failed = self.fail.iter().any(|f| command.contains(f));
            Ok(ProcessOutput {
                stdout: String::new(),
                stderr: if failed {
                    "BucketAlreadyOwnedByYou".to_string()
                } else {
                    String::new()
                },
                exit_code: Some(if failed { 1 } else { 0 }),
                success: !failed,
            })
        }
    }

    fn staging_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("squill-deploy-{tag}-{}", std::process::id()))
    }

    #[test]
    fn bucket_policy_targets_every_object() {
        let policy = bucket_policy("b-1");
        let statement = &policy["Statement"][0];
        assert_eq!(statement["Sid"], "PublicReadGetObject");
        assert_eq!(statement["Action"], "s3:GetObject");
        assert_eq!(statement["Resource"], "arn:aws:s3:::b-1/*");
    }

    #[test]
    fn website_url_includes_region() {
        assert_eq!(
            website_url("squill-frontend-bucket-1", "us-east-1"),
            "http://squill-frontend-bucket-1.s3-website-us-east-1.amazonaws.com"
        );
    }

    #[test]
    fn extract_api_url_finds_prod_endpoint() {
        let info = "Service Information\nendpoints:\n  GET - https://abc123xyz.execute-api.us-east-1.amazonaws.com/prod/analytics\n";
        assert_eq!(
            extract_api_url(info).as_deref(),
            Some("https://abc123xyz.execute-api.us-east-1.amazonaws.com/prod")
        );
        assert_eq!(
            extract_api_url("https://abc.execute-api.us-east-1.amazonaws.com/dev"),
            None
        );
    }

    #[test]
    fn deployment_info_uses_camel_case() {
        let info = DeploymentInfo::new("b-1", "us-east-1", Some("d111.cloudfront.net".to_string()));
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["bucketName"], "b-1");
        assert_eq!(json["cloudfrontUrl"], "https://d111.cloudfront.net");
        assert_eq!(
            json["s3WebsiteUrl"],
            "http://b-1.s3-website-us-east-1.amazonaws.com"
        );
        assert_eq!(info.urls().len(), 2);
    }

    #[test]
    fn deployment_info_without_cdn_omits_fields() {
        let info = DeploymentInfo::new("b-1", "eu-west-1", None);
        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("cloudfront"));
        assert_eq!(info.urls(), vec![info.s3_website_url.clone()]);
    }

    #[test]
    fn deployment_info_save_and_load() {
        let dir = staging_dir("info");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("deployment-info.json");
        let info = DeploymentInfo::new("b-2", "us-east-1", None);
        info.save(&path).unwrap();
        assert_eq!(DeploymentInfo::load(&path).unwrap(), info);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn frontend_plan_syncs_html_without_cache() {
        let steps = plan_frontend(&DeployConfig::default(), "b-1", Path::new("/tmp/x"));
        assert_eq!(steps.len(), 7);
        assert!(!steps[0].required);
        assert!(steps[0].command.starts_with("aws s3 mb s3://b-1 --region us-east-1"));

        let assets = &steps[4].command;
        assert!(assets.contains("--cache-control max-age=31536000 --exclude '*.html'"));
        let html = &steps[5].command;
        assert!(html.contains("'max-age=0, no-cache, no-store, must-revalidate' --include '*.html'"));
        assert!(html.contains("frontend/build/ s3://b-1 --delete"));
    }

    #[test]
    fn frontend_plan_stages_policy_documents() {
        let steps = plan_frontend(&DeployConfig::default(), "b-1", Path::new("/tmp/x"));
        let policy_step = &steps[3];
        assert_eq!(policy_step.staged.len(), 1);
        assert!(policy_step.staged[0].contents.contains("arn:aws:s3:::b-1/*"));
        assert!(policy_step.command.contains("file:///tmp/x/bucket-policy.json"));
    }

    #[test]
    fn distribution_points_at_the_bucket() {
        let config = distribution_config("b-1", 1756485949914);
        assert_eq!(config["CallerReference"], "squill-1756485949914");
        assert_eq!(config["Origins"]["Items"][0]["DomainName"], "b-1.s3.amazonaws.com");
        assert_eq!(
            config["DefaultCacheBehavior"]["TargetOriginId"],
            config["Origins"]["Items"][0]["Id"]
        );
    }

    #[test]
    fn distribution_step_runs_last_and_stages_config() {
        let steps = plan_frontend(&DeployConfig::default(), "b-1", Path::new("/tmp/x"));
        let last = &steps[6];
        assert_eq!(last.name, DISTRIBUTION_STEP);
        assert!(!last.required);
        assert!(last.command.contains("cloudfront create-distribution"));
        assert!(last.command.contains("file:///tmp/x/cloudfront-config.json"));
        assert!(last.staged[0].contents.contains("b-1.s3.amazonaws.com"));
    }

    #[test]
    fn distribution_domain_reads_create_output() {
        let out = r#"{"Location": "x", "Distribution": {"Id": "E1", "DomainName": "d111abc.cloudfront.net"}}"#;
        assert_eq!(
            distribution_domain(out).as_deref(),
            Some("d111abc.cloudfront.net")
        );
        assert_eq!(distribution_domain("An error occurred"), None);
        assert_eq!(distribution_domain(r#"{"Distribution": {}}"#), None);
    }

    #[test]
    fn best_effort_failure_continues() {
        let dir = staging_dir("warn");
        let steps = plan_frontend(&DeployConfig::default(), "b-1", &dir);
        let mut runner = Scripted::failing(vec![" s3 mb "]);

        let outcomes = run_steps(&steps, false, &mut runner, &EventLog::disabled()).unwrap();
        assert_eq!(outcomes.len(), 7);
        assert_eq!(
            outcomes[0].status,
            StepStatus::Warned("BucketAlreadyOwnedByYou".to_string())
        );
        assert!(outcomes[1..].iter().all(|o| o.status == StepStatus::Ok));
        assert!(dir.join("website-config.json").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn required_failure_aborts() {
        let dir = staging_dir("abort");
        let steps = plan_frontend(&DeployConfig::default(), "b-1", &dir);
        let mut runner = Scripted::failing(vec!["put-bucket-policy"]);

        let err = run_steps(&steps, false, &mut runner, &EventLog::disabled()).unwrap_err();
        assert!(err.to_string().contains("set bucket policy"));
        // the sync steps never ran
        assert_eq!(runner.ran.len(), 4);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn dry_run_executes_nothing() {
        let dir = staging_dir("dry");
        let steps = plan_frontend(&DeployConfig::default(), "b-1", &dir);
        let mut runner = Scripted::failing(Vec::new());

        let outcomes = run_steps(&steps, true, &mut runner, &EventLog::disabled()).unwrap();
        assert!(outcomes.iter().all(|o| o.status == StepStatus::Skipped));
        assert!(runner.ran.is_empty());
        assert!(!dir.exists());
    }

    #[test]
    fn backend_plan_uses_stage() {
        let steps = plan_backend(&DeployConfig::default());
        assert_eq!(steps[0].command, "npx serverless deploy --stage prod");
        assert_eq!(steps[1].command, "npx serverless info --stage prod");
    }

    #[test]
    fn verify_reports_transport_errors() {
        let checks = verify(
            &["http://127.0.0.1:9/".to_string()],
            Duration::from_millis(500),
        );
        assert_eq!(checks.len(), 1);
        assert!(!checks[0].reachable());
        assert!(checks[0].error.is_some());
    }
}
