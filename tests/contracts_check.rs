mod common;

use common::{html_page, Reply, TestEnv, PHRASE};
use jsonschema::JSONSchema;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

fn load_schema(name: &str) -> Value {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let raw = fs::read_to_string(root.join("docs/contracts").join(name)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn validate(schema_name: &str, data: &Value) {
    let schema = load_schema(schema_name);
    let validator = JSONSchema::compile(&schema).expect("compile schema");
    let msgs: Vec<String> = match validator.validate(data) {
        Ok(()) => return,
        Err(errors) => errors.map(|e| e.to_string()).collect(),
    };
    panic!("schema validation failed: {}", msgs.join(" | "));
}

#[test]
fn page_report_matches_contract() {
    let env = TestEnv::new();
    let target = env.server.url("/komunikat");
    env.server.route(
        "/komunikat",
        Reply::new(
            200,
            html_page(
                Some(&target),
                "<p>Komunikat dot. pobierania krwi w grupie AB+</p>",
            ),
        ),
    );
    let (code, out) = env.check_json(&target, &[("TEXT_TO_CHECK", PHRASE)]);
    assert_eq!(code, 0);
    validate("run_report.schema.json", &out);
    assert_eq!(out["data"]["evidence"]["record"]["slug"], "komunikat");
}

#[test]
fn absent_and_indeterminate_reports_match_contract() {
    let env = TestEnv::new();
    env.server.route("/gone", Reply::new(410, ""));
    env.server.route("/busy", Reply::new(503, ""));

    let (code, out) = env.check_json(&env.server.url("/gone"), &[]);
    assert_eq!(code, 1);
    validate("run_report.schema.json", &out);
    assert_eq!(out["ok"], false);

    let (code, out) = env.check_json(&env.server.url("/busy"), &[]);
    assert_eq!(code, 2);
    validate("run_report.schema.json", &out);
}

#[test]
fn persisted_state_matches_contract() {
    let env = TestEnv::new();
    let api = env.server.url("/wp-json/wp/v2/posts");
    env.server.route(
        "/wp-json/wp/v2/posts",
        Reply::json(&json!([{
            "date": "2025-03-10T09:00:00",
            "slug": "komunikat-ab",
            "link": env.server.url("/komunikat-ab"),
            "title": {"rendered": "Komunikat dot. pobierania krwi w grupie AB+"}
        }])),
    );
    let args = [("CHECK_PROFILE", "api"), ("TEXT_TO_CHECK", PHRASE)];

    let (code, out) = env.check_json(&api, &args);
    assert_eq!(code, 0);
    validate("run_report.schema.json", &out);
    validate("state.schema.json", &env.state());

    env.server.route("/wp-json/wp/v2/posts", Reply::json(&json!([])));
    let (code, out) = env.check_json(&api, &args);
    assert_eq!(code, 10);
    validate("run_report.schema.json", &out);
    validate("state.schema.json", &env.state());
    assert!(env.state()["evidence"].is_null());
}

#[test]
fn state_command_json_matches_contract() {
    let env = TestEnv::new();
    env.seed_state(true);
    let out = env
        .cmd()
        .args(["--json", "state"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&out).expect("valid json output");
    assert_eq!(json["ok"], true);
    validate("state.schema.json", &json["data"]);
}
