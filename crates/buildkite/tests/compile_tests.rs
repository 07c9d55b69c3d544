//! End-to-end compilation tests
//!
//! These parse the emitted documents back as YAML to check the structure the
//! orchestrator will see, not just the text.

use kitegen_buildkite::{
    BuildkiteEmitter, PROPAGATED_ENV, compile_group, compile_pipeline, compile_step, render,
};
use kitegen_ci::emitter::Emitter;
use kitegen_ci::{CompileError, GroupSpec, PipelineSpec, StepSpec};
use serde_yaml::Value;

fn stable_group() -> GroupSpec {
    GroupSpec::new(
        "stable",
        vec![
            StepSpec::new("partitions", "ci/stable/run-partition.sh", 30, "solana")
                .with_parallelism(2)
                .with_retry_limit(3),
            StepSpec::new("localnet", "ci/stable/run-localnet.sh", 30, "solana"),
        ],
    )
}

fn parse(lines: &[String]) -> Value {
    serde_yaml::from_str(&render(lines)).unwrap()
}

#[test]
fn test_stable_group_structure() {
    let lines = compile_group(&stable_group(), 0).unwrap();
    let doc = parse(&lines);

    let group = &doc[0];
    assert_eq!(group["group"].as_str(), Some("stable"));

    let steps = group["steps"].as_sequence().unwrap();
    assert_eq!(steps.len(), 2);

    let partitions = &steps[0];
    assert_eq!(partitions["name"].as_str(), Some("partitions"));
    assert_eq!(
        partitions["command"].as_str(),
        Some("ci/stable/run-partition.sh")
    );
    assert_eq!(partitions["timeout_in_minutes"].as_u64(), Some(30));
    assert_eq!(partitions["agents"]["queue"].as_str(), Some("solana"));
    assert_eq!(partitions["parallelism"].as_u64(), Some(2));
    assert_eq!(
        partitions["retry"]["automatic"][0]["limit"].as_u64(),
        Some(3)
    );

    let localnet = &steps[1];
    assert_eq!(localnet["name"].as_str(), Some("localnet"));
    let localnet = localnet.as_mapping().unwrap();
    assert!(!localnet.contains_key("parallelism"));
    assert!(!localnet.contains_key("retry"));
}

#[test]
fn test_stable_group_text() {
    let lines = compile_group(&stable_group(), 0).unwrap();

    assert_eq!(lines[0], "- group: \"stable\"");
    assert_eq!(lines[1], "  steps:");

    let step_headers: Vec<(usize, &String)> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.trim_start().starts_with("- name:"))
        .collect();
    assert_eq!(step_headers.len(), 2);
    assert_eq!(step_headers[0].1, "    - name: \"partitions\"");
    assert_eq!(step_headers[1].1, "    - name: \"localnet\"");

    assert_eq!(lines.iter().filter(|l| l.contains("parallelism:")).count(), 1);
    assert_eq!(lines.iter().filter(|l| l.contains("retry:")).count(), 1);
    assert!(lines.contains(&"      parallelism: 2".to_string()));
    assert!(lines.contains(&"          - limit: 3".to_string()));

    // optional blocks belong to the first step only
    let second = step_headers[1].0;
    assert!(!lines[second..].iter().any(|l| l.contains("parallelism")));
}

#[test]
fn test_plugin_descriptor_structure() {
    let lines = compile_step(&StepSpec::new("a", "true", 1, "q"), 0).unwrap();
    let doc = parse(&lines);

    let plugin = &doc[0]["plugins"][0]["docker#v5.12.0"];
    assert_eq!(plugin["workdir"].as_str(), Some("/solana"));
    assert_eq!(plugin["propagate-uid-gid"].as_bool(), Some(true));

    let env: Vec<&str> = plugin["environment"]
        .as_sequence()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(env, PROPAGATED_ENV);
}

#[test]
fn test_pipeline_document_parses() {
    let spec = PipelineSpec::new(vec![
        stable_group(),
        GroupSpec::new(
            "bench",
            vec![StepSpec::new("bench", "ci/bench/run.sh", 60, "benchmark")],
        ),
    ]);

    let yaml = BuildkiteEmitter::new().emit(&spec).unwrap();
    let doc: Value = serde_yaml::from_str(&yaml).unwrap();

    let groups = doc["steps"].as_sequence().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["group"].as_str(), Some("stable"));
    assert_eq!(groups[1]["group"].as_str(), Some("bench"));
    assert_eq!(
        groups[1]["steps"][0]["agents"]["queue"].as_str(),
        Some("benchmark")
    );
}

#[test]
fn test_pipeline_equals_concatenated_groups() {
    let second = GroupSpec::new("other", vec![StepSpec::new("x", "x.sh", 5, "q")]);
    let spec = PipelineSpec::new(vec![stable_group(), second.clone()]);

    let pipeline = compile_pipeline(&spec).unwrap();

    let mut expected = vec!["steps:".to_string()];
    expected.extend(compile_group(&stable_group(), 1).unwrap());
    expected.extend(compile_group(&second, 1).unwrap());
    assert_eq!(pipeline, expected);
}

#[test]
fn test_special_characters_survive_round_trip() {
    let step = StepSpec::new(
        "quote \"me\"",
        "bash -c 'echo \\\"$HOME\\\"' # not a comment",
        5,
        "queue: weird",
    );
    let lines = compile_step(&step, 0).unwrap();
    let doc = parse(&lines);

    assert_eq!(doc[0]["name"].as_str(), step.name.as_deref());
    assert_eq!(doc[0]["command"].as_str(), step.command.as_deref());
    assert_eq!(doc[0]["agents"]["queue"].as_str(), step.agent_queue.as_deref());
}

#[test]
fn test_noncharacters_are_escaped() {
    for name in ["a\u{FFFE}b", "\u{FFFF}", "bom\u{FEFF} nel\u{85} del\u{7F}"] {
        let step = StepSpec::new(name, "true", 1, "q");
        let group = GroupSpec::new(name, vec![step]);
        let doc = parse(&compile_group(&group, 0).unwrap());

        assert_eq!(doc[0]["group"].as_str(), Some(name));
        assert_eq!(doc[0]["steps"][0]["name"].as_str(), Some(name));
    }
}

#[test]
fn test_empty_group_emits_nothing() {
    let result = compile_group(&GroupSpec::new("empty", vec![]), 0);
    assert!(matches!(result, Err(CompileError::EmptyGroup { ref group }) if group == "empty"));
}

#[test]
fn test_failed_child_produces_no_document() {
    let mut group = stable_group();
    group.steps[1].command = None;

    let err = compile_group(&group, 0).unwrap_err();
    assert_eq!(err.root_cause(), &CompileError::missing_field("command"));
    assert!(err.to_string().contains("Step #1 of group 'stable'"));
}
