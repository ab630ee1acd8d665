//! Shared fixtures for the execution tests
//!
//! `ExamplePlaybook` stands in for `ansible-playbook` running
//! `tests/fixtures/example/main.yml`: one task, "Test output", tagged
//! `output`, which dumps the `provision` vars as JSON into the profile dir.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use infrared::{
    IrResult, PlaybookInvocation, PlaybookRunner, Plugin, PluginSpec, Profile, ProfileManager,
    SpecManager,
};
use tempfile::TempDir;

pub const OUTPUT_FILE: &str = "output.example";
pub const TEST_PROFILE: &str = "test_profile";

struct Task {
    name: &'static str,
    tags: &'static [&'static str],
}

const EXAMPLE_TASKS: &[Task] = &[Task {
    name: "Test output",
    tags: &["output"],
}];

/// Runner emulating the example playbook; records every invocation
#[derive(Clone, Default)]
pub struct ExamplePlaybook {
    pub invocations: Rc<RefCell<Vec<PlaybookInvocation>>>,
}

impl ExamplePlaybook {
    fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }
}

impl PlaybookRunner for ExamplePlaybook {
    fn run(&self, invocation: &PlaybookInvocation) -> IrResult<i32> {
        self.invocations.borrow_mut().push(invocation.clone());

        let start_at = Self::arg_value(&invocation.ansible_args, "--start-at-task");
        let tags: Option<Vec<&str>> =
            Self::arg_value(&invocation.ansible_args, "--tags").map(|t| t.split(',').collect());

        let start = match start_at {
            Some(name) => match EXAMPLE_TASKS.iter().position(|t| t.name == name) {
                Some(i) => i,
                None => return Ok(1),
            },
            None => 0,
        };

        for task in &EXAMPLE_TASKS[start..] {
            let selected = match &tags {
                Some(tags) => task
                    .tags
                    .iter()
                    .any(|t| *t == "always" || tags.contains(t)),
                None => true,
            };
            if selected {
                let provision = invocation.vars.get("provision").cloned().unwrap_or_default();
                std::fs::write(
                    invocation.profile.path.join(OUTPUT_FILE),
                    serde_json::to_string_pretty(&provision)?,
                )?;
            }
        }

        Ok(0)
    }
}

pub fn example_plugin_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/example")
}

pub struct Fixture {
    pub temp: TempDir,
    pub sm: SpecManager,
    pub profile: Profile,
    pub runner: ExamplePlaybook,
}

impl Fixture {
    /// Spec manager with the example plugin and an inactive test profile
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let profiles = ProfileManager::new(temp.path().join("profiles")).unwrap();
        let profile = profiles.create(TEST_PROFILE).unwrap();

        let runner = ExamplePlaybook::default();
        let mut sm = SpecManager::new(profiles, Box::new(runner.clone()));
        let plugin = Plugin::load(example_plugin_dir()).unwrap();
        sm.register_spec(Box::new(PluginSpec::new(plugin))).unwrap();

        Self {
            temp,
            sm,
            profile,
            runner,
        }
    }

    pub fn activate(&self) {
        self.sm.profiles().activate(&self.profile.name).unwrap();
    }

    pub fn output_path(&self) -> PathBuf {
        self.profile.path.join(OUTPUT_FILE)
    }

    /// Fresh path under a scratch dir
    pub fn tmp_path(&self, name: &str) -> PathBuf {
        let dir = self.temp.path().join("tmp");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    pub fn read_output(&self) -> serde_json::Value {
        read_json(&self.output_path())
    }

    pub fn run_count(&self) -> usize {
        self.runner.invocations.borrow().len()
    }
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

pub fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
