//! Plugin command: option resolution and playbook dispatch

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::parser::ValueSource as ClapValueSource;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::{debug, info};

use super::{flag_set, opt_value, Spec, SpecContext};
use crate::answers::AnswersFile;
use crate::error::{IrError, IrResult};
use crate::options::{OptionResolver, OptionSpec, OptionType, VarsDict};
use crate::plugin::Plugin;
use crate::runner::{parse_ansible_args, PlaybookInvocation};

/// Shared control group titles a plugin may include
pub const GROUP_ANSIBLE: &str = "Ansible options";
pub const GROUP_COMMON: &str = "Common options";
pub const GROUP_ANSWERS: &str = "Answers file";

/// Control arguments that steer execution rather than feed the playbook
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlArgs {
    pub ansible_args: Option<String>,
    pub verbosity: u8,
    pub dry_run: bool,
    pub output: Option<PathBuf>,
    pub extra_vars: Vec<String>,
    pub from_file: Option<PathBuf>,
    pub generate_answers_file: Option<PathBuf>,
}

impl ControlArgs {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            ansible_args: opt_value(matches, "ansible-args"),
            verbosity: opt_value(matches, "verbose").unwrap_or(0),
            dry_run: flag_set(matches, "dry-run"),
            output: opt_value(matches, "output"),
            extra_vars: matches
                .try_get_many::<String>("extra-vars")
                .ok()
                .flatten()
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            from_file: opt_value(matches, "from-file"),
            generate_answers_file: opt_value(matches, "generate-answers-file"),
        }
    }
}

/// [`Spec`] for one loaded plugin
#[derive(Debug, Clone)]
pub struct PluginSpec {
    plugin: Plugin,
}

impl PluginSpec {
    pub fn new(plugin: Plugin) -> Self {
        Self { plugin }
    }

    pub fn plugin(&self) -> &Plugin {
        &self.plugin
    }

    /// Option values given explicitly on the command line
    fn cli_values(&self, matches: &ArgMatches) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();

        for (name, spec) in self.plugin.options() {
            let raw = if spec.option_type.takes_value() {
                opt_value::<String>(matches, name)
            } else if matches.value_source(name) == Some(ClapValueSource::CommandLine) {
                Some("true".to_string())
            } else {
                None
            };

            if let Some(raw) = raw {
                values.insert(name.to_string(), raw);
            }
        }

        values
    }

    fn write_dry_run(&self, vars: &VarsDict, output: Option<&PathBuf>) -> IrResult<()> {
        let yaml = serde_yaml::to_string(vars.as_map())?;

        match output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, yaml)?;
                info!("Dry-run vars written to {:?}", path);
            }
            None => print!("{}", yaml),
        }
        Ok(())
    }
}

fn option_arg(name: &str, spec: &OptionSpec, heading: &str) -> Arg {
    let mut help = spec.help.clone();
    if let Some(default) = spec.default_raw().filter(|_| spec.option_type != OptionType::Flag) {
        help = format!("{} [default: {}]", help, default);
    }
    if !spec.choices.is_empty() {
        help = format!("{} [choices: {}]", help, spec.choices.join(", "));
    }
    if spec.required {
        help = format!("{} (required)", help);
    }

    let arg = Arg::new(name.to_string())
        .long(name.to_string())
        .help(help.trim().to_string())
        .help_heading(heading.to_string());

    if spec.option_type.takes_value() {
        arg.action(ArgAction::Set)
            .value_name(value_name(spec.option_type))
    } else {
        arg.action(ArgAction::SetTrue)
    }
}

fn value_name(option_type: OptionType) -> &'static str {
    match option_type {
        OptionType::Value => "VALUE",
        OptionType::Int => "INT",
        OptionType::Bool => "BOOL",
        OptionType::Flag => "",
        OptionType::ListValue => "A,B,...",
        OptionType::KeyValueList => "K:V,...",
    }
}

fn ansible_group() -> Vec<Arg> {
    vec![
        Arg::new("ansible-args")
            .long("ansible-args")
            .value_name("ARGS")
            .help("Extra playbook runner arguments, ';'-separated (e.g. 'tags=x;check')"),
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .help("Runner verbosity, repeat for more"),
    ]
}

fn common_group() -> Vec<Arg> {
    vec![
        Arg::new("dry-run")
            .long("dry-run")
            .action(ArgAction::SetTrue)
            .help("Resolve and print the vars without running the playbook"),
        Arg::new("output")
            .short('o')
            .long("output")
            .value_name("PATH")
            .value_parser(value_parser!(PathBuf))
            .requires("dry-run")
            .help("Write dry-run vars to PATH instead of stdout"),
        Arg::new("extra-vars")
            .short('e')
            .long("extra-vars")
            .value_name("KEY=VALUE|@FILE")
            .action(ArgAction::Append)
            .help("Extra vars, highest precedence"),
        // read from raw argv by telemetry::debug_requested before parsing
        Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help("Debug logging"),
    ]
}

fn answers_group() -> Vec<Arg> {
    vec![
        Arg::new("from-file")
            .long("from-file")
            .value_name("PATH")
            .value_parser(value_parser!(PathBuf))
            .help("Load option values from an answers file"),
        Arg::new("generate-answers-file")
            .long("generate-answers-file")
            .value_name("PATH")
            .value_parser(value_parser!(PathBuf))
            .conflicts_with("from-file")
            .help("Write the resolved option values to PATH and exit"),
    ]
}

impl Spec for PluginSpec {
    fn name(&self) -> &str {
        &self.plugin.name
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(self.plugin.name.clone()).about(self.plugin.description.clone());

        for group in &self.plugin.groups {
            for (name, spec) in &group.options {
                cmd = cmd.arg(option_arg(name, spec, &group.title));
            }
        }

        let control: [(&str, fn() -> Vec<Arg>); 3] = [
            (GROUP_ANSIBLE, ansible_group),
            (GROUP_COMMON, common_group),
            (GROUP_ANSWERS, answers_group),
        ];
        for (title, args) in control {
            if self.plugin.includes_group(title) {
                cmd = cmd.args(args().into_iter().map(|a| a.help_heading(title)));
            }
        }

        cmd
    }

    fn handle(&self, ctx: &SpecContext<'_>, matches: &ArgMatches) -> IrResult<Option<i32>> {
        let profile = ctx
            .profiles
            .get_active()?
            .ok_or(IrError::NoActiveProfileFound)?;
        debug!("Active profile: {}", profile.name);

        let control = ControlArgs::from_matches(matches);

        let answers = match &control.from_file {
            Some(path) => AnswersFile::load(path, &self.plugin.name)?,
            None => BTreeMap::new(),
        };

        let resolved = OptionResolver::new(&self.plugin.name, self.plugin.options())
            .with_answers(answers)
            .with_cli(self.cli_values(matches))
            .resolve()?;

        if let Some(path) = &control.generate_answers_file {
            AnswersFile::write(path, &self.plugin.name, &resolved.raw_values())?;
            return Ok(None);
        }

        resolved.check_required()?;

        let mut vars = VarsDict::build(&self.plugin.plugin_type, &resolved)?;
        vars.merge_extra_vars(&control.extra_vars)?;

        if control.dry_run {
            self.write_dry_run(&vars, control.output.as_ref())?;
            return Ok(None);
        }

        let ansible_args = match &control.ansible_args {
            Some(raw) => parse_ansible_args(raw)?,
            None => Vec::new(),
        };

        let invocation = PlaybookInvocation {
            plugin_name: self.plugin.name.clone(),
            playbook: self.plugin.playbook(),
            profile,
            vars: vars.into_value(),
            ansible_args,
            verbosity: control.verbosity,
        };

        ctx.runner.run(&invocation).map(Some)
    }
}
