//! # Create Command Implementation
//!
//! This module implements the `create` subcommand, which scaffolds a new
//! ISI.INVOICE project directory and hands it over to the package manager.
//!
//! ## Functionality
//!
//! 1. **Answers**: Project settings come from command-line flags first, then
//!    from an optional YAML answers file (`--answers`), then from interactive
//!    prompts for whatever is still missing. `--no-input` disables prompts and
//!    fills the gaps with defaults.
//! 2. **Scaffolding**: The library pipeline creates the directory, initializes
//!    Git, fetches the template and customizes the generated files. A spinner
//!    reports each stage.
//! 3. **Handoff**: Dependencies are installed, the editor is opened and the
//!    development server is started, unless skipped with `--skip-install`,
//!    `--no-editor` or `--no-dev`.
//!
//! Warnings raised during scaffolding are printed but do not change the exit
//! code. Any fatal error exits non-zero.

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::path::{Path, PathBuf};

use isi_create::config::{validate_project_name, PackageManager, ProjectAnswers, TemplateSource};
use isi_create::defaults;
use isi_create::error::Error;
use isi_create::handoff;
use isi_create::output::OutputConfig;
use isi_create::phases::orchestrator::Scaffolder;
use isi_create::phases::ScaffoldReport;

/// Create a new project from the ISI.INVOICE template
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the project directory to create
    #[arg(value_name = "PROJECT_NAME")]
    pub name: String,

    /// Package manager used to install and run the project
    #[arg(long, value_enum, value_name = "PM")]
    pub package_manager: Option<PackageManager>,

    /// Git remote URL registered as `origin`
    #[arg(long, value_name = "URL")]
    pub repo: Option<String>,

    /// Value of ISI_DOCUMENTO_SECTOR in `.env` and `.env.production`
    #[arg(long, value_name = "ID")]
    pub documento_sector: Option<String>,

    /// Value of ISI_API_URL in `.env` (`.env.production` keeps the sandbox URL)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Application environment name (default: local)
    #[arg(long, value_name = "ENV")]
    pub app_env: Option<String>,

    /// YAML file with answers to the project questions
    #[arg(long, value_name = "FILE", env = "ISI_CREATE_ANSWERS")]
    pub answers: Option<PathBuf>,

    /// Never prompt; use defaults for unanswered questions
    #[arg(long)]
    pub no_input: bool,

    /// Directory in which the project directory is created
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Template repository to clone
    #[arg(long, value_name = "URL", env = "ISI_TEMPLATE_URL", default_value = defaults::TEMPLATE_URL)]
    pub template_url: String,

    /// Branch or tag of the template repository
    #[arg(long, value_name = "REF", env = "ISI_TEMPLATE_BRANCH", default_value = defaults::TEMPLATE_BRANCH)]
    pub template_branch: String,

    /// Do not install dependencies, open the editor or start the dev server
    #[arg(long)]
    pub skip_install: bool,

    /// Do not open the editor after installing
    #[arg(long)]
    pub no_editor: bool,

    /// Do not start the development server after installing
    #[arg(long)]
    pub no_dev: bool,

    /// Editor command used to open the project
    #[arg(long, value_name = "CMD", env = "ISI_EDITOR", default_value = defaults::EDITOR)]
    pub editor: String,
}

impl CreateArgs {
    /// Answers given directly on the command line.
    fn flag_answers(&self) -> ProjectAnswers {
        ProjectAnswers {
            package_manager: self.package_manager,
            repo: self.repo.clone(),
            documento_sector: self.documento_sector.clone(),
            api_url: self.api_url.clone(),
            app_env: self.app_env.clone(),
        }
    }
}

/// Execute the `create` command.
pub fn execute(args: CreateArgs, output: &OutputConfig) -> Result<()> {
    output.banner();

    let working_root = match &args.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    // Refuse early so nobody answers questions for a project that cannot be created.
    check_destination(&args.name, &working_root)?;

    let answers = collect_answers(&args)?;
    let request = answers.into_request(&args.name)?;

    let scaffolder = Scaffolder::new(TemplateSource::new(
        args.template_url.as_str(),
        args.template_branch.as_str(),
    ));

    output.step(
        "🚀",
        "[..]",
        &format!("Creating {} in {}", request.name(), working_root.display()),
    );
    let spinner = output.spinner("Starting");
    let result = scaffolder.run_with_progress(&request, &working_root, |stage| {
        if output.is_terminal {
            spinner.set_message(stage.description());
        } else {
            output.step("🔧", "[..]", stage.description());
        }
    });
    spinner.finish_and_clear();
    let report = result?;

    print_report(&report, output);

    if args.skip_install {
        print_next_steps(request.name(), request.package_manager(), output);
        return Ok(());
    }

    let project_dir = report.destination.as_path();
    let pm = request.package_manager();

    let spinner = output.spinner(&format!("Installing dependencies with {}", pm));
    let installed = handoff::install(pm, project_dir);
    spinner.finish_and_clear();
    installed?;
    output.success("Dependencies installed");

    if !args.no_editor {
        handoff::open_editor(&args.editor, project_dir);
    }

    if !args.no_dev {
        output.step("🖥️", "[RUN]", &format!("Starting `{}`", pm.dev_command()));
        let status = handoff::launch_dev_server(pm, project_dir)?;
        if !status.success() {
            anyhow::bail!("`{}` exited with {}", pm.dev_command(), status);
        }
    }

    Ok(())
}

/// Fail before prompting if `name` is unusable or already taken.
fn check_destination(name: &str, working_root: &Path) -> Result<()> {
    validate_project_name(name)?;
    let path = working_root.join(name);
    if path.symlink_metadata().is_ok() {
        return Err(Error::DestinationExists { path }.into());
    }
    Ok(())
}

/// Merge flags with the answers file and prompt for the rest.
fn collect_answers(args: &CreateArgs) -> Result<ProjectAnswers> {
    let mut answers = args.flag_answers();
    if let Some(path) = &args.answers {
        answers = answers.or(ProjectAnswers::from_file(path)?);
    }
    if args.no_input || answers.is_complete() {
        return Ok(answers);
    }
    prompt_missing(answers)
}

/// Interactive prompts for the unanswered questions.
fn prompt_missing(mut answers: ProjectAnswers) -> Result<ProjectAnswers> {
    let theme = ColorfulTheme::default();

    if answers.package_manager.is_none() {
        let selection = Select::with_theme(&theme)
            .with_prompt("Package manager")
            .items(&PackageManager::ALL)
            .default(0)
            .interact()?;
        answers.package_manager = Some(PackageManager::ALL[selection]);
    }

    let questions: [(&mut Option<String>, &str, &str); 4] = [
        (&mut answers.repo, "Git remote URL (leave empty to skip)", ""),
        (&mut answers.documento_sector, "Documento sector", ""),
        (&mut answers.api_url, "API URL", ""),
        (&mut answers.app_env, "App environment", defaults::APP_ENV),
    ];
    for (slot, prompt, default) in questions {
        if slot.is_some() {
            continue;
        }
        let value: String = Input::with_theme(&theme)
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()?;
        *slot = Some(value.trim().to_string());
    }

    Ok(answers)
}

fn print_report(report: &ScaffoldReport, output: &OutputConfig) {
    for warning in &report.warnings {
        output.warn(&warning.to_string());
    }
    output.success(&format!(
        "Project created at {} ({} template files, {} from the overlay)",
        report.destination.display(),
        report.merge.copied,
        report.overlay.as_ref().map(|o| o.files).unwrap_or(0),
    ));
}

fn print_next_steps(name: &str, pm: PackageManager, output: &OutputConfig) {
    output.step("💡", "Next:", &format!("cd {}", name));
    output.step("💡", "Next:", &pm.install_command());
    output.step("💡", "Next:", &pm.dev_command());
}
