//! Setup command: drives the wizard state machine with terminal prompts.

use dialoguer::{Confirm, Input, Password, Select};
use miette::Result;

use central_core::manifest::PublisherManifest;
use central_core::model::CentralPublisherConfig;
use central_ops::ops_resolve::resolve_with;
use central_ops::ops_wizard::{
    advance, persist, ProjectAnswers, SigningAnswers, WizardContext, WizardInput, WizardState,
};
use central_resolve::ConfigSourceManager;
use central_util::errors::CentralError;
use central_util::progress;
use central_validate::report::ValidationReport;

pub fn exec() -> Result<()> {
    if !atty::is(atty::Stream::Stdin) {
        return Err(CentralError::Generic {
            message: "setup requires an interactive terminal".to_string(),
        }
        .into());
    }

    let root = super::project_root()?;
    let settings = PublisherManifest::load(&root)?
        .map(|m| m.detection)
        .unwrap_or_default();
    let manager = ConfigSourceManager::standard(&settings);
    let properties_file = manager.global_properties_file().ok_or_else(|| CentralError::Config {
        message: "Cannot locate the user gradle.properties; set GRADLE_USER_HOME".to_string(),
    })?;
    let project = resolve_with(&root, &manager)?;

    let mut state = WizardState::Welcome;
    let mut context = WizardContext::with_provenance(
        project.config().clone(),
        project.resolution.provenance.clone(),
    );
    loop {
        println!("\n{}", console::style(state).bold());
        let input = prompt(state, &context.config)?;
        let outcome = advance(state, context, input);
        if !outcome.validation.is_empty() {
            print!(
                "{}",
                ValidationReport::from_result(&outcome.validation).render(console::colors_enabled())
            );
        }
        if outcome.context.completed {
            context = outcome.context;
            break;
        }
        state = outcome.state;
        context = outcome.context;
    }

    let summary = persist(&root, &context, &properties_file)?;
    progress::status("Saved", &summary.manifest.display().to_string());
    if let Some(properties) = &summary.properties {
        progress::status(
            "Saved",
            &format!(
                "{} ({})",
                properties.display(),
                summary.secret_keys.join(", ")
            ),
        );
    }
    Ok(())
}

fn prompt(state: WizardState, config: &CentralPublisherConfig) -> Result<WizardInput> {
    match state {
        WizardState::Welcome => {
            println!("This wizard collects what the Central Portal needs to accept a release.");
            println!("Press enter to keep a suggested value.");
            if confirm("Continue?")? {
                Ok(WizardInput::Continue)
            } else {
                Err(aborted())
            }
        }
        WizardState::ProjectInfo => {
            let info = &config.project_info;
            let developer = info.developers.first().cloned().unwrap_or_default();
            Ok(WizardInput::ProjectInfo(ProjectAnswers {
                name: text("Project name", &info.name)?,
                description: text("Description", &info.description)?,
                url: text("Project URL", &info.url)?,
                license_name: text("License name", &info.license.name)?,
                license_url: text("License URL", &info.license.url)?,
                developer_id: text("Developer id", &developer.id)?,
                developer_name: text("Developer name", &developer.name)?,
                developer_email: text("Developer email", &developer.email)?,
            }))
        }
        WizardState::Credentials => Ok(WizardInput::Credentials {
            username: text("Portal token username", &config.credentials.username)?,
            password: secret("Portal token password", &config.credentials.password)?,
        }),
        WizardState::Signing => {
            let choice = select(
                "How are artifacts signed?",
                &["ASCII-armored key file", "Key id and keyring", "Keep current settings"],
            )?;
            let signing = &config.signing;
            let answers = match choice {
                0 => {
                    let path = text("Path to the armored key", "")?;
                    let key = if path.trim().is_empty() {
                        String::new()
                    } else {
                        std::fs::read_to_string(path.trim()).map_err(CentralError::Io)?
                    };
                    SigningAnswers {
                        key,
                        password: secret("Key passphrase", &signing.password)?,
                        ..SigningAnswers::default()
                    }
                }
                1 => SigningAnswers {
                    key_id: text("Key id", &signing.key_id)?,
                    secret_key_ring_file: text("Keyring file", &signing.secret_key_ring_file)?,
                    password: secret("Key passphrase", &signing.password)?,
                    ..SigningAnswers::default()
                },
                _ => return Ok(WizardInput::Continue),
            };
            Ok(WizardInput::Signing(answers))
        }
        WizardState::Review => {
            for (path, value) in config.mask_secrets().leaves() {
                println!("  {path:<38} = {value}");
            }
            match select("Save these settings?", &["Continue", "Back"])? {
                0 => Ok(WizardInput::Continue),
                _ => Ok(WizardInput::Back),
            }
        }
        WizardState::Test => match select("Run the final checks", &["Run", "Back", "Abort"])? {
            0 => Ok(WizardInput::Continue),
            1 => Ok(WizardInput::Back),
            _ => Err(aborted()),
        },
    }
}

fn aborted() -> miette::Report {
    CentralError::Generic {
        message: "Setup aborted; nothing was saved".to_string(),
    }
    .into()
}

fn prompt_error(e: dialoguer::Error) -> CentralError {
    CentralError::Generic {
        message: format!("Prompt error: {e}"),
    }
}

fn text(label: &str, current: &str) -> Result<String> {
    let answer = Input::<String>::new()
        .with_prompt(label)
        .default(current.to_string())
        .show_default(!current.is_empty())
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;
    Ok(answer)
}

/// Hidden input. An empty answer keeps the current value.
fn secret(label: &str, current: &str) -> Result<String> {
    let label = if current.is_empty() {
        label.to_string()
    } else {
        format!("{label} (enter to keep)")
    };
    let answer = Password::new()
        .with_prompt(label)
        .allow_empty_password(true)
        .interact()
        .map_err(prompt_error)?;
    Ok(answer)
}

fn select(label: &str, items: &[&str]) -> Result<usize> {
    let choice = Select::new()
        .with_prompt(label)
        .items(items)
        .default(0)
        .interact()
        .map_err(prompt_error)?;
    Ok(choice)
}

fn confirm(label: &str) -> Result<bool> {
    let answer = Confirm::new()
        .with_prompt(label)
        .default(true)
        .interact()
        .map_err(prompt_error)?;
    Ok(answer)
}
