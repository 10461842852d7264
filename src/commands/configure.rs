//! `devutils configure`: record who owns this machine in `~/.devutils`.
use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use dialoguer::Input;

use crate::cli::ConfigureOpts;
use crate::config::git_config::{self, GitIdentity};
use crate::config::validation::{validate_email, validate_url};
use crate::config::{self, DevConfig, UserProfile};
use crate::context::Context;

/// Starting values for each field: the flag, then the saved profile, then
/// the git identity.
#[must_use]
pub fn defaults(
    opts: &ConfigureOpts,
    existing: Option<&DevConfig>,
    git: &GitIdentity,
) -> UserProfile {
    let saved = existing.map(|c| &c.user);
    UserProfile {
        name: opts
            .name
            .clone()
            .or_else(|| saved.map(|u| u.name.clone()))
            .or_else(|| git.name.clone())
            .unwrap_or_default(),
        email: opts
            .email
            .clone()
            .or_else(|| saved.map(|u| u.email.clone()))
            .or_else(|| git.email.clone())
            .unwrap_or_default(),
        url: opts.url.clone().or_else(|| saved.and_then(|u| u.url.clone())),
    }
}

fn prompt(opts: &ConfigureOpts, defaults: UserProfile) -> Result<UserProfile> {
    let name = if opts.name.is_some() {
        defaults.name
    } else {
        let mut input = Input::<String>::new().with_prompt("Name");
        if !defaults.name.is_empty() {
            input = input.default(defaults.name);
        }
        input
            .validate_with(|v: &String| {
                if v.trim().is_empty() {
                    Err("name must not be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()?
    };
    let email = if opts.email.is_some() {
        defaults.email
    } else {
        let mut input = Input::<String>::new().with_prompt("Email");
        if !defaults.email.is_empty() {
            input = input.default(defaults.email);
        }
        input
            .validate_with(|v: &String| validate_email(v.trim()).map_err(|e| e.to_string()))
            .interact_text()?
    };
    let url = if opts.url.is_some() {
        defaults.url
    } else {
        let answer = Input::<String>::new()
            .with_prompt("URL (optional)")
            .default(defaults.url.unwrap_or_default())
            .allow_empty(true)
            .validate_with(|v: &String| {
                let v = v.trim();
                if v.is_empty() {
                    Ok(())
                } else {
                    validate_url(v).map_err(|e| e.to_string())
                }
            })
            .interact_text()?;
        Some(answer)
    };
    Ok(UserProfile { name, email, url })
}

fn show(ctx: &Context, existing: Option<&DevConfig>, path: &Path) -> Result<()> {
    match existing {
        Some(cfg) => ctx.log.output(&serde_json::to_string_pretty(cfg)?),
        None => ctx.log.warn(&format!(
            "{} does not exist, run `devutils configure` first",
            path.display()
        )),
    }
    Ok(())
}

/// Save `user` over `existing` at `path`, stamped with the current time.
///
/// # Errors
///
/// Returns an error if a field is invalid or the file cannot be written.
pub fn save_user(
    path: &Path,
    existing: Option<&DevConfig>,
    user: UserProfile,
) -> Result<DevConfig> {
    let cfg = DevConfig::apply_user(existing, user, Utc::now())?;
    config::save(path, &cfg)?;
    Ok(cfg)
}

/// Run the configure command.
///
/// # Errors
///
/// Returns an error if the existing profile is unreadable, a prompt fails, a
/// field is invalid, or the profile cannot be written.
pub fn run(ctx: &Context, opts: &ConfigureOpts) -> Result<()> {
    let path = config::config_path(&ctx.home);
    let existing = config::load(&path)?;

    if opts.show {
        return show(ctx, existing.as_ref(), &path);
    }

    let has_fields = opts.name.is_some() || opts.email.is_some() || opts.url.is_some();
    if let Some(cfg) = &existing
        && !opts.force
        && !has_fields
    {
        ctx.log.info(&format!(
            "already configured as {} <{}>",
            cfg.user.name, cfg.user.email
        ));
        ctx.log
            .info("use --force to reconfigure, or pass --name/--email/--url to change a field");
        return Ok(());
    }

    let defaults = defaults(opts, existing.as_ref(), &git_config::identity());
    let user = if ctx.interactive {
        prompt(opts, defaults)?
    } else {
        defaults
    };
    let cfg = save_user(&path, existing.as_ref(), user)?;
    ctx.log.info(&format!(
        "saved {} <{}> to {}",
        cfg.user.name,
        cfg.user.email,
        path.display()
    ));
    Ok(())
}
