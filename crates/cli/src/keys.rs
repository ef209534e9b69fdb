// keys: list, change and reset key bindings

use charsheet_config::keybindings::{self, ACTIONS};
use charsheet_config::{KeyChord, SettingsContext};

use crate::{ensure_loaded, CliError};

fn check_action(id: &str) -> Result<(), CliError> {
    match keybindings::find_action(id) {
        Some(_) => Ok(()),
        None => Err(CliError::args(format!("unknown action '{id}'")).with_hint("csheet keys list")),
    }
}

/// One line per action: modified marker, id, chord, title
pub fn cmd_list(ctx: &SettingsContext, modified_only: bool) -> Result<(), CliError> {
    for action in ACTIONS {
        let modified = ctx.keys.is_modified(action.id);
        if modified_only && !modified {
            continue;
        }
        let chord = match ctx.keys.get(action.id) {
            Some(Some(chord)) => chord.to_string(),
            _ => "-".to_string(),
        };
        let mark = if modified { '*' } else { ' ' };
        println!("{mark} {:<22} {:<18} {}", action.id, chord, action.title);
    }
    Ok(())
}

pub fn cmd_set(ctx: &mut SettingsContext, action: &str, chord: &str) -> Result<(), CliError> {
    check_action(action)?;
    ensure_loaded(ctx, keybindings::FILE_NAME)?;
    let chord: KeyChord = chord.parse()?;
    ctx.keys.set(action, Some(chord.clone()))?;
    warn_conflicts(ctx, &chord);
    ctx.save()?;
    println!("{action} = {chord}");
    Ok(())
}

pub fn cmd_unbind(ctx: &mut SettingsContext, action: &str) -> Result<(), CliError> {
    check_action(action)?;
    ensure_loaded(ctx, keybindings::FILE_NAME)?;
    ctx.keys.set(action, None)?;
    ctx.save()?;
    Ok(())
}

pub fn cmd_reset(ctx: &mut SettingsContext, action: Option<&str>) -> Result<(), CliError> {
    match action {
        Some(id) => {
            check_action(id)?;
            ensure_loaded(ctx, keybindings::FILE_NAME)?;
            if !ctx.keys.reset_one(id) {
                log::info!("{id} already has its built-in binding");
                return Ok(());
            }
            if let Some(Some(chord)) = ctx.keys.get(id).cloned() {
                warn_conflicts(ctx, &chord);
            }
        }
        // Resetting everything replaces an unreadable file too
        None => {
            ctx.keys.reset();
            ctx.forget_failure(keybindings::FILE_NAME);
        }
    }
    ctx.save()?;
    Ok(())
}

pub fn cmd_conflicts(ctx: &SettingsContext) -> Result<(), CliError> {
    for (chord, ids) in keybindings::conflicts(&ctx.keys) {
        println!("{chord}\t{}", ids.join(", "));
    }
    Ok(())
}

fn warn_conflicts(ctx: &SettingsContext, chord: &KeyChord) {
    for (shared, ids) in keybindings::conflicts(&ctx.keys) {
        if &shared == chord {
            log::warn!("{chord} is bound to {}", ids.join(", "));
        }
    }
}
