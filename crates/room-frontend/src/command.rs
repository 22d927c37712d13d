//! Console command parsing
//!
//! One line is one command: a verb followed by positional words and
//! `key=value` pairs. The pairs fill form fields verbatim, so malformed
//! numbers are left for the engine to default exactly as a form would.

use std::path::PathBuf;

use room_core::{
    InsertMode, Key, LightFields, LightKind, ModelFields, PrimitiveFields, UnknownField,
};

use crate::state::AppAction;

/// Reasons a console line could not be turned into an action
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),
    #[error("Unknown key '{0}'")]
    UnknownKey(String),
    #[error("Unknown light kind '{0}'")]
    UnknownLight(String),
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error(transparent)]
    UnknownField(#[from] UnknownField),
}

pub const HELP: &str = "\
Objects
  box k=v...             create a box (id, h, w, d, x, y, z, rx, ry, rz, color, texture, attribute)
  pyramid k=v...         create a pyramid
  model [file] k=v...    import an OBJ/STL model (id, h, w, d, x, y, z, rx, ry, rz)
  update box|pyramid|model ...   replace an existing object
  select <id>            select (or toggle off) an object
  deselect               clear the selection
  delete [id]            delete an object, or the selection
  collide                toggle collision checking while selected
Input
  press <key>            hold a key (left, right, up, down, pageup, pagedown, shift, enter, delete, c, w, a, s, d, q, e)
  release <key>          release a key
  tick [n]               run n frames (default 1)
  capture on|off         pointer capture for first-person navigation
  look <dx> <dy>         pointer movement
Lights
  light <kind> k=v...    directional|ambient|point|spot (x, y, z, tx, ty, tz, r, g, b, intensity, distance, decay, angle, penumbra)
  unlight <kind>         remove a light
Shell
  list                   show objects, lights and camera
  config [save|reset]    show, write or reset the configuration
  help                   this text
  quit                   exit";

/// Parse one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<AppAction>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let action = match verb.to_ascii_lowercase().as_str() {
        "box" | "pyramid" => primitive(verb, &args, InsertMode::Create)?,
        "model" => model(&args, InsertMode::Create)?,
        "update" => {
            let (target, rest) = args.split_first().ok_or(CommandError::MissingArgument {
                command: "update",
                expected: "box, pyramid or model",
            })?;
            match target.to_ascii_lowercase().as_str() {
                "box" | "pyramid" => primitive(target, rest, InsertMode::Update)?,
                "model" => model(rest, InsertMode::Update)?,
                other => return Err(CommandError::UnexpectedArgument(other.to_string())),
            }
        }
        "select" => AppAction::Select(single(&args, "select", "an object id")?.to_string()),
        "deselect" => AppAction::Deselect,
        "delete" | "del" => match args.as_slice() {
            [] => AppAction::DeleteSelected,
            [id] => AppAction::Delete(id.to_string()),
            [_, extra, ..] => return Err(CommandError::UnexpectedArgument(extra.to_string())),
        },
        "collide" => AppAction::ToggleCollisions,
        "press" => AppAction::PressKey(key(single(&args, "press", "a key name")?)?),
        "release" => AppAction::ReleaseKey(key(single(&args, "release", "a key name")?)?),
        "tick" => match args.as_slice() {
            [] => AppAction::Tick(1),
            [n] => AppAction::Tick(
                n.parse()
                    .map_err(|_| CommandError::InvalidNumber(n.to_string()))?,
            ),
            [_, extra, ..] => return Err(CommandError::UnexpectedArgument(extra.to_string())),
        },
        "capture" => match single(&args, "capture", "on or off")? {
            "on" => AppAction::SetCapture(true),
            "off" => AppAction::SetCapture(false),
            other => return Err(CommandError::UnexpectedArgument(other.to_string())),
        },
        "look" => match args.as_slice() {
            [dx, dy] => AppAction::Look {
                dx: number(dx)?,
                dy: number(dy)?,
            },
            _ => {
                return Err(CommandError::MissingArgument {
                    command: "look",
                    expected: "<dx> <dy>",
                });
            }
        },
        "light" => {
            let (kind, rest) = args.split_first().ok_or(CommandError::MissingArgument {
                command: "light",
                expected: "a light kind",
            })?;
            let kind = light_kind(kind)?;
            let mut fields = LightFields::default();
            for (k, v) in pairs(rest)? {
                fields.set(k, v)?;
            }
            AppAction::SetLight { kind, fields }
        }
        "unlight" => AppAction::ResetLight(light_kind(single(&args, "unlight", "a light kind")?)?),
        "list" | "ls" => AppAction::List,
        "config" => match args.as_slice() {
            [] => AppAction::ShowConfig,
            ["save"] => AppAction::SaveConfig,
            ["reset"] => AppAction::ResetConfig,
            [other, ..] => return Err(CommandError::UnexpectedArgument(other.to_string())),
        },
        "help" | "?" => AppAction::Help,
        "quit" | "exit" => AppAction::Quit,
        _ => return Err(CommandError::UnknownCommand(verb.to_string())),
    };
    Ok(Some(action))
}

fn primitive(kind: &str, args: &[&str], mode: InsertMode) -> Result<AppAction, CommandError> {
    let mut fields = PrimitiveFields {
        kind: kind.to_ascii_lowercase(),
        ..Default::default()
    };
    for (k, v) in pairs(args)? {
        fields.set(k, v)?;
    }
    Ok(AppAction::SubmitPrimitive { fields, mode })
}

fn model(args: &[&str], mode: InsertMode) -> Result<AppAction, CommandError> {
    let mut fields = ModelFields::default();
    let mut path = None;
    for arg in args {
        match arg.split_once('=') {
            Some((k, v)) => fields.set(k, v)?,
            None if path.is_none() => path = Some(PathBuf::from(*arg)),
            None => return Err(CommandError::UnexpectedArgument(arg.to_string())),
        }
    }
    Ok(AppAction::ImportModel { fields, path, mode })
}

fn pairs<'a>(args: &[&'a str]) -> Result<Vec<(&'a str, &'a str)>, CommandError> {
    args.iter()
        .map(|&arg| {
            arg.split_once('=')
                .ok_or_else(|| CommandError::UnexpectedArgument(arg.to_string()))
        })
        .collect()
}

fn single<'a>(
    args: &[&'a str],
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    match args {
        [one] => Ok(*one),
        [] => Err(CommandError::MissingArgument { command, expected }),
        [_, extra, ..] => Err(CommandError::UnexpectedArgument(extra.to_string())),
    }
}

fn key(name: &str) -> Result<Key, CommandError> {
    Key::from_name(name).ok_or_else(|| CommandError::UnknownKey(name.to_string()))
}

fn light_kind(name: &str) -> Result<LightKind, CommandError> {
    LightKind::from_name(name).ok_or_else(|| CommandError::UnknownLight(name.to_string()))
}

fn number(raw: &str) -> Result<f32, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::InvalidNumber(raw.to_string()))
}
