//! Text input: command lines and `"x,y,z"` vector fields.
//!
//! Converts the textual form a menu, form field or script produces into
//! engine [`Command`]s. Blank lines and `#` comments yield no command.

use glam::DVec3;

use crate::engine::Command;
use crate::error::PrepError;

/// Parse a comma-separated vector (`"3, 4, 0"`). Exactly three finite
/// components are required.
pub fn parse_vector(text: &str) -> Result<DVec3, PrepError> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    let [x, y, z] = parts[..] else {
        return Err(PrepError::CommandParse(format!(
            "'{text}' is not a vector (expected x,y,z)"
        )));
    };

    let component = |s: &str| -> Result<f64, PrepError> {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                PrepError::CommandParse(format!(
                    "'{s}' is not a finite number in '{text}'"
                ))
            })
    };
    Ok(DVec3::new(component(x)?, component(y)?, component(z)?))
}

/// Parse one command line.
///
/// - `open <path>` → [`Command::OpenMesh`]
/// - `picking on`, `picking off` → [`Command::TogglePicking`]
/// - `pick x,y,z` → [`Command::Pick`]
/// - `deselect` → [`Command::Deselect`]
/// - `fix`, `unfix` → [`Command::FixSelected`], [`Command::UnfixSelected`]
/// - `force fx,fy,fz` → [`Command::ApplyForce`]
/// - `clear` → [`Command::ClearAll`]
pub fn parse_command(line: &str) -> Result<Option<Command>, PrepError> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    let command = match (word.to_ascii_lowercase().as_str(), rest) {
        ("open", path) if !path.is_empty() => Command::OpenMesh(path.into()),
        ("picking", "on") => Command::TogglePicking(true),
        ("picking", "off") => Command::TogglePicking(false),
        ("pick", v) if !v.is_empty() => Command::Pick(parse_vector(v)?),
        ("deselect", "") => Command::Deselect,
        ("fix", "") => Command::FixSelected,
        ("unfix", "") => Command::UnfixSelected,
        ("force", v) if !v.is_empty() => Command::ApplyForce(parse_vector(v)?),
        ("clear", "") => Command::ClearAll,
        _ => {
            return Err(PrepError::CommandParse(format!(
                "unrecognised command '{line}'"
            )))
        }
    };
    Ok(Some(command))
}
