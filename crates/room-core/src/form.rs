//! Raw form input
//!
//! Hosts hand over field values exactly as typed. All parsing and
//! defaulting happens here so that every frontend behaves the same.

/// Parse a number, falling back to `default` for blank or malformed input
pub fn parse_or(raw: &str, default: f32) -> f32 {
    parse_opt(raw).unwrap_or(default)
}

/// Parse a finite number, `None` for blank or malformed input
pub fn parse_opt(raw: &str) -> Option<f32> {
    raw.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Field name could not be mapped onto a form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field '{0}'")]
pub struct UnknownField(pub String);

/// Position and rotation inputs shared by both object forms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementFields {
    pub x: String,
    pub y: String,
    pub z: String,
    pub rotation_x: String,
    pub rotation_y: String,
    pub rotation_z: String,
}

impl PlacementFields {
    fn set(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "x" => &mut self.x,
            "y" => &mut self.y,
            "z" => &mut self.z,
            "rx" | "rotation_x" => &mut self.rotation_x,
            "ry" | "rotation_y" => &mut self.rotation_y,
            "rz" | "rotation_z" => &mut self.rotation_z,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }
}

/// Primitive creation form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimitiveFields {
    pub id: String,
    /// `pyramid` selects a pyramid, anything else a box
    pub kind: String,
    pub height: String,
    pub width: String,
    pub depth: String,
    pub placement: PlacementFields,
    /// `texture` selects the texture field, anything else the color field
    pub attribute: String,
    pub color: String,
    pub texture: String,
}

impl PrimitiveFields {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Fill a field by its form name
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), UnknownField> {
        let slot = match key {
            "id" => &mut self.id,
            "kind" | "type" => &mut self.kind,
            "height" | "h" => &mut self.height,
            "width" | "w" => &mut self.width,
            "depth" | "d" => &mut self.depth,
            "attribute" => &mut self.attribute,
            "color" => &mut self.color,
            "texture" => &mut self.texture,
            _ => {
                return if self.placement.set(key, value) {
                    Ok(())
                } else {
                    Err(UnknownField(key.to_string()))
                };
            }
        };
        *slot = value.to_string();
        Ok(())
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        // Builder for known keys; unknown keys are ignored
        let _ = self.set(key, value);
        self
    }
}

/// Model import form (the file itself travels separately)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFields {
    pub id: String,
    /// Size factors relative to the room
    pub height: String,
    pub width: String,
    pub depth: String,
    pub placement: PlacementFields,
}

impl ModelFields {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), UnknownField> {
        let slot = match key {
            "id" => &mut self.id,
            "height" | "h" => &mut self.height,
            "width" | "w" => &mut self.width,
            "depth" | "d" => &mut self.depth,
            _ => {
                return if self.placement.set(key, value) {
                    Ok(())
                } else {
                    Err(UnknownField(key.to_string()))
                };
            }
        };
        *slot = value.to_string();
        Ok(())
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        let _ = self.set(key, value);
        self
    }
}

/// Model file contents supplied by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFile {
    /// File name including extension; selects the parser
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ModelFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}
