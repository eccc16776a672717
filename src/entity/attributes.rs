//! Named attribute access for debug consoles and scripting
//!
//! Every inspectable field is listed explicitly. Asking for a name that is
//! not in the table is an error, never a silent insert.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SkirmishError};
use crate::core::types::{EntityId, Size, Vec2};
use crate::entity::{Awareness, Entity, EntityKind};
use crate::render::colors::Color;
use crate::spatial::rect::Rect;

/// Dynamically typed attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Float(f32),
    Int(i64),
    Bool(bool),
    Point(Vec2),
    Size(Size),
    Rect(Rect),
    Color(Color),
    Text(String),
    Entity(Option<EntityId>),
}

impl AttributeValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Float(_) => "float",
            AttributeValue::Int(_) => "int",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Point(_) => "point",
            AttributeValue::Size(_) => "size",
            AttributeValue::Rect(_) => "rect",
            AttributeValue::Color(_) => "color",
            AttributeValue::Text(_) => "text",
            AttributeValue::Entity(_) => "entity",
        }
    }
}

const COMMON: &[&str] = &[
    "id",
    "kind",
    "x",
    "y",
    "pos",
    "w",
    "h",
    "size",
    "hp",
    "max_hp",
    "color",
    "hitbox",
    "velocity",
    "attack_speed",
    "look_angle",
    "weapon",
    "target",
    "sleeping",
];

const PLAYER: &[&str] = &["invul", "attack_angle"];

const ENEMY: &[&str] = &["fov", "view_range", "team", "attacking", "awareness"];

fn as_float(name: &str, value: &AttributeValue) -> Result<f32> {
    match value {
        AttributeValue::Float(v) => Ok(*v),
        AttributeValue::Int(v) => Ok(*v as f32),
        other => Err(mismatch(name, "float", other)),
    }
}

fn as_int(name: &str, value: &AttributeValue) -> Result<i64> {
    match value {
        AttributeValue::Int(v) => Ok(*v),
        other => Err(mismatch(name, "int", other)),
    }
}

fn as_bool(name: &str, value: &AttributeValue) -> Result<bool> {
    match value {
        AttributeValue::Bool(v) => Ok(*v),
        other => Err(mismatch(name, "bool", other)),
    }
}

fn mismatch(name: &str, expected: &'static str, found: &AttributeValue) -> SkirmishError {
    SkirmishError::AttributeType {
        name: name.to_string(),
        expected,
        found: found.type_name(),
    }
}

impl Entity {
    /// Names this entity answers to, common ones first
    pub fn attribute_names(&self) -> impl Iterator<Item = &'static str> {
        let specific = match self.kind {
            EntityKind::Player(_) => PLAYER,
            EntityKind::Enemy(_) => ENEMY,
        };
        COMMON.iter().chain(specific.iter()).copied()
    }

    fn unknown(&self, name: &str) -> SkirmishError {
        SkirmishError::UnknownAttribute {
            kind: self.kind_name(),
            name: name.to_string(),
        }
    }

    fn read_only(&self, name: &str) -> SkirmishError {
        SkirmishError::ReadOnlyAttribute {
            kind: self.kind_name(),
            name: name.to_string(),
        }
    }

    pub fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
        let base = &self.base;
        let value = match name {
            "id" => AttributeValue::Entity(Some(base.id)),
            "kind" => AttributeValue::Text(self.kind_name().to_string()),
            "x" => AttributeValue::Float(base.x()),
            "y" => AttributeValue::Float(base.y()),
            "pos" => AttributeValue::Point(base.position()),
            "w" => AttributeValue::Int(base.width() as i64),
            "h" => AttributeValue::Int(base.height() as i64),
            "size" => AttributeValue::Size(base.size()),
            "hp" => AttributeValue::Int(base.hp() as i64),
            "max_hp" => AttributeValue::Int(base.max_hp() as i64),
            "color" => AttributeValue::Color(base.color),
            "hitbox" => AttributeValue::Rect(base.hitbox()),
            "velocity" => AttributeValue::Float(base.velocity),
            "attack_speed" => AttributeValue::Int(base.attack_speed as i64),
            "look_angle" => AttributeValue::Float(base.look_angle()),
            "weapon" => AttributeValue::Text(base.weapon.name.clone()),
            "target" => AttributeValue::Entity(base.target),
            "sleeping" => AttributeValue::Bool(base.is_sleeping()),
            _ => match &self.kind {
                EntityKind::Player(p) => match name {
                    "invul" => AttributeValue::Bool(p.invul),
                    "attack_angle" => AttributeValue::Float(p.attack_angle),
                    _ => return Err(self.unknown(name)),
                },
                EntityKind::Enemy(e) => match name {
                    "fov" => AttributeValue::Float(e.fov),
                    "view_range" => AttributeValue::Float(e.view_range),
                    "team" => AttributeValue::Int(e.team as i64),
                    "attacking" => AttributeValue::Bool(e.attacking),
                    "awareness" => AttributeValue::Text(
                        match e.awareness(base) {
                            Awareness::Idle => "idle",
                            Awareness::Alerted => "alerted",
                            Awareness::Aggro => "aggro",
                        }
                        .to_string(),
                    ),
                    _ => return Err(self.unknown(name)),
                },
            },
        };
        Ok(value)
    }

    /// Every attribute with its current value
    pub fn attributes(&self) -> Vec<(&'static str, AttributeValue)> {
        self.attribute_names()
            .filter_map(|name| self.get_attribute(name).ok().map(|v| (name, v)))
            .collect()
    }

    /// Overwrite a writable attribute
    ///
    /// Position writes teleport without collision checks but keep the
    /// hit-box in sync. Size, health and identity cannot be written.
    pub fn set_attribute(&mut self, name: &str, value: AttributeValue) -> Result<()> {
        match name {
            "id" | "kind" | "w" | "h" | "size" | "hp" | "max_hp" | "hitbox" | "weapon"
            | "sleeping" | "awareness" => {
                // Known names only; unknown ones fall through to the error below
                if self.attribute_names().any(|n| n == name) {
                    return Err(self.read_only(name));
                }
                return Err(self.unknown(name));
            }
            "x" => {
                let x = as_float(name, &value)?;
                let y = self.base.y();
                self.base.set_position(Vec2::new(x, y));
            }
            "y" => {
                let y = as_float(name, &value)?;
                let x = self.base.x();
                self.base.set_position(Vec2::new(x, y));
            }
            "pos" => match value {
                AttributeValue::Point(p) => self.base.set_position(p),
                other => return Err(mismatch(name, "point", &other)),
            },
            "color" => match value {
                AttributeValue::Color(c) => self.base.color = c,
                other => return Err(mismatch(name, "color", &other)),
            },
            "velocity" => self.base.velocity = as_float(name, &value)?,
            "attack_speed" => {
                let speed = as_int(name, &value)?;
                self.base.attack_speed = u32::try_from(speed).map_err(|_| {
                    SkirmishError::AttributeType {
                        name: name.to_string(),
                        expected: "non-negative int",
                        found: "negative int",
                    }
                })?;
            }
            "look_angle" => {
                let angle = as_float(name, &value)?;
                self.base.set_look_angle(angle);
            }
            "target" => match value {
                AttributeValue::Entity(target) => self.base.target = target,
                other => return Err(mismatch(name, "entity", &other)),
            },
            _ => {
                let kind_name = self.kind_name();
                match &mut self.kind {
                    EntityKind::Player(p) => match name {
                        "invul" => p.invul = as_bool(name, &value)?,
                        "attack_angle" => p.attack_angle = as_float(name, &value)?,
                        _ => {
                            return Err(SkirmishError::UnknownAttribute {
                                kind: kind_name,
                                name: name.to_string(),
                            })
                        }
                    },
                    EntityKind::Enemy(e) => match name {
                        "fov" => e.fov = as_float(name, &value)?,
                        "view_range" => e.view_range = as_float(name, &value)?,
                        "team" => {
                            let team = as_int(name, &value)?;
                            e.team = i32::try_from(team).map_err(|_| {
                                SkirmishError::AttributeType {
                                    name: name.to_string(),
                                    expected: "32-bit int",
                                    found: "out-of-range int",
                                }
                            })?;
                        }
                        "attacking" => e.attacking = as_bool(name, &value)?,
                        _ => {
                            return Err(SkirmishError::UnknownAttribute {
                                kind: kind_name,
                                name: name.to_string(),
                            })
                        }
                    },
                }
            }
        }
        Ok(())
    }
}
