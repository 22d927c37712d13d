//! Light slots
//!
//! There is at most one light of each kind. Replacing a light removes the
//! previous instance together with its helper gizmos and target anchor
//! before the new one is attached.

use glam::{Mat4, Vec3};
use tracing::info;

use crate::form::{UnknownField, parse_opt, parse_or};
use crate::host::SceneSink;
use crate::object::{HelperKind, NodeId, NodeKind, RenderNode};

/// The four light slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    Directional,
    Ambient,
    Point,
    Spot,
}

impl LightKind {
    pub const ALL: [LightKind; 4] = [
        LightKind::Directional,
        LightKind::Ambient,
        LightKind::Point,
        LightKind::Spot,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LightKind::Directional => "Directional",
            LightKind::Ambient => "Ambient",
            LightKind::Point => "Point",
            LightKind::Spot => "Spot",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "directional" => Some(LightKind::Directional),
            "ambient" => Some(LightKind::Ambient),
            "point" => Some(LightKind::Point),
            "spot" => Some(LightKind::Spot),
            _ => None,
        }
    }

    /// Directional and spot lights aim at a target anchor
    pub fn has_target(&self) -> bool {
        matches!(self, LightKind::Directional | LightKind::Spot)
    }

    fn index(&self) -> usize {
        match self {
            LightKind::Directional => 0,
            LightKind::Ambient => 1,
            LightKind::Point => 2,
            LightKind::Spot => 3,
        }
    }
}

/// Pack 0-255 channels into `0xRRGGBB`
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Unparseable channels become 1, not 0
fn parse_channel(raw: &str) -> u8 {
    parse_opt(raw)
        .map(|v| v.trunc().clamp(0.0, 255.0) as u8)
        .unwrap_or(1)
}

/// Raw light form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightFields {
    pub x: String,
    pub y: String,
    pub z: String,
    pub target_x: String,
    pub target_y: String,
    pub target_z: String,
    pub red: String,
    pub green: String,
    pub blue: String,
    pub intensity: String,
    pub distance: String,
    pub decay: String,
    /// Spot cone half-angle in degrees
    pub angle: String,
    pub penumbra: String,
}

impl LightFields {
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), UnknownField> {
        let slot = match key {
            "x" => &mut self.x,
            "y" => &mut self.y,
            "z" => &mut self.z,
            "tx" | "target_x" => &mut self.target_x,
            "ty" | "target_y" => &mut self.target_y,
            "tz" | "target_z" => &mut self.target_z,
            "r" | "red" => &mut self.red,
            "g" | "green" => &mut self.green,
            "b" | "blue" => &mut self.blue,
            "intensity" => &mut self.intensity,
            "distance" => &mut self.distance,
            "decay" => &mut self.decay,
            "angle" => &mut self.angle,
            "penumbra" => &mut self.penumbra,
            _ => return Err(UnknownField(key.to_string())),
        };
        *slot = value.to_string();
        Ok(())
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        let _ = self.set(key, value);
        self
    }
}

/// Parsed light parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LightParams {
    pub kind: LightKind,
    pub position: Vec3,
    pub target: Vec3,
    /// Packed `0xRRGGBB`
    pub color: u32,
    pub intensity: f32,
    /// 0 means unlimited range
    pub distance: f32,
    pub decay: f32,
    pub angle_degrees: f32,
    pub penumbra: f32,
}

impl LightParams {
    pub fn parse(kind: LightKind, fields: &LightFields) -> Self {
        Self {
            kind,
            position: Vec3::new(
                parse_or(&fields.x, 0.0),
                parse_or(&fields.y, 0.0),
                parse_or(&fields.z, 0.0),
            ),
            target: Vec3::new(
                parse_or(&fields.target_x, 0.0),
                parse_or(&fields.target_y, 0.0),
                parse_or(&fields.target_z, 0.0),
            ),
            color: pack_rgb(
                parse_channel(&fields.red),
                parse_channel(&fields.green),
                parse_channel(&fields.blue),
            ),
            intensity: parse_or(&fields.intensity, 1.0),
            distance: parse_or(&fields.distance, 0.0),
            decay: parse_or(&fields.decay, 2.0),
            angle_degrees: parse_or(&fields.angle, 60.0),
            penumbra: parse_or(&fields.penumbra, 0.0).clamp(0.0, 1.0),
        }
    }

    fn ambient(color: u32, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            color,
            intensity,
            distance: 0.0,
            decay: 2.0,
            angle_degrees: 60.0,
            penumbra: 0.0,
        }
    }
}

/// A light currently present in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct LightInstance {
    pub params: LightParams,
    pub light: NodeId,
    pub anchor: Option<NodeId>,
    pub helpers: Vec<NodeId>,
}

impl LightInstance {
    /// Every scene node owned by this light
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(self.light)
            .chain(self.anchor)
            .chain(self.helpers.iter().copied())
    }

    fn build(params: LightParams) -> (Self, Vec<RenderNode>) {
        let kind = params.kind;
        let light_node = RenderNode::new(
            NodeId::new(),
            format!("{} light", kind.name()),
            NodeKind::Light {
                kind,
                color: params.color,
                intensity: params.intensity,
            },
        )
        .with_transform(Mat4::from_translation(params.position));

        let anchor = kind.has_target().then(|| {
            RenderNode::new(
                NodeId::new(),
                format!("{} target", kind.name()),
                NodeKind::TargetAnchor,
            )
            .with_transform(Mat4::from_translation(params.target))
        });

        let helper_kinds: &[HelperKind] = match kind {
            LightKind::Directional => &[HelperKind::DirectionArrow],
            LightKind::Ambient => &[],
            LightKind::Point => &[HelperKind::PositionSphere],
            LightKind::Spot => &[HelperKind::Cone],
        };
        let helpers: Vec<RenderNode> = helper_kinds
            .iter()
            .map(|&helper| {
                RenderNode::new(
                    NodeId::new(),
                    format!("{} helper", kind.name()),
                    NodeKind::Helper {
                        kind: helper,
                        light: light_node.id,
                    },
                )
                .with_transform(light_node.transform)
            })
            .collect();

        let instance = Self {
            params,
            light: light_node.id,
            anchor: anchor.as_ref().map(|a| a.id),
            helpers: helpers.iter().map(|h| h.id).collect(),
        };

        let mut nodes = vec![light_node];
        nodes.extend(anchor);
        nodes.extend(helpers);
        (instance, nodes)
    }
}

/// Four independent light slots
#[derive(Debug, Default)]
pub struct LightManager {
    slots: [Option<LightInstance>; 4],
}

impl LightManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: LightKind) -> Option<&LightInstance> {
        self.slots[kind.index()].as_ref()
    }

    pub fn active(&self) -> impl Iterator<Item = &LightInstance> {
        self.slots.iter().flatten()
    }

    /// Replace the light of `kind` with one built from `fields`
    pub fn add_or_replace<H>(
        &mut self,
        kind: LightKind,
        fields: &LightFields,
        host: &mut H,
    ) -> &LightInstance
    where
        H: SceneSink + ?Sized,
    {
        self.install(LightParams::parse(kind, fields), host)
    }

    /// Remove the light of `kind` and its helpers. Returns false if the slot
    /// was already empty.
    pub fn reset<H>(&mut self, kind: LightKind, host: &mut H) -> bool
    where
        H: SceneSink + ?Sized,
    {
        let Some(previous) = self.slots[kind.index()].take() else {
            return false;
        };
        for node in previous.nodes() {
            host.detach(node);
        }
        info!("Removed {} light", kind.name());
        true
    }

    /// White ambient fill plus a white directional key light
    pub fn install_defaults<H>(&mut self, host: &mut H)
    where
        H: SceneSink + ?Sized,
    {
        self.install(LightParams::ambient(0xffffff, 0.5), host);
        self.install(
            LightParams {
                kind: LightKind::Directional,
                position: Vec3::new(5.0, 10.0, 7.5).normalize(),
                ..LightParams::ambient(0xffffff, 1.0)
            },
            host,
        );
    }

    fn install<H>(&mut self, params: LightParams, host: &mut H) -> &LightInstance
    where
        H: SceneSink + ?Sized,
    {
        let kind = params.kind;
        self.reset(kind, host);

        let (instance, nodes) = LightInstance::build(params);
        for node in &nodes {
            host.attach(node);
        }
        info!(
            "Added {} light (color #{:06x}, intensity {})",
            kind.name(),
            instance.params.color,
            instance.params.intensity
        );
        self.slots[kind.index()].insert(instance)
    }
}
