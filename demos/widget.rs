//! Standalone widget demo: a procedural blocky humanoid with a looping
//! "Run" clip, since asset parsing is out of scope for the crate.

use glam::{Mat4, Quat, Vec3};

use vitrine::animation::{AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta};
use vitrine::{App, ChannelNotifier, Geometry, ModelAsset, ModelNode, ModelSkin};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let asset = build_figure();

    let (notifier, events) = ChannelNotifier::new();
    std::thread::spawn(move || {
        for event in events.iter() {
            log::info!("host event: {event:?}");
        }
    });

    App::new(asset)
        .with_title("vitrine widget")
        .with_notifier(Box::new(notifier))
        .run()?;
    Ok(())
}

/// Node indices of the figure's skeleton.
const HIPS: usize = 0;
const SPINE: usize = 1;
const HEAD: usize = 2;
const LEFT_LEG: usize = 3;
const RIGHT_LEG: usize = 4;
const LEFT_ARM: usize = 5;
const RIGHT_ARM: usize = 6;
const BODY: usize = 7;

/// Bind-pose world positions of the bones, index-aligned with the skeleton.
const BIND_POSITIONS: [Vec3; 7] = [
    Vec3::new(0.0, 2.4, 0.0),   // hips
    Vec3::new(0.0, 2.8, 0.0),   // spine
    Vec3::new(0.0, 3.8, 0.0),   // head
    Vec3::new(-0.35, 2.0, 0.0), // left leg pivot
    Vec3::new(0.35, 2.0, 0.0),  // right leg pivot
    Vec3::new(-0.8, 2.8, 0.0),  // left arm pivot
    Vec3::new(0.8, 2.8, 0.0),   // right arm pivot
];

fn build_figure() -> ModelAsset {
    let mut nodes = vec![
        bone("Hips", BIND_POSITIONS[HIPS], vec![SPINE, LEFT_LEG, RIGHT_LEG]),
        bone(
            "Spine",
            BIND_POSITIONS[SPINE] - BIND_POSITIONS[HIPS],
            vec![HEAD, LEFT_ARM, RIGHT_ARM],
        ),
        bone("Head", BIND_POSITIONS[HEAD] - BIND_POSITIONS[SPINE], vec![]),
        bone("LeftLeg", BIND_POSITIONS[LEFT_LEG] - BIND_POSITIONS[HIPS], vec![]),
        bone("RightLeg", BIND_POSITIONS[RIGHT_LEG] - BIND_POSITIONS[HIPS], vec![]),
        bone("LeftArm", BIND_POSITIONS[LEFT_ARM] - BIND_POSITIONS[SPINE], vec![]),
        bone("RightArm", BIND_POSITIONS[RIGHT_ARM] - BIND_POSITIONS[SPINE], vec![]),
    ];

    let skin = ModelSkin {
        joints: vec![HIPS, SPINE, HEAD, LEFT_LEG, RIGHT_LEG, LEFT_ARM, RIGHT_ARM],
        inverse_bind_matrices: BIND_POSITIONS
            .iter()
            .map(|&p| Mat4::from_translation(-p))
            .collect(),
    };
    nodes.push(ModelNode::new("Body").with_skinned_mesh(body_geometry(), skin));

    ModelAsset::new(nodes, vec![HIPS, BODY], vec![run_clip()])
}

fn bone(name: &str, translation: Vec3, children: Vec<usize>) -> ModelNode {
    let mut node = ModelNode::new(name);
    node.translation = translation;
    node.children = children;
    node
}

/// One box per body part, each fully weighted to a single joint.
fn body_geometry() -> Geometry {
    let mut positions = Vec::new();
    let mut indices = Vec::new();
    let mut joints = Vec::new();
    let mut weights = Vec::new();

    let mut push_box = |center: Vec3, half: Vec3, joint: u16| {
        let base = positions.len() as u32;
        for z in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                for x in [-1.0, 1.0] {
                    positions.push([
                        center.x + half.x * x,
                        center.y + half.y * y,
                        center.z + half.z * z,
                    ]);
                    joints.push([joint, 0, 0, 0]);
                    weights.push([1.0, 0.0, 0.0, 0.0]);
                }
            }
        }
        for face in [
            [0u32, 1, 3, 2], // front
            [5, 4, 6, 7],    // back
            [4, 0, 2, 6],    // left
            [1, 5, 7, 3],    // right
            [2, 3, 7, 6],    // top
            [4, 5, 1, 0],    // bottom
        ] {
            indices.extend([base + face[0], base + face[1], base + face[2]]);
            indices.extend([base + face[0], base + face[2], base + face[3]]);
        }
    };

    push_box(Vec3::new(0.0, 2.6, 0.0), Vec3::new(0.55, 0.8, 0.3), 1); // torso
    push_box(Vec3::new(0.0, 3.9, 0.0), Vec3::splat(0.35), 2); // head
    push_box(Vec3::new(-0.35, 1.0, 0.0), Vec3::new(0.22, 1.0, 0.25), 3);
    push_box(Vec3::new(0.35, 1.0, 0.0), Vec3::new(0.22, 1.0, 0.25), 4);
    push_box(Vec3::new(-0.8, 2.15, 0.0), Vec3::new(0.18, 0.65, 0.2), 5);
    push_box(Vec3::new(0.8, 2.15, 0.0), Vec3::new(0.18, 0.65, 0.2), 6);

    Geometry::new(positions, indices).with_skin(joints, weights)
}

/// 0.8 s locomotion cycle: legs and arms swing in opposite phase around X,
/// the hips bob vertically.
fn run_clip() -> AnimationClip {
    let times = vec![0.0, 0.2, 0.4, 0.6, 0.8];

    let swing = |amplitude: f32| -> Vec<Quat> {
        vec![
            Quat::from_rotation_x(amplitude),
            Quat::IDENTITY,
            Quat::from_rotation_x(-amplitude),
            Quat::IDENTITY,
            Quat::from_rotation_x(amplitude),
        ]
    };
    let counter_swing = |amplitude: f32| -> Vec<Quat> {
        vec![
            Quat::from_rotation_x(-amplitude),
            Quat::IDENTITY,
            Quat::from_rotation_x(amplitude),
            Quat::IDENTITY,
            Quat::from_rotation_x(-amplitude),
        ]
    };

    let rotation_track = |node: &str, values: Vec<Quat>| Track {
        meta: TrackMeta {
            node_name: node.to_string(),
            target: TargetPath::Rotation,
        },
        data: TrackData::Quaternion(KeyframeTrack::new(
            times.clone(),
            values,
            InterpolationMode::Linear,
        )),
    };

    let bob = Track {
        meta: TrackMeta {
            node_name: "Hips".to_string(),
            target: TargetPath::Translation,
        },
        data: TrackData::Vector3(KeyframeTrack::new(
            times.clone(),
            vec![
                Vec3::new(0.0, 2.46, 0.0),
                Vec3::new(0.0, 2.36, 0.0),
                Vec3::new(0.0, 2.46, 0.0),
                Vec3::new(0.0, 2.36, 0.0),
                Vec3::new(0.0, 2.46, 0.0),
            ],
            InterpolationMode::Linear,
        )),
    };

    AnimationClip::new(
        "Run",
        vec![
            rotation_track("LeftLeg", swing(0.8)),
            rotation_track("RightLeg", counter_swing(0.8)),
            rotation_track("LeftArm", counter_swing(0.6)),
            rotation_track("RightArm", swing(0.6)),
            bob,
        ],
    )
}
