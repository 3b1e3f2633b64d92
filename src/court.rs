//! Basketball court scene construction
//!
//! Builds the full static scene: the wooden slab with its painted markings,
//! two mirrored hoop assemblies just outside the baselines, and the ball at
//! center court. All positions are in court units with the slab top at
//! y = 0.1 and markings floating just above it.

use cgmath::Deg;

use crate::gfx::{
    geometry::{
        generate_box, generate_cylinder, generate_line, generate_ring, generate_sphere,
        generate_torus,
    },
    resources::Material,
    scene::{GroupNode, MeshNode, Scene},
};

// Court slab
pub const COURT_LENGTH: f32 = 30.0;
pub const COURT_THICKNESS: f32 = 0.2;
pub const COURT_WIDTH: f32 = 15.0;

/// Markings float just above the slab top (y = 0.1) to avoid z-fighting
pub const MARKING_HEIGHT: f32 = 0.11;

// Hoop assembly
pub const POLE_OFFSET: f32 = 15.5;
pub const BOARD_OFFSET: f32 = 14.2;
pub const RIM_HEIGHT: f32 = 4.5;
pub const RIM_RADIUS: f32 = 0.23;
pub const RIM_SETBACK: f32 = 0.3;

// Net
pub const NET_SEGMENTS: usize = 8;
pub const NET_HEIGHT: f32 = 0.5;
pub const NET_TOP_RADIUS: f32 = RIM_RADIUS;
pub const NET_BOTTOM_RADIUS: f32 = 0.13;

// Ball
pub const BALL_RADIUS: f32 = 0.24;
pub const SEAM_TUBE_RADIUS: f32 = 0.005;

/// Root indices of the nodes [`build_court`] inserts into the scene
///
/// Handy for tests and structural lookups; the scene owns the nodes.
pub struct CourtNodes {
    pub slab: usize,
    pub center_line: usize,
    pub center_circle: usize,
    /// Three-point arcs, left then right
    pub arcs: [usize; 2],
    /// Hoop assemblies, left then right
    pub hoops: [usize; 2],
    pub ball: usize,
}

/// Derived x positions for one hoop assembly
///
/// `side` is -1 for the left baseline and +1 for the right; all other
/// coordinates follow from it, so the two hoops are exact mirrors.
pub struct HoopLayout {
    pub side: f32,
    pub pole_x: f32,
    pub board_x: f32,
    pub arm_length: f32,
    pub arm_mid_x: f32,
    pub rim_x: f32,
}

impl HoopLayout {
    pub fn new(side: f32) -> Self {
        let pole_x = side * POLE_OFFSET;
        let board_x = side * BOARD_OFFSET;
        let setback = if side < 0.0 { RIM_SETBACK } else { -RIM_SETBACK };
        Self {
            side,
            pole_x,
            board_x,
            arm_length: (board_x - pole_x).abs().max(f32::EPSILON),
            arm_mid_x: (pole_x + board_x) / 2.0,
            rim_x: board_x + setback,
        }
    }

    /// Yaw turning the arm and backboard to face the court center
    pub fn facing_angle(&self) -> Deg<f32> {
        if self.side < 0.0 {
            Deg(90.0)
        } else {
            Deg(-90.0)
        }
    }
}

/// Endpoints of the eight net cords hanging from the rim
///
/// Each cord runs from the rim circle down and inward to a smaller circle,
/// in the net group's local space (origin at the rim center).
pub fn net_segments() -> Vec<([f32; 3], [f32; 3])> {
    (0..NET_SEGMENTS)
        .map(|i| {
            let angle = (i as f32 / NET_SEGMENTS as f32) * std::f32::consts::TAU;
            let (sin, cos) = angle.sin_cos();
            let top = [cos * NET_TOP_RADIUS, 0.0, sin * NET_TOP_RADIUS];
            let bottom = [cos * NET_BOTTOM_RADIUS, -NET_HEIGHT, sin * NET_BOTTOM_RADIUS];
            (top, bottom)
        })
        .collect()
}

/// Builds the whole court into `scene` and returns the root indices
///
/// Registers all materials, then inserts eight root nodes: the slab, three
/// marking meshes, both hoop assemblies, and the ball group.
pub fn build_court(scene: &mut Scene) -> CourtNodes {
    register_materials(scene);

    let slab = scene.add_node(
        MeshNode::new(
            "court_slab",
            generate_box(COURT_LENGTH, COURT_THICKNESS, COURT_WIDTH),
        )
        .with_material("court_floor")
        .receive_shadow(),
    );

    let center_line = scene.add_node(
        MeshNode::new("center_line", generate_box(0.2, 0.01, COURT_WIDTH))
            .with_material("court_line")
            .at(0.0, MARKING_HEIGHT, 0.0),
    );

    let center_circle = scene.add_node(
        MeshNode::new("center_circle", generate_ring(1.8, 2.0, 32, 0.0, std::f32::consts::TAU))
            .with_material("court_line")
            .at(0.0, MARKING_HEIGHT, 0.0)
            .rotated_x(Deg(-90.0)),
    );

    // Half-circle arcs opening toward center court
    let arc_left = scene.add_node(
        MeshNode::new(
            "three_point_arc_left",
            generate_ring(6.7, 6.9, 32, 0.0, std::f32::consts::PI),
        )
            .with_material("court_line")
            .at(-COURT_LENGTH / 2.0, MARKING_HEIGHT, 0.0)
            .rotated_x(Deg(-90.0))
            .rotated_z(Deg(-90.0)),
    );
    let arc_right = scene.add_node(
        MeshNode::new(
            "three_point_arc_right",
            generate_ring(6.7, 6.9, 32, 0.0, std::f32::consts::PI),
        )
            .with_material("court_line")
            .at(COURT_LENGTH / 2.0, MARKING_HEIGHT, 0.0)
            .rotated_x(Deg(-90.0))
            .rotated_z(Deg(90.0)),
    );

    let hoop_left = scene.add_node(hoop_assembly("hoop_left", HoopLayout::new(-1.0)));
    let hoop_right = scene.add_node(hoop_assembly("hoop_right", HoopLayout::new(1.0)));

    let ball = scene.add_node(ball_assembly());

    CourtNodes {
        slab,
        center_line,
        center_circle,
        arcs: [arc_left, arc_right],
        hoops: [hoop_left, hoop_right],
        ball,
    }
}

fn register_materials(scene: &mut Scene) {
    scene.add_material(Material::new(
        "court_floor",
        [0.776, 0.525, 0.259, 1.0],
        0.0,
        0.6,
    ));
    scene.add_material(Material::new("court_line", [1.0, 1.0, 1.0, 1.0], 0.0, 1.0).unlit());
    scene.add_material(Material::new(
        "hoop_steel",
        [0.333, 0.333, 0.333, 1.0],
        0.3,
        0.5,
    ));
    scene.add_material(
        Material::new("backboard", [1.0, 1.0, 1.0, 1.0], 0.0, 0.3).with_alpha(0.6),
    );
    scene.add_material(Material::new("rim", [1.0, 0.4, 0.0, 1.0], 0.3, 0.4));
    scene.add_material(Material::new(
        "basketball",
        [1.0, 0.498, 0.0, 1.0],
        0.05,
        0.7,
    ));
    scene.add_material(Material::new("seam", [0.0, 0.0, 0.0, 1.0], 0.0, 1.0).unlit());
    scene.add_material(Material::new("net_cord", [1.0, 1.0, 1.0, 1.0], 0.0, 1.0).unlit());
}

/// One complete hoop: pole, arm, backboard, rim, and the net group
fn hoop_assembly(name: &str, layout: HoopLayout) -> GroupNode {
    let facing = layout.facing_angle();

    let pole = MeshNode::new("pole", generate_cylinder(0.15, 6.0, 16))
        .with_material("hoop_steel")
        .cast_shadow()
        .at(layout.pole_x, 3.0, 0.0);

    let arm = MeshNode::new("arm", generate_box(0.2, 0.15, layout.arm_length))
        .with_material("hoop_steel")
        .cast_shadow()
        .at(layout.arm_mid_x, 5.0, 0.0)
        .rotated_y(facing);

    let backboard = MeshNode::new("backboard", generate_box(2.8, 1.6, 0.1))
        .with_material("backboard")
        .cast_shadow()
        .at(layout.board_x, 5.0, 0.0)
        .rotated_y(facing);

    let rim = MeshNode::new("rim", generate_torus(RIM_RADIUS, 0.02, 16, 8))
        .with_material("rim")
        .cast_shadow()
        .at(layout.rim_x, RIM_HEIGHT, 0.0)
        .rotated_x(Deg(-90.0));

    let mut net = GroupNode::new("net").at(layout.rim_x, RIM_HEIGHT, 0.0);
    for (i, (top, bottom)) in net_segments().into_iter().enumerate() {
        net.add_child(
            MeshNode::new(&format!("net_cord_{}", i), generate_line(top, bottom))
                .with_material("net_cord")
                .with_topology(wgpu::PrimitiveTopology::LineList)
                .into(),
        );
    }

    GroupNode::new(name)
        .with_child(pole.into())
        .with_child(arm.into())
        .with_child(backboard.into())
        .with_child(rim.into())
        .with_child(net.into())
}

/// The ball at center court with its five seam rings
///
/// The whole group casts shadows; the flag propagates to every child when
/// transforms are resolved.
fn ball_assembly() -> GroupNode {
    let sphere = MeshNode::new("ball_sphere", generate_sphere(BALL_RADIUS, 64, 64))
        .with_material("basketball");

    let seam_ring = || generate_torus(BALL_RADIUS, SEAM_TUBE_RADIUS, 64, 8);

    let equator = MeshNode::new("seam_equator", seam_ring()).with_material("seam");
    let meridian_a = MeshNode::new("seam_meridian_a", seam_ring())
        .with_material("seam")
        .rotated_x(Deg(45.0));
    let meridian_b = MeshNode::new("seam_meridian_b", seam_ring())
        .with_material("seam")
        .rotated_x(Deg(90.0));
    let meridian_c = MeshNode::new("seam_meridian_c", seam_ring())
        .with_material("seam")
        .rotated_x(Deg(-45.0));
    let meridian_z = MeshNode::new("seam_meridian_z", seam_ring())
        .with_material("seam")
        .rotated_z(Deg(90.0));

    GroupNode::new("basketball")
        .at(0.0, BALL_RADIUS + COURT_THICKNESS / 2.0, 0.0)
        .cast_shadow()
        .with_child(sphere.into())
        .with_child(equator.into())
        .with_child(meridian_a.into())
        .with_child(meridian_b.into())
        .with_child(meridian_c.into())
        .with_child(meridian_z.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{
        camera_controller::CameraController, camera_utils::CameraManager,
        orbit_camera::OrbitCamera,
    };
    use cgmath::Vector3;

    fn court_scene() -> (Scene, CourtNodes) {
        let camera = OrbitCamera::new(33.5, 0.46, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.5);
        let controller = CameraController::new(0.005, 0.1);
        let mut scene = Scene::new(CameraManager::new(camera, controller));
        let nodes = build_court(&mut scene);
        scene.propagate_transforms();
        (scene, nodes)
    }

    #[test]
    fn census_matches_construction() {
        let (scene, nodes) = court_scene();

        assert_eq!(scene.roots().len(), 8);
        assert_eq!(scene.mesh_count(), 35);

        assert_eq!(scene.roots()[nodes.slab].name(), "court_slab");
        assert_eq!(scene.roots()[nodes.ball].name(), "basketball");
    }

    #[test]
    fn hoops_mirror_each_other() {
        let left = HoopLayout::new(-1.0);
        let right = HoopLayout::new(1.0);

        assert!((left.pole_x + right.pole_x).abs() < 1e-6);
        assert!((left.board_x + right.board_x).abs() < 1e-6);
        assert!((left.rim_x + right.rim_x).abs() < 1e-6);
        assert!((left.arm_length - right.arm_length).abs() < 1e-6);

        assert!((left.pole_x - (-15.5)).abs() < 1e-6);
        assert!((right.board_x - 14.2).abs() < 1e-6);
        // Rim sits between the backboard and center court
        assert!((right.rim_x - 13.9).abs() < 1e-6);
    }

    #[test]
    fn arm_spans_pole_to_board() {
        let layout = HoopLayout::new(1.0);
        assert!((layout.arm_length - 1.3).abs() < 1e-5);
        assert!((layout.arm_mid_x - 14.85).abs() < 1e-5);
    }

    #[test]
    fn net_cords_hang_between_the_two_circles() {
        let segments = net_segments();
        assert_eq!(segments.len(), 8);

        for (i, (top, bottom)) in segments.iter().enumerate() {
            let top_r = (top[0] * top[0] + top[2] * top[2]).sqrt();
            let bottom_r = (bottom[0] * bottom[0] + bottom[2] * bottom[2]).sqrt();

            assert!((top_r - NET_TOP_RADIUS).abs() < 1e-5);
            assert!((bottom_r - NET_BOTTOM_RADIUS).abs() < 1e-5);
            assert_eq!(top[1], 0.0);
            assert!((bottom[1] + NET_HEIGHT).abs() < 1e-6);

            // Cords sit at multiples of 45 degrees
            let angle = (i as f32 / 8.0) * std::f32::consts::TAU;
            assert!((top[0] - angle.cos() * NET_TOP_RADIUS).abs() < 1e-5);
            assert!((top[2] - angle.sin() * NET_TOP_RADIUS).abs() < 1e-5);
        }
    }

    #[test]
    fn ball_rests_on_the_slab() {
        let (scene, _) = court_scene();
        let ball = scene.find_node("ball_sphere").unwrap().as_mesh().unwrap();
        let pos = ball.world_position();

        assert!(pos.x.abs() < 1e-6);
        assert!((pos.y - 0.34).abs() < 1e-6);
        assert!(pos.z.abs() < 1e-6);
    }

    #[test]
    fn ball_group_shadow_flag_reaches_all_children() {
        let (scene, _) = court_scene();
        let group = scene
            .roots()
            .iter()
            .find(|n| n.name() == "basketball")
            .and_then(|n| n.as_group())
            .unwrap();
        assert_eq!(group.children.len(), 6);

        for mesh in scene.meshes() {
            if mesh.name.starts_with("seam") || mesh.name == "ball_sphere" {
                assert!(mesh.cast_shadow, "{} should cast a shadow", mesh.name);
            }
        }
        let slab = scene.find_node("court_slab").unwrap().as_mesh().unwrap();
        assert!(!slab.cast_shadow);
        assert!(slab.receive_shadow);
    }

    #[test]
    fn net_cords_are_line_meshes() {
        let (scene, _) = court_scene();
        let cords: Vec<_> = scene
            .meshes()
            .into_iter()
            .filter(|m| m.name.starts_with("net_cord"))
            .collect();
        assert_eq!(cords.len(), 16);

        for cord in cords {
            assert_eq!(cord.topology, wgpu::PrimitiveTopology::LineList);
            assert_eq!(cord.geometry.vertices.len(), 2);
        }
    }

    #[test]
    fn degenerate_side_stays_finite() {
        let layout = HoopLayout::new(0.0);
        assert!(layout.pole_x.is_finite());
        assert!(layout.arm_length.is_finite());
        assert!(layout.arm_length > 0.0);
        assert!(layout.rim_x.is_finite());
    }

    #[test]
    fn markings_use_unlit_materials() {
        let (scene, nodes) = court_scene();
        let circle = scene.roots()[nodes.center_circle].as_mesh().unwrap();
        let material = scene.material_for_mesh(circle);
        assert!(material.unlit);
        assert!(!material.is_transparent());

        let backboard = scene.find_node("backboard").unwrap().as_mesh().unwrap();
        let board_material = scene.material_for_mesh(backboard);
        assert!(board_material.is_transparent());
    }
}
