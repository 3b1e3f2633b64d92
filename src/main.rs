use anyhow::Result;
use courtside::{build_court, CourtApp};

fn main() -> Result<()> {
    env_logger::init();

    let mut app = CourtApp::new()?;
    let nodes = build_court(app.scene_mut());

    let stats = app.scene().statistics();
    log::info!(
        "Court built: {} roots, {} meshes, {} materials, {} triangles",
        stats.root_count,
        stats.mesh_count,
        stats.material_count,
        stats.total_triangles
    );
    log::debug!(
        "Hoop roots at indices {} and {}",
        nodes.hoops[0],
        nodes.hoops[1]
    );

    app.run()?;
    Ok(())
}
