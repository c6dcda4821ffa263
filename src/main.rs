use geogrid_rs::{
    BoundingBox, CellGeometry, GeoPoint, GridCell, GridError, GridLineGenerator, decode,
    grid_lines_to_geojson,
};
use log::info;

fn main() -> Result<(), GridError> {
    env_logger::init();

    let point = GeoPoint::new(52.26, 10.525);
    let cell = GridCell::encode(&point, 10)?;

    println!("Cell ID: {}", cell.id);
    println!("Zone: {}, Level: {}", cell.zone, cell.level);
    println!("Bounds: {:?}", cell.bounds);
    println!("WKT: {}", cell.to_wkt());

    match decode(&cell.id) {
        Some(bounds) => println!("Decoded: {:?}", bounds),
        None => println!("Could not decode {}", cell.id),
    }

    let viewport = BoundingBox::from_lat_lon((52.15, 10.2), (52.5, 10.8))?;
    let lines = GridLineGenerator::default().generate_for_zoom(&viewport, 14)?;
    info!("Overlay at level {} has {} lines", lines.level, lines.len());

    println!(
        "Overlay: {} parallels, {} meridian ticks",
        lines.parallels.len(),
        lines.meridian_ticks.len()
    );
    println!("{}", grid_lines_to_geojson(&lines));

    Ok(())
}
